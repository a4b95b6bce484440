//! In-memory [`Browser`] for page-flow tests.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::bail;
use async_trait::async_trait;
use parking_lot::Mutex;
use regex::Regex;

use crate::browser::{Browser, ElementState, LoadState};
use crate::locator::Locator;

/// Records every call as `"<op> <target>"` and fails calls on request.
#[derive(Default)]
pub(crate) struct FakeBrowser {
	url: Mutex<String>,
	calls: Mutex<Vec<String>>,
	failures: Mutex<HashMap<String, u32>>,
	attributes: Mutex<HashMap<(String, String), String>>,
	visible: Mutex<Vec<String>>,
}

impl FakeBrowser {
	pub(crate) fn at(url: &str) -> Self {
		let browser = Self::default();
		*browser.url.lock() = url.to_string();
		browser
	}

	/// Makes the next `times` calls recorded as `call` fail.
	pub(crate) fn fail(&self, call: impl Into<String>, times: u32) {
		self.failures.lock().insert(call.into(), times);
	}

	pub(crate) fn set_attribute(&self, locator: &Locator, name: &str, value: &str) {
		self.attributes
			.lock()
			.insert((locator.to_string(), name.to_string()), value.to_string());
	}

	pub(crate) fn show(&self, locator: &Locator) {
		self.visible.lock().push(locator.to_string());
	}

	pub(crate) fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}

	pub(crate) fn count(&self, call: &str) -> usize {
		self.calls.lock().iter().filter(|c| *c == call).count()
	}

	fn record(&self, call: String) -> anyhow::Result<()> {
		self.calls.lock().push(call.clone());
		let mut failures = self.failures.lock();
		if let Some(remaining) = failures.get_mut(&call) {
			if *remaining > 0 {
				*remaining -= 1;
				bail!("{call}: Timeout exceeded");
			}
		}
		Ok(())
	}
}

#[async_trait]
impl Browser for FakeBrowser {
	async fn goto(&self, url: &str) -> anyhow::Result<()> {
		self.record(format!("goto {url}"))?;
		*self.url.lock() = url.to_string();
		Ok(())
	}

	fn url(&self) -> String {
		self.url.lock().clone()
	}

	async fn wait_for(&self, locator: &Locator, state: ElementState, _timeout: Duration) -> anyhow::Result<()> {
		self.record(format!("wait_for {locator} {state:?}"))
	}

	async fn wait_for_load_state(&self, state: LoadState, _timeout: Option<Duration>) -> anyhow::Result<()> {
		self.record(format!("load_state {}", state.as_str()))
	}

	async fn wait_for_url(&self, pattern: &Regex, _timeout: Duration) -> anyhow::Result<()> {
		self.record(format!("wait_for_url {pattern}"))
	}

	async fn click(&self, locator: &Locator) -> anyhow::Result<()> {
		self.record(format!("click {locator}"))
	}

	async fn fill(&self, locator: &Locator, value: &str) -> anyhow::Result<()> {
		self.record(format!("fill {locator} {value}"))
	}

	async fn attribute(&self, locator: &Locator, name: &str) -> anyhow::Result<Option<String>> {
		self.record(format!("attribute {locator} {name}"))?;
		Ok(self.attributes.lock().get(&(locator.to_string(), name.to_string())).cloned())
	}

	async fn is_visible(&self, locator: &Locator) -> anyhow::Result<bool> {
		let key = locator.to_string();
		self.record(format!("is_visible {key}"))?;
		Ok(self.visible.lock().contains(&key))
	}

	async fn go_back(&self, wait_until: LoadState) -> anyhow::Result<()> {
		self.record(format!("go_back {}", wait_until.as_str()))
	}

	async fn go_forward(&self, wait_until: LoadState) -> anyhow::Result<()> {
		self.record(format!("go_forward {}", wait_until.as_str()))
	}
}
