//! Seams to the browser-automation collaborator.
//!
//! Nothing in this crate drives a browser. [`SessionContext`] is what session
//! bootstrap needs from a browser context; [`Browser`] is what the page flows
//! need from a page. Implementations wrap a real automation library.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tubewright_protocol::{Cookie, StorageEntries};

use crate::locator::Locator;

/// When a navigation is considered finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
	/// Wait for the `load` event.
	#[default]
	Load,
	/// Wait for the `DOMContentLoaded` event.
	DomContentLoaded,
	/// Wait until there are no network connections for at least 500ms.
	NetworkIdle,
}

impl LoadState {
	pub fn as_str(&self) -> &'static str {
		match self {
			LoadState::Load => "load",
			LoadState::DomContentLoaded => "domcontentloaded",
			LoadState::NetworkIdle => "networkidle",
		}
	}
}

/// Element state to wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
	Attached,
	Detached,
	Visible,
	Hidden,
}

/// Cookie store plus key/value storage of one browser context.
///
/// Bootstrap borrows the context mutably for its whole run, so no other code
/// can touch the session while credentials are being applied.
#[async_trait]
pub trait SessionContext: Send {
	/// Adds cookies to the context's cookie store.
	async fn add_cookies(&mut self, cookies: &[Cookie]) -> anyhow::Result<()>;

	/// Arranges for `entries` to be present in localStorage on every page load.
	async fn add_storage_entries(&mut self, entries: &StorageEntries) -> anyhow::Result<()>;

	/// Reloads the current page so installed credentials take effect.
	async fn reload(&mut self) -> anyhow::Result<()>;

	/// Returns whether the element is currently visible. Never waits.
	async fn is_visible(&mut self, locator: &Locator) -> anyhow::Result<bool>;
}

/// A single page, as seen by the page flows.
#[async_trait]
pub trait Browser: Send + Sync {
	async fn goto(&self, url: &str) -> anyhow::Result<()>;

	/// URL of the current page.
	fn url(&self) -> String;

	async fn wait_for(&self, locator: &Locator, state: ElementState, timeout: Duration) -> anyhow::Result<()>;

	async fn wait_for_load_state(&self, state: LoadState, timeout: Option<Duration>) -> anyhow::Result<()>;

	async fn wait_for_url(&self, pattern: &Regex, timeout: Duration) -> anyhow::Result<()>;

	async fn click(&self, locator: &Locator) -> anyhow::Result<()>;

	async fn fill(&self, locator: &Locator, value: &str) -> anyhow::Result<()>;

	async fn attribute(&self, locator: &Locator, name: &str) -> anyhow::Result<Option<String>>;

	async fn is_visible(&self, locator: &Locator) -> anyhow::Result<bool>;

	async fn go_back(&self, wait_until: LoadState) -> anyhow::Result<()>;

	async fn go_forward(&self, wait_until: LoadState) -> anyhow::Result<()>;
}
