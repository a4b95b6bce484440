//! Page flows shared by every page of the site.
//!
//! Each flow is a short sequence of waits and clicks wrapped in
//! [`retry::execute`] under the suite's action policy, so a transient UI
//! failure costs a retry instead of a failed test.

pub mod home;
pub mod shorts;
pub mod urls;

#[cfg(test)]
mod testing;

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::browser::{Browser, ElementState, LoadState};
use crate::config::SuiteConfig;
use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::retry::{self, RetryPolicy};

/// Entries of the guide (hamburger) menu that flows can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideItem {
	Home,
	Shorts,
	Subscriptions,
	You,
	History,
}

impl GuideItem {
	/// The entry's exact `title` attribute.
	pub fn title(&self) -> &'static str {
		match self {
			GuideItem::Home => "Home",
			GuideItem::Shorts => "Shorts",
			GuideItem::Subscriptions => "Subscriptions",
			GuideItem::You => "You",
			GuideItem::History => "History",
		}
	}
}

impl fmt::Display for GuideItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.title())
	}
}

/// Flows and locators available on every page.
pub struct SitePage<'a, B: Browser + ?Sized> {
	browser: &'a B,
	policy: RetryPolicy,
	timeout: Duration,
	navigation_timeout: Duration,
}

impl<B: Browser + ?Sized> Clone for SitePage<'_, B> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<B: Browser + ?Sized> Copy for SitePage<'_, B> {}

impl<'a, B: Browser + ?Sized> SitePage<'a, B> {
	pub fn new(browser: &'a B, config: &SuiteConfig) -> Self {
		Self {
			browser,
			policy: config.action_retry,
			timeout: config.default_timeout,
			navigation_timeout: config.navigation_timeout,
		}
	}

	/// Overrides the retry policy applied to every flow.
	pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn browser(&self) -> &'a B {
		self.browser
	}

	pub fn policy(&self) -> &RetryPolicy {
		&self.policy
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	pub fn navigation_timeout(&self) -> Duration {
		self.navigation_timeout
	}

	pub fn home_button(&self) -> Locator {
		Locator::css("#start").locate(Locator::role("link", "YouTube Home"))
	}

	pub fn guide(&self) -> Locator {
		Locator::css("#start #guide-button").locate(Locator::label("Guide"))
	}

	pub fn search_button(&self) -> Locator {
		Locator::exact_role("button", "Search")
	}

	pub fn voice_button(&self) -> Locator {
		Locator::label("Search with your voice")
	}

	pub fn search_box(&self) -> Locator {
		Locator::role("combobox", "Search")
	}

	/// Visible only while signed out.
	pub fn login_button(&self) -> Locator {
		Locator::label("Sign in")
	}

	/// Visible only while signed in.
	pub fn account_menu(&self) -> Locator {
		Locator::label("Account menu")
	}

	pub fn guide_content(&self) -> Locator {
		Locator::css("#guide-content")
	}

	pub fn guide_close_button(&self) -> Locator {
		Locator::css("#guide-content #button")
	}

	pub fn guide_item(&self, item: GuideItem) -> Locator {
		Locator::css("#sections").locate(Locator::exact_title(item.title()))
	}

	/// Waits for `locator` to be visible, then clicks it.
	async fn click_visible(&self, locator: &Locator) -> anyhow::Result<()> {
		self.browser.wait_for(locator, ElementState::Visible, self.timeout).await?;
		self.browser.click(locator).await
	}

	pub async fn click_home_button(&self) -> Result<()> {
		info!(target: "tubewright", "Clicking home button...");
		let this = *self;
		let button = self.home_button();
		let button = &button;
		retry::execute("Click home button", &self.policy, || async move { this.click_visible(button).await }).await
	}

	/// Opens the guide menu unless it is already open.
	pub async fn open_guide_menu(&self) -> Result<()> {
		info!(target: "tubewright", "Opening guide menu...");
		let this = *self;
		let (guide, content) = (self.guide(), self.guide_content());
		let (guide, content) = (&guide, &content);
		retry::execute("Open guide menu", &self.policy, || async move {
			this.browser.wait_for(guide, ElementState::Visible, this.timeout).await?;
			let selected = this.browser.attribute(guide, "aria-selected").await?;
			if selected.as_deref() == Some("true") {
				debug!(target: "tubewright", "Guide menu is already open.");
				return Ok(());
			}
			this.browser.click(guide).await?;
			this.browser.wait_for(content, ElementState::Visible, this.timeout).await
		})
		.await
	}

	/// Clicks the search button and waits for the results to settle.
	pub async fn submit_search(&self) -> Result<()> {
		info!(target: "tubewright", "Clicking search button...");
		let this = *self;
		let button = self.search_button();
		let button = &button;
		retry::execute("Submit search", &self.policy, || async move {
			this.click_visible(button).await?;
			this.browser
				.wait_for_load_state(LoadState::NetworkIdle, Some(this.timeout))
				.await
		})
		.await
	}

	/// Types `input` into the search box and submits it.
	pub async fn search_query(&self, input: &str) -> Result<()> {
		info!(target: "tubewright", "Searching for {input} ...");
		let this = *self;
		let search_box = self.search_box();
		let search_box = &search_box;
		retry::execute("Search query", &self.policy, || async move {
			this.browser.wait_for(search_box, ElementState::Visible, this.timeout).await?;
			this.browser.fill(search_box, input).await?;
			this.submit_search().await?;
			Ok::<_, anyhow::Error>(())
		})
		.await
	}

	pub async fn click_voice_button(&self) -> Result<()> {
		info!(target: "tubewright", "Clicking voice button...");
		let this = *self;
		let button = self.voice_button();
		let button = &button;
		retry::execute("Click voice button", &self.policy, || async move { this.click_visible(button).await }).await
	}

	/// Opens the guide menu and follows one of its entries.
	pub async fn navigate_to_guide_item(&self, item: GuideItem) -> Result<()> {
		info!(target: "tubewright", "Navigating to {item}...");
		let this = *self;
		let entry = self.guide_item(item);
		let entry = &entry;
		retry::execute(&format!("Navigate to {item}"), &self.policy, || async move {
			this.open_guide_menu().await?;
			this.click_visible(entry).await?;
			this.browser
				.wait_for_load_state(LoadState::NetworkIdle, Some(this.timeout))
				.await?;
			Ok::<_, anyhow::Error>(())
		})
		.await
	}

	/// Navigates to `path`, resolved against the current URL, and waits for the
	/// page to go quiet.
	pub async fn goto(&self, path: &str) -> Result<()> {
		let url = resolve(&self.browser.url(), path)?;
		info!(target: "tubewright", "Navigating to {url}");
		let this = *self;
		let url = url.as_str();
		retry::execute("Page navigation", &self.policy, || async move {
			this.browser.goto(url).await?;
			this.browser.wait_for_load_state(LoadState::DomContentLoaded, None).await?;
			this.browser
				.wait_for_load_state(LoadState::NetworkIdle, Some(this.timeout))
				.await
		})
		.await
	}

	/// Returns whether the signed-in account menu is showing.
	pub async fn is_signed_in(&self) -> Result<bool> {
		Ok(self.browser.is_visible(&self.account_menu()).await?)
	}
}

fn resolve(current: &str, path: &str) -> Result<url::Url> {
	let base = url::Url::parse(current).map_err(|err| Error::InvalidUrl(format!("{current}: {err}")))?;
	base.join(path)
		.map_err(|err| Error::InvalidUrl(format!("{path} (relative to {current}): {err}")))
}
