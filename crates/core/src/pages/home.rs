//! The landing page.

use tracing::info;

use super::{SitePage, resolve};
use crate::browser::{Browser, LoadState};
use crate::config::SuiteConfig;
use crate::error::Result;
use crate::locator::Locator;

pub struct HomePage<'a, B: Browser + ?Sized> {
	site: SitePage<'a, B>,
	base_url: String,
}

impl<'a, B: Browser + ?Sized> HomePage<'a, B> {
	pub fn new(browser: &'a B, config: &SuiteConfig) -> Self {
		Self {
			site: SitePage::new(browser, config),
			base_url: config.base_url.clone(),
		}
	}

	pub fn site(&self) -> &SitePage<'a, B> {
		&self.site
	}

	/// One row of the recommendation grid.
	pub fn video_row(&self) -> Locator {
		Locator::css("ytd-rich-grid-row")
	}

	pub fn body(&self) -> Locator {
		Locator::css("contents").locate(Locator::css("ytd-rich-grid-renderer"))
	}

	/// Headline shown instead of recommendations when history is empty.
	pub fn get_started_title(&self) -> Locator {
		Locator::label("Try searching to get started")
	}

	pub fn get_started_subtitle(&self) -> Locator {
		Locator::label("Start watching videos to help")
	}

	/// Every filter chip above the grid.
	pub fn chips(&self) -> Locator {
		Locator::any_role("tab")
	}

	pub fn chip(&self, index: usize) -> Locator {
		self.chips().nth(index)
	}

	/// Opens the root of the configured base URL.
	pub async fn goto(&self) -> Result<()> {
		let url = resolve(&self.base_url, "/")?;
		info!(target: "tubewright", "Opening home page {url}");
		let browser = self.site.browser();
		browser.goto(url.as_str()).await?;
		browser.wait_for_load_state(LoadState::DomContentLoaded, None).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::super::testing::FakeBrowser;
	use super::super::urls;
	use super::*;
	use crate::error::Error;

	#[tokio::test]
	async fn goto_opens_root_of_base_url() {
		let browser = FakeBrowser::at("about:blank");
		let config = SuiteConfig {
			base_url: "https://www.youtube.com/feed/you".into(),
			..Default::default()
		};

		HomePage::new(&browser, &config).goto().await.unwrap();

		assert_eq!(
			browser.calls(),
			vec!["goto https://www.youtube.com/", "load_state domcontentloaded"]
		);
		assert!(urls::home().is_match(&browser.url()));
	}

	#[tokio::test]
	async fn unparsable_base_url_is_rejected() {
		let browser = FakeBrowser::at("about:blank");
		let config = SuiteConfig {
			base_url: "youtube".into(),
			..Default::default()
		};

		let err = HomePage::new(&browser, &config).goto().await.unwrap_err();

		assert!(matches!(err, Error::InvalidUrl(_)));
		assert!(browser.calls().is_empty());
	}

	#[tokio::test]
	async fn failed_navigation_surfaces_browser_error() {
		let browser = FakeBrowser::at("about:blank");
		browser.fail("goto https://www.youtube.com/", 1);

		let err = HomePage::new(&browser, &SuiteConfig::default()).goto().await.unwrap_err();

		assert!(matches!(err, Error::Browser(_)));
		assert!(err.to_string().contains("Timeout exceeded"), "{err}");
	}

	#[test]
	fn grid_and_chip_locators() {
		let browser = FakeBrowser::at("about:blank");
		let home = HomePage::new(&browser, &SuiteConfig::default());

		assert_eq!(home.body().to_string(), "contents >> ytd-rich-grid-renderer");
		assert_eq!(home.chip(2).to_string(), "internal:role=tab >> nth=2");
		assert_eq!(
			home.get_started_title().to_string(),
			r#"internal:label="Try searching to get started"i"#
		);
	}
}
