//! The shorts feed.
//!
//! Shorts are rendered as a vertical list of containers whose ids are the
//! decimal index of the short (`0`, `1`, ...). Most controls exist once per
//! container, so their locators are scoped to the active short through a
//! [`ShortsCursor`].

use tracing::info;

use super::SitePage;
use super::urls;
use crate::browser::{Browser, LoadState};
use crate::error::Result;
use crate::locator::Locator;

/// Index of the short currently on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortsCursor {
	index: usize,
}

impl ShortsCursor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn index(&self) -> usize {
		self.index
	}

	pub fn advance(&mut self) {
		self.index += 1;
	}

	/// Moves to the previous short, stopping at the first one.
	pub fn retreat(&mut self) {
		self.index = self.index.saturating_sub(1);
	}

	/// Selector for the active short's container.
	///
	/// Ids starting with a digit must be CSS-escaped: the first digit becomes a
	/// hex code point (`\3N`), terminated by a space when more digits follow.
	pub fn scope(&self) -> Locator {
		let digits = self.index.to_string();
		let (first, rest) = digits.split_at(1);
		let escaped = if rest.is_empty() {
			format!(r"\3{first}")
		} else {
			format!(r"\3{first} {rest}")
		};
		Locator::css(format!(r#"[id="{escaped}"]"#))
	}

	/// `inner` inside the active short.
	pub fn within(&self, inner: Locator) -> Locator {
		self.scope().locate(inner)
	}
}

pub struct ShortsPage<'a, B: Browser + ?Sized> {
	site: SitePage<'a, B>,
	cursor: ShortsCursor,
}

impl<'a, B: Browser + ?Sized> ShortsPage<'a, B> {
	pub fn new(site: SitePage<'a, B>) -> Self {
		Self {
			site,
			cursor: ShortsCursor::new(),
		}
	}

	/// Shared flows (search, guide menu, ...) of the underlying page.
	pub fn site(&self) -> &SitePage<'a, B> {
		&self.site
	}

	pub fn cursor(&self) -> ShortsCursor {
		self.cursor
	}

	pub fn like_button(&self) -> Locator {
		Locator::css("#like-button").locate(Locator::label("like this video along with"))
	}

	pub fn dislike_button(&self) -> Locator {
		Locator::css("#dislike-button").locate(Locator::label("Dislike this video"))
	}

	pub fn comments_button(&self) -> Locator {
		self.cursor.within(Locator::css("#comments-button button"))
	}

	pub fn more_actions_button(&self) -> Locator {
		Locator::role("button", "More actions")
	}

	pub fn next_short_button(&self) -> Locator {
		Locator::label("Next video")
	}

	pub fn previous_short_button(&self) -> Locator {
		Locator::label("Previous video")
	}

	pub fn share_button(&self) -> Locator {
		self.cursor.within(Locator::role("button", "Share"))
	}

	pub fn player(&self) -> Locator {
		self.cursor.within(Locator::css("#shorts-player"))
	}

	pub fn video(&self) -> Locator {
		self.cursor.within(Locator::css("#shorts-player video"))
	}

	/// Container whose `style` carries the first-frame thumbnail.
	pub fn thumbnail(&self) -> Locator {
		self.cursor.within(Locator::css(".player-container"))
	}

	pub fn volume_button(&self) -> Locator {
		self.cursor
			.within(Locator::css(".YtdDesktopShortsVolumeControlsMuteIconButton"))
	}

	pub fn volume(&self) -> Locator {
		self.cursor.within(Locator::label("Volume"))
	}

	pub fn play_button(&self) -> Locator {
		self.cursor.within(Locator::exact_label("Play"))
	}

	/// Opens the feed and waits until it has redirected to a concrete short.
	pub async fn goto(&mut self) -> Result<()> {
		info!(target: "tubewright", "Opening shorts feed...");
		let browser = self.site.browser();
		browser.goto(urls::SHORTS_URL).await?;
		browser.wait_for_url(urls::shorts(), self.site.navigation_timeout()).await?;
		self.cursor = ShortsCursor::new();
		Ok(())
	}

	pub async fn next_short(&mut self) -> Result<()> {
		self.site.browser().click(&self.next_short_button()).await?;
		self.cursor.advance();
		Ok(())
	}

	pub async fn previous_short(&mut self) -> Result<()> {
		self.site.browser().click(&self.previous_short_button()).await?;
		self.cursor.retreat();
		Ok(())
	}

	pub async fn go_forward(&mut self) -> Result<()> {
		self.site.browser().go_forward(LoadState::NetworkIdle).await?;
		self.cursor.advance();
		Ok(())
	}

	pub async fn go_back(&mut self) -> Result<()> {
		self.site.browser().go_back(LoadState::NetworkIdle).await?;
		self.cursor.retreat();
		Ok(())
	}

	pub async fn click_share_button(&self) -> Result<()> {
		Ok(self.site.browser().click(&self.share_button()).await?)
	}

	/// Starts playback if the active short is paused. Returns whether it clicked.
	pub async fn click_play_if_visible(&self) -> Result<bool> {
		let play = self.play_button();
		let browser = self.site.browser();
		if !browser.is_visible(&play).await? {
			return Ok(false);
		}
		browser.click(&play).await?;
		Ok(true)
	}

	/// `style` of the active short's player container.
	pub async fn thumbnail_style(&self) -> Result<Option<String>> {
		Ok(self.site.browser().attribute(&self.thumbnail(), "style").await?)
	}
}
