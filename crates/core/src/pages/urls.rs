//! URL and title patterns of the site under test.

use std::sync::LazyLock;

use regex::Regex;

const ORIGIN: &str = r"^https?://(www\.)?youtube\.com";

static HOME: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!(r"{ORIGIN}/?(\?.*)?$")).unwrap());
static SHORTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!(r"{ORIGIN}/shorts/.+$")).unwrap());
static SUBSCRIPTIONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!(r"{ORIGIN}/feed/subscriptions")).unwrap());
static FILTERED_RESULTS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(&format!(r"{ORIGIN}/results\?search_query=.+&sp=.+$")).unwrap());
static VIDEO_HREF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(watch\?v=.+$)|(shorts/.+$)").unwrap());
static SHORTS_THUMBNAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".+frame0\.jpg").unwrap());

/// The landing page, with or without a trailing slash or query string.
pub fn home() -> &'static Regex {
	&HOME
}

/// Any individual short.
pub fn shorts() -> &'static Regex {
	&SHORTS
}

pub fn subscriptions() -> &'static Regex {
	&SUBSCRIPTIONS
}

/// Search results narrowed by at least one filter (`&sp=`).
pub fn filtered_results() -> &'static Regex {
	&FILTERED_RESULTS
}

/// `href` of a result thumbnail that links to a video or a short.
pub fn video_href() -> &'static Regex {
	&VIDEO_HREF
}

/// `style` of a short's player container once its first frame is loaded.
pub fn shorts_thumbnail() -> &'static Regex {
	&SHORTS_THUMBNAIL
}

/// Results page for `query`, with the query form-encoded as the site does.
pub fn search_results(query: &str) -> Regex {
	let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
	Regex::new(&format!(r"{ORIGIN}/results\?search_query={}", regex::escape(&encoded)))
		.expect("escaped query is always a valid pattern")
}

/// Document title of a page named `name` (e.g. a search term).
pub fn page_title(name: &str) -> String {
	format!("{name} - YouTube")
}

pub const HOME_TITLE: &str = "YouTube";
pub const SHORTS_URL: &str = "https://www.youtube.com/shorts/";

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn home_matches_only_the_landing_page() {
		assert!(home().is_match("https://www.youtube.com/"));
		assert!(home().is_match("http://youtube.com"));
		assert!(home().is_match("https://www.youtube.com/?app=desktop"));
		assert!(!home().is_match("https://www.youtube.com/results?search_query=rust"));
		assert!(!home().is_match("https://www.youtube.com/feed/subscriptions"));
		assert!(!home().is_match("https://www.youtube.com.evil.example/"));
	}

	#[test]
	fn shorts_needs_a_short_id() {
		assert!(shorts().is_match("https://www.youtube.com/shorts/dQw4w9WgXcQ"));
		assert!(!shorts().is_match("https://www.youtube.com/shorts/"));
	}

	#[test]
	fn search_results_encode_the_query() {
		let re = search_results("rust & c++");
		assert!(re.is_match("https://www.youtube.com/results?search_query=rust+%26+c%2B%2B"));
		assert!(!re.is_match("https://www.youtube.com/results?search_query=rust"));
	}

	#[test]
	fn filtered_results_require_sp_param() {
		assert!(filtered_results().is_match("https://www.youtube.com/results?search_query=news&sp=EgJAAQ%253D%253D"));
		assert!(!filtered_results().is_match("https://www.youtube.com/results?search_query=news"));
	}

	#[test]
	fn video_hrefs() {
		assert!(video_href().is_match("/watch?v=abc123"));
		assert!(video_href().is_match("/shorts/abc123"));
		assert!(!video_href().is_match("/channel/UC123"));
	}

	#[test]
	fn titles() {
		assert_eq!(page_title("Subscriptions"), "Subscriptions - YouTube");
		assert!(shorts_thumbnail().is_match("background: url(\"https://i.ytimg.com/vi/x/frame0.jpg\")"));
	}
}
