//! Cookie types in the format Playwright's `addCookies` accepts.

use serde::{Deserialize, Serialize};

/// SameSite cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
	/// Sent with same-site and cross-site requests
	#[serde(rename = "None")]
	None,
	/// Sent with same-site requests and cross-site top-level navigations
	#[default]
	#[serde(rename = "Lax")]
	Lax,
	/// Only sent with same-site requests
	#[serde(rename = "Strict")]
	Strict,
}

/// A browser cookie as exported from a signed-in session.
///
/// Either `domain` or `url` must be present for a browser to accept it; this
/// type does not enforce that, the browser collaborator does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
	pub name: String,

	pub value: String,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,

	/// Unix timestamp in seconds (-1 means session cookie)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires: Option<f64>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub http_only: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub secure: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub same_site: Option<SameSite>,

	/// URL to infer domain and path from
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

impl Cookie {
	/// Creates a domain-scoped cookie.
	pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			domain: Some(domain.into()),
			path: None,
			expires: None,
			http_only: None,
			secure: None,
			same_site: None,
			url: None,
		}
	}

	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	pub fn expires(mut self, expires: f64) -> Self {
		self.expires = Some(expires);
		self
	}

	pub fn http_only(mut self, http_only: bool) -> Self {
		self.http_only = Some(http_only);
		self
	}

	pub fn secure(mut self, secure: bool) -> Self {
		self.secure = Some(secure);
		self
	}

	pub fn same_site(mut self, same_site: SameSite) -> Self {
		self.same_site = Some(same_site);
		self
	}

	/// Returns `true` for cookies without an expiry (or with the `-1` marker).
	pub fn is_session(&self) -> bool {
		self.expires.is_none_or(|e| e < 0.0)
	}
}
