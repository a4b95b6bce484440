//! Session credentials: cookies plus localStorage entries.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::cookie::Cookie;

/// localStorage key/value pairs, applied to every page of the session.
pub type StorageEntries = BTreeMap<String, String>;

/// Everything needed to turn an anonymous browser context into a signed-in one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionCredentials {
	#[serde(default)]
	pub cookies: Vec<Cookie>,
	#[serde(default)]
	pub storage: StorageEntries,
}

impl SessionCredentials {
	pub fn new(cookies: Vec<Cookie>, storage: StorageEntries) -> Self {
		Self { cookies, storage }
	}

	/// Returns `true` when there is nothing to install.
	pub fn is_empty(&self) -> bool {
		self.cookies.is_empty() && self.storage.is_empty()
	}

	/// Describes the credentials without exposing any cookie or storage value.
	pub fn summary(&self) -> CredentialSummary {
		let cookie_domains: BTreeSet<String> = self
			.cookies
			.iter()
			.filter_map(|c| c.domain.clone().or_else(|| c.url.clone()))
			.collect();

		CredentialSummary {
			cookies: self.cookies.len(),
			session_cookies: self.cookies.iter().filter(|c| c.is_session()).count(),
			cookie_domains: cookie_domains.into_iter().collect(),
			storage_keys: self.storage.keys().cloned().collect(),
		}
	}
}

/// Value-free view of [`SessionCredentials`] for logs and CLI output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
	pub cookies: usize,
	pub session_cookies: usize,
	pub cookie_domains: Vec<String>,
	pub storage_keys: Vec<String>,
}

/// Parses a Playwright cookie array (`[{"name": ..., "value": ...}, ...]`).
pub fn parse_cookies(json: &str) -> serde_json::Result<Vec<Cookie>> {
	serde_json::from_str(json)
}

/// Parses a flat localStorage object (`{"key": "value", ...}`).
pub fn parse_storage(json: &str) -> serde_json::Result<StorageEntries> {
	serde_json::from_str(json)
}
