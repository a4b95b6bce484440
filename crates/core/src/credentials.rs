//! Where stored session credentials come from.
//!
//! On CI the cookies and localStorage payloads are injected as environment
//! variables (repository secrets); locally they are two JSON files exported
//! from a signed-in browser. The origin is chosen once, by the caller, and
//! passed around as a [`CredentialSource`] value.
//!
//! [`CredentialSource::load`] is lenient: a missing or malformed half yields an
//! empty half plus a warning, so a suite without credentials still runs its
//! anonymous tests. [`CredentialSource::try_load`] reports the same problems as
//! [`Error::Credentials`].

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, warn};
use tubewright_protocol::{Cookie, SessionCredentials, StorageEntries, parse_cookies, parse_storage};

use crate::config::ci_from_env;
use crate::error::{Error, Result};

pub const COOKIES_VAR: &str = "COOKIES_JSON";
pub const STORAGE_VAR: &str = "LOCAL_STORAGE_JSON";
pub const DEFAULT_COOKIES_PATH: &str = "tests/auth/cookies.json";
pub const DEFAULT_STORAGE_PATH: &str = "tests/auth/localStorage.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
	/// JSON payloads captured from [`COOKIES_VAR`] and [`STORAGE_VAR`].
	/// An absent variable counts as an empty payload.
	EnvironmentPayload { cookies: Option<String>, storage: Option<String> },
	/// A cookie array file and a localStorage object file.
	LocalFiles { cookies_path: PathBuf, storage_path: PathBuf },
}

impl CredentialSource {
	/// Picks the environment payload on CI and the default local files otherwise.
	pub fn detect() -> Self {
		if ci_from_env() {
			Self::from_env()
		} else {
			Self::local_files(DEFAULT_COOKIES_PATH, DEFAULT_STORAGE_PATH)
		}
	}

	/// Captures the payload variables as they are right now.
	pub fn from_env() -> Self {
		Self::EnvironmentPayload {
			cookies: std::env::var(COOKIES_VAR).ok(),
			storage: std::env::var(STORAGE_VAR).ok(),
		}
	}

	pub fn local_files(cookies_path: impl Into<PathBuf>, storage_path: impl Into<PathBuf>) -> Self {
		Self::LocalFiles {
			cookies_path: cookies_path.into(),
			storage_path: storage_path.into(),
		}
	}

	/// Human-readable origin for logs and errors.
	pub fn origin(&self) -> String {
		match self {
			Self::EnvironmentPayload { .. } => format!("environment ({COOKIES_VAR}, {STORAGE_VAR})"),
			Self::LocalFiles { cookies_path, storage_path } => {
				format!("files ({}, {})", cookies_path.display(), storage_path.display())
			}
		}
	}

	/// Loads credentials, substituting an empty half for anything unreadable.
	pub fn load(&self) -> SessionCredentials {
		debug!(target: "tubewright", origin = %self.origin(), "Grabbing cookies...");
		let cookies = self.read_cookies().unwrap_or_else(|err| {
			warn!(target: "tubewright", "Error parsing cookies: {err:#}");
			Vec::new()
		});

		debug!(target: "tubewright", origin = %self.origin(), "Grabbing storage...");
		let storage = self.read_storage().unwrap_or_else(|err| {
			warn!(target: "tubewright", "Error parsing local storage: {err:#}");
			StorageEntries::new()
		});

		SessionCredentials::new(cookies, storage)
	}

	/// Loads credentials, failing on the first unreadable half.
	pub fn try_load(&self) -> Result<SessionCredentials> {
		let wrap = |source: anyhow::Error| Error::Credentials {
			origin: self.origin(),
			source,
		};
		let cookies = self.read_cookies().map_err(wrap)?;
		let storage = self.read_storage().map_err(wrap)?;
		Ok(SessionCredentials::new(cookies, storage))
	}

	fn read_cookies(&self) -> anyhow::Result<Vec<Cookie>> {
		match self {
			Self::EnvironmentPayload { cookies, .. } => {
				parse_cookies(cookies.as_deref().unwrap_or("[]")).with_context(|| format!("parsing {COOKIES_VAR}"))
			}
			Self::LocalFiles { cookies_path, .. } => {
				let content = read_file(cookies_path)?;
				parse_cookies(&content).with_context(|| format!("parsing {}", cookies_path.display()))
			}
		}
	}

	fn read_storage(&self) -> anyhow::Result<StorageEntries> {
		match self {
			Self::EnvironmentPayload { storage, .. } => {
				parse_storage(storage.as_deref().unwrap_or("{}")).with_context(|| format!("parsing {STORAGE_VAR}"))
			}
			Self::LocalFiles { storage_path, .. } => {
				let content = read_file(storage_path)?;
				parse_storage(&content).with_context(|| format!("parsing {}", storage_path.display()))
			}
		}
	}
}

fn read_file(path: &Path) -> anyhow::Result<String> {
	std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
