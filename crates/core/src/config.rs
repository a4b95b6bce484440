//! Suite configuration.
//!
//! A single JSON file with every field optional; anything omitted falls back
//! to the values the suite was tuned with. The `CI` environment variable is
//! read once when the config is resolved and decides the credential source
//! and the suite-level retry count.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bootstrap::{self, BootstrapOptions};
use crate::credentials::{CredentialSource, DEFAULT_COOKIES_PATH, DEFAULT_STORAGE_PATH};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Environment variable that switches the suite into CI mode.
pub const CI_VAR: &str = "CI";

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com/";
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_millis(60_000);
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Serde helpers for [`Duration`] stored as integer milliseconds.
pub mod millis {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
		u64::deserialize(deserializer).map(Duration::from_millis)
	}
}

/// Returns true when the `CI` variable is set to a non-empty value.
pub fn ci_from_env() -> bool {
	std::env::var_os(CI_VAR).is_some_and(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuiteConfig {
	pub base_url: String,
	/// Timeout for element waits inside page flows.
	#[serde(rename = "defaultTimeoutMs", with = "millis")]
	pub default_timeout: Duration,
	#[serde(rename = "testTimeoutMs", with = "millis")]
	pub test_timeout: Duration,
	#[serde(rename = "navigationTimeoutMs", with = "millis")]
	pub navigation_timeout: Duration,
	/// Retry policy wrapped around every page-flow step.
	pub action_retry: RetryPolicy,
	pub bootstrap: BootstrapSettings,
	pub credentials: CredentialPaths,
	/// Forces CI mode on or off; unset means "read the `CI` variable".
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ci: Option<bool>,
	/// Whole-test retries; unset means 2 on CI and 0 locally.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub suite_retries: Option<u32>,
}

impl Default for SuiteConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			default_timeout: DEFAULT_ACTION_TIMEOUT,
			test_timeout: DEFAULT_TEST_TIMEOUT,
			navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
			action_retry: RetryPolicy::default(),
			bootstrap: BootstrapSettings::default(),
			credentials: CredentialPaths::default(),
			ci: None,
			suite_retries: None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BootstrapSettings {
	pub max_retries: u32,
	#[serde(rename = "backoffMs", with = "millis")]
	pub backoff: Duration,
	#[serde(rename = "verifyTimeoutMs", with = "millis")]
	pub verify_timeout: Duration,
}

impl Default for BootstrapSettings {
	fn default() -> Self {
		Self {
			max_retries: bootstrap::DEFAULT_MAX_RETRIES,
			backoff: bootstrap::DEFAULT_BACKOFF,
			verify_timeout: bootstrap::DEFAULT_VERIFY_TIMEOUT,
		}
	}
}

impl BootstrapSettings {
	pub fn to_options(&self) -> BootstrapOptions {
		BootstrapOptions::new()
			.max_retries(self.max_retries)
			.backoff(self.backoff)
			.verify_timeout(self.verify_timeout)
	}
}

/// Local credential files, used outside CI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CredentialPaths {
	pub cookies: PathBuf,
	pub storage: PathBuf,
}

impl Default for CredentialPaths {
	fn default() -> Self {
		Self {
			cookies: PathBuf::from(DEFAULT_COOKIES_PATH),
			storage: PathBuf::from(DEFAULT_STORAGE_PATH),
		}
	}
}

impl SuiteConfig {
	/// Reads `path`, falling back to defaults when the file does not exist.
	pub fn load(path: &Path) -> Result<Self> {
		let content = match std::fs::read_to_string(path) {
			Ok(content) => content,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				debug!(target: "tubewright", path = %path.display(), "no suite config, using defaults");
				return Ok(Self::default());
			}
			Err(err) => {
				return Err(Error::Config {
					path: path.to_path_buf(),
					source: err.into(),
				});
			}
		};

		let config: Self = serde_json::from_str(&content).map_err(|err| Error::Config {
			path: path.to_path_buf(),
			source: err.into(),
		})?;
		config.validate().map_err(|err| Error::Config {
			path: path.to_path_buf(),
			source: err.into(),
		})?;
		Ok(config)
	}

	/// Fills an unset `ci` from the environment.
	pub fn with_env(mut self) -> Self {
		if self.ci.is_none() {
			self.ci = Some(ci_from_env());
		}
		self
	}

	pub fn validate(&self) -> Result<()> {
		self.action_retry.validate()?;
		url::Url::parse(&self.base_url).map_err(|err| Error::InvalidUrl(format!("{}: {err}", self.base_url)))?;
		Ok(())
	}

	/// The configured `ci` flag, or the `CI` variable when it is unset.
	pub fn is_ci(&self) -> bool {
		self.ci_or(ci_from_env)
	}

	fn ci_or(&self, detect: impl FnOnce() -> bool) -> bool {
		self.ci.unwrap_or_else(detect)
	}

	pub fn suite_retries(&self) -> u32 {
		self.suite_retries.unwrap_or(if self.is_ci() { 2 } else { 0 })
	}

	/// Environment payload on CI, local files otherwise.
	pub fn credential_source(&self) -> CredentialSource {
		if self.is_ci() {
			CredentialSource::from_env()
		} else {
			CredentialSource::local_files(&self.credentials.cookies, &self.credentials.storage)
		}
	}

	pub fn bootstrap_options(&self) -> BootstrapOptions {
		self.bootstrap.to_options()
	}
}
