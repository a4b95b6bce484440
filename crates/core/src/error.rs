//! Error types for retry, bootstrap and suite setup.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for tubewright operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// A caller passed an unusable policy or option. Nothing was attempted.
	#[error("invalid configuration: {0}")]
	Configuration(String),

	/// Every attempt of a retried action failed.
	#[error("{label} failed after {attempts} attempts: {source}")]
	ActionExhausted {
		label: String,
		attempts: u32,
		#[source]
		source: anyhow::Error,
	},

	/// The session could not be verified as signed in after all attempts.
	#[error("Authentication failed after maximum retries ({attempts} attempts): {source}")]
	BootstrapExhausted {
		attempts: u32,
		#[source]
		source: anyhow::Error,
	},

	/// Strict credential loading failed.
	#[error("failed to load credentials from {origin}: {source}")]
	Credentials {
		origin: String,
		#[source]
		source: anyhow::Error,
	},

	#[error("failed to load test data from {}: {source}", path.display())]
	TestData {
		path: PathBuf,
		#[source]
		source: anyhow::Error,
	},

	#[error("failed to load suite config from {}: {source}", path.display())]
	Config {
		path: PathBuf,
		#[source]
		source: anyhow::Error,
	},

	#[error("invalid URL: {0}")]
	InvalidUrl(String),

	/// A browser call made outside the retry executor failed.
	#[error(transparent)]
	Browser(#[from] anyhow::Error),
}

impl Error {
	/// Returns true if a retried action ran out of attempts.
	pub fn is_action_exhausted(&self) -> bool {
		matches!(self, Error::ActionExhausted { .. })
	}

	/// Returns true if session bootstrap ran out of attempts.
	///
	/// Callers use this to skip steps that assume a signed-in session.
	pub fn is_bootstrap_exhausted(&self) -> bool {
		matches!(self, Error::BootstrapExhausted { .. })
	}

	/// Number of attempts made before giving up, for exhaustion errors.
	pub fn attempts(&self) -> Option<u32> {
		match self {
			Error::ActionExhausted { attempts, .. } | Error::BootstrapExhausted { attempts, .. } => Some(*attempts),
			_ => None,
		}
	}
}
