//! Strict loading of JSON test data (search terms, expected titles, ...).
//!
//! Unlike credentials, any read or parse failure is an error.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::{Error, Result};

pub fn load_test_data<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
	let path = path.as_ref();
	let parsed = std::fs::read_to_string(path)
		.map_err(anyhow::Error::from)
		.and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from));

	parsed.map_err(|source| {
		error!(target: "tubewright", path = %path.display(), "Error loading test data: {source}");
		Error::TestData {
			path: path.to_path_buf(),
			source,
		}
	})
}
