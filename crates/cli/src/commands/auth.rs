//! `auth show`: what the suite would sign in with.

use serde::Serialize;
use tracing::info;
use tubewright::SuiteConfig;
use tubewright_protocol::CredentialSummary;

use crate::error::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthReport {
	origin: String,
	ci: bool,
	#[serde(flatten)]
	summary: CredentialSummary,
}

pub(super) fn show(suite: &SuiteConfig, strict: bool) -> Result<serde_json::Value> {
	let source = suite.credential_source();
	let credentials = if strict { source.try_load()? } else { source.load() };

	if credentials.is_empty() {
		info!(target: "tubewright", origin = %source.origin(), "no credentials found; tests will run signed out");
	}

	let report = AuthReport {
		origin: source.origin(),
		ci: suite.is_ci(),
		summary: credentials.summary(),
	};
	Ok(serde_json::to_value(report)?)
}
