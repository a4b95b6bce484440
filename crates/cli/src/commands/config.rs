use tubewright::SuiteConfig;

use crate::error::Result;

pub(super) fn show(suite: &SuiteConfig) -> Result<serde_json::Value> {
	let mut value = serde_json::to_value(suite)?;
	if let Some(object) = value.as_object_mut() {
		object.insert("suiteRetries".into(), suite.suite_retries().into());
	}
	Ok(value)
}
