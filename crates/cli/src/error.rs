use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Suite(#[from] tubewright::Error),

	#[error("failed to render output: {0}")]
	Json(#[from] serde_json::Error),
}
