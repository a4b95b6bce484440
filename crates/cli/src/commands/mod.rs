mod auth;
mod config;

use tracing::debug;
use tubewright::SuiteConfig;

use crate::cli::{AuthAction, Cli, Commands, ConfigAction};
use crate::error::Result;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let ci_override = cli.ci_override();
	let mut suite = SuiteConfig::load(&cli.config)?;
	if ci_override.is_some() {
		suite.ci = ci_override;
	}
	let suite = suite.with_env();
	debug!(target: "tubewright", config = %cli.config.display(), ci = suite.is_ci(), "resolved suite config");

	let output = match cli.command {
		Commands::Auth {
			action: AuthAction::Show { strict, .. },
		} => auth::show(&suite, strict)?,
		Commands::Config {
			action: ConfigAction::Show,
		} => config::show(&suite)?,
	};

	println!("{}", serde_json::to_string_pretty(&output)?);
	Ok(())
}
