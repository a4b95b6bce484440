use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tubewright")]
#[command(about = "Inspect suite configuration and stored session credentials")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Suite config file; defaults apply when it does not exist
	#[arg(short, long, global = true, value_name = "FILE", default_value = "tubewright.json")]
	pub config: PathBuf,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Stored session credentials
	Auth {
		#[command(subcommand)]
		action: AuthAction,
	},

	/// Suite configuration
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
	/// Load the credentials the suite would use and summarize them (never prints values)
	Show {
		/// Read the COOKIES_JSON / LOCAL_STORAGE_JSON payloads regardless of CI
		#[arg(long, conflicts_with = "local")]
		ci: bool,
		/// Read the local credential files regardless of CI
		#[arg(long)]
		local: bool,
		/// Fail on unreadable credentials instead of treating them as empty
		#[arg(long)]
		strict: bool,
	},
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
	/// Print the resolved suite config as JSON
	Show,
}

impl Cli {
	/// CI override from `auth show --ci/--local`, if any.
	pub fn ci_override(&self) -> Option<bool> {
		match self.command {
			Commands::Auth {
				action: AuthAction::Show { ci: true, .. },
			} => Some(true),
			Commands::Auth {
				action: AuthAction::Show { local: true, .. },
			} => Some(false),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn auth_show_flags() {
		let cli = Cli::try_parse_from(["tubewright", "-vv", "auth", "show", "--local", "--strict"]).unwrap();
		assert_eq!(cli.verbose, 2);
		assert_eq!(cli.ci_override(), Some(false));
		assert!(matches!(cli.command, Commands::Auth { action: AuthAction::Show { strict: true, .. } }));
	}

	#[test]
	fn ci_and_local_conflict() {
		assert!(Cli::try_parse_from(["tubewright", "auth", "show", "--ci", "--local"]).is_err());
	}

	#[test]
	fn config_defaults_to_suite_file() {
		let cli = Cli::try_parse_from(["tubewright", "config", "show"]).unwrap();
		assert_eq!(cli.config, PathBuf::from("tubewright.json"));
		assert_eq!(cli.ci_override(), None);
	}
}
