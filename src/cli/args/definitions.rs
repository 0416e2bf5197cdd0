use std::path::PathBuf;

use clap::{ArgAction, ColorChoice, Parser};

use super::options::Command;
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `fadrec` binary.
#[derive(Parser, Debug)]
#[command(
	name = "fadrec",
	version,
	long_version = long_version(),
	about = "List, export and delete recorded videos",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
pub(crate) struct CliArgs {
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "FADREC_CONFIG",
		global = true,
		action = ArgAction::Append,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		global = true,
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'r',
		long = "records-dir",
		value_name = "PATH",
		global = true,
		help = "Directory holding the recordings (default: <data-dir>/records)"
	)]
	pub(crate) records_dir: Option<PathBuf>,
	#[arg(
		short = 'd',
		long = "downloads-dir",
		value_name = "PATH",
		global = true,
		help = "Public downloads directory exports are written to (default: user download dir)"
	)]
	pub(crate) downloads_dir: Option<PathBuf>,
	#[arg(
		long = "log-level",
		value_name = "LEVEL",
		global = true,
		help = "Log level written to the log file (default: info)"
	)]
	pub(crate) log_level: Option<String>,
	#[arg(
		short = 'p',
		long = "print-config",
		global = true,
		help = "Print the resolved configuration before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[command(subcommand)]
	pub(crate) command: Option<Command>,
}

impl CliArgs {
	/// The requested action, `list` when none was given.
	pub(crate) fn action(&self) -> Command {
		self.command.clone().unwrap_or_default()
	}
}
