mod cli;
mod settings;
mod workflow;

use std::process::ExitCode;

use anyhow::{Context, Result};
use cli::{CliArgs, parse_cli, print_report};
use fadrec::{app_dirs, logging};
use settings::ResolvedConfig;
use workflow::RecordsWorkflow;

fn main() -> Result<ExitCode> {
	let cli = parse_cli();
	let resolved = settings::load(&cli).context("failed to load configuration")?;

	init_logging(&resolved);

	if cli.print_config {
		resolved.print_summary();
	}

	run(&cli, &resolved)
}

/// Route library logs into the cache directory; carry on without them on failure.
fn init_logging(settings: &ResolvedConfig) {
	let result = app_dirs::get_cache_dir()
		.and_then(|dir| Ok(logging::initialize(&dir, settings.log_level)?));
	match result {
		Ok(path) => log::debug!("logging to {}", path.display()),
		Err(err) => eprintln!("logging disabled: {err}"),
	}
}

fn run(cli: &CliArgs, settings: &ResolvedConfig) -> Result<ExitCode> {
	let report = RecordsWorkflow::from_config(settings).run(cli.action())?;
	print_report(&report)?;

	Ok(if report.failed() {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	})
}
