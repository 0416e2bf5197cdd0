use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use config::{Config, ConfigError, File};

use crate::cli::CliArgs;
use fadrec::app_dirs;

/// Build a [`Config`] from the default locations, `--config` files and the
/// `FADREC_*` environment.
pub(super) fn build_config(cli: &CliArgs) -> Result<Config> {
	let mut builder = Config::builder();

	if !cli.no_config {
		for path in default_config_files() {
			builder = builder.add_source(File::from(path).required(false));
		}
	}

	for path in &cli.config {
		builder = builder.add_source(File::from(path.clone()).required(true));
	}

	builder = builder.add_source(
		config::Environment::with_prefix("fadrec")
			.separator("__")
			.try_parsing(true)
			.list_separator(",")
			.with_list_parse_key("records.extensions"),
	);

	builder.build().map_err(|err| match err {
		ConfigError::Frozen => anyhow!("configuration builder is frozen"),
		other => other.into(),
	})
}

pub(super) fn default_config_files() -> Vec<PathBuf> {
	let mut files = Vec::new();

	if let Ok(dir) = app_dirs::get_config_dir() {
		files.push(dir.join("config.toml"));
	}

	if let Ok(current_dir) = env::current_dir() {
		files.push(current_dir.join("fadrec.toml"));
	}

	files
}

#[cfg(test)]
mod tests {
	use std::ffi::OsStr;
	use std::fs;

	use clap::Parser;
	use tempfile::tempdir;

	use super::*;
	use crate::settings::raw::RawConfig;

	#[test]
	fn default_files_include_working_directory() {
		let files = default_config_files();
		assert!(files.iter().any(|path| path.ends_with("fadrec.toml")));
	}

	#[test]
	fn explicit_files_are_merged_in_order() {
		let dir = tempdir().unwrap();
		let first = dir.path().join("first.toml");
		let second = dir.path().join("second.toml");
		fs::write(&first, "[export]\nstorage = \"legacy\"\nmime_type = \"video/webm\"\n").unwrap();
		fs::write(&second, "[export]\nmime_type = \"video/quicktime\"\n").unwrap();

		let cli = CliArgs::parse_from([
			OsStr::new("fadrec"),
			OsStr::new("--no-config"),
			OsStr::new("--config"),
			first.as_os_str(),
			OsStr::new("--config"),
			second.as_os_str(),
		]);
		let raw: RawConfig = build_config(&cli).unwrap().try_deserialize().unwrap();

		assert_eq!(raw.export.storage.as_deref(), Some("legacy"));
		assert_eq!(raw.export.mime_type.as_deref(), Some("video/quicktime"));
	}

	#[test]
	fn missing_explicit_file_is_an_error() {
		let dir = tempdir().unwrap();
		let missing = dir.path().join("absent.toml");
		let cli = CliArgs::parse_from([
			OsStr::new("fadrec"),
			OsStr::new("--no-config"),
			OsStr::new("--config"),
			missing.as_os_str(),
		]);

		assert!(build_config(&cli).is_err());
	}
}
