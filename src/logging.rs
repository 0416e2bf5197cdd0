//! File logging for the `fadrec` binary.
//!
//! Library code only talks to the `log` facade. The binary calls
//! [`initialize`] once to route those records into `<cache-dir>/fadrec.log`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{Config, WriteLogger};
use thiserror::Error;

pub const LOG_FILE_NAME: &str = "fadrec.log";

#[derive(Debug, Error)]
pub enum LoggingError {
	#[error("unknown log level '{0}'")]
	UnknownLevel(String),
	#[error("cannot open log file {}: {source}", path.display())]
	Open {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("a logger is already installed")]
	AlreadyInstalled(#[from] log::SetLoggerError),
}

/// Parse a level name such as `info` or `DEBUG`.
pub fn parse_level(value: &str) -> Result<LevelFilter, LoggingError> {
	LevelFilter::from_str(value.trim()).map_err(|_| LoggingError::UnknownLevel(value.to_string()))
}

/// Install a file logger appending to `<dir>/fadrec.log` and return that path.
pub fn initialize(dir: &Path, level: LevelFilter) -> Result<PathBuf, LoggingError> {
	let path = dir.join(LOG_FILE_NAME);
	let open = |source| LoggingError::Open {
		path: path.clone(),
		source,
	};
	fs::create_dir_all(dir).map_err(open)?;
	let file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(&path)
		.map_err(open)?;

	WriteLogger::init(level, Config::default(), file)?;
	Ok(path)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn level_names_are_case_insensitive() {
		assert_eq!(parse_level("DEBUG").unwrap(), LevelFilter::Debug);
		assert_eq!(parse_level(" warn ").unwrap(), LevelFilter::Warn);
		assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
	}

	#[test]
	fn unknown_level_is_rejected() {
		let err = parse_level("chatty").unwrap_err();
		assert_eq!(err.to_string(), "unknown log level 'chatty'");
	}
}
