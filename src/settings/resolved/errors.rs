use std::fmt::Display;

use thiserror::Error;

/// A configuration value that could not be turned into a usable setting.
#[derive(Debug, Error)]
#[error("invalid value for {key}: {reason} (value: {value})")]
pub(crate) struct ConfigError {
	pub(crate) key: &'static str,
	pub(crate) value: String,
	pub(crate) reason: String,
}

impl ConfigError {
	pub(crate) fn invalid(
		key: &'static str,
		value: impl Into<String>,
		reason: impl Into<String>,
	) -> Self {
		Self {
			key,
			value: value.into(),
			reason: reason.into(),
		}
	}

	/// The default for `key` depends on a directory that could not be resolved.
	pub(crate) fn unavailable(key: &'static str, err: impl Display) -> Self {
		Self::invalid(key, "(default)", format!("default location unavailable: {err}"))
	}
}
