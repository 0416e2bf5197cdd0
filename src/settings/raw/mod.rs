use std::path::PathBuf;

use serde::Deserialize;

use fadrec::app_dirs;
use fadrec::export::{DEFAULT_MIME_TYPE, StorageAccess};
use fadrec::logging::parse_level;

use crate::cli::CliArgs;

use super::resolved::{ConfigError, ResolvedConfig};
use super::util::{absolutize, sanitize_extensions};

const DEFAULT_EXTENSION: &str = "mp4";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Mirror of the configuration file before CLI overrides and validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	pub(super) records: RecordsSection,
	pub(super) export: ExportSection,
	pub(super) ui: UiSection,
	pub(super) log: LogSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RecordsSection {
	pub(super) dir: Option<PathBuf>,
	pub(super) extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ExportSection {
	pub(super) storage: Option<String>,
	pub(super) downloads_dir: Option<PathBuf>,
	pub(super) mime_type: Option<String>,
	pub(super) remove_partial_on_failure: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct UiSection {
	pub(super) show_menu_icons: Option<bool>,
	pub(super) prune_selection_on_update: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct LogSection {
	pub(super) level: Option<String>,
}

impl RawConfig {
	/// Apply CLI overrides on top of the raw configuration values.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(dir) = cli.records_dir.clone() {
			self.records.dir = Some(dir);
		}
		if let Some(dir) = cli.downloads_dir.clone() {
			self.export.downloads_dir = Some(dir);
		}
		if let Some(level) = cli.log_level.clone() {
			self.log.level = Some(level);
		}
		if cli.action().forces_legacy_storage() {
			self.export.storage = Some("legacy".to_string());
		}
	}

	/// Validate values and fill in defaults.
	pub(super) fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
		let records_dir = match self.records.dir {
			Some(dir) => dir,
			None => app_dirs::get_data_dir()
				.map_err(|err| ConfigError::unavailable("records.dir", err))?
				.join("records"),
		};
		let records_dir = absolutize(records_dir)
			.map_err(|err| ConfigError::unavailable("records.dir", err))?;

		let mut extensions = self
			.records
			.extensions
			.map(sanitize_extensions)
			.unwrap_or_default();
		if extensions.is_empty() {
			extensions.push(DEFAULT_EXTENSION.to_string());
		}

		let storage = match self.export.storage {
			Some(value) => parse_storage(&value)?,
			None => StorageAccess::default(),
		};

		let downloads_dir = match self.export.downloads_dir {
			Some(dir) => dir,
			None => app_dirs::get_downloads_dir()
				.map_err(|err| ConfigError::unavailable("export.downloads_dir", err))?,
		};
		let downloads_dir = absolutize(downloads_dir)
			.map_err(|err| ConfigError::unavailable("export.downloads_dir", err))?;

		let mime_type = match self.export.mime_type {
			Some(value) if !value.trim().is_empty() => value.trim().to_string(),
			Some(value) => {
				return Err(ConfigError::invalid("export.mime_type", value, "must not be empty"));
			}
			None => DEFAULT_MIME_TYPE.to_string(),
		};

		let level = self
			.log
			.level
			.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
		let log_level = parse_level(&level).map_err(|_| {
			ConfigError::invalid("log.level", level, "expected a level such as info or debug")
		})?;

		Ok(ResolvedConfig {
			records_dir,
			extensions,
			storage,
			downloads_dir,
			mime_type,
			remove_partial_on_failure: self.export.remove_partial_on_failure.unwrap_or(false),
			show_menu_icons: self.ui.show_menu_icons.unwrap_or(true),
			prune_selection_on_update: self.ui.prune_selection_on_update.unwrap_or(true),
			log_level,
		})
	}
}

fn parse_storage(value: &str) -> Result<StorageAccess, ConfigError> {
	match value.trim().to_ascii_lowercase().as_str() {
		"scoped" | "managed" => Ok(StorageAccess::Scoped),
		"legacy" | "direct" => Ok(StorageAccess::Legacy),
		_ => Err(ConfigError::invalid(
			"export.storage",
			value,
			"expected 'scoped' or 'legacy'",
		)),
	}
}
