use std::path::PathBuf;

use log::LevelFilter;

use fadrec::export::ExportOptions;
use fadrec::{PresenterOptions, StorageAccess};

mod errors;
mod summary;

pub(crate) use errors::ConfigError;

/// Application-ready configuration derived from config files, the environment
/// and command-line flags.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
	pub records_dir: PathBuf,
	pub extensions: Vec<String>,
	pub storage: StorageAccess,
	pub downloads_dir: PathBuf,
	pub mime_type: String,
	pub remove_partial_on_failure: bool,
	pub show_menu_icons: bool,
	pub prune_selection_on_update: bool,
	pub log_level: LevelFilter,
}

impl ResolvedConfig {
	pub fn presenter_options(&self) -> PresenterOptions {
		PresenterOptions {
			show_menu_icons: self.show_menu_icons,
			prune_selection_on_update: self.prune_selection_on_update,
			storage_access: self.storage,
			mime_type: self.mime_type.clone(),
			..PresenterOptions::default()
		}
	}

	pub fn export_options(&self) -> ExportOptions {
		ExportOptions {
			remove_partial_on_failure: self.remove_partial_on_failure,
		}
	}

	/// Print a human readable summary of the effective configuration.
	pub fn print_summary(&self) {
		summary::print_summary(self);
	}
}
