//! Copy a record into shared public storage.
//!
//! Two storage models exist and the caller picks one per call:
//! [`StorageAccess::Scoped`] asks a [`StorageBroker`] for a managed entry and
//! streams into it, [`StorageAccess::Legacy`] writes straight to
//! `<downloads>/FadCam/<file name>` and then pings the [`MediaIndexer`].

mod broker;
mod copy;
mod error;

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub use broker::{
	AllocationRequest, DirectoryBroker, LogMediaIndexer, ManagedEntry, MediaIndexer,
	NoopMediaIndexer, StorageBroker, StorageVolume,
};
pub use copy::{CHUNK_SIZE, copy_chunked};
pub use error::ExportError;

use crate::record::RecordHandle;

/// Folder created inside the public downloads area for every export.
pub const EXPORT_FOLDER: &str = "FadCam";
/// Name of the public downloads collection as seen by a storage broker.
pub const PUBLIC_DOWNLOADS_DIR: &str = "Download";
/// MIME type used for recordings when the caller has no better idea.
pub const DEFAULT_MIME_TYPE: &str = "video/mp4";

/// Storage-access model available on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageAccess {
	/// Direct filesystem paths are off limits; go through the storage broker.
	#[default]
	Scoped,
	/// Public directories may be written directly.
	Legacy,
}

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportedLocation {
	Managed(ManagedEntry),
	Path(PathBuf),
}

impl fmt::Display for ExportedLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Managed(entry) => write!(f, "{entry}"),
			Self::Path(path) => write!(f, "{}", path.display()),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
	/// Delete the partially written target when a copy fails. Off by default,
	/// which leaves the partial file in place.
	pub remove_partial_on_failure: bool,
}

/// Copies records into public storage using host-supplied collaborators.
#[derive(Clone)]
pub struct ExportEngine {
	broker: Arc<dyn StorageBroker>,
	indexer: Arc<dyn MediaIndexer>,
	downloads_dir: PathBuf,
	options: ExportOptions,
}

impl ExportEngine {
	/// `downloads_dir` is the public downloads directory used by
	/// [`StorageAccess::Legacy`] exports.
	pub fn new(
		broker: Arc<dyn StorageBroker>,
		indexer: Arc<dyn MediaIndexer>,
		downloads_dir: impl Into<PathBuf>,
	) -> Self {
		Self {
			broker,
			indexer,
			downloads_dir: downloads_dir.into(),
			options: ExportOptions::default(),
		}
	}

	#[must_use]
	pub fn with_options(mut self, options: ExportOptions) -> Self {
		self.options = options;
		self
	}

	/// Directory legacy exports are written into.
	#[must_use]
	pub fn destination_dir(&self) -> PathBuf {
		self.downloads_dir.join(EXPORT_FOLDER)
	}

	/// Copy `handle` into public storage.
	///
	/// `destination_name` names the managed entry; legacy exports always keep
	/// the record's own file name. Success is only reported once every byte has
	/// been written.
	pub fn export(
		&self,
		handle: &RecordHandle,
		destination_name: &str,
		mime_type: &str,
		access: StorageAccess,
	) -> Result<ExportedLocation, ExportError> {
		debug!("exporting {handle} via {access:?}");
		let result = match access {
			StorageAccess::Scoped => self.managed_insert(handle, destination_name, mime_type),
			StorageAccess::Legacy => self.direct_path(handle),
		};
		match &result {
			Ok(location) => info!("exported {handle} to {location}"),
			Err(err) => warn!("export of {handle} failed: {err}"),
		}
		result
	}

	fn managed_insert(
		&self,
		handle: &RecordHandle,
		display_name: &str,
		mime_type: &str,
	) -> Result<ExportedLocation, ExportError> {
		let request = AllocationRequest {
			display_name: display_name.to_string(),
			mime_type: mime_type.to_string(),
			relative_path: format!("{PUBLIC_DOWNLOADS_DIR}/{EXPORT_FOLDER}"),
			volume: StorageVolume::ExternalPrimary,
		};
		let entry = self
			.broker
			.insert(&request)
			.ok_or_else(|| ExportError::allocation(display_name))?;

		let mut writer = match self.broker.open_writer(&entry) {
			Ok(writer) => writer,
			Err(err) => {
				debug!("entry {entry} is not writable: {err}");
				return Err(ExportError::allocation(display_name));
			}
		};
		let copied = File::open(handle.path())
			.and_then(|mut reader| copy_chunked(&mut reader, &mut writer));
		drop(writer);

		match copied {
			Ok(bytes) => {
				debug!("wrote {bytes} bytes into {entry}");
				Ok(ExportedLocation::Managed(entry))
			}
			Err(source) => {
				if self.options.remove_partial_on_failure
					&& let Err(err) = self.broker.discard(&entry)
				{
					warn!("could not discard partial entry {entry}: {err}");
				}
				Err(ExportError::copy(handle.path(), source))
			}
		}
	}

	fn direct_path(&self, handle: &RecordHandle) -> Result<ExportedLocation, ExportError> {
		let dir = self.destination_dir();
		// Already-existing directories are fine; concurrent exports race here.
		fs::create_dir_all(&dir).map_err(|source| ExportError::copy(&dir, source))?;

		let destination = dir.join(handle.file_name().as_ref());
		if same_file(handle.path(), &destination) {
			// Creating the destination would truncate the record itself.
			debug!("{} is already in the export folder", destination.display());
			self.indexer.scan_file(&destination);
			return Ok(ExportedLocation::Path(destination));
		}
		let mut reader =
			File::open(handle.path()).map_err(|source| ExportError::copy(handle.path(), source))?;
		let mut writer =
			File::create(&destination).map_err(|source| ExportError::copy(&destination, source))?;
		let copied = copy_chunked(&mut reader, &mut writer);
		drop(writer);
		drop(reader);

		match copied {
			Ok(bytes) => {
				debug!("wrote {bytes} bytes to {}", destination.display());
				self.indexer.scan_file(&destination);
				Ok(ExportedLocation::Path(destination))
			}
			Err(source) => {
				if self.options.remove_partial_on_failure
					&& let Err(err) = fs::remove_file(&destination)
				{
					warn!("could not remove partial {}: {err}", destination.display());
				}
				Err(ExportError::copy(handle.path(), source))
			}
		}
	}
}

/// Whether both paths resolve to the same existing file.
fn same_file(a: &Path, b: &Path) -> bool {
	match (fs::canonicalize(a), fs::canonicalize(b)) {
		(Ok(a), Ok(b)) => a == b,
		_ => false,
	}
}

#[cfg(test)]
mod tests;
