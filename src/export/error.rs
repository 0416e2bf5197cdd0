use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by [`ExportEngine::export`](super::ExportEngine::export).
#[derive(Debug, Error)]
pub enum ExportError {
	/// The storage broker refused to create a managed entry, or handed back one
	/// that cannot be written.
	#[error("storage broker could not allocate an entry for '{display_name}'")]
	AllocationFailed { display_name: String },

	/// Reading the record or writing the destination failed part way.
	#[error("failed to copy '{}': {source}", path.display())]
	CopyFailed {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

impl ExportError {
	pub(crate) fn allocation(display_name: &str) -> Self {
		Self::AllocationFailed {
			display_name: display_name.to_string(),
		}
	}

	pub(crate) fn copy(path: impl Into<PathBuf>, source: io::Error) -> Self {
		Self::CopyFailed {
			path: path.into(),
			source,
		}
	}
}
