use std::fmt;
use std::io;

use crate::export::{ExportError, ExportedLocation};
use crate::record::RecordHandle;

/// Result of background work, ready to be shown to the user.
#[derive(Debug)]
pub enum Notice {
	Deleted {
		handle: RecordHandle,
	},
	DeleteFailed {
		handle: RecordHandle,
		error: io::Error,
	},
	Exported {
		handle: RecordHandle,
		location: ExportedLocation,
	},
	ExportFailed {
		handle: RecordHandle,
		error: ExportError,
	},
}

impl Notice {
	/// Short user-facing message.
	#[must_use]
	pub fn message(&self) -> &'static str {
		match self {
			Self::Deleted { .. } => "Video deleted",
			Self::DeleteFailed { .. } => "Failed to delete video",
			Self::Exported { .. } => "Video saved to FadCam folder in Downloads",
			Self::ExportFailed { .. } => "Failed to save video",
		}
	}

	#[must_use]
	pub fn handle(&self) -> &RecordHandle {
		match self {
			Self::Deleted { handle }
			| Self::DeleteFailed { handle, .. }
			| Self::Exported { handle, .. }
			| Self::ExportFailed { handle, .. } => handle,
		}
	}

	#[must_use]
	pub fn is_failure(&self) -> bool {
		matches!(self, Self::DeleteFailed { .. } | Self::ExportFailed { .. })
	}
}

impl fmt::Display for Notice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Deleted { handle } => write!(f, "{}: {}", self.message(), handle.file_name()),
			Self::DeleteFailed { handle, error } => {
				write!(f, "{}: {} ({error})", self.message(), handle.file_name())
			}
			Self::Exported { location, .. } => write!(f, "{} ({location})", self.message()),
			Self::ExportFailed { error, .. } => write!(f, "{} ({error})", self.message()),
		}
	}
}
