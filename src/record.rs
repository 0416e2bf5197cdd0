//! Identity of a single recorded video on disk.

use std::borrow::Cow;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a path cannot identify a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
	/// The supplied path was empty.
	#[error("record path is empty")]
	Empty,

	/// The supplied path was not absolute.
	#[error("record path '{path}' is not absolute")]
	Relative { path: PathBuf },
}

/// Reference to one recorded video file.
///
/// Two handles are equal when their normalized absolute paths are equal. The
/// handle carries no other payload, so a matched pair of handles never needs a
/// visual refresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PathBuf", into = "PathBuf")]
pub struct RecordHandle {
	path: PathBuf,
}

impl RecordHandle {
	/// Build a handle from an absolute path.
	///
	/// `.` components are dropped and `..` components are folded lexically; the
	/// filesystem is never consulted.
	pub fn new(path: impl AsRef<Path>) -> Result<Self, RecordError> {
		let path = path.as_ref();
		if path.as_os_str().is_empty() {
			return Err(RecordError::Empty);
		}
		if !path.is_absolute() {
			return Err(RecordError::Relative {
				path: path.to_path_buf(),
			});
		}

		Ok(Self {
			path: normalize(path),
		})
	}

	/// Full normalized path of the record.
	#[must_use]
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Final path component, used as the row title and export file name.
	#[must_use]
	pub fn file_name(&self) -> Cow<'_, str> {
		self.path
			.file_name()
			.map(|name| name.to_string_lossy())
			.unwrap_or_else(|| self.path.to_string_lossy())
	}
}

impl fmt::Display for RecordHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.path.display())
	}
}

impl AsRef<Path> for RecordHandle {
	fn as_ref(&self) -> &Path {
		&self.path
	}
}

impl TryFrom<PathBuf> for RecordHandle {
	type Error = RecordError;

	fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
		Self::new(path)
	}
}

impl From<RecordHandle> for PathBuf {
	fn from(handle: RecordHandle) -> Self {
		handle.path
	}
}

fn normalize(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				// `pop` refuses to remove the root, which is the behaviour we want.
				normalized.pop();
			}
			other => normalized.push(other.as_os_str()),
		}
	}
	normalized
}
