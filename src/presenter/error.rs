use std::path::PathBuf;

use thiserror::Error;

/// Errors returned synchronously by [`ListPresenter`](super::ListPresenter) actions.
///
/// Failures of the background work itself are reported as
/// [`Notice`](super::Notice)s, never as errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresenterError {
	/// The action named a record that is not part of the current list.
	#[error("'{}' is not in the current list", path.display())]
	NotListed { path: PathBuf },

	/// The background worker is gone, so the action cannot be dispatched.
	#[error("background worker is no longer running")]
	WorkerUnavailable,
}
