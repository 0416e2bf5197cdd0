//! Presentation core for a list of recorded videos.
//!
//! The crate keeps an ordered list of [`RecordHandle`]s in sync with a host
//! list widget, tracks a multi-select set, and copies recordings into a public
//! downloads area. Host toolkits plug in through the collaborator traits in
//! [`presenter`] and [`export`]; nothing here draws pixels.

pub mod app_dirs;
pub mod export;
pub mod logging;
pub mod presenter;
pub mod reconcile;
pub mod record;
pub mod selection;

pub use export::{ExportEngine, ExportError, ExportedLocation, StorageAccess};
pub use presenter::{
	Collaborators, ListPresenter, Notice, PresentationSurface, PresenterError, PresenterOptions,
	RecordOpener, RenderSpec, ThumbnailLoader,
};
pub use reconcile::{DiffOptions, EditOp, EditScript, diff, diff_with};
pub use record::{RecordError, RecordHandle};
pub use selection::SelectionSet;
