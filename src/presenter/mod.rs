//! Presentation logic for the list of recordings.
//!
//! [`ListPresenter`] owns the ordered record list and the multi-select set. It
//! renders rows on demand, turns taps and menu choices into background work and
//! keeps the host's [`PresentationSurface`] in sync through minimal edit
//! scripts whenever the list is replaced.

mod error;
mod menu;
mod notice;
mod tasks;

use std::path::PathBuf;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::Duration;

use log::{debug, info};

pub use error::PresenterError;
pub use menu::{
	ConfirmPrompt, DELETE_PROMPT, MenuEntry, MenuOutcome, PLACEHOLDER_THUMBNAIL, RowAction,
	RowMenu,
};
pub use notice::Notice;
pub use tasks::{TaskCompletion, TaskOutcome, Ticket};

use crate::export::{DEFAULT_MIME_TYPE, ExportEngine, StorageAccess};
use crate::reconcile::{DiffOptions, EditOp, EditScript, diff_with};
use crate::record::RecordHandle;
use crate::selection::SelectionSet;
use tasks::TaskRuntime;

/// Host-side list widget that receives row edits.
pub trait PresentationSurface {
	/// Apply one edit operation, in script order.
	fn apply(&mut self, op: &EditOp<RecordHandle>);

	/// Re-render every visible row.
	fn reload_all(&mut self);
}

/// Decodes preview frames off the presenter's thread.
pub trait ThumbnailLoader {
	fn load(&self, request: &ThumbnailRequest);
}

/// Hands a record to the platform's default video player.
pub trait RecordOpener {
	fn open(&self, handle: &RecordHandle);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
	pub path: PathBuf,
	pub placeholder: &'static str,
}

/// Everything a surface needs to draw one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSpec {
	pub handle: RecordHandle,
	pub file_name: String,
	pub selected: bool,
	pub thumbnail: ThumbnailRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterOptions {
	pub show_menu_icons: bool,
	/// Drop selected handles that vanish from the list on [`ListPresenter::update`].
	pub prune_selection_on_update: bool,
	pub storage_access: StorageAccess,
	pub mime_type: String,
	pub diff: DiffOptions,
}

impl Default for PresenterOptions {
	fn default() -> Self {
		Self {
			show_menu_icons: true,
			prune_selection_on_update: true,
			storage_access: StorageAccess::default(),
			mime_type: DEFAULT_MIME_TYPE.to_string(),
			diff: DiffOptions::default(),
		}
	}
}

/// The collaborators a presenter drives.
pub struct Collaborators {
	pub surface: Box<dyn PresentationSurface>,
	pub thumbnails: Box<dyn ThumbnailLoader>,
	pub opener: Box<dyn RecordOpener>,
}

pub struct ListPresenter {
	records: Vec<RecordHandle>,
	selection: SelectionSet,
	surface: Box<dyn PresentationSurface>,
	thumbnails: Box<dyn ThumbnailLoader>,
	opener: Box<dyn RecordOpener>,
	options: PresenterOptions,
	tasks: TaskRuntime,
}

impl ListPresenter {
	/// Create an empty presenter and start its background worker.
	pub fn new(
		collaborators: Collaborators,
		engine: ExportEngine,
		options: PresenterOptions,
	) -> Self {
		let Collaborators {
			surface,
			thumbnails,
			opener,
		} = collaborators;
		Self {
			records: Vec::new(),
			selection: SelectionSet::new(),
			surface,
			thumbnails,
			opener,
			options,
			tasks: TaskRuntime::start(engine),
		}
	}

	#[must_use]
	pub fn records(&self) -> &[RecordHandle] {
		&self.records
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.records.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	#[must_use]
	pub fn selection(&self) -> &SelectionSet {
		&self.selection
	}

	#[must_use]
	pub fn options(&self) -> &PresenterOptions {
		&self.options
	}

	#[must_use]
	pub fn position(&self, handle: &RecordHandle) -> Option<usize> {
		self.records.iter().position(|candidate| candidate == handle)
	}

	/// Number of dispatched actions whose completion has not been seen yet.
	#[must_use]
	pub fn pending(&self) -> usize {
		self.tasks.in_flight()
	}

	/// Describe row `index`, or `None` past the end of the list.
	#[must_use]
	pub fn bind(&self, index: usize) -> Option<RenderSpec> {
		let handle = self.records.get(index)?;
		Some(RenderSpec {
			handle: handle.clone(),
			file_name: handle.file_name().into_owned(),
			selected: self.selection.contains(handle),
			thumbnail: ThumbnailRequest {
				path: handle.path().to_path_buf(),
				placeholder: PLACEHOLDER_THUMBNAIL,
			},
		})
	}

	/// Bind row `index` and queue its thumbnail.
	pub fn show_row(&self, index: usize) -> Option<RenderSpec> {
		let spec = self.bind(index)?;
		self.thumbnails.load(&spec.thumbnail);
		Some(spec)
	}

	#[must_use]
	pub fn menu(&self) -> RowMenu {
		RowMenu::new(self.options.show_menu_icons)
	}

	pub fn on_tap(&self, handle: &RecordHandle) -> Result<(), PresenterError> {
		self.require_listed(handle)?;
		debug!("opening {handle}");
		self.opener.open(handle);
		Ok(())
	}

	/// Toggle selection of `handle` and redraw its row. Returns whether the
	/// record is now selected.
	pub fn on_long_press(&mut self, handle: &RecordHandle) -> Result<bool, PresenterError> {
		let index = self.require_listed(handle)?;
		let selected = self.selection.toggle(handle);
		self.surface.apply(&EditOp::Change { index });
		Ok(selected)
	}

	/// Leave multi-select mode.
	pub fn clear_selection(&mut self) {
		if self.selection.is_empty() {
			return;
		}
		self.selection.clear();
		self.surface.reload_all();
	}

	pub fn on_menu_action(
		&mut self,
		handle: &RecordHandle,
		action: RowAction,
	) -> Result<MenuOutcome, PresenterError> {
		match action {
			RowAction::Delete => {
				self.require_listed(handle)?;
				Ok(MenuOutcome::ConfirmDelete(DELETE_PROMPT))
			}
			RowAction::SaveToDownloads => self
				.on_export_requested(handle)
				.map(MenuOutcome::ExportStarted),
		}
	}

	/// Delete the backing file in the background. The row goes away once the
	/// completion arrives through [`ListPresenter::pump`].
	pub fn on_delete_requested(
		&mut self,
		handle: &RecordHandle,
	) -> Result<Ticket, PresenterError> {
		self.require_listed(handle)?;
		let ticket = self
			.tasks
			.submit_delete(handle.clone())
			.ok_or(PresenterError::WorkerUnavailable)?;
		debug!("queued delete {ticket} for {handle}");
		Ok(ticket)
	}

	/// Export the record under its own file name in the background.
	pub fn on_export_requested(
		&mut self,
		handle: &RecordHandle,
	) -> Result<Ticket, PresenterError> {
		self.require_listed(handle)?;
		let ticket = self
			.tasks
			.submit_export(
				handle.clone(),
				handle.file_name().into_owned(),
				self.options.mime_type.clone(),
				self.options.storage_access,
			)
			.ok_or(PresenterError::WorkerUnavailable)?;
		debug!("queued export {ticket} for {handle}");
		Ok(ticket)
	}

	/// Apply every completion that has already arrived, without blocking.
	pub fn pump(&mut self) -> Vec<Notice> {
		let mut notices = Vec::new();
		loop {
			match self.tasks.try_recv() {
				Ok(completion) => notices.push(self.complete(completion)),
				Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
			}
		}
		notices
	}

	/// Block up to `timeout` for the next completion, then drain the rest.
	pub fn wait(&mut self, timeout: Duration) -> Vec<Notice> {
		match self.tasks.recv_timeout(timeout) {
			Ok(completion) => {
				let mut notices = vec![self.complete(completion)];
				notices.extend(self.pump());
				notices
			}
			Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Vec::new(),
		}
	}

	fn complete(&mut self, completion: TaskCompletion) -> Notice {
		let TaskCompletion {
			ticket,
			handle,
			outcome,
		} = completion;
		debug!("task {ticket} finished for {handle}");
		match outcome {
			TaskOutcome::Deleted => {
				self.selection.remove(&handle);
				if let Some(index) = self.position(&handle) {
					self.records.remove(index);
					self.surface.apply(&EditOp::Remove { index });
				}
				Notice::Deleted { handle }
			}
			TaskOutcome::DeleteFailed(error) => Notice::DeleteFailed { handle, error },
			TaskOutcome::Exported(location) => Notice::Exported { handle, location },
			TaskOutcome::ExportFailed(error) => Notice::ExportFailed { handle, error },
		}
	}

	/// Replace the list, pushing the minimal set of row edits to the surface.
	pub fn update(&mut self, records: Vec<RecordHandle>) -> EditScript<RecordHandle> {
		let script = diff_with(&self.records, &records, self.options.diff);
		for op in &script {
			self.surface.apply(op);
		}
		self.records = records;

		if self.options.prune_selection_on_update {
			let records = &self.records;
			let before = self.selection.len();
			self.selection.retain(|handle| records.contains(handle));
			let pruned = before - self.selection.len();
			if pruned > 0 {
				debug!("pruned {pruned} stale selections");
			}
		}

		let (inserts, removes, moves) = script.summary();
		info!(
			"list updated to {} records ({inserts} inserted, {removes} removed, {moves} moved)",
			self.records.len()
		);
		script
	}

	pub fn refresh_thumbnails(&mut self) {
		self.surface.reload_all();
	}

	fn require_listed(&self, handle: &RecordHandle) -> Result<usize, PresenterError> {
		self.position(handle).ok_or_else(|| PresenterError::NotListed {
			path: handle.path().to_path_buf(),
		})
	}
}

impl Drop for ListPresenter {
	fn drop(&mut self) {
		self.tasks.shutdown();
	}
}
