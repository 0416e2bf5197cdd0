use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use ignore::WalkBuilder;
use log::{debug, info, warn};

use fadrec::export::{DirectoryBroker, LogMediaIndexer};
use fadrec::presenter::{ConfirmPrompt, MenuOutcome, RowAction, ThumbnailRequest};
use fadrec::{
	Collaborators, EditOp, ExportEngine, ListPresenter, Notice, PresentationSurface,
	RecordHandle, RecordOpener, RenderSpec, ThumbnailLoader,
};

use crate::cli::Command;
use crate::settings::ResolvedConfig;

/// Upper bound on waiting for a single background completion.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// What a command produced, ready for printing.
#[derive(Debug)]
pub(crate) enum Report {
	Rows {
		rows: Vec<RenderSpec>,
		json: bool,
	},
	Notices {
		notices: Vec<Notice>,
		missing: Vec<String>,
	},
	Confirm {
		prompt: ConfirmPrompt,
		names: Vec<String>,
		missing: Vec<String>,
	},
}

impl Report {
	/// Whether any requested action failed.
	pub(crate) fn failed(&self) -> bool {
		match self {
			Report::Rows { .. } => false,
			Report::Notices { notices, missing } => {
				!missing.is_empty() || notices.iter().any(Notice::is_failure)
			}
			Report::Confirm { missing, .. } => !missing.is_empty(),
		}
	}
}

/// Drives a [`ListPresenter`] over the records directory for one command.
pub(crate) struct RecordsWorkflow {
	presenter: ListPresenter,
	records_dir: PathBuf,
	extensions: Vec<String>,
}

impl RecordsWorkflow {
	pub(crate) fn from_config(config: &ResolvedConfig) -> Self {
		let engine = ExportEngine::new(
			Arc::new(DirectoryBroker::new(&config.downloads_dir)),
			Arc::new(LogMediaIndexer),
			&config.downloads_dir,
		)
		.with_options(config.export_options());
		let collaborators = Collaborators {
			surface: Box::new(LogSurface),
			thumbnails: Box::new(SkipThumbnails),
			opener: Box::new(LogOpener),
		};

		Self {
			presenter: ListPresenter::new(collaborators, engine, config.presenter_options()),
			records_dir: config.records_dir.clone(),
			extensions: config.extensions.clone(),
		}
	}

	pub(crate) fn run(mut self, command: Command) -> Result<Report> {
		let records = scan_records(&self.records_dir, &self.extensions)?;
		self.presenter.update(records);

		match command {
			Command::List { json } => Ok(Report::Rows {
				rows: self.rows(),
				json,
			}),
			Command::Export { names, .. } => self.export(&names),
			Command::Delete { names, yes } => self.delete(names, yes),
		}
	}

	fn rows(&self) -> Vec<RenderSpec> {
		(0..self.presenter.len())
			.filter_map(|index| self.presenter.show_row(index))
			.collect()
	}

	/// Map file names onto listed handles, collecting the names that are unknown.
	fn lookup(&self, names: &[String]) -> (Vec<RecordHandle>, Vec<String>) {
		let mut found = Vec::new();
		let mut missing = Vec::new();
		for name in names {
			match self
				.presenter
				.records()
				.iter()
				.find(|handle| handle.file_name() == name.as_str())
			{
				Some(handle) => found.push(handle.clone()),
				None => {
					warn!("no recording named {name} in {}", self.records_dir.display());
					missing.push(name.clone());
				}
			}
		}
		(found, missing)
	}

	fn export(&mut self, names: &[String]) -> Result<Report> {
		let (handles, missing) = self.lookup(names);
		for handle in &handles {
			match self.presenter.on_menu_action(handle, RowAction::SaveToDownloads)? {
				MenuOutcome::ExportStarted(ticket) => debug!("export {ticket} started"),
				MenuOutcome::ConfirmDelete(_) => {}
			}
		}
		let notices = self.drain()?;
		Ok(Report::Notices { notices, missing })
	}

	fn delete(&mut self, names: Vec<String>, confirmed: bool) -> Result<Report> {
		let (handles, missing) = self.lookup(&names);
		if !confirmed {
			let mut prompt = None;
			for handle in &handles {
				if let MenuOutcome::ConfirmDelete(asked) =
					self.presenter.on_menu_action(handle, RowAction::Delete)?
				{
					prompt = Some(asked);
				}
			}
			if let Some(prompt) = prompt {
				let names = handles
					.iter()
					.map(|handle| handle.file_name().into_owned())
					.collect();
				return Ok(Report::Confirm {
					prompt,
					names,
					missing,
				});
			}
		}

		for handle in &handles {
			if !self.presenter.selection().contains(handle) {
				self.presenter.on_long_press(handle)?;
			}
		}
		let selected: Vec<_> = self.presenter.selection().iter().cloned().collect();
		for handle in &selected {
			self.presenter.on_delete_requested(handle)?;
		}
		let notices = self.drain()?;
		info!(
			"{} of {} selected recordings deleted",
			selected.len() - self.presenter.selection().len(),
			selected.len()
		);
		Ok(Report::Notices { notices, missing })
	}

	/// Wait until every dispatched task has reported back.
	fn drain(&mut self) -> Result<Vec<Notice>> {
		let mut notices = self.presenter.pump();
		while self.presenter.pending() > 0 {
			let batch = self.presenter.wait(COMPLETION_TIMEOUT);
			if batch.is_empty() {
				bail!(
					"gave up waiting for {} background task(s)",
					self.presenter.pending()
				);
			}
			notices.extend(batch);
		}
		Ok(notices)
	}
}

/// Recordings directly inside `dir` whose extension is listed, sorted by path.
pub(crate) fn scan_records(dir: &Path, extensions: &[String]) -> Result<Vec<RecordHandle>> {
	if !dir.exists() {
		info!("records directory {} does not exist yet", dir.display());
		return Ok(Vec::new());
	}

	let mut records = Vec::new();
	for entry in WalkBuilder::new(dir)
		.standard_filters(false)
		.max_depth(Some(1))
		.build()
	{
		let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
		if !entry.file_type().is_some_and(|kind| kind.is_file()) {
			continue;
		}
		let extension = entry
			.path()
			.extension()
			.and_then(|ext| ext.to_str())
			.map(|ext| ext.to_ascii_lowercase());
		if extension.is_none_or(|ext| !extensions.contains(&ext)) {
			continue;
		}
		let handle = RecordHandle::new(entry.path())
			.with_context(|| format!("unusable record path {}", entry.path().display()))?;
		records.push(handle);
	}
	records.sort();
	debug!("found {} recordings in {}", records.len(), dir.display());
	Ok(records)
}

/// Terminal stand-in for a list widget; rows are printed after the fact.
struct LogSurface;

impl PresentationSurface for LogSurface {
	fn apply(&mut self, op: &EditOp<RecordHandle>) {
		debug!("surface op {op:?}");
	}

	fn reload_all(&mut self) {
		debug!("surface reload");
	}
}

struct SkipThumbnails;

impl ThumbnailLoader for SkipThumbnails {
	fn load(&self, _request: &ThumbnailRequest) {}
}

struct LogOpener;

impl RecordOpener for LogOpener {
	fn open(&self, handle: &RecordHandle) {
		info!("open requested for {handle}");
	}
}
