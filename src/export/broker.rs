//! Host collaborators used by the export engine, plus directory-backed adapters
//! for hosts that expose plain filesystem paths.

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};

use super::PUBLIC_DOWNLOADS_DIR;

/// Storage volume a managed entry is created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageVolume {
	#[default]
	ExternalPrimary,
}

/// Description of the managed entry the engine asks the broker to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
	pub display_name: String,
	pub mime_type: String,
	/// Logical location inside the volume, `/` separated, e.g. `Download/FadCam`.
	pub relative_path: String,
	pub volume: StorageVolume,
}

/// Opaque reference to an entry created by a [`StorageBroker`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManagedEntry {
	pub id: u64,
	pub uri: String,
	pub display_name: String,
}

impl fmt::Display for ManagedEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.uri)
	}
}

/// Content registry that owns shared storage on hosts without direct path access.
pub trait StorageBroker: Send + Sync {
	/// Create a new entry. `None` means the broker refused the request.
	fn insert(&self, request: &AllocationRequest) -> Option<ManagedEntry>;

	/// Open a write stream into a previously inserted entry.
	fn open_writer(&self, entry: &ManagedEntry) -> io::Result<Box<dyn Write + Send>>;

	/// Delete an entry and whatever was written into it.
	fn discard(&self, entry: &ManagedEntry) -> io::Result<()>;
}

/// Service that makes freshly written files visible to other applications.
pub trait MediaIndexer: Send + Sync {
	/// Fire-and-forget notification about a new file.
	fn scan_file(&self, path: &Path);
}

/// Indexer for hosts that have no media index.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMediaIndexer;

impl MediaIndexer for NoopMediaIndexer {
	fn scan_file(&self, _path: &Path) {}
}

/// Indexer that only records the notification in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMediaIndexer;

impl MediaIndexer for LogMediaIndexer {
	fn scan_file(&self, path: &Path) {
		info!("media index notified about {}", path.display());
	}
}

const ENTRY_SCHEME: &str = "fadrec://downloads/";

/// Broker that emulates a downloads content registry on top of a directory.
///
/// The leading `Download` component of a request's relative path names the
/// collection itself and maps onto `downloads_dir`. Names that already exist
/// get a ` (n)` suffix instead of being overwritten.
pub struct DirectoryBroker {
	downloads_dir: PathBuf,
	next_id: AtomicU64,
	entries: Mutex<HashMap<u64, PathBuf>>,
}

impl DirectoryBroker {
	#[must_use]
	pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
		Self {
			downloads_dir: downloads_dir.into(),
			next_id: AtomicU64::new(0),
			entries: Mutex::new(HashMap::new()),
		}
	}

	/// Filesystem location backing `entry`, if the entry is still live.
	#[must_use]
	pub fn resolve(&self, entry: &ManagedEntry) -> Option<PathBuf> {
		self.entries.lock().ok()?.get(&entry.id).cloned()
	}

	fn collection_dir(&self, relative_path: &str) -> PathBuf {
		let relative = Path::new(relative_path);
		let inside = relative.strip_prefix(PUBLIC_DOWNLOADS_DIR).unwrap_or(relative);
		self.downloads_dir.join(inside)
	}
}

impl StorageBroker for DirectoryBroker {
	fn insert(&self, request: &AllocationRequest) -> Option<ManagedEntry> {
		if !is_plain_file_name(&request.display_name) {
			warn!("refusing display name {:?}", request.display_name);
			return None;
		}
		let dir = self.collection_dir(&request.relative_path);
		if let Err(err) = fs::create_dir_all(&dir) {
			warn!("cannot prepare {}: {err}", dir.display());
			return None;
		}

		let path = unique_path(&dir, &request.display_name);
		if let Err(err) = File::create_new(&path) {
			warn!("cannot create {}: {err}", path.display());
			return None;
		}

		let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
		let display_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| request.display_name.clone());
		let mut entries = self.entries.lock().ok()?;
		entries.insert(id, path.clone());
		debug!(
			"allocated entry {id} ({}) at {}",
			request.mime_type,
			path.display()
		);

		Some(ManagedEntry {
			id,
			uri: format!("{ENTRY_SCHEME}{id}"),
			display_name,
		})
	}

	fn open_writer(&self, entry: &ManagedEntry) -> io::Result<Box<dyn Write + Send>> {
		let path = self.resolve(entry).ok_or_else(|| {
			io::Error::new(io::ErrorKind::NotFound, format!("unknown entry {entry}"))
		})?;
		let file = OpenOptions::new().write(true).truncate(true).open(path)?;
		Ok(Box::new(file))
	}

	fn discard(&self, entry: &ManagedEntry) -> io::Result<()> {
		let removed = self
			.entries
			.lock()
			.map_err(|_| io::Error::other("entry table poisoned"))?
			.remove(&entry.id);
		match removed {
			Some(path) => fs::remove_file(path),
			None => Ok(()),
		}
	}
}

/// A display name must stay inside the collection: one normal path component.
fn is_plain_file_name(name: &str) -> bool {
	let mut components = Path::new(name).components();
	matches!(
		(components.next(), components.next()),
		(Some(Component::Normal(_)), None)
	)
}

/// First free path for `name` inside `dir`, appending ` (n)` before the extension.
fn unique_path(dir: &Path, name: &str) -> PathBuf {
	let candidate = dir.join(name);
	if !candidate.exists() {
		return candidate;
	}

	let requested = Path::new(name);
	let stem = requested
		.file_stem()
		.map(|stem| stem.to_string_lossy().into_owned())
		.unwrap_or_else(|| name.to_string());
	let extension = requested
		.extension()
		.map(|ext| format!(".{}", ext.to_string_lossy()))
		.unwrap_or_default();

	(1u32..)
		.map(|n| dir.join(format!("{stem} ({n}){extension}")))
		.find(|path| !path.exists())
		.unwrap_or(candidate)
}
