use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

use tempfile::{TempDir, tempdir};

use super::*;

#[derive(Default)]
struct BrokerState {
	requests: Vec<AllocationRequest>,
	written: Vec<u8>,
	opened: usize,
	discarded: Vec<u64>,
}

/// In-memory broker whose behaviour is configured per test.
#[derive(Default)]
struct RecordingBroker {
	refuse: bool,
	unwritable: bool,
	fail_after: Option<usize>,
	state: Arc<Mutex<BrokerState>>,
}

struct RecordingWriter {
	state: Arc<Mutex<BrokerState>>,
	fail_after: Option<usize>,
}

impl Write for RecordingWriter {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let mut state = self.state.lock().unwrap();
		if let Some(limit) = self.fail_after
			&& state.written.len() + buf.len() > limit
		{
			return Err(io::Error::other("broker stream closed"));
		}
		state.written.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl StorageBroker for RecordingBroker {
	fn insert(&self, request: &AllocationRequest) -> Option<ManagedEntry> {
		self.state.lock().unwrap().requests.push(request.clone());
		if self.refuse {
			return None;
		}
		Some(ManagedEntry {
			id: 7,
			uri: "content://downloads/7".to_string(),
			display_name: request.display_name.clone(),
		})
	}

	fn open_writer(&self, _entry: &ManagedEntry) -> io::Result<Box<dyn Write + Send>> {
		self.state.lock().unwrap().opened += 1;
		if self.unwritable {
			return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read only"));
		}
		Ok(Box::new(RecordingWriter {
			state: Arc::clone(&self.state),
			fail_after: self.fail_after,
		}))
	}

	fn discard(&self, entry: &ManagedEntry) -> io::Result<()> {
		self.state.lock().unwrap().discarded.push(entry.id);
		Ok(())
	}
}

#[derive(Default)]
struct RecordingIndexer {
	scanned: Mutex<Vec<PathBuf>>,
}

impl MediaIndexer for RecordingIndexer {
	fn scan_file(&self, path: &Path) {
		self.scanned.lock().unwrap().push(path.to_path_buf());
	}
}

struct Fixture {
	root: TempDir,
	records: PathBuf,
	downloads: PathBuf,
}

fn fixture() -> Fixture {
	let root = tempdir().unwrap();
	let records = root.path().join("records");
	let downloads = root.path().join("Downloads");
	fs::create_dir_all(&records).unwrap();
	Fixture {
		records,
		downloads,
		root,
	}
}

fn record(dir: &Path, name: &str, bytes: &[u8]) -> RecordHandle {
	let path = dir.join(name);
	fs::write(&path, bytes).unwrap();
	RecordHandle::new(path).unwrap()
}

fn sample_bytes(len: usize) -> Vec<u8> {
	(0..len).map(|value| (value * 31 % 256) as u8).collect()
}

fn engine(
	broker: Arc<RecordingBroker>,
	indexer: Arc<RecordingIndexer>,
	downloads: &Path,
) -> ExportEngine {
	ExportEngine::new(broker, indexer, downloads)
}

#[test]
fn managed_insert_copies_every_byte() {
	let fx = fixture();
	let source = sample_bytes(100);
	let handle = record(&fx.records, "clip.mp4", &source);
	let broker = Arc::new(RecordingBroker::default());
	let indexer = Arc::new(RecordingIndexer::default());

	let location = engine(Arc::clone(&broker), Arc::clone(&indexer), &fx.downloads)
		.export(&handle, "clip.mp4", DEFAULT_MIME_TYPE, StorageAccess::Scoped)
		.expect("export succeeds");

	let state = broker.state.lock().unwrap();
	assert_eq!(state.written, source);
	assert_eq!(
		state.requests,
		vec![AllocationRequest {
			display_name: "clip.mp4".to_string(),
			mime_type: "video/mp4".to_string(),
			relative_path: "Download/FadCam".to_string(),
			volume: StorageVolume::ExternalPrimary,
		}]
	);
	assert!(matches!(location, ExportedLocation::Managed(ref entry) if entry.id == 7));
	assert!(indexer.scanned.lock().unwrap().is_empty());
}

#[test]
fn refused_allocation_copies_nothing() {
	let fx = fixture();
	let handle = record(&fx.records, "clip.mp4", &sample_bytes(100));
	let broker = Arc::new(RecordingBroker {
		refuse: true,
		..RecordingBroker::default()
	});

	let err = engine(Arc::clone(&broker), Arc::default(), &fx.downloads)
		.export(&handle, "clip.mp4", DEFAULT_MIME_TYPE, StorageAccess::Scoped)
		.expect_err("allocation must fail");

	assert!(matches!(
		err,
		ExportError::AllocationFailed { ref display_name } if display_name == "clip.mp4"
	));
	let state = broker.state.lock().unwrap();
	assert_eq!(state.opened, 0);
	assert!(state.written.is_empty());
}

#[test]
fn unwritable_entry_counts_as_allocation_failure() {
	let fx = fixture();
	let handle = record(&fx.records, "clip.mp4", &sample_bytes(10));
	let broker = Arc::new(RecordingBroker {
		unwritable: true,
		..RecordingBroker::default()
	});

	let err = engine(broker, Arc::default(), &fx.downloads)
		.export(&handle, "clip.mp4", DEFAULT_MIME_TYPE, StorageAccess::Scoped)
		.expect_err("entry is read only");

	assert!(matches!(err, ExportError::AllocationFailed { .. }));
}

#[test]
fn failed_managed_copy_leaves_entry_by_default() {
	let fx = fixture();
	let handle = record(&fx.records, "clip.mp4", &sample_bytes(3 * CHUNK_SIZE));
	let broker = Arc::new(RecordingBroker {
		fail_after: Some(CHUNK_SIZE),
		..RecordingBroker::default()
	});

	let err = engine(Arc::clone(&broker), Arc::default(), &fx.downloads)
		.export(&handle, "clip.mp4", DEFAULT_MIME_TYPE, StorageAccess::Scoped)
		.expect_err("copy must fail");

	assert!(matches!(err, ExportError::CopyFailed { .. }));
	let state = broker.state.lock().unwrap();
	assert_eq!(state.written.len(), CHUNK_SIZE);
	assert!(state.discarded.is_empty());
}

#[test]
fn failed_managed_copy_can_discard_the_entry() {
	let fx = fixture();
	let handle = record(&fx.records, "clip.mp4", &sample_bytes(3 * CHUNK_SIZE));
	let broker = Arc::new(RecordingBroker {
		fail_after: Some(CHUNK_SIZE),
		..RecordingBroker::default()
	});

	let result = engine(Arc::clone(&broker), Arc::default(), &fx.downloads)
		.with_options(ExportOptions {
			remove_partial_on_failure: true,
		})
		.export(&handle, "clip.mp4", DEFAULT_MIME_TYPE, StorageAccess::Scoped);

	assert!(result.is_err());
	assert_eq!(broker.state.lock().unwrap().discarded, vec![7]);
}

#[test]
fn missing_source_is_a_copy_failure() {
	let fx = fixture();
	let handle = RecordHandle::new(fx.records.join("gone.mp4")).unwrap();

	let scoped = engine(Arc::default(), Arc::default(), &fx.downloads)
		.export(&handle, "gone.mp4", DEFAULT_MIME_TYPE, StorageAccess::Scoped);
	let legacy = engine(Arc::default(), Arc::default(), &fx.downloads)
		.export(&handle, "gone.mp4", DEFAULT_MIME_TYPE, StorageAccess::Legacy);

	assert!(matches!(scoped, Err(ExportError::CopyFailed { .. })));
	assert!(matches!(legacy, Err(ExportError::CopyFailed { .. })));
}

#[test]
fn direct_path_writes_into_the_export_folder() {
	let fx = fixture();
	let source = sample_bytes(2 * CHUNK_SIZE + 17);
	let handle = record(&fx.records, "clip.mp4", &source);
	let indexer = Arc::new(RecordingIndexer::default());

	let location = engine(Arc::default(), Arc::clone(&indexer), &fx.downloads)
		.export(&handle, "ignored.mp4", DEFAULT_MIME_TYPE, StorageAccess::Legacy)
		.expect("export succeeds");

	let expected = fx.downloads.join("FadCam").join("clip.mp4");
	assert_eq!(location, ExportedLocation::Path(expected.clone()));
	assert_eq!(fs::read(&expected).unwrap(), source);
	assert_eq!(*indexer.scanned.lock().unwrap(), vec![expected]);
}

#[test]
fn direct_path_tolerates_existing_folder() {
	let fx = fixture();
	let handle = record(&fx.records, "clip.mp4", b"first");
	let engine = engine(Arc::default(), Arc::default(), &fx.downloads);
	fs::create_dir_all(engine.destination_dir()).unwrap();

	engine
		.export(&handle, "clip.mp4", DEFAULT_MIME_TYPE, StorageAccess::Legacy)
		.expect("first export");
	fs::write(handle.path(), b"second").unwrap();
	engine
		.export(&handle, "clip.mp4", DEFAULT_MIME_TYPE, StorageAccess::Legacy)
		.expect("second export");

	let written = fs::read(engine.destination_dir().join("clip.mp4")).unwrap();
	assert_eq!(written, b"second");
}

#[test]
fn record_already_in_export_folder_is_left_intact() {
	let fx = fixture();
	let indexer = Arc::new(RecordingIndexer::default());
	let engine = engine(Arc::default(), Arc::clone(&indexer), &fx.downloads);
	fs::create_dir_all(engine.destination_dir()).unwrap();
	let source = sample_bytes(100);
	let handle = record(&engine.destination_dir(), "clip.mp4", &source);

	let location = engine
		.export(&handle, "clip.mp4", DEFAULT_MIME_TYPE, StorageAccess::Legacy)
		.expect("export succeeds");

	let expected = engine.destination_dir().join("clip.mp4");
	assert_eq!(location, ExportedLocation::Path(expected.clone()));
	assert_eq!(fs::read(&expected).unwrap(), source);
	assert_eq!(*indexer.scanned.lock().unwrap(), vec![expected]);
}

#[test]
fn concurrent_direct_exports_share_the_folder() {
	let fx = fixture();
	let engine = engine(Arc::default(), Arc::default(), &fx.downloads);
	let handles: Vec<_> = (0..4)
		.map(|n| record(&fx.records, &format!("clip{n}.mp4"), &sample_bytes(1000 + n)))
		.collect();

	let workers: Vec<_> = handles
		.iter()
		.cloned()
		.map(|handle| {
			let engine = engine.clone();
			thread::spawn(move || {
				engine.export(&handle, "unused", DEFAULT_MIME_TYPE, StorageAccess::Legacy)
			})
		})
		.collect();

	for worker in workers {
		worker.join().unwrap().expect("export succeeds");
	}
	for (n, handle) in handles.iter().enumerate() {
		let copy = engine.destination_dir().join(handle.file_name().as_ref());
		assert_eq!(fs::read(copy).unwrap().len(), 1000 + n);
	}
}

#[cfg(unix)]
#[test]
fn failed_direct_copy_keeps_or_removes_partial_file() {
	let fx = fixture();
	// Opening a directory succeeds on unix but reading it fails.
	let unreadable = fx.records.join("broken.mp4");
	fs::create_dir_all(&unreadable).unwrap();
	let handle = RecordHandle::new(&unreadable).unwrap();
	let partial = fx.downloads.join("FadCam").join("broken.mp4");

	let kept = engine(Arc::default(), Arc::default(), &fx.downloads)
		.export(&handle, "broken.mp4", DEFAULT_MIME_TYPE, StorageAccess::Legacy);
	assert!(matches!(kept, Err(ExportError::CopyFailed { .. })));
	assert!(partial.exists());

	let removed = engine(Arc::default(), Arc::default(), &fx.downloads)
		.with_options(ExportOptions {
			remove_partial_on_failure: true,
		})
		.export(&handle, "broken.mp4", DEFAULT_MIME_TYPE, StorageAccess::Legacy);
	assert!(removed.is_err());
	assert!(!partial.exists());
}

#[test]
fn directory_broker_backs_scoped_exports() {
	let fx = fixture();
	let source = sample_bytes(500);
	let handle = record(&fx.records, "clip.mp4", &source);
	let broker = Arc::new(DirectoryBroker::new(&fx.downloads));
	let engine = ExportEngine::new(
		Arc::clone(&broker) as Arc<dyn StorageBroker>,
		Arc::new(NoopMediaIndexer),
		&fx.downloads,
	);

	let location = engine
		.export(&handle, "renamed.mp4", DEFAULT_MIME_TYPE, StorageAccess::Scoped)
		.expect("export succeeds");

	let ExportedLocation::Managed(entry) = location else {
		panic!("expected managed entry");
	};
	let path = broker.resolve(&entry).expect("entry is live");
	assert_eq!(path, fx.downloads.join("FadCam").join("renamed.mp4"));
	assert_eq!(fs::read(path).unwrap(), source);
}

#[test]
fn directory_broker_refuses_names_outside_the_collection() {
	let fx = fixture();
	let handle = record(&fx.records, "clip.mp4", &sample_bytes(50));
	let engine = ExportEngine::new(
		Arc::new(DirectoryBroker::new(&fx.downloads)),
		Arc::new(NoopMediaIndexer),
		&fx.downloads,
	);
	let absolute = fx.records.join("escaped.mp4");

	for name in [absolute.to_str().unwrap(), "../../escaped2.mp4"] {
		let err = engine
			.export(&handle, name, DEFAULT_MIME_TYPE, StorageAccess::Scoped)
			.expect_err("name leaves the collection");
		assert!(matches!(err, ExportError::AllocationFailed { .. }));
	}
	assert!(!absolute.exists());
	assert!(!fx.root.path().join("escaped2.mp4").exists());
}
