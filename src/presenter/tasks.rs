use std::fmt;
use std::fs;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::export::{ExportEngine, ExportError, ExportedLocation, StorageAccess};
use crate::record::RecordHandle;

/// Identifies one dispatched background action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
	#[must_use]
	pub fn id(self) -> u64 {
		self.0
	}
}

impl fmt::Display for Ticket {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

pub(crate) enum TaskCommand {
	Delete {
		ticket: Ticket,
		handle: RecordHandle,
	},
	Export {
		ticket: Ticket,
		handle: RecordHandle,
		destination_name: String,
		mime_type: String,
		access: StorageAccess,
	},
	Shutdown,
}

#[derive(Debug)]
pub enum TaskOutcome {
	Deleted,
	DeleteFailed(io::Error),
	Exported(ExportedLocation),
	ExportFailed(ExportError),
}

/// Message sent back by the worker once an action has finished.
#[derive(Debug)]
pub struct TaskCompletion {
	pub ticket: Ticket,
	pub handle: RecordHandle,
	pub outcome: TaskOutcome,
}

/// Launches the background task worker and returns its channels.
pub(crate) fn spawn(engine: ExportEngine) -> (Sender<TaskCommand>, Receiver<TaskCompletion>) {
	let (command_tx, command_rx) = mpsc::channel();
	let (completion_tx, completion_rx) = mpsc::channel();

	thread::spawn(move || worker_loop(&engine, command_rx, completion_tx));

	(command_tx, completion_rx)
}

fn worker_loop(
	engine: &ExportEngine,
	command_rx: Receiver<TaskCommand>,
	completion_tx: Sender<TaskCompletion>,
) {
	while let Ok(command) = command_rx.recv() {
		if !handle_command(engine, &completion_tx, command) {
			break;
		}
	}
	debug!("task worker stopped");
}

fn handle_command(
	engine: &ExportEngine,
	completion_tx: &Sender<TaskCompletion>,
	command: TaskCommand,
) -> bool {
	let completion = match command {
		TaskCommand::Delete { ticket, handle } => {
			let outcome = match fs::remove_file(handle.path()) {
				Ok(()) => TaskOutcome::Deleted,
				Err(err) => {
					warn!("could not delete {handle}: {err}");
					TaskOutcome::DeleteFailed(err)
				}
			};
			TaskCompletion {
				ticket,
				handle,
				outcome,
			}
		}
		TaskCommand::Export {
			ticket,
			handle,
			destination_name,
			mime_type,
			access,
		} => {
			let outcome = match engine.export(&handle, &destination_name, &mime_type, access) {
				Ok(location) => TaskOutcome::Exported(location),
				Err(err) => TaskOutcome::ExportFailed(err),
			};
			TaskCompletion {
				ticket,
				handle,
				outcome,
			}
		}
		TaskCommand::Shutdown => return false,
	};
	// Queued work still runs after the receiver is gone; only the result is lost.
	if let Err(mpsc::SendError(completion)) = completion_tx.send(completion) {
		debug!(
			"no listener for task {} on {}",
			completion.ticket, completion.handle
		);
	}
	true
}

/// Presenter-side end of the task worker.
pub(crate) struct TaskRuntime {
	tx: Sender<TaskCommand>,
	rx: Receiver<TaskCompletion>,
	next_ticket: u64,
	in_flight: usize,
}

impl TaskRuntime {
	pub(crate) fn new(tx: Sender<TaskCommand>, rx: Receiver<TaskCompletion>) -> Self {
		Self {
			tx,
			rx,
			next_ticket: 0,
			in_flight: 0,
		}
	}

	pub(crate) fn start(engine: ExportEngine) -> Self {
		let (tx, rx) = spawn(engine);
		Self::new(tx, rx)
	}

	fn issue_ticket(&mut self) -> Ticket {
		self.next_ticket = self.next_ticket.saturating_add(1);
		Ticket(self.next_ticket)
	}

	/// Queue a delete; `None` when the worker has gone away.
	pub(crate) fn submit_delete(&mut self, handle: RecordHandle) -> Option<Ticket> {
		let ticket = self.issue_ticket();
		self.send(TaskCommand::Delete { ticket, handle }).then_some(ticket)
	}

	pub(crate) fn submit_export(
		&mut self,
		handle: RecordHandle,
		destination_name: String,
		mime_type: String,
		access: StorageAccess,
	) -> Option<Ticket> {
		let ticket = self.issue_ticket();
		self.send(TaskCommand::Export {
			ticket,
			handle,
			destination_name,
			mime_type,
			access,
		})
		.then_some(ticket)
	}

	fn send(&mut self, command: TaskCommand) -> bool {
		let sent = self.tx.send(command).is_ok();
		if sent {
			self.in_flight += 1;
		}
		sent
	}

	pub(crate) fn in_flight(&self) -> usize {
		self.in_flight
	}

	pub(crate) fn try_recv(&mut self) -> Result<TaskCompletion, TryRecvError> {
		let completion = self.rx.try_recv()?;
		self.in_flight = self.in_flight.saturating_sub(1);
		Ok(completion)
	}

	pub(crate) fn recv_timeout(
		&mut self,
		timeout: Duration,
	) -> Result<TaskCompletion, RecvTimeoutError> {
		let completion = self.rx.recv_timeout(timeout)?;
		self.in_flight = self.in_flight.saturating_sub(1);
		Ok(completion)
	}

	pub(crate) fn shutdown(&self) {
		let _ = self.tx.send(TaskCommand::Shutdown);
	}
}
