use clap::Subcommand;

/// Actions the binary can perform on the recordings directory.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
	/// Print every recording in list order.
	List {
		#[arg(long, help = "Print rows as JSON (default: plain text)")]
		json: bool,
	},
	/// Copy recordings into the FadCam folder of the downloads directory.
	Export {
		#[arg(value_name = "NAME", required = true, help = "File names of the recordings")]
		names: Vec<String>,
		#[arg(
			long,
			help = "Write straight into the downloads directory instead of going through the storage broker (default: config value)"
		)]
		legacy: bool,
	},
	/// Permanently delete recordings.
	Delete {
		#[arg(value_name = "NAME", required = true, help = "File names of the recordings")]
		names: Vec<String>,
		#[arg(
			short = 'y',
			long,
			help = "Confirm the deletion; without it only the prompt is shown (default: disabled)"
		)]
		yes: bool,
	},
}

impl Default for Command {
	fn default() -> Self {
		Self::List { json: false }
	}
}

impl Command {
	/// Whether this command forces direct-path exports.
	pub(crate) fn forces_legacy_storage(&self) -> bool {
		matches!(self, Self::Export { legacy: true, .. })
	}
}
