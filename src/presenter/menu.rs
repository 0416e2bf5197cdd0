use super::tasks::Ticket;

/// Thumbnail shown until the real preview has been decoded.
pub const PLACEHOLDER_THUMBNAIL: &str = "ic_video_placeholder";

/// Action offered by a row's overflow menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
	Delete,
	SaveToDownloads,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
	pub action: RowAction,
	pub label: &'static str,
	pub icon: &'static str,
}

/// Overflow menu attached to every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMenu {
	pub entries: Vec<MenuEntry>,
	/// Whether the surface should draw entry icons next to their labels.
	pub show_icons: bool,
}

impl RowMenu {
	#[must_use]
	pub fn new(show_icons: bool) -> Self {
		Self {
			entries: vec![
				MenuEntry {
					action: RowAction::Delete,
					label: "Delete",
					icon: "ic_delete",
				},
				MenuEntry {
					action: RowAction::SaveToDownloads,
					label: "Save to Downloads",
					icon: "ic_save",
				},
			],
			show_icons,
		}
	}

	/// Icon to draw for `entry`, honouring [`RowMenu::show_icons`].
	#[must_use]
	pub fn icon_for(&self, entry: &MenuEntry) -> Option<&'static str> {
		self.show_icons.then_some(entry.icon)
	}
}

/// Text of the confirmation dialog the host shows before deleting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmPrompt {
	pub title: &'static str,
	pub message: &'static str,
	pub confirm_label: &'static str,
	pub cancel_label: &'static str,
}

pub const DELETE_PROMPT: ConfirmPrompt = ConfirmPrompt {
	title: "Delete Forever?",
	message: "Are you sure you want to delete this video?",
	confirm_label: "Delete",
	cancel_label: "Cancel",
};

/// What the host has to do after a menu choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
	/// Ask the user; call `on_delete_requested` only if they confirm.
	ConfirmDelete(ConfirmPrompt),
	/// The export has been handed to the background worker.
	ExportStarted(Ticket),
}
