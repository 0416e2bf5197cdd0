use indexmap::IndexSet;

use crate::record::RecordHandle;

/// Records the user has marked, independent of where they sit in the list.
///
/// Iteration follows the order in which records were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
	members: IndexSet<RecordHandle>,
}

impl SelectionSet {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Flip membership of `handle` and return whether it is now selected.
	pub fn toggle(&mut self, handle: &RecordHandle) -> bool {
		if self.members.shift_remove(handle) {
			false
		} else {
			self.members.insert(handle.clone());
			true
		}
	}

	#[must_use]
	pub fn contains(&self, handle: &RecordHandle) -> bool {
		self.members.contains(handle)
	}

	/// Drop `handle` from the selection. Returns whether it was selected.
	pub fn remove(&mut self, handle: &RecordHandle) -> bool {
		self.members.shift_remove(handle)
	}

	pub fn clear(&mut self) {
		self.members.clear();
	}

	/// Keep only the members for which `keep` returns `true`.
	pub fn retain(&mut self, mut keep: impl FnMut(&RecordHandle) -> bool) {
		self.members.retain(|handle| keep(handle));
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.members.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &RecordHandle> {
		self.members.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn handle(name: &str) -> RecordHandle {
		RecordHandle::new(format!("/records/{name}")).unwrap()
	}

	#[test]
	fn toggle_twice_restores_membership() {
		let mut selection = SelectionSet::new();
		let a = handle("a.mp4");

		assert!(selection.toggle(&a));
		assert!(selection.contains(&a));
		assert_eq!(selection.len(), 1);

		assert!(!selection.toggle(&a));
		assert!(selection.is_empty());
	}

	#[test]
	fn remove_and_clear_are_idempotent() {
		let mut selection = SelectionSet::new();
		let a = handle("a.mp4");
		let b = handle("b.mp4");
		selection.toggle(&a);
		selection.toggle(&b);

		assert!(selection.remove(&a));
		assert!(!selection.remove(&a));
		assert_eq!(selection.iter().collect::<Vec<_>>(), vec![&b]);

		selection.clear();
		selection.clear();
		assert!(selection.is_empty());
	}

	#[test]
	fn retain_prunes_members() {
		let mut selection = SelectionSet::new();
		let a = handle("a.mp4");
		let b = handle("b.mp4");
		selection.toggle(&a);
		selection.toggle(&b);

		selection.retain(|member| member == &b);

		assert!(!selection.contains(&a));
		assert!(selection.contains(&b));
	}
}
