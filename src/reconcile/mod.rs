//! Incremental reconciliation between two ordered lists.
//!
//! [`diff`] produces an [`EditScript`] that turns the old list into the new one
//! while leaving the longest run of untouched items in place. Items are matched
//! by equality alone; a matched item is never reported as changed.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;


/// A single edit applied to a list, expressed in indices valid at the moment the
/// operation is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp<T> {
	/// Insert `item` so that it ends up at `index`.
	Insert { index: usize, item: T },
	/// Remove the item at `index`.
	Remove { index: usize },
	/// Take the item at `from` out of the list, then insert it at `to` in the
	/// shortened list.
	Move { from: usize, to: usize },
	/// The item at `index` must be redrawn. Never produced by [`diff`].
	Change { index: usize },
}

/// Ordered list of [`EditOp`]s.
///
/// Scripts produced by [`diff`] list removals by descending index, then moves,
/// then insertions by ascending index, so applying them front to back keeps
/// every index valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditScript<T> {
	ops: Vec<EditOp<T>>,
}

impl<T> Default for EditScript<T> {
	fn default() -> Self {
		Self { ops: Vec::new() }
	}
}

impl<T> EditScript<T> {
	#[must_use]
	pub fn ops(&self) -> &[EditOp<T>] {
		&self.ops
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.ops.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, EditOp<T>> {
		self.ops.iter()
	}

	/// Count of (insertions, removals, moves).
	#[must_use]
	pub fn summary(&self) -> (usize, usize, usize) {
		self.ops
			.iter()
			.fold((0, 0, 0), |(inserts, removes, moves), op| match op {
				EditOp::Insert { .. } => (inserts + 1, removes, moves),
				EditOp::Remove { .. } => (inserts, removes + 1, moves),
				EditOp::Move { .. } => (inserts, removes, moves + 1),
				EditOp::Change { .. } => (inserts, removes, moves),
			})
	}
}

impl<T: Clone> EditScript<T> {
	/// Apply every operation to `list` in order.
	///
	/// # Panics
	///
	/// Panics if an index is out of range for `list`, which only happens when the
	/// script was computed against a different list.
	pub fn apply(&self, list: &mut Vec<T>) {
		for op in &self.ops {
			match op {
				EditOp::Insert { index, item } => list.insert(*index, item.clone()),
				EditOp::Remove { index } => {
					list.remove(*index);
				}
				EditOp::Move { from, to } => {
					let item = list.remove(*from);
					list.insert(*to, item);
				}
				EditOp::Change { .. } => {}
			}
		}
	}
}

impl<'a, T> IntoIterator for &'a EditScript<T> {
	type Item = &'a EditOp<T>;
	type IntoIter = std::slice::Iter<'a, EditOp<T>>;

	fn into_iter(self) -> Self::IntoIter {
		self.ops.iter()
	}
}

/// Knobs for [`diff_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
	/// Report an item that changed position as one [`EditOp::Move`] instead of a
	/// removal followed by an insertion.
	pub detect_moves: bool,
}

impl Default for DiffOptions {
	fn default() -> Self {
		Self { detect_moves: true }
	}
}

/// Compute the edit script from `old` to `new` with default options.
pub fn diff<T: Eq + Hash + Clone>(old: &[T], new: &[T]) -> EditScript<T> {
	diff_with(old, new, DiffOptions::default())
}

/// Compute the edit script from `old` to `new`.
///
/// Only the part of the lists left after stripping the common prefix and
/// suffix is compared. When no item repeats within either list the common
/// subsequence is found in O(n log n); lists with repeats fall back to an
/// O(n·m) table. Identical inputs always produce the same script.
pub fn diff_with<T: Eq + Hash + Clone>(
	old: &[T],
	new: &[T],
	options: DiffOptions,
) -> EditScript<T> {
	// origin[j] is the index in `old` that new[j] comes from, if any.
	let mut origin = match_common(old, new);
	let mut old_used = vec![false; old.len()];
	for source in origin.iter().flatten() {
		old_used[*source] = true;
	}

	let mut moved = vec![false; new.len()];
	if options.detect_moves {
		// Unused old indices per item, lowest first.
		let mut unused: HashMap<&T, VecDeque<usize>> = HashMap::new();
		for (i, item) in old.iter().enumerate() {
			if !old_used[i] {
				unused.entry(item).or_default().push_back(i);
			}
		}
		for (j, item) in new.iter().enumerate() {
			if origin[j].is_some() {
				continue;
			}
			if let Some(i) = unused.get_mut(item).and_then(VecDeque::pop_front) {
				old_used[i] = true;
				origin[j] = Some(i);
				moved[j] = true;
			}
		}
	}

	let mut ops = Vec::new();

	for index in (0..old.len()).rev() {
		if !old_used[index] {
			ops.push(EditOp::Remove { index });
		}
	}

	// Working list of surviving old indices, mirrors the list after removals.
	let mut working: Vec<usize> = (0..old.len()).filter(|&i| old_used[i]).collect();
	let mut predecessor = None;
	for (j, source) in origin.iter().enumerate() {
		let Some(source) = *source else {
			continue;
		};
		if moved[j] {
			let from = position_of(&working, source);
			working.remove(from);
			let to = predecessor.map_or(0, |prev| position_of(&working, prev) + 1);
			working.insert(to, source);
			if from != to {
				ops.push(EditOp::Move { from, to });
			}
		}
		predecessor = Some(source);
	}

	for (index, item) in new.iter().enumerate() {
		if origin[index].is_none() {
			ops.push(EditOp::Insert {
				index,
				item: item.clone(),
			});
		}
	}

	EditScript { ops }
}

fn position_of(working: &[usize], source: usize) -> usize {
	working
		.iter()
		.position(|&candidate| candidate == source)
		.unwrap_or(working.len())
}

/// Pair up items of the longest common subsequence of `old` and `new`.
fn match_common<T: Eq + Hash>(old: &[T], new: &[T]) -> Vec<Option<usize>> {
	let mut origin = vec![None; new.len()];

	let prefix = old
		.iter()
		.zip(new.iter())
		.take_while(|(a, b)| a == b)
		.count();
	let suffix = old[prefix..]
		.iter()
		.rev()
		.zip(new[prefix..].iter().rev())
		.take_while(|(a, b)| a == b)
		.count();

	for (j, slot) in origin.iter_mut().enumerate().take(prefix) {
		*slot = Some(j);
	}
	for k in 0..suffix {
		origin[new.len() - suffix + k] = Some(old.len() - suffix + k);
	}

	let old_mid = &old[prefix..old.len() - suffix];
	let new_mid = &new[prefix..new.len() - suffix];
	if old_mid.is_empty() || new_mid.is_empty() {
		return origin;
	}

	let pairs = match unique_positions(new_mid) {
		Some(positions) if all_distinct(old_mid) => match_distinct(old_mid, &positions),
		_ => match_by_table(old_mid, new_mid),
	};
	for (i, j) in pairs {
		origin[prefix + j] = Some(prefix + i);
	}

	origin
}

/// Index of every item in `items`, or `None` if some item repeats.
fn unique_positions<T: Eq + Hash>(items: &[T]) -> Option<HashMap<&T, usize>> {
	let mut positions = HashMap::with_capacity(items.len());
	for (index, item) in items.iter().enumerate() {
		if positions.insert(item, index).is_some() {
			return None;
		}
	}
	Some(positions)
}

fn all_distinct<T: Eq + Hash>(items: &[T]) -> bool {
	let mut seen = HashSet::with_capacity(items.len());
	items.iter().all(|item| seen.insert(item))
}

/// Common subsequence of two repeat-free lists: the longest increasing run of
/// new positions, taken in old order.
fn match_distinct<T: Eq + Hash>(old: &[T], positions: &HashMap<&T, usize>) -> Vec<(usize, usize)> {
	let shared: Vec<(usize, usize)> = old
		.iter()
		.enumerate()
		.filter_map(|(i, item)| positions.get(item).map(|&j| (i, j)))
		.collect();

	// tails[k] indexes the shared pair ending the best run of length k + 1.
	let mut tails: Vec<usize> = Vec::new();
	let mut previous: Vec<Option<usize>> = vec![None; shared.len()];
	for (k, &(_, j)) in shared.iter().enumerate() {
		let slot = tails.partition_point(|&t| shared[t].1 < j);
		previous[k] = slot.checked_sub(1).map(|before| tails[before]);
		if slot == tails.len() {
			tails.push(k);
		} else {
			tails[slot] = k;
		}
	}

	let mut pairs = Vec::with_capacity(tails.len());
	let mut cursor = tails.last().copied();
	while let Some(k) = cursor {
		pairs.push(shared[k]);
		cursor = previous[k];
	}
	pairs.reverse();
	pairs
}

/// Classic LCS table, used when items repeat.
fn match_by_table<T: PartialEq>(old: &[T], new: &[T]) -> Vec<(usize, usize)> {
	// lengths[i][j] = LCS length of old[i..] and new[j..].
	let width = new.len() + 1;
	let mut lengths = vec![0u32; (old.len() + 1) * width];
	for i in (0..old.len()).rev() {
		for j in (0..new.len()).rev() {
			lengths[i * width + j] = if old[i] == new[j] {
				lengths[(i + 1) * width + j + 1] + 1
			} else {
				lengths[(i + 1) * width + j].max(lengths[i * width + j + 1])
			};
		}
	}

	let mut pairs = Vec::new();
	let (mut i, mut j) = (0, 0);
	while i < old.len() && j < new.len() {
		if old[i] == new[j] {
			pairs.push((i, j));
			i += 1;
			j += 1;
		} else if lengths[(i + 1) * width + j] >= lengths[i * width + j + 1] {
			i += 1;
		} else {
			j += 1;
		}
	}
	pairs
}
