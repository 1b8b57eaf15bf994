//! Cursors and iterators for the [`Tree`] data structure.
//!
//! A [`Cursor`] is the positional state of a traversal: a node handle, an
//! in-node element position, and a validity flag. The sentinel cursors
//! returned by [`Tree::end`] and [`Tree::rend`] are *invalid but anchored*:
//! they remember the extreme element's position, and advancing or retreating
//! them flips them back to a valid cursor at that element instead of moving.
//! This is what makes reverse traversal from `end()` yield the maximal
//! element first.
//!
//! Successor and predecessor computation uses only local node state plus the
//! non-owning parent links. The climb out of an exhausted subtree branches on
//! the tagged parent relation: leaving an overflow subtree keeps climbing
//! (the parent's own elements are already behind us), while leaving a left
//! subtree at position `i` stops at the parent's element `i`.

use crate::{NodeId, Relation, Tree};

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A traversal position: `(node, in-node position, validity)`.
///
/// Cursors do not borrow the tree; every movement or dereference takes the
/// tree by reference. A cursor is only meaningful against the tree that
/// produced it, and any mutation of that tree invalidates it (using a stale
/// cursor is a logic error, not undefined behavior: reads go through the
/// arena and at worst panic or return an unrelated element).
///
/// Two cursors are equal when both are invalid, or when node, position and
/// validity all match.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
	/// Anchored node, `None` only for cursors of an empty tree.
	node: Option<NodeId>,
	pos: usize,
	valid: bool,
}

impl PartialEq for Cursor {
	fn eq(&self, other: &Self) -> bool {
		if !self.valid && !other.valid {
			return true;
		}
		self.node == other.node && self.pos == other.pos && self.valid == other.valid
	}
}

impl Eq for Cursor {}

impl Cursor {
	/// A valid cursor at `node.elems[pos]`.
	pub(crate) fn at(node: NodeId, pos: usize) -> Cursor {
		Cursor {
			node: Some(node),
			pos,
			valid: true,
		}
	}

	/// An invalid cursor anchored at `node.elems[pos]`.
	pub(crate) fn sentinel(node: NodeId, pos: usize) -> Cursor {
		Cursor {
			node: Some(node),
			pos,
			valid: false,
		}
	}

	/// An invalid cursor with no anchor, for empty trees. Never moves.
	pub(crate) fn detached() -> Cursor {
		Cursor {
			node: None,
			pos: 0,
			valid: false,
		}
	}

	/// Whether the cursor points at a real element (not a sentinel).
	pub fn is_valid(&self) -> bool {
		self.valid
	}

	/// The element under the cursor, or `None` for sentinels.
	pub fn get<'t, T: Ord>(&self, tree: &'t Tree<T>) -> Option<&'t T> {
		if !self.valid {
			return None;
		}
		tree.node(self.node?).elems.get(self.pos)
	}

	/// Moves the cursor to the in-order successor.
	///
	/// On the sentinel this flips validity without moving, landing back on
	/// the maximal element. Advancing past the maximal element turns the
	/// cursor into the end sentinel, still anchored at that element.
	pub fn advance<T: Ord>(&mut self, tree: &Tree<T>) {
		let Some(id) = self.node else {
			return;
		};
		if !self.valid {
			self.valid = true;
			return;
		}

		let node = tree.node(id);
		let last = node.len() - 1;
		let next_left = if self.pos < last {
			node.left_at(self.pos + 1)
		} else {
			None
		};

		if let Some(child) = next_left {
			// Everything between elems[pos] and elems[pos + 1] comes next.
			let (n, p) = tree.leftmost_in(child);
			self.node = Some(n);
			self.pos = p;
		} else if self.pos < last {
			self.pos += 1;
		} else if let Some(child) = node.overflow {
			let (n, p) = tree.leftmost_in(child);
			self.node = Some(n);
			self.pos = p;
		} else {
			// Subtree exhausted: climb. Leaving a left subtree at position i
			// stops at the parent's element i; leaving an overflow subtree
			// keeps climbing. Reaching the root this way means we were at the
			// maximal element, so the cursor becomes the end sentinel without
			// moving off its anchor.
			let mut curr = id;
			loop {
				match tree.node(curr).parent {
					Some((parent, Relation::LeftAt(i))) => {
						self.node = Some(parent);
						self.pos = i;
						return;
					}
					Some((parent, Relation::Overflow)) => curr = parent,
					None => {
						self.valid = false;
						return;
					}
				}
			}
		}
	}

	/// Moves the cursor to the in-order predecessor. Mirror of
	/// [`Cursor::advance`].
	///
	/// On a sentinel this flips validity without moving; retreating past the
	/// minimal element turns the cursor into the reverse sentinel, anchored
	/// at that element.
	pub fn retreat<T: Ord>(&mut self, tree: &Tree<T>) {
		let Some(id) = self.node else {
			return;
		};
		if !self.valid {
			self.valid = true;
			return;
		}

		let node = tree.node(id);

		if let Some(child) = node.left_at(self.pos) {
			// The subtree below elems[pos] holds the immediate predecessors;
			// its maximum sits at the end of its overflow chain.
			let (n, p) = tree.rightmost_in(child);
			self.node = Some(n);
			self.pos = p;
		} else if self.pos > 0 {
			self.pos -= 1;
		} else {
			// Climb. Leaving an overflow subtree stops at the parent's last
			// element; leaving a left subtree at position i > 0 stops at
			// element i - 1; leaving the left subtree at position 0 keeps
			// climbing. Reaching the root means we were at the minimal
			// element.
			let mut curr = id;
			loop {
				match tree.node(curr).parent {
					Some((parent, Relation::Overflow)) => {
						self.node = Some(parent);
						self.pos = tree.node(parent).len() - 1;
						return;
					}
					Some((parent, Relation::LeftAt(i))) if i > 0 => {
						self.node = Some(parent);
						self.pos = i - 1;
						return;
					}
					Some((parent, Relation::LeftAt(_))) => curr = parent,
					None => {
						self.valid = false;
						return;
					}
				}
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Iterator
// ---------------------------------------------------------------------------

/// Double-ended in-order iterator over a [`Tree`].
///
/// The front cursor starts at [`Tree::begin`]; the back cursor starts at the
/// [`Tree::end`] sentinel, so the first `next_back` exercises the sentinel
/// flip and yields the maximal element. The element count keeps the two ends
/// from crossing.
pub struct Iter<'t, T> {
	tree: &'t Tree<T>,
	front: Cursor,
	back: Cursor,
	remaining: usize,
}

impl<'t, T: Ord> Iter<'t, T> {
	pub(crate) fn new(tree: &'t Tree<T>) -> Iter<'t, T> {
		Iter {
			tree,
			front: tree.begin(),
			back: tree.end(),
			remaining: tree.len(),
		}
	}
}

impl<'t, T: Ord> Iterator for Iter<'t, T> {
	type Item = &'t T;

	fn next(&mut self) -> Option<&'t T> {
		if self.remaining == 0 {
			return None;
		}
		let item = self.front.get(self.tree)?;
		self.front.advance(self.tree);
		self.remaining -= 1;
		Some(item)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<T: Ord> DoubleEndedIterator for Iter<'_, T> {
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}
		self.back.retreat(self.tree);
		let item = self.back.get(self.tree)?;
		self.remaining -= 1;
		Some(item)
	}
}

impl<T: Ord> ExactSizeIterator for Iter<'_, T> {}

impl<T: Ord> std::iter::FusedIterator for Iter<'_, T> {}
