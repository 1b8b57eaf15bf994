//! # Mosstree: An Order-Preserving Multiway Search Tree Set
//!
//! This crate provides an in-memory, single-threaded set of totally-ordered
//! elements backed by a multiway search tree with **lazy overflow subtrees**.
//!
//! ## Design Overview
//!
//! Each node owns a bounded sorted array of elements. A node grows children
//! only once that array is full: one *left subtree* per element position,
//! holding the elements strictly between its neighbouring elements, plus a
//! single trailing *overflow subtree* holding everything greater than the
//! node's last element. Nodes are never split, merged or rebalanced; the tree
//! shape is a pure function of insertion order.
//!
//! ```text
//!               ┌───────────────────────────────┐
//!               │ elems: [ e0 │ e1 │ ... │ ek ]  │
//!               └──┬───────┬─────────────────┬──┘
//!                  │       │                 │
//!            left[0]    left[1]   ...   overflow
//!            (< e0)    (e0..e1)           (> ek)
//! ```
//!
//! All nodes live in an arena owned by the tree and reference each other by
//! index, so parent back-references are plain non-owning indices. The parent
//! link carries a tagged relation (left child at position `i`, or the
//! overflow child); the iterator's climb logic branches on that tag.
//!
//! ## Basic Usage
//!
//! ```
//! use mosstree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Deduplicated insertion
//! assert!(tree.insert(2).1);
//! assert!(tree.insert(1).1);
//! assert!(!tree.insert(2).1); // already present
//!
//! // Exact-match lookup
//! assert!(tree.contains(&1));
//! assert!(!tree.contains(&3));
//!
//! // In-order traversal
//! let elems: Vec<i32> = tree.iter().copied().collect();
//! assert_eq!(elems, vec![1, 2]);
//! ```
//!
//! ## What this is not
//!
//! There is no element removal, no persistence and no concurrency support:
//! the tree assumes exclusive access by its caller. Precondition violations
//! (inserting into a full node, creating a child on a non-full node) are
//! programming errors and panic rather than corrupting the structure.

use smallvec::SmallVec;

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

pub mod error;
pub mod iter;
#[cfg(any(test, feature = "test-utils"))]
pub mod util;

use iter::{Cursor, Iter};

// ---------------------------------------------------------------------------
// Configuration Constants
// ---------------------------------------------------------------------------

/// Default maximum number of elements a node holds before it becomes full
/// and starts growing children.
pub const DEFAULT_NODE_CAPACITY: usize = 40;

/// Inline element slots per node before spilling to the heap.
const INLINE_ELEMS: usize = 8;

// ---------------------------------------------------------------------------
// Arena Handles
// ---------------------------------------------------------------------------

/// Index of a node within the tree's arena.
///
/// Handles are stable for the life of the tree: nodes are only ever created
/// (insertion never removes nodes), and `clear` drops the arena wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
	#[inline]
	fn index(self) -> usize {
		self.0 as usize
	}
}

/// How a node hangs off its parent.
///
/// Stored explicitly rather than as a bare position integer: climbing out of
/// an overflow subtree must continue past the parent's last element, while
/// climbing out of a left subtree at position `i` stops at the parent's
/// element `i`. The two cases are indistinguishable from a position alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relation {
	/// Left subtree at element position `i`: holds elements strictly between
	/// the parent's elements `i - 1` and `i` (below element 0 when `i == 0`).
	LeftAt(usize),
	/// Overflow subtree: holds elements strictly greater than the parent's
	/// last element.
	Overflow,
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single tree node: a sorted element array plus optional children.
pub(crate) struct Node<T> {
	/// Locally stored elements, strictly ascending, at most `capacity` long.
	pub(crate) elems: SmallVec<[T; INLINE_ELEMS]>,
	/// Left children by element position. Empty until the first child is
	/// created, then exactly `capacity` slots.
	pub(crate) left: Vec<Option<NodeId>>,
	/// The overflow child, if any.
	pub(crate) overflow: Option<NodeId>,
	/// Non-owning back-reference to the parent, absent for the root.
	pub(crate) parent: Option<(NodeId, Relation)>,
	/// Maximum number of local elements, fixed at node creation.
	pub(crate) capacity: usize,
}

impl<T> Node<T> {
	fn new(capacity: usize, parent: Option<(NodeId, Relation)>) -> Node<T> {
		Node {
			elems: SmallVec::new(),
			left: Vec::new(),
			overflow: None,
			parent,
			capacity,
		}
	}

	/// Whether the local element array is at capacity. Only full nodes may
	/// have children.
	#[inline]
	pub(crate) fn is_full(&self) -> bool {
		self.elems.len() == self.capacity
	}

	#[inline]
	pub(crate) fn is_empty(&self) -> bool {
		self.elems.is_empty()
	}

	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.elems.len()
	}

	/// The left child at element position `pos`, if present.
	#[inline]
	pub(crate) fn left_at(&self, pos: usize) -> Option<NodeId> {
		self.left.get(pos).copied().flatten()
	}

	/// Membership test against the local element array only (linear scan).
	pub(crate) fn contains(&self, value: &T) -> bool
	where
		T: Ord,
	{
		self.elems.iter().any(|e| e == value)
	}

	/// Inserts `value` at `pos`, shifting later elements right. The caller
	/// chooses `pos` so the array stays sorted.
	///
	/// # Panics
	///
	/// Panics if the node is already full: the caller should have descended
	/// into a child instead, and silently dropping the element would corrupt
	/// the tree.
	pub(crate) fn insert_at(&mut self, pos: usize, value: T) {
		assert!(!self.is_full(), "insert into full node");
		self.elems.insert(pos, value);
	}

	/// All present children, left children first in position order, then the
	/// overflow child.
	pub(crate) fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.left.iter().copied().flatten().chain(self.overflow)
	}
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// An ordered set backed by a multiway search tree with overflow subtrees.
///
/// Elements are deduplicated and kept in the intrinsic total order of `T`.
/// See the [crate docs](crate) for the structural model.
///
/// # Example
///
/// ```
/// use mosstree::Tree;
///
/// let mut tree = Tree::with_capacity(2);
/// for v in [5, 3, 8, 1, 4] {
///     tree.insert(v);
/// }
/// let sorted: Vec<i32> = tree.iter().copied().collect();
/// assert_eq!(sorted, vec![1, 3, 4, 5, 8]);
/// ```
pub struct Tree<T> {
	/// Node arena. The root owns its children transitively through here;
	/// parent links are indices back into this vector.
	nodes: Vec<Node<T>>,
	/// The root node, absent exactly when the tree holds zero elements.
	root: Option<NodeId>,
	/// Maximum elements per node. Immutable between `clear`s.
	capacity: usize,
	/// Total number of elements.
	len: usize,
}

impl<T: Ord> Default for Tree<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Ord> Tree<T> {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates an empty tree with the default node capacity
	/// ([`DEFAULT_NODE_CAPACITY`]).
	///
	/// No nodes are allocated until the first insertion.
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_NODE_CAPACITY)
	}

	/// Creates an empty tree whose nodes hold up to `capacity` elements.
	///
	/// # Panics
	///
	/// Panics if `capacity` is zero. Use [`Tree::try_with_capacity`] when the
	/// capacity comes from configuration.
	pub fn with_capacity(capacity: usize) -> Self {
		match Self::try_with_capacity(capacity) {
			Ok(tree) => tree,
			Err(e) => panic!("{e}"),
		}
	}

	/// Fallible variant of [`Tree::with_capacity`].
	///
	/// # Example
	///
	/// ```
	/// use mosstree::{error::Error, Tree};
	///
	/// assert!(matches!(Tree::<i32>::try_with_capacity(0), Err(Error::ZeroCapacity)));
	/// assert!(Tree::<i32>::try_with_capacity(2).is_ok());
	/// ```
	pub fn try_with_capacity(capacity: usize) -> error::Result<Self> {
		if capacity == 0 {
			return Err(error::Error::ZeroCapacity);
		}
		Ok(Tree {
			nodes: Vec::new(),
			root: None,
			capacity,
			len: 0,
		})
	}

	// -----------------------------------------------------------------------
	// Metadata
	// -----------------------------------------------------------------------

	/// The configured maximum number of elements per node.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Number of elements in the tree.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Whether the tree holds no elements.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Number of node levels in the tree, `0` when empty.
	///
	/// Diagnostic only: with capacity 1 every insertion can add a level, so
	/// this grows linearly on skewed input.
	pub fn height(&self) -> usize {
		match self.root {
			Some(root) => self.subtree_height(root),
			None => 0,
		}
	}

	fn subtree_height(&self, id: NodeId) -> usize {
		let mut deepest = 0;
		for child in self.node(id).children() {
			deepest = deepest.max(self.subtree_height(child));
		}
		1 + deepest
	}

	// -----------------------------------------------------------------------
	// Insertion
	// -----------------------------------------------------------------------

	/// Inserts `value`, deduplicated.
	///
	/// Returns a cursor to the element's slot and `true` if the value was
	/// actually inserted, or a cursor to the already-present equal element
	/// and `false`. Equality is derived from ordering: two elements are equal
	/// when neither orders below the other.
	///
	/// The descent scans each full node left to right, moving into the left
	/// subtree at the first greater element or into the overflow subtree past
	/// the last one, creating empty children on demand. The first non-full
	/// node on that path receives the element in sorted position.
	///
	/// # Example
	///
	/// ```
	/// use mosstree::Tree;
	///
	/// let mut tree = Tree::new();
	/// let (first, inserted) = tree.insert(7);
	/// assert!(inserted);
	/// let (again, inserted) = tree.insert(7);
	/// assert!(!inserted);
	/// assert_eq!(first, again);
	/// ```
	pub fn insert(&mut self, value: T) -> (Cursor, bool) {
		let Some(root) = self.root else {
			let id = self.alloc_node(None);
			self.nodes[id.index()].elems.push(value);
			self.root = Some(id);
			self.len = 1;
			return (Cursor::at(id, 0), true);
		};

		let mut curr = root;
		'descent: while self.node(curr).is_full() {
			let mut i = 0;
			loop {
				let ord = value.cmp(&self.node(curr).elems[i]);
				match ord {
					Ordering::Equal => {
						return (Cursor::at(curr, i), false);
					}
					Ordering::Less => {
						let existing = self.node(curr).left_at(i);
						curr = match existing {
							Some(child) => child,
							None => self.create_left_child(curr, i),
						};
						continue 'descent;
					}
					Ordering::Greater => {
						if i + 1 < self.capacity {
							i += 1;
						} else {
							let existing = self.node(curr).overflow;
							curr = match existing {
								Some(child) => child,
								None => self.create_overflow_child(curr),
							};
							continue 'descent;
						}
					}
				}
			}
		}

		// Non-full node: find the sorted position, bailing on an equal match.
		let node = self.node(curr);
		let mut pos = node.len();
		for (i, e) in node.elems.iter().enumerate() {
			match value.cmp(e) {
				Ordering::Equal => return (Cursor::at(curr, i), false),
				Ordering::Less => {
					pos = i;
					break;
				}
				Ordering::Greater => {}
			}
		}
		self.nodes[curr.index()].insert_at(pos, value);
		self.len += 1;
		(Cursor::at(curr, pos), true)
	}

	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Finds `value`, returning a cursor to its slot or [`Tree::end`] when
	/// absent.
	///
	/// The descent mirrors [`Tree::insert`] exactly, except that a required
	/// but absent child means "not found" instead of being created.
	pub fn find(&self, value: &T) -> Cursor {
		let Some(root) = self.root else {
			return self.end();
		};

		let mut curr = root;
		'descent: while self.node(curr).is_full() {
			let mut i = 0;
			loop {
				match value.cmp(&self.node(curr).elems[i]) {
					Ordering::Equal => return Cursor::at(curr, i),
					Ordering::Less => match self.node(curr).left_at(i) {
						Some(child) => {
							curr = child;
							continue 'descent;
						}
						None => return self.end(),
					},
					Ordering::Greater => {
						if i + 1 < self.capacity {
							i += 1;
						} else {
							match self.node(curr).overflow {
								Some(child) => {
									curr = child;
									continue 'descent;
								}
								None => return self.end(),
							}
						}
					}
				}
			}
		}

		let node = self.node(curr);
		for (i, e) in node.elems.iter().enumerate() {
			match value.cmp(e) {
				Ordering::Equal => return Cursor::at(curr, i),
				Ordering::Less => break,
				Ordering::Greater => {}
			}
		}
		self.end()
	}

	/// Whether `value` is present.
	pub fn contains(&self, value: &T) -> bool {
		self.find(value).is_valid()
	}

	/// A reference to the stored element equal to `value`, if any.
	pub fn get(&self, value: &T) -> Option<&T> {
		self.find(value).get(self)
	}

	// -----------------------------------------------------------------------
	// Traversal Anchors
	// -----------------------------------------------------------------------

	/// Cursor at the minimal element; equals [`Tree::end`] when empty.
	pub fn begin(&self) -> Cursor {
		match self.root {
			Some(root) => {
				let (node, pos) = self.leftmost_in(root);
				Cursor::at(node, pos)
			}
			None => Cursor::detached(),
		}
	}

	/// The one-past-the-end sentinel: an invalid cursor anchored at the
	/// maximal element's position. Retreating it (or advancing it) flips it
	/// back to a valid cursor at the maximal element.
	pub fn end(&self) -> Cursor {
		match self.max_position() {
			Some((node, pos)) => Cursor::sentinel(node, pos),
			None => Cursor::detached(),
		}
	}

	/// Cursor at the maximal element, the first stop of a reverse traversal;
	/// equals [`Tree::rend`] when empty.
	pub fn rbegin(&self) -> Cursor {
		match self.max_position() {
			Some((node, pos)) => Cursor::at(node, pos),
			None => Cursor::detached(),
		}
	}

	/// The reverse sentinel: an invalid cursor anchored at the minimal
	/// element's position.
	pub fn rend(&self) -> Cursor {
		match self.root {
			Some(root) => {
				let (node, pos) = self.leftmost_in(root);
				Cursor::sentinel(node, pos)
			}
			None => Cursor::detached(),
		}
	}

	/// The minimal element, if any.
	pub fn first(&self) -> Option<&T> {
		self.begin().get(self)
	}

	/// The maximal element, if any.
	pub fn last(&self) -> Option<&T> {
		let (node, pos) = self.max_position()?;
		Some(&self.node(node).elems[pos])
	}

	/// A double-ended in-order iterator over the elements.
	pub fn iter(&self) -> Iter<'_, T> {
		Iter::new(self)
	}

	// -----------------------------------------------------------------------
	// Whole-Tree Operations
	// -----------------------------------------------------------------------

	/// Removes every element and drops every node.
	///
	/// Note: `clear` also resets the node capacity to
	/// [`DEFAULT_NODE_CAPACITY`], discarding any custom capacity the tree was
	/// constructed with. Callers that need a persistent non-default capacity
	/// should reconstruct the tree instead.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.root = None;
		self.len = 0;
		self.capacity = DEFAULT_NODE_CAPACITY;
	}

	/// Exchanges the entire contents (nodes, root, capacity, length) of two
	/// trees in constant time.
	pub fn swap(&mut self, other: &mut Tree<T>) {
		std::mem::swap(self, other);
	}
}

// ---------------------------------------------------------------------------
// Internal Plumbing
// ---------------------------------------------------------------------------

// Arena access and child bookkeeping never compare elements, so they carry
// no ordering bound; trait impls like `Display` use them on any `T`.
impl<T> Tree<T> {
	#[inline]
	pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
		&self.nodes[id.index()]
	}

	pub(crate) fn alloc_node(&mut self, parent: Option<(NodeId, Relation)>) -> NodeId {
		let id = NodeId(u32::try_from(self.nodes.len()).expect("arena index overflow"));
		self.nodes.push(Node::new(self.capacity, parent));
		id
	}

	/// Materializes an empty left child at element position `pos`.
	///
	/// # Panics
	///
	/// Panics if the node is not full or the slot is already occupied; both
	/// indicate a broken descent invariant.
	fn create_left_child(&mut self, id: NodeId, pos: usize) -> NodeId {
		assert!(self.node(id).is_full(), "child created on non-full node");
		let child = self.alloc_node(Some((id, Relation::LeftAt(pos))));
		let node = &mut self.nodes[id.index()];
		if node.left.is_empty() {
			node.left.resize(node.capacity, None);
		}
		assert!(node.left[pos].is_none(), "left child slot {pos} occupied");
		node.left[pos] = Some(child);
		child
	}

	/// Materializes an empty overflow child.
	///
	/// # Panics
	///
	/// Panics if the node is not full or already has an overflow child.
	fn create_overflow_child(&mut self, id: NodeId) -> NodeId {
		assert!(self.node(id).is_full(), "child created on non-full node");
		let child = self.alloc_node(Some((id, Relation::Overflow)));
		let node = &mut self.nodes[id.index()];
		assert!(node.overflow.is_none(), "overflow child slot occupied");
		node.overflow = Some(child);
		child
	}

	/// First element position of the subtree rooted at `id`: follow the
	/// left-child-at-0 chain to its end.
	pub(crate) fn leftmost_in(&self, mut id: NodeId) -> (NodeId, usize) {
		while let Some(child) = self.node(id).left_at(0) {
			id = child;
		}
		(id, 0)
	}

	/// Last element position of the subtree rooted at `id`: follow the
	/// overflow chain to its end.
	pub(crate) fn rightmost_in(&self, mut id: NodeId) -> (NodeId, usize) {
		while let Some(child) = self.node(id).overflow {
			id = child;
		}
		(id, self.node(id).len() - 1)
	}

	fn max_position(&self) -> Option<(NodeId, usize)> {
		self.root.map(|root| self.rightmost_in(root))
	}
}

// ---------------------------------------------------------------------------
// Trait Implementations
// ---------------------------------------------------------------------------

impl<T: Ord + Clone> Clone for Tree<T> {
	/// Deep, value-preserving copy.
	///
	/// Rather than cloning node structure, the source is walked breadth-first
	/// (a node's local elements in order, then its present children enqueued
	/// left to right, overflow last) and every element is replayed through
	/// [`Tree::insert`] on the copy. Insertion is deterministic given
	/// insertion order, so the replay reconstructs an operationally
	/// equivalent tree.
	fn clone(&self) -> Self {
		let mut out = Tree::with_capacity(self.capacity);
		let Some(root) = self.root else {
			return out;
		};
		let mut queue = VecDeque::from([root]);
		while let Some(id) = queue.pop_front() {
			let node = self.node(id);
			for (i, elem) in node.elems.iter().enumerate() {
				out.insert(elem.clone());
				if let Some(child) = node.left_at(i) {
					queue.push_back(child);
				}
			}
			if let Some(child) = node.overflow {
				queue.push_back(child);
			}
		}
		out
	}
}

impl<T: fmt::Debug> fmt::Debug for Tree<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Tree")
			.field("capacity", &self.capacity)
			.field("len", &self.len)
			.finish_non_exhaustive()
	}
}

impl<T: fmt::Display> fmt::Display for Tree<T> {
	/// Diagnostic dump: every element in breadth-first order, space
	/// separated, root's elements first. Not a stable format.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let Some(root) = self.root else {
			return Ok(());
		};
		let mut queue = VecDeque::from([root]);
		let mut first = true;
		while let Some(id) = queue.pop_front() {
			let node = self.node(id);
			for (i, elem) in node.elems.iter().enumerate() {
				if !first {
					f.write_str(" ")?;
				}
				first = false;
				write!(f, "{elem}")?;
				if let Some(child) = node.left_at(i) {
					queue.push_back(child);
				}
			}
			if let Some(child) = node.overflow {
				queue.push_back(child);
			}
		}
		Ok(())
	}
}

impl<'t, T: Ord> IntoIterator for &'t Tree<T> {
	type Item = &'t T;
	type IntoIter = Iter<'t, T>;

	fn into_iter(self) -> Iter<'t, T> {
		self.iter()
	}
}

// ---------------------------------------------------------------------------
// Invariant Validation (test support)
// ---------------------------------------------------------------------------

#[cfg(any(test, feature = "test-utils"))]
impl<T: Ord + fmt::Debug> Tree<T> {
	/// Validates all structural invariants, panicking with diagnostics on
	/// the first violation.
	///
	/// Checked invariants:
	///
	/// 1. Every node's elements are strictly ascending and within capacity
	/// 2. Only full nodes have children
	/// 3. Every child's parent back-link names the right node and relation
	/// 4. Subtree key ranges: `left[i]` strictly between neighbouring
	///    elements, overflow strictly above the last element
	/// 5. Every arena node is reachable from the root (no leaks)
	/// 6. The maintained `len` matches the actual element count
	pub fn assert_invariants(&self) {
		let Some(root) = self.root else {
			assert_eq!(self.len, 0, "empty tree with nonzero len");
			assert!(self.nodes.is_empty(), "empty tree with live nodes");
			return;
		};
		assert!(self.node(root).parent.is_none(), "root has a parent link");

		let mut visited = 0usize;
		let mut count = 0usize;
		self.validate_subtree(root, None, None, &mut visited, &mut count);

		assert_eq!(count, self.len, "len {} != element count {}", self.len, count);
		assert_eq!(
			visited,
			self.nodes.len(),
			"{} arena nodes but only {} reachable",
			self.nodes.len(),
			visited
		);
	}

	fn validate_subtree(
		&self,
		id: NodeId,
		lower: Option<&T>,
		upper: Option<&T>,
		visited: &mut usize,
		count: &mut usize,
	) {
		*visited += 1;
		let node = self.node(id);

		assert!(!node.is_empty(), "{id:?} holds no elements");
		assert!(
			node.len() <= node.capacity,
			"{id:?} holds {} elements, capacity {}",
			node.len(),
			node.capacity
		);
		assert_eq!(node.capacity, self.capacity, "{id:?} capacity mismatch");

		for w in node.elems.windows(2) {
			assert!(w[0] < w[1], "{id:?} not strictly ascending: {:?} >= {:?}", w[0], w[1]);
		}
		for e in &node.elems {
			if let Some(lo) = lower {
				assert!(e > lo, "{e:?} in {id:?} not above bound {lo:?}");
			}
			if let Some(hi) = upper {
				assert!(e < hi, "{e:?} in {id:?} not below bound {hi:?}");
			}
		}
		*count += node.len();

		if !node.is_full() {
			assert!(
				node.children().next().is_none(),
				"non-full {id:?} has children"
			);
		}

		for (i, slot) in node.left.iter().enumerate() {
			let Some(child) = *slot else {
				continue;
			};
			assert_eq!(
				self.node(child).parent,
				Some((id, Relation::LeftAt(i))),
				"{child:?} back-link does not name {id:?} left slot {i}"
			);
			let lo = if i == 0 { lower } else { Some(&node.elems[i - 1]) };
			self.validate_subtree(child, lo, Some(&node.elems[i]), visited, count);
		}
		if let Some(child) = node.overflow {
			assert_eq!(
				self.node(child).parent,
				Some((id, Relation::Overflow)),
				"{child:?} back-link does not name {id:?} overflow slot"
			);
			self.validate_subtree(child, node.elems.last(), upper, visited, count);
		}
	}
}

// ---------------------------------------------------------------------------
// Unit Tests
// ---------------------------------------------------------------------------
