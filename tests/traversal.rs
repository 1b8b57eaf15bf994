//! # Traversal Tests for Mosstree
//!
//! The successor/predecessor computation is the riskiest part of this
//! structure: climbing out of an overflow subtree must continue past the
//! parent's last element, while climbing out of a left subtree stops at the
//! parent. These tests concentrate on those boundaries, the end/rend
//! sentinel contract, and step-by-step cursor navigation.

use mosstree::Tree;
use rand::prelude::*;

fn tree_with(capacity: usize, values: &[i32]) -> Tree<i32> {
	let mut tree = Tree::with_capacity(capacity);
	for &v in values {
		tree.insert(v);
	}
	tree
}

// ===========================================================================
// Overflow-Chain Boundary Walks
// ===========================================================================

/// Deep overflow chains force multi-level climbs: moving off the last
/// element of the deepest node must climb through every overflow ancestor in
/// one step and land on the end sentinel.
#[test]
fn forward_walk_through_nested_overflow_chains() {
	// Capacity 2: [1,2] full, then 3..=10 spill into nested overflow nodes.
	let tree = tree_with(2, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
	tree.assert_invariants();

	let mut c = tree.begin();
	for expected in 1..=10 {
		assert_eq!(c.get(&tree), Some(&expected), "stopped early at {expected}");
		c.advance(&tree);
	}
	assert!(!c.is_valid());
	assert_eq!(c, tree.end());
}

/// Mirror of the above: the first retreat from an overflow child stops at
/// its immediate parent's last element, never higher.
#[test]
fn backward_walk_through_nested_overflow_chains() {
	let tree = tree_with(2, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

	let mut c = tree.rbegin();
	for expected in (1..=10).rev() {
		assert_eq!(c.get(&tree), Some(&expected));
		c.retreat(&tree);
	}
	assert_eq!(c, tree.rend());
}

/// A left subtree hanging off the middle of an overflow chain: climbing out
/// of it must stop at the overflow node that owns it, while climbing out of
/// that node's last element must keep going.
#[test]
fn left_subtree_inside_overflow_chain() {
	// Capacity 1: 10 -> overflow 30 -> overflow 40; 20 becomes the left
	// child of 30, and 25 the overflow child of 20.
	let tree = tree_with(1, &[10, 30, 40, 20, 25]);
	tree.assert_invariants();

	assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![10, 20, 25, 30, 40]);
	assert_eq!(
		tree.iter().rev().copied().collect::<Vec<_>>(),
		vec![40, 30, 25, 20, 10]
	);

	// Successor of 25 climbs out of an overflow child into a left child and
	// stops exactly at 30.
	let mut c = tree.find(&25);
	c.advance(&tree);
	assert_eq!(c.get(&tree), Some(&30));

	// Predecessor of 30 dives to the rightmost element of its left subtree.
	let mut c = tree.find(&30);
	c.retreat(&tree);
	assert_eq!(c.get(&tree), Some(&25));
}

// ===========================================================================
// Sentinel Contract
// ===========================================================================

#[test]
fn end_is_anchored_at_the_maximum() {
	let tree = tree_with(2, &[5, 3, 8, 1, 4]);

	// Decrementing end() yields the maximal element without moving.
	let mut c = tree.end();
	c.retreat(&tree);
	assert_eq!(c.get(&tree), Some(&8));
	assert_eq!(c, tree.rbegin());
}

#[test]
fn empty_tree_begin_equals_end() {
	let tree: Tree<i32> = Tree::with_capacity(2);
	assert_eq!(tree.begin(), tree.end());
	assert!(!tree.begin().is_valid());
}

#[test]
fn advance_beyond_end_then_back() {
	let tree = tree_with(1, &[1, 2, 3]);

	let mut c = tree.find(&3);
	c.advance(&tree);
	assert_eq!(c, tree.end());

	// Repeated flips oscillate between the sentinel and the maximum.
	c.advance(&tree);
	assert_eq!(c.get(&tree), Some(&3));
	c.advance(&tree);
	assert_eq!(c, tree.end());
	c.retreat(&tree);
	assert_eq!(c.get(&tree), Some(&3));
}

// ===========================================================================
// Step Symmetry
// ===========================================================================

/// For every element, advancing then retreating (and vice versa) returns to
/// the same cursor. Run over a randomized tree at a deep capacity.
#[test]
fn advance_retreat_round_trip() {
	let mut rng = StdRng::seed_from_u64(11);
	let mut tree: Tree<i32> = Tree::with_capacity(2);
	for _ in 0..500 {
		tree.insert(rng.random_range(0..2000));
	}
	tree.assert_invariants();

	let mut c = tree.begin();
	while c.is_valid() {
		let here = c;
		let mut forward = c;
		forward.advance(&tree);
		if forward.is_valid() {
			let mut back = forward;
			back.retreat(&tree);
			assert_eq!(back, here, "retreat did not undo advance");
			assert_eq!(back.get(&tree), here.get(&tree));
		}
		c = forward;
	}
}

/// The full forward walk and the full backward walk visit the same elements
/// in mirrored order, at several capacities.
#[test]
fn bidirectional_walks_mirror() {
	let mut rng = StdRng::seed_from_u64(13);
	let values: Vec<i32> = (0..400).map(|_| rng.random_range(-1000..1000)).collect();

	for capacity in [1, 2, 3, 7, 40] {
		let tree = tree_with(capacity, &values);

		let mut forward = Vec::new();
		let mut c = tree.begin();
		while c.is_valid() {
			forward.push(*c.get(&tree).unwrap());
			c.advance(&tree);
		}

		let mut backward = Vec::new();
		let mut c = tree.rbegin();
		while c.is_valid() {
			backward.push(*c.get(&tree).unwrap());
			c.retreat(&tree);
		}
		backward.reverse();

		assert_eq!(forward, backward, "mismatch at capacity {capacity}");
	}
}

// ===========================================================================
// Cursor Dereference
// ===========================================================================

#[test]
fn get_is_none_only_for_sentinels() {
	let tree = tree_with(2, &[2, 1, 3]);

	assert_eq!(tree.begin().get(&tree), Some(&1));
	assert_eq!(tree.rbegin().get(&tree), Some(&3));
	assert_eq!(tree.end().get(&tree), None);
	assert_eq!(tree.rend().get(&tree), None);
	assert_eq!(tree.find(&2).get(&tree), Some(&2));
}
