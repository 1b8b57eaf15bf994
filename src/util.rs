//! Test utilities for loading sample trees from JSON fixtures.
//!
//! Fixtures describe node structure directly (local elements, left children
//! by position, overflow child), which makes it possible to build exact tree
//! shapes such as deep overflow chains or sparse left slots without reverse
//! engineering an insertion order that produces them. The loader writes the
//! nodes straight into the arena and wires up the parent back-links.

use crate::{NodeId, Relation, Tree};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Deserialize, Debug)]
struct TreeNode {
	elems: Vec<i64>,
	/// Left children keyed by element position.
	#[serde(default)]
	left: BTreeMap<usize, TreeNode>,
	#[serde(default)]
	overflow: Option<Box<TreeNode>>,
}

#[derive(Deserialize, Debug)]
struct SampleTree {
	capacity: usize,
	root: TreeNode,
}

fn translate_node(
	tree: &mut Tree<i64>,
	fixture: TreeNode,
	parent: Option<(NodeId, Relation)>,
) -> NodeId {
	let id = tree.alloc_node(parent);
	let count = fixture.elems.len();
	{
		let node = &mut tree.nodes[id.index()];
		node.elems.extend(fixture.elems);
		if !fixture.left.is_empty() {
			node.left.resize(node.capacity, None);
		}
	}
	tree.len += count;

	for (pos, child) in fixture.left {
		let child_id = translate_node(tree, child, Some((id, Relation::LeftAt(pos))));
		tree.nodes[id.index()].left[pos] = Some(child_id);
	}
	if let Some(child) = fixture.overflow {
		let child_id = translate_node(tree, *child, Some((id, Relation::Overflow)));
		tree.nodes[id.index()].overflow = Some(child_id);
	}
	id
}

/// Loads a tree from a JSON fixture file.
///
/// Panics on missing files or malformed fixtures; this is test plumbing.
/// Fixtures are trusted to satisfy the structural invariants; tests should
/// call `assert_invariants` on the result to be sure.
pub fn sample_tree<P: AsRef<std::path::Path>>(path: P) -> Tree<i64> {
	let file = std::fs::File::open(path).expect("failed to find fixture file");
	let fixture: SampleTree = serde_json::from_reader(file).expect("malformed fixture");

	let mut tree = Tree::with_capacity(fixture.capacity);
	let root = translate_node(&mut tree, fixture.root, None);
	tree.root = Some(root);
	tree
}
