//! Error types for the tree.
//!
//! Almost nothing in this crate is fallible in the recoverable sense: there
//! is no I/O, no external dependency, and duplicate insertion is a defined
//! outcome rather than a failure. Precondition violations (inserting into a
//! full node, creating a child on a non-full node, walking a foreign cursor)
//! are programming errors and panic, because tolerating them would corrupt
//! the tree.
//!
//! The one recoverable case is construction: node capacity often comes from
//! configuration, and a zero capacity is a caller input problem rather than
//! a broken invariant. [`crate::Tree::try_with_capacity`] surfaces it here.

use thiserror::Error;

/// Errors reported by fallible tree constructors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
	/// The requested node capacity was zero. A node must be able to hold at
	/// least one element, otherwise the descent can never terminate.
	#[error("node capacity must be at least 1")]
	ZeroCapacity,
}

/// A Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
