//! An indexed ordered multiset for Rust.
//!
//! [`AvlMultiset`] keeps its values sorted, stores repeated values as a count on a
//! single node, and answers order-statistic queries in O(log n):
//!
//! - [`value_at`](AvlMultiset::value_at) - the value at a given sorted position,
//!   duplicates included
//! - [`rank_of`](AvlMultiset::rank_of) - the sorted position of a value's first occurrence
//! - Indexing by [`Rank`] - e.g., `set[Rank(0)]` for the smallest value
//!
//! # Example
//!
//! ```
//! use avl_multiset::{AvlMultiset, Error, Rank};
//!
//! let mut set = AvlMultiset::new();
//! set.insert(5);
//! set.insert(3);
//! set.insert(5);
//! set.insert(1);
//!
//! assert_eq!(set.len(), 4);
//! assert_eq!(set.value_at(0), Ok(&1));
//! assert_eq!(set.value_at(3), Ok(&5));
//! assert_eq!(set[Rank(1)], 3);
//!
//! // Failed operations are reported, never silently absorbed.
//! assert_eq!(set.remove(&4), Err(Error::ValueNotFound));
//! assert_eq!(set.value_at(4), Err(Error::IndexOutOfRange { rank: 4, len: 4 }));
//! ```
//!
//! # Implementation
//!
//! The multiset is an AVL tree whose nodes also carry a duplicate count and the
//! number of occurrences in their subtree. Nodes live in an arena and link to each
//! other (parent included) by index, so rotations are plain index reassignments.
//! Insertion and removal share one rebalancing walk from the modified node to the
//! root: an insertion rotates at most once, a removal may rotate at every level.
//!
//! The crate is `no_std` and only requires `alloc`.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;

pub mod avl_multiset;

pub use avl_multiset::AvlMultiset;
pub use error::{Error, Result};
pub use order_statistic::Rank;
