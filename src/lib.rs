//! Balanced ordered sets of `u64` keys.
//!
//! This crate provides two self-balancing search trees behind one point-query
//! interface, [`OrderedSet`]:
//!
//! - [`AvlSet`] - A binary AVL tree that rotates to keep sibling subtree heights within one
//! - [`MultiwaySet`] - A B-tree of compile-time fanout `B`, with [`TwoThreeSet`] (`B = 3`)
//!   and [`BTreeSet4`] (`B = 4`) as the common shapes
//!
//! Both answer membership, predecessor and successor queries in `O(log n)` and
//! agree on observable behaviour for any sequence of calls.
//!
//! # Example
//!
//! ```
//! use kiln_tree::{AvlSet, OrderedSet, TwoThreeSet};
//!
//! let mut avl = AvlSet::new();
//! let mut two_three = TwoThreeSet::new();
//!
//! for key in [50, 20, 80, 10, 30] {
//!     avl.insert(key);
//!     two_three.insert(key);
//! }
//!
//! // Neighbours need not be stored keys themselves.
//! assert_eq!(avl.predecessor(25), Some(20));
//! assert_eq!(two_three.successor(30), Some(50));
//! assert_eq!(avl.successor(80), None);
//!
//! avl.remove(20);
//! assert_eq!(avl.predecessor(25), Some(10));
//! assert_eq!(OrderedSet::size(&two_three), 5);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Self-checking** - Every set exposes `validate()`, which walks the tree and
//!   reports the first broken shape invariant as an [`InvariantViolation`]
//! - **Arena-backed B-tree nodes** - Multiway nodes live in one contiguous pool and
//!   refer to each other by index
//!
//! # Logging
//!
//! Structural events of the multiway tree (root splits, root collapses) are
//! emitted at `trace` level through the [`log`](https://docs.rs/log) facade.
//! Nothing is logged unless the application installs a logger.

#![cfg_attr(not(test), no_std)]
// These forbid rules and lint groups are meant to be very restrictive.
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

mod avl_set;
mod error;
mod multiway_set;
mod ordered_set;
mod raw;

pub use avl_set::AvlSet;
pub use error::InvariantViolation;
pub use multiway_set::{BTreeSet4, MultiwaySet, TwoThreeSet};
pub use ordered_set::OrderedSet;
pub use raw::MAX_FANOUT;
