use thiserror::Error;

/// A broken shape invariant reported by `validate()`.
///
/// None of these can be produced through the public API; seeing one means a
/// rebalancing bug, so callers typically just `unwrap()` the result in tests.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum InvariantViolation {
    /// `key` is not strictly between its neighbours in in-order position.
    #[error("key {key} breaks search-tree order")]
    OutOfOrder { key: u64 },

    /// Subtree heights under the node holding `key` differ by more than one.
    #[error("node {key} is unbalanced: left height {left}, right height {right}")]
    Unbalanced { key: u64, left: usize, right: usize },

    /// The height cached on the node holding `key` is out of date.
    #[error("node {key} caches height {cached} but has height {actual}")]
    StaleHeight { key: u64, cached: usize, actual: usize },

    /// A multiway node holds too few or too many keys.
    #[error("node at depth {depth} holds {keys} keys, outside {min}..={max}")]
    Occupancy { depth: usize, keys: usize, min: usize, max: usize },

    /// An internal multiway node does not have exactly one more child than keys.
    #[error("internal node holds {keys} keys but {children} children")]
    ChildCount { keys: usize, children: usize },

    /// Multiway leaves sit at different depths.
    #[error("leaf found at depth {found}, expected {expected}")]
    UnevenLeafDepth { expected: usize, found: usize },

    /// The recorded size disagrees with the number of stored keys.
    #[error("size is recorded as {recorded} but {counted} keys are stored")]
    SizeMismatch { recorded: usize, counted: usize },

    /// Nodes are still allocated but unreachable from the root.
    #[error("{live} nodes allocated but only {reachable} reachable")]
    LeakedNodes { live: usize, reachable: usize },
}
