use core::fmt;

use crate::InvariantViolation;
use crate::OrderedSet;
use crate::raw::RawMultiwaySet;

/// An ordered set of `u64` keys backed by a multiway search tree of fanout `B`.
///
/// Each node holds at most `B - 1` sorted keys and, unless it is a leaf, one
/// more child than keys. Every node except the root holds at least
/// `ceil(B / 2) - 1` keys and all leaves sit at the same depth, so the tree
/// stays `O(log n)` tall. An insertion that overfills a node splits it and
/// pushes its median up to the parent; a removal that starves a node borrows
/// a key through the parent from a sibling, or merges with one.
///
/// `B` must lie in `3..=MAX_FANOUT`; other values fail to compile. `B = 3`
/// gives a [`TwoThreeSet`] and `B = 4` a [`BTreeSet4`] (a 2-3-4 tree).
///
/// When a starved node has two siblings, the left one is tried first, both
/// for borrowing and for merging.
///
/// # Examples
///
/// ```
/// use kiln_tree::MultiwaySet;
///
/// let mut set: MultiwaySet<5> = (1..=100).collect();
/// assert_eq!(set.len(), 100);
/// assert_eq!(set.predecessor(50), Some(49));
///
/// for key in (1..=100).step_by(2) {
///     set.remove(key);
/// }
/// assert_eq!(set.successor(50), Some(52));
/// set.validate().unwrap();
/// ```
#[derive(Clone)]
pub struct MultiwaySet<const B: usize> {
    raw: RawMultiwaySet<B>,
}

/// A 2-3 tree: every node holds one or two keys.
pub type TwoThreeSet = MultiwaySet<3>;

/// A B-tree of fanout four: every node holds one to three keys.
pub type BTreeSet4 = MultiwaySet<4>;

impl<const B: usize> MultiwaySet<B> {
    /// Makes a new, empty set.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: RawMultiwaySet::new(),
        }
    }

    /// Returns the number of keys in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Removes every key, freeing all nodes.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Number of node levels from the root down to the leaves; zero when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiln_tree::TwoThreeSet;
    ///
    /// let mut set = TwoThreeSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.height(), 1);
    ///
    /// set.insert(3); // the root overflows and splits
    /// assert_eq!(set.height(), 2);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns `true` if `key` is in the set.
    #[must_use]
    pub fn contains(&self, key: u64) -> bool {
        self.raw.contains(key)
    }

    /// Adds `key` to the set, returning whether it was newly inserted.
    pub fn insert(&mut self, key: u64) -> bool {
        self.raw.insert(key)
    }

    /// Removes `key` from the set, returning whether it was present.
    pub fn remove(&mut self, key: u64) -> bool {
        self.raw.remove(key)
    }

    /// Returns the greatest key strictly less than `key`, which need not be in the set.
    #[must_use]
    pub fn predecessor(&self, key: u64) -> Option<u64> {
        self.raw.predecessor(key)
    }

    /// Returns the least key strictly greater than `key`, which need not be in the set.
    #[must_use]
    pub fn successor(&self, key: u64) -> Option<u64> {
        self.raw.successor(key)
    }

    /// Walks the whole tree and checks key order, node occupancy, child
    /// counts, uniform leaf depth, the recorded length and that every
    /// allocated node is still reachable.
    ///
    /// # Errors
    ///
    /// Returns the first violation found. A correct implementation never does.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.raw.validate()
    }
}

impl<const B: usize> Default for MultiwaySet<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const B: usize> OrderedSet for MultiwaySet<B> {
    fn contains(&self, key: u64) -> bool {
        self.raw.contains(key)
    }

    fn insert(&mut self, key: u64) {
        self.raw.insert(key);
    }

    fn remove(&mut self, key: u64) {
        self.raw.remove(key);
    }

    fn predecessor(&self, key: u64) -> Option<u64> {
        self.raw.predecessor(key)
    }

    fn successor(&self, key: u64) -> Option<u64> {
        self.raw.successor(key)
    }

    fn size(&self) -> u64 {
        self.raw.len() as u64
    }
}

impl<const B: usize> fmt::Debug for MultiwaySet<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.raw.keys_in_order()).finish()
    }
}

impl<const B: usize> FromIterator<u64> for MultiwaySet<B> {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<const B: usize> Extend<u64> for MultiwaySet<B> {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        for key in iter {
            self.raw.insert(key);
        }
    }
}

impl<const B: usize, const N: usize> From<[u64; N]> for MultiwaySet<B> {
    fn from(keys: [u64; N]) -> Self {
        keys.into_iter().collect()
    }
}
