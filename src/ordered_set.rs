/// The point-query interface shared by every set in this crate.
///
/// Implementations agree on observable behaviour for any sequence of calls,
/// so a test harness can drive several of them side by side and compare each
/// against a reference set after every step.
///
/// # Examples
///
/// ```
/// use kiln_tree::{AvlSet, OrderedSet, TwoThreeSet};
///
/// fn fill(set: &mut impl OrderedSet) {
///     for key in [4, 8, 15, 16, 23, 42] {
///         set.insert(key);
///     }
///     set.remove(15);
/// }
///
/// let mut avl = AvlSet::new();
/// let mut two_three = TwoThreeSet::new();
/// fill(&mut avl);
/// fill(&mut two_three);
///
/// assert_eq!(OrderedSet::size(&avl), 5);
/// assert_eq!(OrderedSet::successor(&avl, 8), OrderedSet::successor(&two_three, 8));
/// ```
pub trait OrderedSet {
    /// Returns `true` if `key` is stored.
    fn contains(&self, key: u64) -> bool;

    /// Stores `key`. Does nothing if it is already stored.
    fn insert(&mut self, key: u64);

    /// Removes `key`. Does nothing if it is absent.
    fn remove(&mut self, key: u64);

    /// The greatest stored key strictly less than `key`.
    fn predecessor(&self, key: u64) -> Option<u64>;

    /// The least stored key strictly greater than `key`.
    fn successor(&self, key: u64) -> Option<u64>;

    /// Number of stored keys.
    fn size(&self) -> u64;
}
