use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::fmt;

use crate::InvariantViolation;
use crate::OrderedSet;

mod node;

use node::{Link, Node, height};

/// An ordered set of `u64` keys backed by a height-balanced (AVL) binary search tree.
///
/// Every node caches the height of its subtree, and the heights of any node's
/// two subtrees never differ by more than one. Lookups, insertions and
/// removals therefore touch `O(log n)` nodes.
///
/// Nodes are individually boxed and know nothing of their parent: all
/// rebalancing happens on the way back up from a recursive descent, each
/// level handing its caller the (possibly rotated) new root of its subtree.
///
/// # Examples
///
/// ```
/// use kiln_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// for key in [30, 10, 20] {
///     set.insert(key);
/// }
///
/// assert!(set.contains(20));
/// assert_eq!(set.predecessor(20), Some(10));
/// assert_eq!(set.successor(20), Some(30));
/// assert_eq!(set.successor(30), None);
///
/// set.remove(20);
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.successor(10), Some(30));
/// ```
#[derive(Clone, Default)]
pub struct AvlSet {
    root: Link,
    len: usize,
}

impl AvlSet {
    /// Makes a new, empty `AvlSet`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Returns the number of keys in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every key, freeing all nodes.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Number of node levels on the longest root-to-leaf path; zero when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiln_tree::AvlSet;
    ///
    /// let set: AvlSet = (0..7).collect();
    /// assert_eq!(set.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Returns `true` if `key` is in the set.
    #[must_use]
    pub fn contains(&self, key: u64) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Equal => return true,
                Less => node.left.as_deref(),
                Greater => node.right.as_deref(),
            };
        }
        false
    }

    /// Adds `key` to the set.
    ///
    /// Returns whether the key was newly inserted. Inserting a key that is
    /// already present changes nothing.
    pub fn insert(&mut self, key: u64) -> bool {
        let mut added = false;
        self.root = Some(insert(self.root.take(), key, &mut added));
        if added {
            self.len += 1;
        }
        added
    }

    /// Removes `key` from the set, returning whether it was present.
    pub fn remove(&mut self, key: u64) -> bool {
        let mut removed = false;
        self.root = remove(self.root.take(), key, &mut removed);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Returns the greatest key strictly less than `key`, which need not be in the set.
    ///
    /// When `key` is stored and has a left subtree this is that subtree's
    /// rightmost key; otherwise it is the nearest smaller key on the search path.
    #[must_use]
    pub fn predecessor(&self, key: u64) -> Option<u64> {
        let mut best = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if node.key < key {
                best = Some(node.key);
                current = node.right.as_deref();
            } else {
                current = node.left.as_deref();
            }
        }
        best
    }

    /// Returns the least key strictly greater than `key`, which need not be in the set.
    #[must_use]
    pub fn successor(&self, key: u64) -> Option<u64> {
        let mut best = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if node.key > key {
                best = Some(node.key);
                current = node.left.as_deref();
            } else {
                current = node.right.as_deref();
            }
        }
        best
    }

    /// Walks the whole tree and checks search order, the balance bound, every
    /// cached height and the recorded length.
    ///
    /// # Errors
    ///
    /// Returns the first violation found. A correct implementation never does.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut counted = 0;
        validate(&self.root, None, None, &mut counted)?;
        if counted != self.len {
            return Err(InvariantViolation::SizeMismatch {
                recorded: self.len,
                counted,
            });
        }
        Ok(())
    }

    fn keys_in_order(&self) -> Vec<u64> {
        fn walk(link: &Link, keys: &mut Vec<u64>) {
            if let Some(node) = link {
                walk(&node.left, keys);
                keys.push(node.key);
                walk(&node.right, keys);
            }
        }

        let mut keys = Vec::with_capacity(self.len);
        walk(&self.root, &mut keys);
        keys
    }
}

fn insert(link: Link, key: u64, added: &mut bool) -> Box<Node> {
    let Some(mut node) = link else {
        *added = true;
        return Node::new(key);
    };

    match key.cmp(&node.key) {
        Equal => return node,
        Less => node.left = Some(insert(node.left.take(), key, added)),
        Greater => node.right = Some(insert(node.right.take(), key, added)),
    }
    node.rebalance_after_insert(key)
}

fn remove(link: Link, key: u64, removed: &mut bool) -> Link {
    let mut node = link?;

    match key.cmp(&node.key) {
        Less => node.left = remove(node.left.take(), key, removed),
        Greater => node.right = remove(node.right.take(), key, removed),
        Equal => {
            *removed = true;
            match (node.left.take(), node.right.take()) {
                (None, None) => return None,
                (Some(child), None) | (None, Some(child)) => return Some(child),
                (Some(left), Some(right)) => {
                    // Take over the in-order successor's key, then remove it from the right subtree.
                    let successor = min_key(&right);
                    node.key = successor;
                    node.left = Some(left);
                    node.right = remove(Some(right), successor, &mut false);
                }
            }
        }
    }
    Some(node.rebalance())
}

fn min_key(mut node: &Node) -> u64 {
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    node.key
}

/// Returns the subtree's height, checking it against every invariant on the way.
fn validate(link: &Link, lower: Option<u64>, upper: Option<u64>, counted: &mut usize) -> Result<usize, InvariantViolation> {
    let Some(node) = link else {
        return Ok(0);
    };

    let key = node.key;
    if lower.is_some_and(|l| key <= l) || upper.is_some_and(|u| key >= u) {
        return Err(InvariantViolation::OutOfOrder { key });
    }

    let left = validate(&node.left, lower, Some(key), counted)?;
    let right = validate(&node.right, Some(key), upper, counted)?;
    *counted += 1;

    if left.abs_diff(right) > 1 {
        return Err(InvariantViolation::Unbalanced { key, left, right });
    }
    let actual = 1 + left.max(right);
    if node.height() != actual {
        return Err(InvariantViolation::StaleHeight {
            key,
            cached: node.height(),
            actual,
        });
    }
    Ok(actual)
}

impl OrderedSet for AvlSet {
    fn contains(&self, key: u64) -> bool {
        AvlSet::contains(self, key)
    }

    fn insert(&mut self, key: u64) {
        AvlSet::insert(self, key);
    }

    fn remove(&mut self, key: u64) {
        AvlSet::remove(self, key);
    }

    fn predecessor(&self, key: u64) -> Option<u64> {
        AvlSet::predecessor(self, key)
    }

    fn successor(&self, key: u64) -> Option<u64> {
        AvlSet::successor(self, key)
    }

    fn size(&self) -> u64 {
        self.len as u64
    }
}

impl fmt::Debug for AvlSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys_in_order()).finish()
    }
}

impl FromIterator<u64> for AvlSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<u64> for AvlSet {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<const N: usize> From<[u64; N]> for AvlSet {
    fn from(keys: [u64; N]) -> Self {
        keys.into_iter().collect()
    }
}
