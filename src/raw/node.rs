use smallvec::SmallVec;

use super::handle::Handle;

/// Largest fanout a [`MultiwaySet`](crate::MultiwaySet) may be instantiated with.
///
/// Node storage is sized for this fanout so that a node never spills to the
/// heap, even while it transiently holds one key too many before a split.
pub const MAX_FANOUT: usize = 16;

pub(crate) type Keys = SmallVec<[u64; MAX_FANOUT]>;
pub(crate) type Children = SmallVec<[Handle; MAX_FANOUT + 1]>;

/// A multiway node: sorted keys plus, for internal nodes, one more child than keys.
///
/// A node is a leaf exactly when it has no children.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    keys: Keys,
    children: Children,
}

/// Result of searching for a key within a single node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SearchResult {
    /// Key stored at this index.
    Found(usize),
    /// Key absent; index of the child interval (and insertion slot) that would hold it.
    GoDown(usize),
}

impl Node {
    pub(crate) fn leaf(key: u64) -> Self {
        let mut keys = Keys::new();
        keys.push(key);
        Self {
            keys,
            children: Children::new(),
        }
    }

    /// A fresh root holding only the median promoted out of a root split.
    pub(crate) fn new_root(median: u64, left: Handle, right: Handle) -> Self {
        let mut keys = Keys::new();
        keys.push(median);
        let mut children = Children::new();
        children.push(left);
        children.push(right);
        Self { keys, children }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> u64 {
        self.keys[index]
    }

    pub(crate) fn keys(&self) -> &[u64] {
        &self.keys
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    pub(crate) fn first_key(&self) -> u64 {
        self.keys[0]
    }

    pub(crate) fn last_key(&self) -> u64 {
        self.keys[self.keys.len() - 1]
    }

    #[inline]
    pub(crate) fn search(&self, key: u64) -> SearchResult {
        match self.keys.binary_search(&key) {
            Ok(index) => SearchResult::Found(index),
            Err(index) => SearchResult::GoDown(index),
        }
    }

    pub(crate) fn set_key(&mut self, index: usize, key: u64) -> u64 {
        core::mem::replace(&mut self.keys[index], key)
    }

    /// Inserts a key into a leaf at its sorted position.
    pub(crate) fn insert_key(&mut self, index: usize, key: u64) {
        debug_assert!(self.is_leaf(), "`Node::insert_key()` - node is internal!");
        self.keys.insert(index, key);
    }

    /// Adopts a promoted median and the right half of a split child at `index`.
    pub(crate) fn insert_split(&mut self, index: usize, median: u64, right: Handle) {
        debug_assert!(!self.is_leaf(), "`Node::insert_split()` - node is a leaf!");
        self.keys.insert(index, median);
        self.children.insert(index + 1, right);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> u64 {
        self.keys.remove(index)
    }

    /// Removes separator `index` and the child to its right, as done when two
    /// children are merged.
    pub(crate) fn remove_separator(&mut self, index: usize) -> (u64, Handle) {
        let separator = self.keys.remove(index);
        let right = self.children.remove(index + 1);
        (separator, right)
    }

    /// Splits an overfull node around its median.
    ///
    /// `self` keeps the keys below the median; the returned node takes the keys
    /// above it, along with their children.
    pub(crate) fn split(&mut self) -> (u64, Node) {
        let mid = self.keys.len() / 2;
        let right_keys: Keys = self.keys.drain(mid + 1..).collect();
        let right_children: Children = if self.is_leaf() {
            Children::new()
        } else {
            self.children.drain(mid + 1..).collect()
        };
        let Some(median) = self.keys.pop() else {
            unreachable!("`Node::split()` - node has no median");
        };

        (
            median,
            Node {
                keys: right_keys,
                children: right_children,
            },
        )
    }

    /// Lends the last key, and the last child for internal nodes, to a right sibling.
    pub(crate) fn lend_last(&mut self) -> (u64, Option<Handle>) {
        let Some(key) = self.keys.pop() else {
            panic!("`Node::lend_last()` - node is empty!");
        };
        (key, self.children.pop())
    }

    /// Lends the first key, and the first child for internal nodes, to a left sibling.
    pub(crate) fn lend_first(&mut self) -> (u64, Option<Handle>) {
        assert!(!self.keys.is_empty(), "`Node::lend_first()` - node is empty!");
        let key = self.keys.remove(0);
        let child = (!self.children.is_empty()).then(|| self.children.remove(0));
        (key, child)
    }

    /// Receives a separator rotated down from the parent at the front.
    pub(crate) fn accept_front(&mut self, separator: u64, child: Option<Handle>) {
        self.keys.insert(0, separator);
        if let Some(child) = child {
            self.children.insert(0, child);
        }
    }

    /// Receives a separator rotated down from the parent at the back.
    pub(crate) fn accept_back(&mut self, separator: u64, child: Option<Handle>) {
        self.keys.push(separator);
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    /// Absorbs the separator and every key and child of the right sibling.
    pub(crate) fn merge_with_right(&mut self, separator: u64, right: Node) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }

    /// Detaches the only child of an emptied root.
    pub(crate) fn sole_child(&self) -> Option<Handle> {
        (self.keys.is_empty() && self.children.len() == 1).then(|| self.children[0])
    }
}
