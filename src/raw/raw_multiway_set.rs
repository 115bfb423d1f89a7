use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{MAX_FANOUT, Node, SearchResult};
use crate::error::InvariantViolation;

/// Arena-backed multiway search tree with fanout `B`.
///
/// Every node other than the root holds between `MIN_KEYS` and `MAX_KEYS`
/// keys. An empty tree has no root node at all.
#[derive(Clone)]
pub(crate) struct RawMultiwaySet<const B: usize> {
    nodes: Arena<Node>,
    root: Option<Handle>,
    len: usize,
}

/// One step of a root-to-leaf descent.
#[derive(Clone, Copy, Debug)]
struct PathElement {
    node: Handle,
    child_index: usize,
}

/// Ancestors of the node being repaired, root first.
type Path = SmallVec<[PathElement; 32]>;

impl<const B: usize> RawMultiwaySet<B> {
    pub(crate) const MAX_KEYS: usize = B - 1;
    pub(crate) const MIN_KEYS: usize = B.div_ceil(2) - 1;

    const FANOUT_IN_RANGE: () = assert!(
        B >= 3 && B <= MAX_FANOUT,
        "`MultiwaySet<B>` - `B` must lie in 3..=MAX_FANOUT"
    );

    pub(crate) const fn new() -> Self {
        let () = Self::FANOUT_IN_RANGE;
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Number of node levels; zero for an empty tree.
    pub(crate) fn height(&self) -> usize {
        let mut levels = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            levels += 1;
            let node = self.nodes.get(handle);
            current = node.children().first().copied();
        }
        levels
    }

    pub(crate) fn contains(&self, key: u64) -> bool {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match node.search(key) {
                SearchResult::Found(_) => return true,
                SearchResult::GoDown(_) if node.is_leaf() => return false,
                SearchResult::GoDown(index) => current = Some(node.child(index)),
            }
        }
        false
    }

    /// Greatest stored key strictly less than `key`.
    pub(crate) fn predecessor(&self, key: u64) -> Option<u64> {
        let mut best = None;
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(index) if node.is_leaf() => {
                    return if index > 0 { Some(node.key(index - 1)) } else { best };
                }
                SearchResult::Found(index) => return Some(self.max_in(node.child(index))),
                SearchResult::GoDown(index) => {
                    if index > 0 {
                        best = Some(node.key(index - 1));
                    }
                    if node.is_leaf() {
                        return best;
                    }
                    current = node.child(index);
                }
            }
        }
    }

    /// Least stored key strictly greater than `key`.
    pub(crate) fn successor(&self, key: u64) -> Option<u64> {
        let mut best = None;
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(index) if node.is_leaf() => {
                    return if index + 1 < node.key_count() { Some(node.key(index + 1)) } else { best };
                }
                SearchResult::Found(index) => return Some(self.min_in(node.child(index + 1))),
                SearchResult::GoDown(index) => {
                    if index < node.key_count() {
                        best = Some(node.key(index));
                    }
                    if node.is_leaf() {
                        return best;
                    }
                    current = node.child(index);
                }
            }
        }
    }

    fn min_in(&self, mut handle: Handle) -> u64 {
        loop {
            let node = self.nodes.get(handle);
            if node.is_leaf() {
                return node.first_key();
            }
            handle = node.child(0);
        }
    }

    fn max_in(&self, mut handle: Handle) -> u64 {
        loop {
            let node = self.nodes.get(handle);
            if node.is_leaf() {
                return node.last_key();
            }
            handle = node.child(node.key_count());
        }
    }

    /// Inserts `key`, returning `false` if it was already present.
    pub(crate) fn insert(&mut self, key: u64) -> bool {
        let Some(root) = self.root else {
            self.root = Some(self.nodes.alloc(Node::leaf(key)));
            self.len = 1;
            return true;
        };

        let mut path = Path::new();
        let mut current = root;
        let slot = loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(_) => return false,
                SearchResult::GoDown(index) if node.is_leaf() => break index,
                SearchResult::GoDown(index) => {
                    path.push(PathElement {
                        node: current,
                        child_index: index,
                    });
                    current = node.child(index);
                }
            }
        };

        self.nodes.get_mut(current).insert_key(slot, key);
        self.len += 1;
        self.split_and_propagate(current, &mut path);
        true
    }

    /// Splits `current` while it is overfull, carrying medians up the path.
    fn split_and_propagate(&mut self, mut current: Handle, path: &mut Path) {
        while self.nodes.get(current).key_count() > Self::MAX_KEYS {
            let (median, right) = self.nodes.get_mut(current).split();
            let right = self.nodes.alloc(right);

            let Some(parent) = path.pop() else {
                self.root = Some(self.nodes.alloc(Node::new_root(median, current, right)));
                log::trace!("multiway root split on median {median}; height now {}", self.height());
                return;
            };

            self.nodes.get_mut(parent.node).insert_split(parent.child_index, median, right);
            current = parent.node;
        }
    }

    /// Removes `key`, returning `false` if it was absent.
    pub(crate) fn remove(&mut self, key: u64) -> bool {
        let Some(root) = self.root else {
            return false;
        };

        let mut path = Path::new();
        let mut current = root;
        // Internal node and index holding `key`, when it is not found in a leaf.
        let mut hole: Option<(Handle, usize)> = None;

        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                break;
            }
            let index = match hole {
                Some(_) => 0,
                None => match node.search(key) {
                    SearchResult::Found(index) => {
                        hole = Some((current, index));
                        index + 1
                    }
                    SearchResult::GoDown(index) => index,
                },
            };
            path.push(PathElement {
                node: current,
                child_index: index,
            });
            current = node.child(index);
        }

        match hole {
            Some((internal, index)) => {
                // Swap with the in-order successor, the leftmost key of the leaf reached.
                let successor = self.nodes.get_mut(current).remove_key(0);
                self.nodes.get_mut(internal).set_key(index, successor);
            }
            None => match self.nodes.get(current).search(key) {
                SearchResult::Found(index) => {
                    self.nodes.get_mut(current).remove_key(index);
                }
                SearchResult::GoDown(_) => return false,
            },
        }

        self.len -= 1;
        self.repair_underflow(current, &mut path);
        true
    }

    /// Restores occupancy from `current` upward after a key was removed from it.
    fn repair_underflow(&mut self, mut current: Handle, path: &mut Path) {
        loop {
            let Some(parent) = path.pop() else {
                self.shrink_root(current);
                return;
            };

            if self.nodes.get(current).key_count() >= Self::MIN_KEYS {
                return;
            }

            let index = parent.child_index;
            let (left, right) = {
                let parent_node = self.nodes.get(parent.node);
                let left = (index > 0).then(|| parent_node.child(index - 1));
                let right = (index < parent_node.key_count()).then(|| parent_node.child(index + 1));
                (left, right)
            };

            if let Some(left) = left
                && self.nodes.get(left).key_count() > Self::MIN_KEYS
            {
                self.borrow_from_left(parent.node, index, left, current);
                return;
            }
            if let Some(right) = right
                && self.nodes.get(right).key_count() > Self::MIN_KEYS
            {
                self.borrow_from_right(parent.node, index, current, right);
                return;
            }

            match left {
                Some(left) => self.merge(parent.node, index - 1, left),
                None => self.merge(parent.node, index, current),
            }
            current = parent.node;
        }
    }

    /// Rotates the parent separator down into `node` and the left sibling's last key up.
    fn borrow_from_left(&mut self, parent: Handle, index: usize, left: Handle, node: Handle) {
        let (key, child) = self.nodes.get_mut(left).lend_last();
        let separator = self.nodes.get_mut(parent).set_key(index - 1, key);
        self.nodes.get_mut(node).accept_front(separator, child);
    }

    /// Rotates the parent separator down into `node` and the right sibling's first key up.
    fn borrow_from_right(&mut self, parent: Handle, index: usize, node: Handle, right: Handle) {
        let (key, child) = self.nodes.get_mut(right).lend_first();
        let separator = self.nodes.get_mut(parent).set_key(index, key);
        self.nodes.get_mut(node).accept_back(separator, child);
    }

    /// Folds child `index + 1` and separator `index` of `parent` into child `index`.
    fn merge(&mut self, parent: Handle, index: usize, left: Handle) {
        let (separator, right) = self.nodes.get_mut(parent).remove_separator(index);
        let right = self.nodes.take(right);
        self.nodes.get_mut(left).merge_with_right(separator, right);
    }

    /// Drops a root left without keys: an emptied leaf empties the tree, an
    /// emptied internal node hands the root over to its only child.
    fn shrink_root(&mut self, root: Handle) {
        let node = self.nodes.get(root);
        if node.key_count() > 0 {
            return;
        }

        if let Some(child) = node.sole_child() {
            self.nodes.free(root);
            self.root = Some(child);
            log::trace!("multiway root collapsed; height now {}", self.height());
        } else {
            debug_assert!(node.is_leaf(), "`shrink_root()` - empty internal root without a child");
            debug_assert_eq!(self.len, 0);
            self.clear();
            log::trace!("multiway tree emptied");
        }
    }

    /// Keys in ascending order.
    pub(crate) fn keys_in_order(&self) -> Vec<u64> {
        let mut keys = Vec::with_capacity(self.len);
        if let Some(root) = self.root {
            self.collect_keys(root, &mut keys);
        }
        keys
    }

    fn collect_keys(&self, handle: Handle, keys: &mut Vec<u64>) {
        let node = self.nodes.get(handle);
        if node.is_leaf() {
            keys.extend_from_slice(node.keys());
            return;
        }
        for (index, &child) in node.children().iter().enumerate() {
            self.collect_keys(child, keys);
            if index < node.key_count() {
                keys.push(node.key(index));
            }
        }
    }

    /// Checks order, occupancy, child counts, leaf depth, the recorded size
    /// and that no freed node is still held by the arena.
    pub(crate) fn validate(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            if self.len != 0 {
                return Err(InvariantViolation::SizeMismatch {
                    recorded: self.len,
                    counted: 0,
                });
            }
            return match self.nodes.len() {
                0 => Ok(()),
                live => Err(InvariantViolation::LeakedNodes { live, reachable: 0 }),
            };
        };

        let mut tally = Tally {
            keys: 0,
            nodes: 0,
            leaf_depth: None,
        };
        self.validate_node(root, true, 0, None, None, &mut tally)?;

        if tally.keys != self.len {
            return Err(InvariantViolation::SizeMismatch {
                recorded: self.len,
                counted: tally.keys,
            });
        }
        if tally.nodes != self.nodes.len() {
            return Err(InvariantViolation::LeakedNodes {
                live: self.nodes.len(),
                reachable: tally.nodes,
            });
        }
        Ok(())
    }

    fn validate_node(
        &self,
        handle: Handle,
        is_root: bool,
        depth: usize,
        lower: Option<u64>,
        upper: Option<u64>,
        tally: &mut Tally,
    ) -> Result<(), InvariantViolation> {
        let node = self.nodes.get(handle);
        let count = node.key_count();
        let min = if is_root { 1 } else { Self::MIN_KEYS };
        if count < min || count > Self::MAX_KEYS {
            return Err(InvariantViolation::Occupancy {
                depth,
                keys: count,
                min,
                max: Self::MAX_KEYS,
            });
        }

        let mut previous = lower;
        for &key in node.keys() {
            if previous.is_some_and(|p| p >= key) || upper.is_some_and(|u| key >= u) {
                return Err(InvariantViolation::OutOfOrder { key });
            }
            previous = Some(key);
        }

        tally.keys += count;
        tally.nodes += 1;

        if node.is_leaf() {
            return match tally.leaf_depth {
                Some(expected) if expected != depth => Err(InvariantViolation::UnevenLeafDepth {
                    expected,
                    found: depth,
                }),
                _ => {
                    tally.leaf_depth = Some(depth);
                    Ok(())
                }
            };
        }

        if node.children().len() != count + 1 {
            return Err(InvariantViolation::ChildCount {
                keys: count,
                children: node.children().len(),
            });
        }
        for (index, &child) in node.children().iter().enumerate() {
            let low = if index == 0 { lower } else { Some(node.key(index - 1)) };
            let high = if index == count { upper } else { Some(node.key(index)) };
            self.validate_node(child, false, depth + 1, low, high, tally)?;
        }
        Ok(())
    }
}

struct Tally {
    keys: usize,
    nodes: usize,
    leaf_depth: Option<usize>,
}
