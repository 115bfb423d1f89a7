use alloc::boxed::Box;
use core::cmp::max;

/// An owned, possibly absent subtree.
pub(super) type Link = Option<Box<Node>>;

#[derive(Clone, Debug)]
pub(super) struct Node {
    pub(super) key: u64,
    pub(super) left: Link,
    pub(super) right: Link,
    // Always `1 + max(height(left), height(right))`.
    height: usize,
}

/// Height of a subtree, with an absent subtree at height zero.
#[inline]
pub(super) fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

#[allow(clippy::unnecessary_box_returns)]
impl Node {
    pub(super) fn new(key: u64) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
            height: 1,
        })
    }

    #[inline]
    pub(super) fn height(&self) -> usize {
        self.height
    }

    fn update_height(&mut self) {
        self.height = 1 + max(height(&self.left), height(&self.right));
    }

    fn left_heavy(&self) -> bool {
        height(&self.left) > height(&self.right) + 1
    }

    fn right_heavy(&self) -> bool {
        height(&self.right) > height(&self.left) + 1
    }

    /// Promotes the left child into this node's place.
    ///
    /// ```text
    ///       y          x
    ///      / \        / \
    ///     x   c  ->  a   y
    ///    / \            / \
    ///   a   b          b   c
    /// ```
    pub(super) fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let Some(mut x) = self.left.take() else {
            panic!("`Node::rotate_right()` - node {} has no left child!", self.key);
        };
        self.left = x.right.take();
        self.update_height();
        x.right = Some(self);
        x.update_height();
        x
    }

    /// Promotes the right child into this node's place. Mirror of [`rotate_right`](Self::rotate_right).
    pub(super) fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let Some(mut x) = self.right.take() else {
            panic!("`Node::rotate_left()` - node {} has no right child!", self.key);
        };
        self.right = x.left.take();
        self.update_height();
        x.left = Some(self);
        x.update_height();
        x
    }

    /// Restores balance on the way back up from inserting `key` below this node.
    ///
    /// The side of the heavy child that received `key` decides between a single
    /// and a double rotation.
    pub(super) fn rebalance_after_insert(mut self: Box<Self>, key: u64) -> Box<Self> {
        self.update_height();

        if self.left_heavy() {
            if let Some(left) = self.left.take() {
                self.left = Some(if key > left.key { left.rotate_left() } else { left });
            }
            return self.rotate_right();
        }

        if self.right_heavy() {
            if let Some(right) = self.right.take() {
                self.right = Some(if key < right.key { right.rotate_right() } else { right });
            }
            return self.rotate_left();
        }

        self
    }

    /// Restores balance on the way back up from a removal below this node.
    ///
    /// Unlike insertion this may rotate at every ancestor, and the inner
    /// grandchild's height decides between a single and a double rotation.
    pub(super) fn rebalance(mut self: Box<Self>) -> Box<Self> {
        self.update_height();

        if self.left_heavy() {
            if let Some(left) = self.left.take() {
                let inner_taller = height(&left.right) > height(&left.left);
                self.left = Some(if inner_taller { left.rotate_left() } else { left });
            }
            return self.rotate_right();
        }

        if self.right_heavy() {
            if let Some(right) = self.right.take() {
                let inner_taller = height(&right.left) > height(&right.right);
                self.right = Some(if inner_taller { right.rotate_right() } else { right });
            }
            return self.rotate_left();
        }

        self
    }
}
