use core::borrow::Borrow;
use core::cmp::Ordering;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{EMPTY_HEIGHT, Node};
use crate::error::{Error, Result};

/// The size-augmented AVL tree backing `AvlMultiset`.
///
/// After every public operation:
/// - values strictly increase along an in-order walk (duplicates live in `count`),
/// - child heights differ by at most one at every node,
/// - every cached `height`/`subtree_size` matches its recursive definition,
/// - every `parent` link is the inverse of the owning `left`/`right` link.
#[derive(Clone)]
pub(crate) struct RawAvlTree<T> {
    /// Arena storing all tree nodes, one per distinct value.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

/// Shape of a node whose children are already up to date.
enum Balance {
    /// Child heights differ by at most one.
    Within,
    /// Right subtree is two taller; carries the right child.
    RightHeavy(Handle),
    /// Left subtree is two taller; carries the left child.
    LeftHeavy(Handle),
}

/// What one level of the rebalancing walk did.
enum Step {
    /// Height and size were re-derived in place.
    Refreshed,
    /// The subtree was rotated; carries its new local root, not yet linked to
    /// the former grandparent.
    Rotated(Handle),
}

impl<T> RawAvlTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates an empty tree with room for `capacity` distinct values.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Total number of occurrences, duplicates included.
    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    /// Number of distinct values (one node each).
    pub(crate) const fn distinct_len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    /// Height of the root, `None` when empty.
    pub(crate) fn height(&self) -> Option<usize> {
        self.root.map(|root| self.nodes.get(root).height().unsigned_abs() as usize)
    }

    /// `height(right) - height(left)`, absent children counting as -1.
    pub(crate) fn balance_factor(&self, handle: Handle) -> i32 {
        let node = self.nodes.get(handle);
        self.height_of(node.right()) - self.height_of(node.left())
    }

    /// Gets the value at `rank` in sorted order, counting every duplicate.
    pub(crate) fn value_at(&self, rank: usize) -> Result<&T> {
        let len = self.len();
        if rank >= len {
            log::debug!("value_at({rank}) rejected: multiset holds {len} values");
            return Err(Error::IndexOutOfRange {
                rank,
                len,
            });
        }

        let mut current = self.root;
        let mut remaining = rank;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left_size = self.size_of(node.left());
            if remaining < left_size {
                current = node.left();
            } else if remaining >= left_size + node.count() {
                remaining -= left_size + node.count();
                current = node.right();
            } else {
                return Ok(node.value());
            }
        }
        unreachable!("`RawAvlTree::value_at()` - subtree sizes disagree with root size {len}")
    }

    /// Smallest value, if any.
    pub(crate) fn first(&self) -> Option<&T> {
        let mut current = self.root?;
        while let Some(left) = self.nodes.get(current).left() {
            current = left;
        }
        Some(self.nodes.get(current).value())
    }

    /// Largest value, if any.
    pub(crate) fn last(&self) -> Option<&T> {
        let mut current = self.root?;
        while let Some(right) = self.nodes.get(current).right() {
            current = right;
        }
        Some(self.nodes.get(current).value())
    }

    #[inline]
    fn height_of(&self, handle: Option<Handle>) -> i32 {
        handle.map_or(EMPTY_HEIGHT, |h| self.nodes.get(h).height())
    }

    #[inline]
    fn size_of(&self, handle: Option<Handle>) -> usize {
        handle.map_or(0, |h| self.nodes.get(h).subtree_size())
    }

    /// Re-derives height and subtree size of `handle` from its children.
    fn refresh(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let summary = |child: Handle| {
            let child = self.nodes.get(child);
            (child.height(), child.subtree_size())
        };
        let left = node.left().map(summary);
        let right = node.right().map(summary);
        self.nodes.get_mut(handle).refresh(left, right);
    }

    /// Re-derives every node from `start` up to the root. Heights cannot have
    /// changed on this path, so no rotation is needed.
    fn refresh_to_root(&mut self, start: Option<Handle>) {
        let mut current = start;
        while let Some(handle) = current {
            self.refresh(handle);
            current = self.nodes.get(handle).parent();
        }
    }

    /// Puts `new` where `old` hung below `parent` (or at the root).
    fn relink(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        if let Some(new) = new {
            self.nodes.get_mut(new).set_parent(parent);
        }
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = self.nodes.get_mut(parent);
                if parent.left() == Some(old) {
                    parent.set_left(new);
                } else {
                    debug_assert_eq!(parent.right(), Some(old), "`RawAvlTree::relink()` - `old` is not a child");
                    parent.set_right(new);
                }
            }
        }
    }

    fn classify(&self, handle: Handle) -> Balance {
        let node = self.nodes.get(handle);
        match self.balance_factor(handle) {
            -1..=1 => Balance::Within,
            factor if factor > 1 => {
                Balance::RightHeavy(node.right().expect("`RawAvlTree::classify()` - right-heavy without right child"))
            }
            _ => Balance::LeftHeavy(node.left().expect("`RawAvlTree::classify()` - left-heavy without left child")),
        }
    }

    /// Restores balance at `handle`, assuming its children are balanced and
    /// up to date. The heavier child's own lean picks single vs. double rotation.
    fn rebalance(&mut self, handle: Handle) -> Step {
        match self.classify(handle) {
            Balance::Within => {
                self.refresh(handle);
                Step::Refreshed
            }
            Balance::RightHeavy(child) => {
                let root = if self.balance_factor(child) < 0 {
                    self.rotate_right_left(handle, child)
                } else {
                    self.rotate_left(handle, child)
                };
                Step::Rotated(root)
            }
            Balance::LeftHeavy(child) => {
                let root = if self.balance_factor(child) > 0 {
                    self.rotate_left_right(handle, child)
                } else {
                    self.rotate_right(handle, child)
                };
                Step::Rotated(root)
            }
        }
    }

    /// Walks from `start` to the root, rebalancing every level. Shared by
    /// insertion and removal. Returns the number of rotations performed.
    fn retrace(&mut self, start: Option<Handle>) -> usize {
        let mut rotations = 0;
        let mut current = start;
        while let Some(handle) = current {
            let grandparent = self.nodes.get(handle).parent();
            if let Step::Rotated(local_root) = self.rebalance(handle) {
                self.relink(grandparent, handle, Some(local_root));
                rotations += 1;
            }
            current = grandparent;
        }
        if rotations > 0 {
            log::trace!("rebalancing walk performed {rotations} rotation(s)");
        }
        rotations
    }

    //      p                x
    //     / \              / \
    //    a   x     =>     p   c
    //       / \          / \
    //      b   c        a   b
    fn rotate_left(&mut self, p: Handle, x: Handle) -> Handle {
        log::trace!("rotate left at {p:?}");
        let inner = self.nodes.get(x).left();
        self.nodes.get_mut(p).set_right(inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(p));
        }
        self.nodes.get_mut(x).set_left(Some(p));
        self.nodes.get_mut(p).set_parent(Some(x));

        self.refresh(p);
        self.refresh(x);
        x
    }

    //        p            x
    //       / \          / \
    //      x   c   =>   a   p
    //     / \              / \
    //    a   b            b   c
    fn rotate_right(&mut self, p: Handle, x: Handle) -> Handle {
        log::trace!("rotate right at {p:?}");
        let inner = self.nodes.get(x).right();
        self.nodes.get_mut(p).set_left(inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(p));
        }
        self.nodes.get_mut(x).set_right(Some(p));
        self.nodes.get_mut(p).set_parent(Some(x));

        self.refresh(p);
        self.refresh(x);
        x
    }

    //        p               n
    //       / \            /   \
    //      x   d          x     p
    //     / \      =>    / \   / \
    //    a   n          a   b c   d
    //       / \
    //      b   c
    fn rotate_left_right(&mut self, p: Handle, x: Handle) -> Handle {
        log::trace!("rotate left-right at {p:?}");
        let n = self.nodes.get(x).right().expect("`RawAvlTree::rotate_left_right()` - child does not lean right");
        let (b, c) = {
            let n = self.nodes.get(n);
            (n.left(), n.right())
        };

        self.nodes.get_mut(x).set_right(b);
        if let Some(b) = b {
            self.nodes.get_mut(b).set_parent(Some(x));
        }
        self.nodes.get_mut(p).set_left(c);
        if let Some(c) = c {
            self.nodes.get_mut(c).set_parent(Some(p));
        }

        let node = self.nodes.get_mut(n);
        node.set_left(Some(x));
        node.set_right(Some(p));
        self.nodes.get_mut(x).set_parent(Some(n));
        self.nodes.get_mut(p).set_parent(Some(n));

        self.refresh(x);
        self.refresh(p);
        self.refresh(n);
        n
    }

    //      p                 n
    //     / \              /   \
    //    a   x            p     x
    //       / \    =>    / \   / \
    //      n   d        a   b c   d
    //     / \
    //    b   c
    fn rotate_right_left(&mut self, p: Handle, x: Handle) -> Handle {
        log::trace!("rotate right-left at {p:?}");
        let n = self.nodes.get(x).left().expect("`RawAvlTree::rotate_right_left()` - child does not lean left");
        let (b, c) = {
            let n = self.nodes.get(n);
            (n.left(), n.right())
        };

        self.nodes.get_mut(p).set_right(b);
        if let Some(b) = b {
            self.nodes.get_mut(b).set_parent(Some(p));
        }
        self.nodes.get_mut(x).set_left(c);
        if let Some(c) = c {
            self.nodes.get_mut(c).set_parent(Some(x));
        }

        let node = self.nodes.get_mut(n);
        node.set_left(Some(p));
        node.set_right(Some(x));
        self.nodes.get_mut(p).set_parent(Some(n));
        self.nodes.get_mut(x).set_parent(Some(n));

        self.refresh(p);
        self.refresh(x);
        self.refresh(n);
        n
    }

    /// Unlinks the in-order predecessor of `target` (which has two children),
    /// moving its value and count into `target`. The predecessor's node is the
    /// one destroyed. Returns where the rebalancing walk starts.
    fn remove_with_predecessor(&mut self, target: Handle) -> Option<Handle> {
        let mut predecessor =
            self.nodes.get(target).left().expect("`RawAvlTree::remove_with_predecessor()` - no left subtree");
        while let Some(right) = self.nodes.get(predecessor).right() {
            predecessor = right;
        }

        let node = self.nodes.get(predecessor);
        let parent = node.parent();
        let orphan = node.left();
        self.relink(parent, predecessor, orphan);

        let payload = self.nodes.take(predecessor);
        self.nodes.get_mut(target).replace_payload(payload);
        parent
    }
}

impl<T: Ord> RawAvlTree<T> {
    /// Finds the node holding `value`.
    pub(crate) fn search<Q>(&self, value: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match value.cmp(node.value().borrow()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    pub(crate) fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(value).is_some()
    }

    /// Number of occurrences of `value`.
    pub(crate) fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(value).map_or(0, |handle| self.nodes.get(handle).count())
    }

    /// Rank of the first occurrence of `value`.
    pub(crate) fn rank_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut rank = 0;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left_size = self.size_of(node.left());
            current = match value.cmp(node.value().borrow()) {
                Ordering::Equal => return Some(rank + left_size),
                Ordering::Less => node.left(),
                Ordering::Greater => {
                    rank += left_size + node.count();
                    node.right()
                }
            };
        }
        None
    }

    /// Adds one occurrence of `value`. Returns the number of rotations, which
    /// is never more than one.
    pub(crate) fn insert(&mut self, value: T) -> usize {
        let Some(root) = self.root else {
            self.root = Some(self.nodes.alloc(Node::new_leaf(value, None)));
            return 0;
        };

        // Descend to either the node holding `value` or the parent of the empty
        // slot it belongs in.
        let mut parent = root;
        let ordering = loop {
            let node = self.nodes.get(parent);
            let ordering = value.cmp(node.value());
            let next = match ordering {
                Ordering::Equal => break ordering,
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
            match next {
                Some(child) => parent = child,
                None => break ordering,
            }
        };

        if ordering == Ordering::Equal {
            let node = self.nodes.get_mut(parent);
            node.increment();
            let ancestor = node.parent();
            self.refresh_to_root(ancestor);
            return 0;
        }

        let leaf = self.nodes.alloc(Node::new_leaf(value, Some(parent)));
        if ordering == Ordering::Less {
            self.nodes.get_mut(parent).set_left(Some(leaf));
        } else {
            self.nodes.get_mut(parent).set_right(Some(leaf));
        }

        let rotations = self.retrace(Some(parent));
        debug_assert!(rotations <= 1, "`RawAvlTree::insert()` - {rotations} rotations for one insertion");
        rotations
    }

    /// Removes one occurrence of `value`. Returns the number of rotations.
    ///
    /// Fails without touching the tree when `value` is absent.
    pub(crate) fn remove<Q>(&mut self, value: &Q) -> Result<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(target) = self.search(value) else {
            log::debug!("remove rejected: value not present among {} values", self.len());
            return Err(Error::ValueNotFound);
        };

        let node = self.nodes.get(target);
        let (parent, left, right) = (node.parent(), node.left(), node.right());
        if node.count() > 1 {
            self.nodes.get_mut(target).decrement();
            self.refresh_to_root(parent);
            return Ok(0);
        }

        let start = match (left, right) {
            (Some(_), Some(_)) => self.remove_with_predecessor(target),
            (left, right) => {
                self.relink(parent, target, left.or(right));
                drop(self.nodes.take(target));
                parent
            }
        };
        Ok(self.retrace(start))
    }
}
