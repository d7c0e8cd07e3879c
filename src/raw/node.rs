use super::handle::Handle;

/// Height reported for an absent child.
pub(crate) const EMPTY_HEIGHT: i32 = -1;

/// One distinct value of the multiset.
///
/// Duplicates are folded into `count`; `subtree_size` sums `count` over the
/// subtree rooted here. Neither is bounded by the arena, since duplicates take
/// no slot. `parent` is the inverse of the owning `left`/`right`
/// links and is `None` only for the root.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    value: T,
    count: usize,
    // A leaf has height 0. AVL height stays below 64 for any addressable tree.
    height: u8,
    subtree_size: usize,
    left: Option<Handle>,
    right: Option<Handle>,
    parent: Option<Handle>,
}

impl<T> Node<T> {
    /// Creates a leaf holding a single occurrence of `value`.
    pub(crate) const fn new_leaf(value: T, parent: Option<Handle>) -> Self {
        Self {
            value,
            count: 1,
            height: 0,
            subtree_size: 1,
            left: None,
            right: None,
            parent,
        }
    }

    #[inline]
    pub(crate) const fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub(crate) const fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn height(&self) -> i32 {
        i32::from(self.height)
    }

    #[inline]
    pub(crate) const fn subtree_size(&self) -> usize {
        self.subtree_size
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    /// Records one more occurrence. Ancestors still need re-deriving.
    pub(crate) fn increment(&mut self) {
        self.count += 1;
        self.subtree_size += 1;
    }

    /// Drops one occurrence; the count never reaches zero here, a node whose
    /// last occurrence goes is unlinked instead.
    pub(crate) fn decrement(&mut self) {
        assert!(self.count() > 1, "`Node::decrement()` - last occurrence must be unlinked!");
        self.count -= 1;
        self.subtree_size -= 1;
    }

    /// Moves `value`/`count` out of `source` into this slot, dropping the old value.
    pub(crate) fn replace_payload(&mut self, source: Node<T>) {
        self.value = source.value;
        self.count = source.count;
    }

    /// Re-derives `height` and `subtree_size` from the children's cached fields.
    pub(crate) fn refresh(&mut self, left: Option<(i32, usize)>, right: Option<(i32, usize)>) {
        let (left_height, left_size) = left.unwrap_or((EMPTY_HEIGHT, 0));
        let (right_height, right_size) = right.unwrap_or((EMPTY_HEIGHT, 0));

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            self.height = (1 + left_height.max(right_height)) as u8;
        }
        self.subtree_size = self.count + left_size + right_size;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_leaf_is_single_occurrence() {
        let node = Node::new_leaf(4, None);
        assert_eq!(node.count(), 1);
        assert_eq!(node.height(), 0);
        assert_eq!(node.subtree_size(), 1);
        assert_eq!((node.left(), node.right()), (None, None));
        assert!(node.parent().is_none());
    }

    #[test]
    fn increment_and_decrement_track_size() {
        let mut node = Node::new_leaf('q', Some(Handle::from_index(3)));
        node.increment();
        node.increment();
        assert_eq!((node.count(), node.subtree_size()), (3, 3));
        node.decrement();
        assert_eq!((node.count(), node.subtree_size()), (2, 2));
    }

    #[test]
    #[should_panic(expected = "`Node::decrement()` - last occurrence must be unlinked!")]
    fn decrement_last_occurrence_panics() {
        Node::new_leaf(1, None).decrement();
    }

    #[test]
    fn refresh_uses_taller_child() {
        let mut node = Node::new_leaf(10, None);
        node.increment();
        node.set_left(Some(Handle::from_index(1)));
        node.set_right(Some(Handle::from_index(2)));
        node.refresh(Some((2, 9)), Some((0, 1)));
        assert_eq!(node.height(), 3);
        assert_eq!(node.subtree_size(), 12);

        node.refresh(None, Some((0, 4)));
        assert_eq!(node.height(), 1);
        assert_eq!(node.subtree_size(), 6);
    }

    #[test]
    fn replace_payload_keeps_links() {
        let mut target = Node::new_leaf(8, None);
        target.set_left(Some(Handle::from_index(0)));
        let mut source = Node::new_leaf(5, Some(Handle::from_index(0)));
        source.increment();

        target.replace_payload(source);
        assert_eq!(*target.value(), 5);
        assert_eq!(target.count(), 2);
        assert_eq!(target.left(), Some(Handle::from_index(0)));
    }
}
