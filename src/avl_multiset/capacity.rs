use super::AvlMultiset;
use crate::raw::RawAvlTree;

impl<T> AvlMultiset<T> {
    /// Creates an empty multiset with room for at least `capacity` distinct
    /// values before reallocating.
    ///
    /// Duplicates of a value already present take no extra room.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set: AvlMultiset<i32> = AvlMultiset::with_capacity(16);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlMultiset {
            tree: RawAvlTree::with_capacity(capacity),
        }
    }

    /// Returns how many distinct values the multiset can hold without
    /// reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::with_capacity(4);
    /// let before = set.capacity();
    /// for _ in 0..100 {
    ///     set.insert('x');
    /// }
    /// assert_eq!(set.capacity(), before);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }
}
