use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::Result;
use crate::raw::{Handle, RawAvlTree};

mod capacity;
mod diagnostics;
mod order_statistic;

pub use diagnostics::{Dump, NodeInfo, Traversal};

/// Traversal stack depth that never spills: AVL height stays below 64 for any
/// tree whose nodes are addressable.
pub(crate) type Stack = SmallVec<[Handle; 64]>;

/// An ordered multiset based on a size-augmented AVL tree.
///
/// Equal values share one node and a count, so the cost of every operation
/// depends on the number of *distinct* values, while lengths and ranks count
/// every occurrence.
///
/// It is a logic error for a value to be modified in such a way that its
/// ordering relative to any other value, as determined by the [`Ord`] trait,
/// changes while it is in the multiset.
///
/// # Examples
///
/// ```
/// use avl_multiset::AvlMultiset;
///
/// let mut scores = AvlMultiset::new();
/// scores.insert(70);
/// scores.insert(85);
/// scores.insert(70);
/// scores.insert(92);
///
/// assert_eq!(scores.len(), 4);
/// assert_eq!(scores.count(&70), 2);
///
/// // The median of an even-sized multiset is between the two middle ranks.
/// let lower = scores.value_at(scores.len() / 2 - 1).unwrap();
/// let upper = scores.value_at(scores.len() / 2).unwrap();
/// assert_eq!((*lower, *upper), (70, 85));
///
/// scores.remove(&70).unwrap();
/// assert_eq!(scores.iter().copied().collect::<Vec<_>>(), [70, 85, 92]);
/// ```
pub struct AvlMultiset<T> {
    tree: RawAvlTree<T>,
}

/// An iterator over the values of an `AvlMultiset`, in ascending order, each
/// repeated as many times as it occurs.
///
/// This `struct` is created by the [`iter`] method on [`AvlMultiset`].
///
/// # Examples
///
/// ```
/// use avl_multiset::AvlMultiset;
///
/// let set = AvlMultiset::from([2, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.len(), 3);
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: AvlMultiset::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    tree: &'a RawAvlTree<T>,
    // Nodes whose left subtree has been yielded but which have not been yet.
    stack: Stack,
    value: Option<&'a T>,
    repeats: usize,
    remaining: usize,
}

impl<T> AvlMultiset<T> {
    /// Makes a new, empty `AvlMultiset`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut set: AvlMultiset<i32> = AvlMultiset::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        AvlMultiset {
            tree: RawAvlTree::new(),
        }
    }

    /// Returns the number of values in the multiset, counting every duplicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// set.insert(1);
    /// assert_eq!(set.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multiset holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of distinct values in the multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([4, 4, 4, 9]);
    /// assert_eq!(set.len(), 4);
    /// assert_eq!(set.distinct_len(), 2);
    /// ```
    #[must_use]
    pub const fn distinct_len(&self) -> usize {
        self.tree.distinct_len()
    }

    /// Returns the height of the underlying tree, or `None` if it is empty.
    ///
    /// A single distinct value has height 0. The height is always logarithmic
    /// in [`distinct_len`](Self::distinct_len), whatever the insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set: AvlMultiset<u32> = (0..1024).collect();
    /// assert!(set.height().unwrap() < 15);
    /// ```
    #[must_use]
    pub fn height(&self) -> Option<usize> {
        self.tree.height()
    }

    /// Clears the multiset, removing all values.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the smallest value, or `None` if the multiset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([3, 1, 2]);
    /// assert_eq!(set.first(), Some(&1));
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns the largest value, or `None` if the multiset is empty.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Gets an iterator that visits the values in ascending order, each as
    /// many times as it occurs.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            tree: &self.tree,
            stack: Stack::new(),
            value: None,
            repeats: 0,
            remaining: self.tree.len(),
        };
        iter.push_left_spine(self.tree.root());
        iter
    }
}

impl<T: Ord> AvlMultiset<T> {
    /// Returns `true` if the multiset holds at least one occurrence of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([1, 2, 3]);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&4));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.contains(value)
    }

    /// Returns how many times `value` occurs in the multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from(["a", "b", "a"]);
    /// assert_eq!(set.count("a"), 2);
    /// assert_eq!(set.count("z"), 0);
    /// ```
    #[must_use]
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.count(value)
    }

    /// Adds one occurrence of `value`.
    ///
    /// A value already present only has its count bumped; the tree shape does
    /// not change.
    ///
    /// # Panics
    ///
    /// Panics if the number of distinct values would exceed the node arena's
    /// maximum capacity. Duplicates of a present value never panic.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::new();
    /// set.insert(2);
    /// set.insert(2);
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.distinct_len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) {
        self.tree.insert(value);
    }

    /// Removes one occurrence of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueNotFound`](crate::Error::ValueNotFound) if
    /// `value` does not occur in the multiset; the multiset is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::{AvlMultiset, Error};
    ///
    /// let mut set = AvlMultiset::from([7, 7]);
    /// assert_eq!(set.remove(&7), Ok(()));
    /// assert_eq!(set.remove(&7), Ok(()));
    /// assert_eq!(set.remove(&7), Err(Error::ValueNotFound));
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> Result<()>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.remove(value).map(drop)
    }
}

impl<T> Iter<'_, T> {
    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.tree.node(handle).left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.repeats == 0 {
            let handle = self.stack.pop()?;
            let node = self.tree.node(handle);
            self.push_left_spine(node.right());
            self.value = Some(node.value());
            self.repeats = node.count();
        }
        self.repeats -= 1;
        self.remaining -= 1;
        self.value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            stack: self.stack.clone(),
            value: self.value,
            repeats: self.repeats,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> IntoIterator for &'a AvlMultiset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> Default for AvlMultiset<T> {
    /// Creates an empty `AvlMultiset`.
    fn default() -> AvlMultiset<T> {
        AvlMultiset::new()
    }
}

impl<T: Clone> Clone for AvlMultiset<T> {
    fn clone(&self) -> Self {
        AvlMultiset {
            tree: self.tree.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Two multisets are equal when they hold the same values with the same
/// counts, regardless of how their trees are shaped.
impl<T: PartialEq> PartialEq for AvlMultiset<T> {
    fn eq(&self, other: &AvlMultiset<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for AvlMultiset<T> {}

impl<T: Ord> FromIterator<T> for AvlMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> AvlMultiset<T> {
        let mut set = AvlMultiset::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for AvlMultiset<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |value| self.insert(value));
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for AvlMultiset<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlMultiset<T> {
    /// Converts a `[T; N]` into an `AvlMultiset<T>`, keeping every duplicate.
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set1 = AvlMultiset::from([1, 2, 3, 3]);
    /// let set2: AvlMultiset<_> = [3, 1, 3, 2].into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;

    #[test]
    fn iter_repeats_duplicates_in_order() {
        let set = AvlMultiset::from([5, 3, 5, 1, 5, 3]);
        let values: Vec<_> = set.iter().copied().collect();
        assert_eq!(values, [1, 3, 3, 5, 5, 5]);
    }

    #[test]
    fn iter_reports_exact_length() {
        let set = AvlMultiset::from([9, 8, 8, 7]);
        let mut iter = set.iter();
        for expected in (0..=4).rev() {
            assert_eq!(iter.len(), expected);
            iter.next();
        }
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn iter_on_empty() {
        let set: AvlMultiset<u8> = AvlMultiset::new();
        assert_eq!(set.iter().next(), None);
        assert_eq!(set.iter().len(), 0);
    }

    #[test]
    fn equality_ignores_shape() {
        let ascending: AvlMultiset<i32> = (0..64).chain(0..8).collect();
        let descending: AvlMultiset<i32> = (0..64).rev().chain(0..8).collect();
        assert_eq!(ascending, descending);

        let mut fewer = ascending.clone();
        fewer.remove(&3).unwrap();
        assert_ne!(ascending, fewer);
    }

    #[test]
    fn debug_lists_every_occurrence() {
        let set = AvlMultiset::from([2, 1, 2]);
        assert_eq!(format!("{set:?}"), "[1, 2, 2]");
        assert_eq!(format!("{:?}", set.iter()), "[1, 2, 2]");
    }

    #[test]
    fn extend_by_reference() {
        let mut set: AvlMultiset<i32> = AvlMultiset::new();
        set.extend(&[3, 3, 1]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.count(&3), 2);
    }

    #[test]
    fn borrowed_lookup() {
        let mut set: AvlMultiset<alloc::string::String> = AvlMultiset::new();
        set.insert("pear".into());
        set.insert("fig".into());
        set.insert("pear".into());
        assert!(set.contains("fig"));
        assert_eq!(set.count("pear"), 2);
        set.remove("pear").unwrap();
        assert_eq!(set.count("pear"), 1);
    }
}
