use core::borrow::Borrow;
use core::ops::Index;

use super::AvlMultiset;
use crate::{Rank, Result};

impl<T> AvlMultiset<T> {
    /// Returns the value at position `rank` in sorted order, where every
    /// duplicate occupies its own position.
    ///
    /// The rank is zero-based.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`](crate::Error::IndexOutOfRange) if
    /// `rank >= self.len()`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::{AvlMultiset, Error};
    ///
    /// let set = AvlMultiset::from([5, 3, 5, 1]);
    /// assert_eq!(set.value_at(0), Ok(&1));
    /// assert_eq!(set.value_at(1), Ok(&3));
    /// assert_eq!(set.value_at(2), Ok(&5));
    /// assert_eq!(set.value_at(3), Ok(&5));
    /// assert_eq!(set.value_at(4), Err(Error::IndexOutOfRange { rank: 4, len: 4 }));
    /// ```
    pub fn value_at(&self, rank: usize) -> Result<&T> {
        self.tree.value_at(rank)
    }
}

impl<T: Ord> AvlMultiset<T> {
    /// Returns the zero-based rank of the first occurrence of `value`, or
    /// `None` if the value is not present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([10, 20, 20, 30]);
    ///
    /// assert_eq!(set.rank_of(&20), Some(1));
    /// assert_eq!(set.rank_of(&30), Some(3));
    /// assert_eq!(set.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.rank_of(value)
    }
}

/// Indexes into the multiset by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use avl_multiset::{AvlMultiset, Rank};
///
/// let set = AvlMultiset::from([10, 20, 30]);
/// assert_eq!(set[Rank(1)], 20);
/// ```
impl<T> Index<Rank> for AvlMultiset<T> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        match self.value_at(rank.0) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}
