/// A zero-based rank into the sorted order of a multiset, duplicates included.
///
/// # Examples
///
/// ```
/// use avl_multiset::{AvlMultiset, Rank};
///
/// let set = AvlMultiset::from([20, 10, 10]);
///
/// assert_eq!(set[Rank(0)], 10);
/// assert_eq!(set[Rank(1)], 10);
/// assert_eq!(set[Rank(2)], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
