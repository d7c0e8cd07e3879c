use thiserror::Error;

/// Reasons an [`AvlMultiset`](crate::AvlMultiset) operation is rejected.
///
/// A rejected operation never mutates the multiset.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// [`remove`](crate::AvlMultiset::remove) was asked for a value with no
    /// occurrences left.
    #[error("value is not present in the multiset")]
    ValueNotFound,
    /// [`value_at`](crate::AvlMultiset::value_at) was asked for a rank outside
    /// `0..len`.
    #[error("rank {rank} is out of range for a multiset of length {len}")]
    IndexOutOfRange {
        /// The requested rank.
        rank: usize,
        /// The multiset's length at the time of the request.
        len: usize,
    },
}

/// Result type returned by fallible multiset operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;
