use core::fmt;
use core::iter::FusedIterator;

use super::{AvlMultiset, Stack};
use crate::raw::{Handle, Node, RawAvlTree};

/// A snapshot of one tree node, for debugging.
///
/// Displays as `(x=value, n=count, BF=balance, H=height, size=subtree_size)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NodeInfo<'a, T> {
    /// The distinct value held by the node.
    pub value: &'a T,
    /// How many times `value` occurs.
    pub count: usize,
    /// Height of the right subtree minus height of the left one.
    pub balance_factor: i32,
    /// Height of the node; a leaf has height 0.
    pub height: usize,
    /// Occurrences in the subtree rooted at this node, duplicates included.
    pub subtree_size: usize,
}

#[derive(Clone, Copy, Debug)]
enum Order {
    Pre,
    In,
}

/// An iterator over the nodes of an `AvlMultiset`, one per distinct value.
///
/// This `struct` is created by the [`preorder`] and [`inorder`] methods on
/// [`AvlMultiset`].
///
/// [`preorder`]: AvlMultiset::preorder
/// [`inorder`]: AvlMultiset::inorder
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Traversal<'a, T: 'a> {
    tree: &'a RawAvlTree<T>,
    order: Order,
    stack: Stack,
}

/// Displays both traversals of an `AvlMultiset`.
///
/// This `struct` is created by the [`dump`](AvlMultiset::dump) method.
#[must_use = "a dump does nothing unless formatted"]
pub struct Dump<'a, T: 'a> {
    set: &'a AvlMultiset<T>,
}

impl<T> AvlMultiset<T> {
    /// Visits the tree's nodes root first, then the left and right subtrees.
    ///
    /// Meant for debugging; the shape of the tree is not part of the
    /// multiset's contract.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([1, 2, 3, 3]);
    /// let root = set.preorder().next().unwrap();
    /// assert_eq!((*root.value, root.height, root.subtree_size), (2, 1, 4));
    /// ```
    pub fn preorder(&self) -> Traversal<'_, T> {
        let mut stack = Stack::new();
        stack.extend(self.tree.root());
        Traversal {
            tree: &self.tree,
            order: Order::Pre,
            stack,
        }
    }

    /// Visits the tree's nodes in ascending order of value.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([1, 2, 3, 3]);
    /// let counts: Vec<_> = set.inorder().map(|info| (*info.value, info.count)).collect();
    /// assert_eq!(counts, [(1, 1), (2, 1), (3, 2)]);
    /// ```
    pub fn inorder(&self) -> Traversal<'_, T> {
        let mut traversal = Traversal {
            tree: &self.tree,
            order: Order::In,
            stack: Stack::new(),
        };
        traversal.push_left_spine(self.tree.root());
        traversal
    }

    /// Returns a printable dump: the preorder walk on one line, then one line
    /// per node in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([2, 1]);
    /// assert_eq!(
    ///     set.dump().to_string(),
    ///     "(x=2, n=1, BF=-1, H=1, size=2) (x=1, n=1, BF=0, H=0, size=1) \n\
    ///      (x=1, n=1, BF=0, H=0, size=1) \n\
    ///      (x=2, n=1, BF=-1, H=1, size=2) \n"
    /// );
    /// ```
    pub fn dump(&self) -> Dump<'_, T> {
        Dump {
            set: self,
        }
    }
}

impl<'a, T> Traversal<'a, T> {
    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.tree.node(handle).left();
        }
    }

    fn info(&self, handle: Handle, node: &'a Node<T>) -> NodeInfo<'a, T> {
        NodeInfo {
            value: node.value(),
            count: node.count(),
            balance_factor: self.tree.balance_factor(handle),
            height: node.height().unsigned_abs() as usize,
            subtree_size: node.subtree_size(),
        }
    }
}

impl<'a, T> Iterator for Traversal<'a, T> {
    type Item = NodeInfo<'a, T>;

    fn next(&mut self) -> Option<NodeInfo<'a, T>> {
        let handle = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.node(handle);
        match self.order {
            Order::Pre => {
                self.stack.extend(node.right());
                self.stack.extend(node.left());
            }
            Order::In => self.push_left_spine(node.right()),
        }
        Some(self.info(handle, node))
    }
}

impl<T> FusedIterator for Traversal<'_, T> {}

impl<T: fmt::Display> fmt::Display for NodeInfo<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x={}, n={}, BF={}, H={}, size={})",
            self.value, self.count, self.balance_factor, self.height, self.subtree_size
        )
    }
}

impl<T: fmt::Display> fmt::Display for Dump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for info in self.set.preorder() {
            write!(f, "{info} ")?;
        }
        writeln!(f)?;
        for info in self.set.inorder() {
            writeln!(f, "{info} ")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn traversals_of_balanced_tree() {
        //      4
        //    /   \
        //   2     6
        //  / \   / \
        // 1   3 5   7
        let set: AvlMultiset<i32> = (1..=7).collect();
        let pre: Vec<_> = set.preorder().map(|info| *info.value).collect();
        let inorder: Vec<_> = set.inorder().map(|info| *info.value).collect();
        assert_eq!(pre, [4, 2, 1, 3, 6, 5, 7]);
        assert_eq!(inorder, [1, 2, 3, 4, 5, 6, 7]);
        assert!(set.inorder().all(|info| info.balance_factor == 0));
    }

    #[test]
    fn traversal_reports_cached_fields() {
        let mut set = AvlMultiset::from([10, 20, 20]);
        set.insert(30);
        set.insert(40);
        // 10, 20 (x2), 30, 40: the right spine is one level deeper.
        let root = set.preorder().next().unwrap();
        assert_eq!(*root.value, 20);
        assert_eq!(root.count, 2);
        assert_eq!(root.balance_factor, 1);
        assert_eq!(root.height, 2);
        assert_eq!(root.subtree_size, 5);
        assert_eq!(set.inorder().count(), set.distinct_len());
    }

    #[test]
    fn empty_dump() {
        let set: AvlMultiset<i32> = AvlMultiset::new();
        assert_eq!(set.preorder().next(), None);
        assert_eq!(set.inorder().next(), None);
        assert_eq!(alloc::format!("{}", set.dump()), "\n");
    }
}
