//! Node representations
//!
//! A representation decides how heap nodes are laid out and how two trees are
//! merged. Both representations in this crate are closed two-case sum types
//! (`Empty | Node`) with reference-counted child links, so a subtree can be
//! shared by any number of heap values.
//!
//! The trait is sealed: the factory brand only means something if every tree a
//! heap holds was built by one of the merge rules below.

use crate::order::Order;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Layout and merge rule of a heap tree
///
/// Implemented by the companion types [`Leftist`](crate::Leftist) and
/// [`Skew`](crate::Skew).
pub trait Representation: sealed::Sealed + Sized + 'static {
    /// Short name, used in `Debug` output and log events
    const NAME: &'static str;

    /// Tree of elements of type `E`
    type Tree<E>: Clone;

    /// The empty tree
    fn empty<E>() -> Self::Tree<E>;

    /// Builds a node from a root and two subtrees
    ///
    /// The caller guarantees heap order between `element` and both subtrees.
    /// The representation may reorder the children to restore its shape rule.
    fn node<E>(element: E, left: Self::Tree<E>, right: Self::Tree<E>) -> Self::Tree<E>;

    /// Splits a non-empty tree into its root element and children
    fn view<E>(tree: &Self::Tree<E>) -> Option<(&E, &Self::Tree<E>, &Self::Tree<E>)>;

    /// Number of elements in the tree
    fn size<E>(tree: &Self::Tree<E>) -> usize;

    /// Merges two heap-ordered trees
    ///
    /// On a tie the root of `a` wins.
    fn merge<E: Clone, O: Order<E>>(
        order: &O,
        a: &Self::Tree<E>,
        b: &Self::Tree<E>,
    ) -> Self::Tree<E>;

    /// Checks the representation's shape rule at the root of `tree` only
    ///
    /// Heap order is checked separately, once for all representations.
    fn check_shape<E>(_tree: &Self::Tree<E>) -> Result<(), String> {
        Ok(())
    }
}
