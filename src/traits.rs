//! Common traits for persistent heap values
//!
//! This module provides a two-tier trait hierarchy for immutable heaps:
//!
//! - [`Heap`]: the read/derive protocol every heap value exposes, independent of
//!   how its nodes are laid out
//! - [`MergeableHeap`]: extends [`Heap`] with `merge`, which is only available
//!   between two values of the *same* concrete type
//!
//! Every operation that derives a new heap returns `Self`, so the concrete
//! representation (and the factory brand it carries) survives `add`, `rest`,
//! `merge` and the range queries. No operation mutates its receiver; the old
//! value stays valid and shares structure with the new one.

use std::fmt;
use std::iter::FusedIterator;

use thiserror::Error;

/// Error type for heap operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `first` was called on an empty heap: there is no extreme element
    #[error("first of an empty heap")]
    Empty,
    /// A derive operation was called on an empty heap: there is no successor state
    #[error("{operation} of an empty heap")]
    Unsupported {
        /// Name of the rejected operation
        operation: &'static str,
    },
    /// `check_invariant` found a node that breaks heap order or the shape rule
    #[error("heap invariant violated: {0}")]
    InvariantViolation(String),
}

/// Base trait for persistent heap values
///
/// "First" means the extreme element under the heap's ordering: the minimum for
/// heaps minted by a `Min` factory, the maximum for a `Max` factory.
///
/// # Example
///
/// ```rust
/// use persistent_heaps::{Heap, Leftist};
///
/// Leftist::MIN.natural(|factory| {
///     let heap = factory.of([5, 3, 8, 1]);
///     assert_eq!(heap.first(), Ok(&1));
///
///     let rest = heap.rest().unwrap();
///     assert_eq!(rest.sorted().collect::<Vec<_>>(), vec![3, 5, 8]);
///
///     // the original value is untouched
///     assert_eq!(heap.len(), 4);
/// });
/// ```
pub trait Heap: Clone {
    /// Element type
    type Item: Clone;

    /// Iterator over borrowed elements, see [`iter`](Heap::iter)
    type Iter<'a>: Iterator<Item = &'a Self::Item>
    where
        Self: 'a;

    /// Returns true if the heap holds no elements
    fn is_empty(&self) -> bool;

    /// Returns true if the heap holds at least one element
    fn non_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Returns the number of elements
    ///
    /// # Time Complexity
    /// O(1) for leftist heaps (cached per node), O(n) for skew heaps.
    fn len(&self) -> usize;

    /// Returns a heap holding every element of `self` plus `x`
    ///
    /// # Time Complexity
    /// O(log n) for leftist heaps, O(log n) amortized for unshared skew heaps.
    fn add(&self, x: Self::Item) -> Self;

    /// Returns the extreme element
    ///
    /// # Errors
    /// Returns [`HeapError::Empty`] if the heap is empty.
    fn first(&self) -> Result<&Self::Item, HeapError>;

    /// Returns the extreme element, or `None` if the heap is empty
    fn first_option(&self) -> Option<&Self::Item>;

    /// Returns the heap without its extreme element
    ///
    /// # Errors
    /// Returns [`HeapError::Unsupported`] if the heap is empty.
    fn rest(&self) -> Result<Self, HeapError>;

    /// Returns the extreme element together with the remaining heap
    ///
    /// Cheaper than calling [`first`](Heap::first) and then [`rest`](Heap::rest)
    /// because the root is only inspected once.
    fn first_view(&self) -> Option<(&Self::Item, Self)>;

    /// Attaches `x` as the new root, with the whole current heap as its left child
    ///
    /// The caller must guarantee that `x` precedes or ties every element already
    /// in the heap. This is not checked; violating it yields a heap that fails
    /// [`check_invariant`](Heap::check_invariant).
    fn add_first_unchecked(&self, x: Self::Item) -> Self;

    /// Elements strictly before `x`
    fn take_until(&self, x: &Self::Item) -> Self;

    /// Elements before or tied with `x`
    fn take_to(&self, x: &Self::Item) -> Self;

    /// Elements tied with or after `x`
    fn drop_until(&self, x: &Self::Item) -> Self;

    /// Elements strictly after `x`
    fn drop_to(&self, x: &Self::Item) -> Self;

    /// Walks the whole structure and verifies heap order and the representation's
    /// shape rule
    ///
    /// Intended for tests and debugging, not for production call paths.
    ///
    /// # Errors
    /// Returns [`HeapError::InvariantViolation`] describing the first broken node.
    fn check_invariant(&self) -> Result<(), HeapError>
    where
        Self::Item: fmt::Debug;

    /// Returns an iterator over all elements in unspecified order
    ///
    /// The walk is driven by an explicit stack of pending nodes, O(n) total.
    fn iter(&self) -> Self::Iter<'_>;

    /// Returns a lazy sequence of all elements in heap order
    ///
    /// Each step peels one element with [`first_view`](Heap::first_view), so
    /// draining the whole sequence costs O(n log n). Call again to restart.
    fn sorted(&self) -> Sorted<Self> {
        Sorted::new(self.clone())
    }
}

/// Heap values that can be merged with values of exactly the same type
///
/// Two heaps share a type only when they come from the same factory, so `merge`
/// can never combine heaps built with different orderings or representations.
///
/// # Example
///
/// ```rust
/// use persistent_heaps::{Heap, MergeableHeap, Skew};
///
/// let merged = Skew::MAX.natural(|factory| {
///     let a = factory.of([5, 7]);
///     let b = factory.of([4, 6]);
///     a.merge(&b).sorted().collect::<Vec<_>>()
/// });
/// assert_eq!(merged, vec![7, 6, 5, 4]);
/// ```
pub trait MergeableHeap: Heap {
    /// Returns a heap holding the multiset union of `self` and `other`
    ///
    /// # Time Complexity
    /// O(log n) for leftist heaps, O(log n) amortized for unshared skew heaps.
    fn merge(&self, other: &Self) -> Self;
}

/// Lazy heap-order sequence produced by [`Heap::sorted`]
///
/// Holds a heap value and replaces it by its `rest` on every step.
#[derive(Clone)]
pub struct Sorted<H: Heap> {
    heap: H,
    remaining: usize,
}

impl<H: Heap> Sorted<H> {
    fn new(heap: H) -> Self {
        let remaining = heap.len();
        Self { heap, remaining }
    }
}

impl<H: Heap> Iterator for Sorted<H> {
    type Item = H::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let (first, rest) = {
            let (first, rest) = self.heap.first_view()?;
            (first.clone(), rest)
        };
        self.heap = rest;
        self.remaining -= 1;
        Some(first)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<H: Heap> ExactSizeIterator for Sorted<H> {}

impl<H: Heap> FusedIterator for Sorted<H> {}

impl<H: Heap> fmt::Debug for Sorted<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sorted")
            .field("remaining", &self.remaining)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(HeapError::Empty.to_string(), "first of an empty heap");
        assert_eq!(
            HeapError::Unsupported { operation: "rest" }.to_string(),
            "rest of an empty heap"
        );
        assert_eq!(
            HeapError::InvariantViolation("bad node".into()).to_string(),
            "heap invariant violated: bad node"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<HeapError>();
    }
}
