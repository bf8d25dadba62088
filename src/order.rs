//! Orderings supplied to heap factories
//!
//! An [`Order`] is a total preorder over an element type. The heaps never look at
//! anything but `compare`, so an ordering may be a zero-sized marker
//! ([`Natural`]), an adapter ([`Reverse`], [`ByKey`]) or a closure ([`FromFn`]).
//!
//! Implementations must be consistent across calls: two comparisons of the same
//! pair must agree, or the heap invariants silently break.

use std::cmp::Ordering;
use std::fmt;

/// A total preorder over `E`
pub trait Order<E: ?Sized> {
    /// Compares two elements
    fn compare(&self, a: &E, b: &E) -> Ordering;

    /// Returns true if `a` strictly precedes `b`
    #[inline]
    fn lt(&self, a: &E, b: &E) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Returns true if `a` precedes or ties with `b`
    #[inline]
    fn le(&self, a: &E, b: &E) -> bool {
        self.compare(a, b) != Ordering::Greater
    }
}

/// The element type's own [`Ord`] implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<E: Ord + ?Sized> Order<E> for Natural {
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Ordering {
        a.cmp(b)
    }
}

/// Reverses another ordering
///
/// Max factories are Min factories bound to `Reverse` of the caller's ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Reverse<O>(pub O);

impl<E: ?Sized, O: Order<E>> Order<E> for Reverse<O> {
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Orders `(key, value)` pairs by key alone
///
/// Values never take part in a comparison, so pairs with tied keys come out in
/// an unspecified relative order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ByKey<O>(pub O);

impl<K, V, O: Order<K>> Order<(K, V)> for ByKey<O> {
    #[inline]
    fn compare(&self, a: &(K, V), b: &(K, V)) -> Ordering {
        self.0.compare(&a.0, &b.0)
    }
}

/// An ordering backed by a comparison closure
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

/// Wraps a comparison closure as an [`Order`]
///
/// # Example
///
/// ```rust
/// use persistent_heaps::order::{from_fn, Order};
///
/// let by_len = from_fn(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// assert!(by_len.lt(&"ab", &"abc"));
/// assert!(by_len.le(&"ab", &"cd"));
/// ```
pub fn from_fn<E: ?Sized, F>(compare: F) -> FromFn<F>
where
    F: Fn(&E, &E) -> Ordering,
{
    FromFn(compare)
}

impl<E: ?Sized, F> Order<E> for FromFn<F>
where
    F: Fn(&E, &E) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromFn(..)")
    }
}
