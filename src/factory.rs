//! Factories, builders and factory-factories
//!
//! A [`Factory`] binds one ordering to one representation and is the only way to
//! obtain heaps. Every heap it mints, and every heap derived from those, carries
//! the factory's brand in its type.
//!
//! Factories are never returned to the caller. The factory-factories [`Min`] and
//! [`Max`] hand a fresh factory to a closure instead, and the closure must accept
//! a factory of *any* brand. Within that closure the brand is a lifetime no other
//! factory shares, so heaps of two factory instances never unify, even when both
//! were bound to equivalent orderings:
//!
//! ```compile_fail
//! use persistent_heaps::{Leftist, MergeableHeap};
//!
//! Leftist::MIN.natural(|a| {
//!     Leftist::MIN.natural(|b| {
//!         let x = a.single(1);
//!         let y = b.single(2);
//!         x.merge(&y);
//!     })
//! });
//! ```
//!
//! Min and max heaps differ in their ordering type:
//!
//! ```compile_fail
//! use persistent_heaps::{Leftist, MergeableHeap};
//!
//! Leftist::MIN.natural(|min| {
//!     Leftist::MAX.natural(|max| {
//!         min.single(1).merge(&max.single(2));
//!     })
//! });
//! ```
//!
//! Leftist and skew heaps differ in their representation:
//!
//! ```compile_fail
//! use persistent_heaps::{Leftist, MergeableHeap, Skew};
//!
//! Leftist::MIN.natural(|leftist| {
//!     Skew::MIN.natural(|skew| {
//!         leftist.single(1).merge(&skew.single(2));
//!     })
//! });
//! ```
//!
//! And heaps cannot leave their factory's scope:
//!
//! ```compile_fail
//! use persistent_heaps::Leftist;
//!
//! let escaped = Leftist::MIN.natural(|factory| factory.single(1));
//! ```
//!
//! Heaps of one factory, including copies of that factory, merge freely:
//!
//! ```rust
//! use persistent_heaps::{Heap, Leftist, MergeableHeap};
//!
//! let merged = Leftist::MIN.natural(|factory| {
//!     let copy = factory.clone();
//!     let heap = factory.of([5, 7]).merge(&copy.of([4, 6]));
//!     heap.sorted().collect::<Vec<_>>()
//! });
//! assert_eq!(merged, vec![4, 5, 6, 7]);
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::brand::{with_brand, Brand};
use crate::heap::BoundHeap;
use crate::order::{ByKey, Natural, Order, Reverse};
use crate::representation::Representation;
use crate::traits::Heap;

/// Authority minting heaps of representation `R` ordered by `O`
///
/// Cloning a factory yields the same authority: the clone shares the brand, so
/// heaps of both merge.
pub struct Factory<'id, E, O, R: Representation> {
    empty: BoundHeap<'id, E, O, R>,
}

impl<'id, E, O, R: Representation> Clone for Factory<'id, E, O, R> {
    fn clone(&self) -> Self {
        Self {
            empty: self.empty.clone(),
        }
    }
}

impl<'id, E, O: fmt::Debug, R: Representation> fmt::Debug for Factory<'id, E, O, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("representation", &R::NAME)
            .field("order", self.empty.order())
            .finish()
    }
}

impl<'id, E: Clone, O: Order<E>, R: Representation> Factory<'id, E, O, R> {
    fn bind(order: O, brand: Brand<'id>) -> Self {
        Self {
            empty: BoundHeap::empty(order, brand),
        }
    }

    /// The ordering every heap of this factory uses
    pub fn order(&self) -> &O {
        self.empty.order()
    }

    /// The empty heap
    pub fn empty(&self) -> BoundHeap<'id, E, O, R> {
        self.empty.clone()
    }

    /// A heap holding exactly `x`
    pub fn single(&self, x: E) -> BoundHeap<'id, E, O, R> {
        self.empty.add(x)
    }

    /// A heap holding the given elements, see [`from_iter`](Factory::from_iter)
    pub fn of<const N: usize>(&self, xs: [E; N]) -> BoundHeap<'id, E, O, R> {
        self.from_iter(xs)
    }

    /// A heap holding every element of `xs`
    ///
    /// Wraps each element as a singleton and merges neighbours pairwise, halving
    /// the number of heaps each round. O(n), against O(n log n) for repeated
    /// [`add`](Heap::add).
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I: IntoIterator<Item = E>>(&self, xs: I) -> BoundHeap<'id, E, O, R> {
        self.empty.add_all(xs)
    }

    /// A heap built from elements already in this factory's order, in O(n)
    ///
    /// Elements are attached right to left with
    /// [`add_first_unchecked`](Heap::add_first_unchecked). The order of `xs` is
    /// not checked; unsorted input yields a heap that fails
    /// [`check_invariant`](Heap::check_invariant).
    ///
    /// # Example
    ///
    /// ```rust
    /// use persistent_heaps::{Heap, Skew};
    ///
    /// Skew::MIN.natural(|factory| {
    ///     let heap = factory.from_sorted_unchecked(vec![1, 2, 2, 9]);
    ///     assert_eq!(heap.first(), Ok(&1));
    ///     assert!(heap.check_invariant().is_ok());
    /// });
    /// ```
    pub fn from_sorted_unchecked<I>(&self, xs: I) -> BoundHeap<'id, E, O, R>
    where
        I: IntoIterator<Item = E>,
        I::IntoIter: DoubleEndedIterator,
    {
        xs.into_iter()
            .rev()
            .fold(self.empty(), |heap, x| heap.add_first_unchecked(x))
    }

    /// A heap built from elements in reverse of this factory's order, in O(n)
    ///
    /// Same contract as [`from_sorted_unchecked`](Factory::from_sorted_unchecked)
    /// with the input running from last to first.
    pub fn from_reverse_sorted_unchecked<I>(&self, xs: I) -> BoundHeap<'id, E, O, R>
    where
        I: IntoIterator<Item = E>,
    {
        xs.into_iter()
            .fold(self.empty(), |heap, x| heap.add_first_unchecked(x))
    }

    /// An accumulator that collects elements and builds heaps from them
    pub fn builder(&self) -> Builder<'id, E, O, R> {
        Builder {
            factory: self.clone(),
            elements: Vec::new(),
        }
    }
}

/// Collects elements, then builds heaps with [`Factory::from_iter`]
///
/// # Example
///
/// ```rust
/// use persistent_heaps::{Heap, Leftist};
///
/// Leftist::MIN.natural(|factory| {
///     let mut builder = factory.builder();
///     builder.push(4);
///     builder.extend([9, 2]);
///     assert_eq!(builder.result().first(), Ok(&2));
///
///     builder.push(1);
///     assert_eq!(builder.finish().len(), 4);
/// });
/// ```
pub struct Builder<'id, E, O, R: Representation> {
    factory: Factory<'id, E, O, R>,
    elements: Vec<E>,
}

impl<'id, E: Clone, O: Order<E>, R: Representation> Builder<'id, E, O, R> {
    /// Appends one element
    pub fn push(&mut self, x: E) {
        self.elements.push(x);
    }

    /// Number of collected elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if nothing has been collected
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Forgets every collected element
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Builds a heap of the elements collected so far, keeping them for later
    pub fn result(&self) -> BoundHeap<'id, E, O, R> {
        tracing::trace!(
            representation = R::NAME,
            count = self.elements.len(),
            "builder result"
        );
        self.factory.from_iter(self.elements.iter().cloned())
    }

    /// Builds a heap of the collected elements, consuming the builder
    pub fn finish(self) -> BoundHeap<'id, E, O, R> {
        tracing::trace!(
            representation = R::NAME,
            count = self.elements.len(),
            "builder finish"
        );
        self.factory.from_iter(self.elements)
    }
}

impl<'id, E, O, R: Representation> Extend<E> for Builder<'id, E, O, R> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl<'id, E, O: fmt::Debug, R: Representation> fmt::Debug for Builder<'id, E, O, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("factory", &self.factory)
            .field("len", &self.elements.len())
            .finish()
    }
}

/// Factory-factory for heaps whose first element is the least under the ordering
pub struct Min<R> {
    _representation: PhantomData<fn() -> R>,
}

impl<R> Min<R> {
    /// The factory-factory for representation `R`
    pub const fn new() -> Self {
        Self {
            _representation: PhantomData,
        }
    }
}

impl<R: Representation> Min<R> {
    fn bind<E, O, T>(
        &self,
        orientation: &'static str,
        order: O,
        body: impl for<'id> FnOnce(Factory<'id, E, O, R>) -> T,
    ) -> T
    where
        E: Clone,
        O: Order<E>,
    {
        tracing::trace!(representation = R::NAME, orientation, "binding factory");
        with_brand(|brand| body(Factory::bind(order, brand)))
    }

    /// Runs `body` with a fresh factory bound to `order`
    ///
    /// # Example
    ///
    /// ```rust
    /// use persistent_heaps::order::from_fn;
    /// use persistent_heaps::{Heap, Leftist};
    ///
    /// let shortest = Leftist::MIN.with(
    ///     from_fn(|a: &&str, b: &&str| a.len().cmp(&b.len())),
    ///     |factory| *factory.of(["heap", "of", "words"]).first().unwrap(),
    /// );
    /// assert_eq!(shortest, "of");
    /// ```
    pub fn with<E, O, T>(
        &self,
        order: O,
        body: impl for<'id> FnOnce(Factory<'id, E, O, R>) -> T,
    ) -> T
    where
        E: Clone,
        O: Order<E>,
    {
        self.bind("min", order, body)
    }

    /// Runs `body` with a fresh factory using the elements' own [`Ord`]
    pub fn natural<E, T>(&self, body: impl for<'id> FnOnce(Factory<'id, E, Natural, R>) -> T) -> T
    where
        E: Ord + Clone,
    {
        self.with(Natural, body)
    }

    /// Runs `body` with a fresh factory for `(key, value)` pairs ordered by key only
    ///
    /// # Example
    ///
    /// ```rust
    /// use persistent_heaps::order::Natural;
    /// use persistent_heaps::{Heap, Skew};
    ///
    /// let next = Skew::MIN.by_key(Natural, |factory| {
    ///     factory.of([(3, "c"), (1, "a"), (2, "b")]).first().map(|(_, v)| *v)
    /// });
    /// assert_eq!(next, Ok("a"));
    /// ```
    pub fn by_key<K, V, O, T>(
        &self,
        key_order: O,
        body: impl for<'id> FnOnce(Factory<'id, (K, V), ByKey<O>, R>) -> T,
    ) -> T
    where
        K: Clone,
        V: Clone,
        O: Order<K>,
    {
        self.with(ByKey(key_order), body)
    }

    /// The max-oriented factory-factory for the same representation
    pub const fn max(&self) -> Max<R> {
        Max::new()
    }
}

/// Factory-factory for heaps whose first element is the greatest under the ordering
///
/// Every entry point delegates to [`Min`] with the ordering reversed.
pub struct Max<R> {
    min: Min<R>,
}

impl<R> Max<R> {
    /// The factory-factory for representation `R`
    pub const fn new() -> Self {
        Self { min: Min::new() }
    }
}

impl<R: Representation> Max<R> {
    /// Runs `body` with a fresh factory bound to the reverse of `order`
    pub fn with<E, O, T>(
        &self,
        order: O,
        body: impl for<'id> FnOnce(Factory<'id, E, Reverse<O>, R>) -> T,
    ) -> T
    where
        E: Clone,
        O: Order<E>,
    {
        self.min.bind("max", Reverse(order), body)
    }

    /// Runs `body` with a fresh factory using the reverse of the elements' [`Ord`]
    pub fn natural<E, T>(
        &self,
        body: impl for<'id> FnOnce(Factory<'id, E, Reverse<Natural>, R>) -> T,
    ) -> T
    where
        E: Ord + Clone,
    {
        self.with(Natural, body)
    }

    /// Runs `body` with a fresh factory for `(key, value)` pairs, greatest key first
    pub fn by_key<K, V, O, T>(
        &self,
        key_order: O,
        body: impl for<'id> FnOnce(Factory<'id, (K, V), Reverse<ByKey<O>>, R>) -> T,
    ) -> T
    where
        K: Clone,
        V: Clone,
        O: Order<K>,
    {
        self.with(ByKey(key_order), body)
    }

    /// The min-oriented factory-factory for the same representation
    pub const fn min(&self) -> Min<R> {
        Min::new()
    }
}

impl<R> Clone for Min<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Min<R> {}

impl<R> Clone for Max<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Max<R> {}

impl<R> Default for Min<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Default for Max<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Representation> fmt::Debug for Min<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Min<{}>", R::NAME)
    }
}

impl<R: Representation> fmt::Debug for Max<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Max<{}>", R::NAME)
    }
}

#[cfg(test)]
mod tests {
    use crate::order::{from_fn, Natural};
    use crate::traits::{Heap, MergeableHeap};
    use crate::{Leftist, Skew};

    fn sorted<H: Heap>(heap: &H) -> Vec<H::Item> {
        heap.sorted().collect()
    }

    #[test]
    fn test_single_and_of() {
        Leftist::MIN.natural(|factory| {
            assert_eq!(sorted(&factory.single(7)), vec![7]);
            assert_eq!(sorted(&factory.of([5, 3, 8, 1])), vec![1, 3, 5, 8]);
            assert!(factory.of::<0>([]).is_empty());
        });
    }

    #[test]
    fn test_from_iter_odd_and_even_counts() {
        Skew::MIN.natural(|factory| {
            for n in 0..40 {
                let heap = factory.from_iter((0..n).rev());
                assert_eq!(heap.len(), n as usize);
                assert_eq!(sorted(&heap), (0..n).collect::<Vec<_>>());
                heap.check_invariant().unwrap();
            }
        });
    }

    #[test]
    fn test_sorted_fast_paths() {
        Leftist::MIN.natural(|factory| {
            let ascending = factory.from_sorted_unchecked(vec![1, 3, 3, 6]);
            let descending = factory.from_reverse_sorted_unchecked(vec![6, 3, 3, 1]);
            for heap in [&ascending, &descending] {
                heap.check_invariant().unwrap();
                assert_eq!(sorted(heap), vec![1, 3, 3, 6]);
            }
        });
        Leftist::MAX.natural(|factory| {
            let heap = factory.from_sorted_unchecked(vec![9, 4, 2]);
            heap.check_invariant().unwrap();
            assert_eq!(heap.first(), Ok(&9));
        });
    }

    #[test]
    fn test_sorted_fast_path_misuse_is_detected() {
        Skew::MIN.natural(|factory| {
            let heap = factory.from_sorted_unchecked(vec![3, 1, 2]);
            assert!(heap.check_invariant().is_err());
        });
    }

    #[test]
    fn test_builder_repeated_finalize() {
        Skew::MAX.natural(|factory| {
            let mut builder = factory.builder();
            assert!(builder.is_empty());
            builder.extend(vec![2, 8, 5]);
            let first = builder.result();
            builder.push(11);
            let second = builder.result();

            assert_eq!(sorted(&first), vec![8, 5, 2]);
            assert_eq!(sorted(&second), vec![11, 8, 5, 2]);
            assert_eq!(builder.len(), 4);

            builder.clear();
            assert!(builder.finish().is_empty());
        });
    }

    #[test]
    fn test_max_reverses_min() {
        let min = Leftist::MIN.natural(|factory| sorted(&factory.of([2, 9, 4])));
        let max = Leftist::MIN.max().natural(|factory| sorted(&factory.of([2, 9, 4])));
        assert_eq!(min, vec![2, 4, 9]);
        assert_eq!(max, vec![9, 4, 2]);
        assert_eq!(
            Leftist::MAX.min().natural(|factory| sorted(&factory.of([2, 9, 4]))),
            min
        );
    }

    #[test]
    fn test_with_custom_order() {
        let by_last_digit = |a: &u32, b: &u32| (a % 10).cmp(&(b % 10));
        let result = Skew::MAX.with(from_fn(by_last_digit), |factory| {
            factory.of([21, 19, 35]).first().copied()
        });
        assert_eq!(result, Ok(19));
    }

    #[test]
    fn test_by_key_orders_on_key_only() {
        let keys = Leftist::MAX.by_key(Natural, |factory| {
            let heap = factory.of([(1, 'x'), (5, 'y'), (3, 'z')]);
            heap.sorted().map(|(k, _)| k).collect::<Vec<_>>()
        });
        assert_eq!(keys, vec![5, 3, 1]);

        let values = Skew::MIN.by_key(Natural, |factory| {
            let heap = factory.of([(2, "late"), (1, "early")]);
            heap.add((0, "first")).sorted().map(|(_, v)| v).collect::<Vec<_>>()
        });
        assert_eq!(values, vec!["first", "early", "late"]);
    }

    #[test]
    fn test_factory_clone_shares_brand() {
        Leftist::MIN.natural(|factory| {
            let copy = factory.clone();
            let merged = factory.single(3).merge(&copy.single(1));
            assert_eq!(sorted(&merged), vec![1, 3]);
        });
    }

    #[test]
    fn test_debug_output() {
        assert_eq!(format!("{:?}", Leftist::MIN), "Min<Leftist>");
        assert_eq!(format!("{:?}", Skew::MAX), "Max<Skew>");
        Leftist::MAX.natural(|factory| {
            assert_eq!(factory.single(1).len(), 1);
            assert_eq!(
                format!("{factory:?}"),
                "Factory { representation: \"Leftist\", order: Reverse(Natural) }"
            );
        });
    }
}
