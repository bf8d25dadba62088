//! Branded heap values
//!
//! [`BoundHeap`] is the one heap type of this crate. It pairs a tree of some
//! [`Representation`] with the ordering it was built under and the brand of the
//! factory that minted it. All three are type parameters, so two heaps only
//! share a type (and can only be merged) when they come from the same factory.
//!
//! Range queries exploit heap order to skip whole subtrees:
//!
//! - `take_until` / `take_to` stop at the first node that fails the bound, since
//!   every descendant fails it too, and rebuild the kept nodes with the
//!   representation's node rule. O(n) worst case, usually proportional to the
//!   output.
//! - `drop_until` / `drop_to` keep a whole subtree as soon as its root passes the
//!   bound; an excluded root's two pruned children are merged back together.
//!   The kept subtrees are merged pairwise, round after round, which makes this
//!   O(n log n) worst case.
//!
//! Both walks run on explicit stacks, so a heap built by the sorted-input fast
//! paths (a single spine of `n` nodes) is queried without deep recursion.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::brand::Brand;
use crate::order::Order;
use crate::representation::Representation;
use crate::traits::{Heap, HeapError, MergeableHeap};

/// Immutable heap minted by a [`Factory`](crate::Factory)
///
/// `'id` is the brand of the minting factory, `O` its ordering and `R` the node
/// representation. Cloning is O(1) and shares the whole tree.
pub struct BoundHeap<'id, E, O, R: Representation> {
    pub(crate) root: R::Tree<E>,
    order: Arc<O>,
    brand: Brand<'id>,
}

impl<'id, E, O, R: Representation> Clone for BoundHeap<'id, E, O, R> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            order: Arc::clone(&self.order),
            brand: self.brand,
        }
    }
}

impl<'id, E, O, R: Representation> BoundHeap<'id, E, O, R> {
    pub(crate) fn empty(order: O, brand: Brand<'id>) -> Self {
        Self {
            root: R::empty(),
            order: Arc::new(order),
            brand,
        }
    }

    /// Wraps a tree built from this heap's trees, keeping ordering and brand
    fn derive(&self, root: R::Tree<E>) -> Self {
        Self {
            root,
            order: Arc::clone(&self.order),
            brand: self.brand,
        }
    }

    /// The ordering this heap was built under
    pub fn order(&self) -> &O {
        &self.order
    }

    /// Returns an iterator over all elements in unspecified order
    ///
    /// The walk is a pre-order traversal driven by an explicit stack, O(n) total.
    pub fn iter(&self) -> Iter<'_, E, R> {
        let mut stack = SmallVec::new();
        stack.push(&self.root);
        Iter { stack }
    }
}

impl<'id, E: Clone, O: Order<E>, R: Representation> BoundHeap<'id, E, O, R> {
    /// Returns a heap holding every element of `self` plus all of `xs`
    ///
    /// `xs` is built into a heap bottom-up in O(k), then merged in.
    pub fn add_all<I: IntoIterator<Item = E>>(&self, xs: I) -> Self {
        let built = build_tree::<E, O, R, _>(self.order(), xs);
        self.derive(R::merge(self.order(), &self.root, &built))
    }
}

/// Builds a tree of singletons, see [`merge_pairwise`]. O(n) total.
fn build_tree<E, O, R, I>(order: &O, xs: I) -> R::Tree<E>
where
    E: Clone,
    O: Order<E>,
    R: Representation,
    I: IntoIterator<Item = E>,
{
    let singletons: Vec<R::Tree<E>> = xs
        .into_iter()
        .map(|x| R::node(x, R::empty(), R::empty()))
        .collect();
    let count = singletons.len();
    let (tree, rounds) = merge_pairwise::<E, O, R>(order, singletons);
    tracing::trace!(representation = R::NAME, count, rounds, "built heap from elements");
    tree
}

/// Merges trees neighbour by neighbour, round after round
///
/// Each round halves the number of trees, carrying an odd one over. Returns
/// the merged tree and the number of rounds it took.
fn merge_pairwise<E, O, R>(order: &O, mut layer: Vec<R::Tree<E>>) -> (R::Tree<E>, usize)
where
    E: Clone,
    O: Order<E>,
    R: Representation,
{
    let mut rounds = 0;
    while layer.len() > 1 {
        let mut next = Vec::with_capacity((layer.len() + 1) / 2);
        let mut trees = layer.into_iter();
        while let Some(a) = trees.next() {
            next.push(match trees.next() {
                Some(b) => R::merge(order, &a, &b),
                None => a,
            });
        }
        layer = next;
        rounds += 1;
    }
    (layer.pop().unwrap_or_else(R::empty), rounds)
}

/// Pending work of the post-order rebuild in [`take_while`]
enum Rebuild<'a, E, R: Representation> {
    Visit(&'a R::Tree<E>),
    Assemble(&'a E),
}

/// Keeps the nodes that pass `keep`, pruning at the first failing root
///
/// Kept nodes are rebuilt children first: both rebuilt children sit on top of
/// `built` when their parent is assembled.
fn take_while<E, R, F>(tree: &R::Tree<E>, keep: &F) -> R::Tree<E>
where
    E: Clone,
    R: Representation,
    F: Fn(&E) -> bool,
{
    let mut pending: Vec<Rebuild<'_, E, R>> = vec![Rebuild::Visit(tree)];
    let mut built: Vec<R::Tree<E>> = Vec::new();

    while let Some(step) = pending.pop() {
        match step {
            Rebuild::Visit(tree) => match R::view(tree) {
                Some((element, left, right)) if keep(element) => {
                    pending.push(Rebuild::Assemble(element));
                    pending.push(Rebuild::Visit(right));
                    pending.push(Rebuild::Visit(left));
                }
                _ => built.push(R::empty()),
            },
            Rebuild::Assemble(element) => {
                let right = built.pop().unwrap_or_else(R::empty);
                let left = built.pop().unwrap_or_else(R::empty);
                built.push(R::node(element.clone(), left, right));
            }
        }
    }
    built.pop().unwrap_or_else(R::empty)
}

/// Removes the nodes that fail `keep`, keeping whole subtrees whose root passes
fn drop_while<E, O, R, F>(order: &O, tree: &R::Tree<E>, keep: &F) -> R::Tree<E>
where
    E: Clone,
    O: Order<E>,
    R: Representation,
    F: Fn(&E) -> bool,
{
    let mut pending: SmallVec<[&R::Tree<E>; 32]> = SmallVec::new();
    let mut kept: Vec<R::Tree<E>> = Vec::new();
    pending.push(tree);

    while let Some(tree) = pending.pop() {
        match R::view(tree) {
            None => {}
            Some((element, _, _)) if keep(element) => kept.push(tree.clone()),
            Some((_, left, right)) => {
                pending.push(right);
                pending.push(left);
            }
        }
    }
    merge_pairwise::<E, O, R>(order, kept).0
}

impl<'id, E: Clone, O: Order<E>, R: Representation> Heap for BoundHeap<'id, E, O, R> {
    type Item = E;
    type Iter<'a> = Iter<'a, E, R> where Self: 'a;

    fn is_empty(&self) -> bool {
        R::view(&self.root).is_none()
    }

    fn len(&self) -> usize {
        R::size(&self.root)
    }

    fn iter(&self) -> Iter<'_, E, R> {
        BoundHeap::iter(self)
    }

    fn add(&self, x: E) -> Self {
        let single = R::node(x, R::empty(), R::empty());
        self.derive(R::merge(self.order(), &self.root, &single))
    }

    fn first(&self) -> Result<&E, HeapError> {
        self.first_option().ok_or(HeapError::Empty)
    }

    fn first_option(&self) -> Option<&E> {
        R::view(&self.root).map(|(element, _, _)| element)
    }

    fn rest(&self) -> Result<Self, HeapError> {
        self.first_view()
            .map(|(_, rest)| rest)
            .ok_or(HeapError::Unsupported { operation: "rest" })
    }

    fn first_view(&self) -> Option<(&E, Self)> {
        let (element, left, right) = R::view(&self.root)?;
        Some((element, self.derive(R::merge(self.order(), left, right))))
    }

    fn add_first_unchecked(&self, x: E) -> Self {
        self.derive(R::node(x, self.root.clone(), R::empty()))
    }

    fn take_until(&self, x: &E) -> Self {
        let order = self.order();
        self.derive(take_while::<E, R, _>(&self.root, &|e: &E| order.lt(e, x)))
    }

    fn take_to(&self, x: &E) -> Self {
        let order = self.order();
        self.derive(take_while::<E, R, _>(&self.root, &|e: &E| order.le(e, x)))
    }

    fn drop_until(&self, x: &E) -> Self {
        let order = self.order();
        self.derive(drop_while::<E, O, R, _>(order, &self.root, &|e: &E| {
            !order.lt(e, x)
        }))
    }

    fn drop_to(&self, x: &E) -> Self {
        let order = self.order();
        self.derive(drop_while::<E, O, R, _>(order, &self.root, &|e: &E| {
            order.lt(x, e)
        }))
    }

    fn check_invariant(&self) -> Result<(), HeapError>
    where
        E: fmt::Debug,
    {
        let order = self.order();
        let mut stack: SmallVec<[&R::Tree<E>; 32]> = SmallVec::new();
        stack.push(&self.root);

        while let Some(tree) = stack.pop() {
            let Some((element, left, right)) = R::view(tree) else {
                continue;
            };
            if let Err(message) = R::check_shape(tree) {
                return Err(violation::<R>(format!("at {element:?}: {message}")));
            }
            for child in [left, right] {
                if let Some((child_element, _, _)) = R::view(child) {
                    if order.lt(child_element, element) {
                        return Err(violation::<R>(format!(
                            "heap order: child {child_element:?} precedes parent {element:?}"
                        )));
                    }
                    stack.push(child);
                }
            }
        }
        Ok(())
    }
}

fn violation<R: Representation>(message: String) -> HeapError {
    tracing::debug!(representation = R::NAME, %message, "heap invariant violated");
    HeapError::InvariantViolation(message)
}

impl<'id, E: Clone, O: Order<E>, R: Representation> MergeableHeap for BoundHeap<'id, E, O, R> {
    fn merge(&self, other: &Self) -> Self {
        self.derive(R::merge(self.order(), &self.root, &other.root))
    }
}

impl<'id, E: fmt::Debug, O, R: Representation> fmt::Debug for BoundHeap<'id, E, O, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Heap", R::NAME)?;
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, 'id, E, O, R: Representation> IntoIterator for &'a BoundHeap<'id, E, O, R> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator over a heap's elements, see [`BoundHeap::iter`]
pub struct Iter<'a, E: 'a, R: Representation> {
    stack: SmallVec<[&'a R::Tree<E>; 32]>,
}

impl<'a, E: 'a, R: Representation> Iterator for Iter<'a, E, R> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        loop {
            let tree = self.stack.pop()?;
            if let Some((element, left, right)) = R::view(tree) {
                self.stack.push(right);
                self.stack.push(left);
                return Some(element);
            }
        }
    }
}

impl<'a, E: 'a, R: Representation> FusedIterator for Iter<'a, E, R> {}

impl<'a, E: 'a, R: Representation> Clone for Iter<'a, E, R> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::traits::{Heap, HeapError, MergeableHeap};
    use crate::{Leftist, Skew};

    fn sorted<H: Heap>(heap: &H) -> Vec<H::Item> {
        heap.sorted().collect()
    }

    #[test]
    fn test_empty_heap_errors() {
        Leftist::MIN.natural(|factory| {
            let heap = factory.single(1).rest().unwrap();
            assert!(heap.is_empty());
            assert!(!heap.non_empty());
            assert_eq!(heap.len(), 0);
            assert_eq!(heap.first(), Err(HeapError::Empty));
            assert_eq!(heap.first_option(), None);
            assert!(matches!(
                heap.rest(),
                Err(HeapError::Unsupported { operation: "rest" })
            ));
            assert!(heap.first_view().is_none());
            assert_eq!(heap.check_invariant(), Ok(()));
        });
    }

    #[test]
    fn test_iter_visits_every_element() {
        Skew::MIN.natural(|factory| {
            let heap = factory.of([4, 1, 4, 9, 2]);
            let mut seen: Vec<i32> = heap.iter().copied().collect();
            seen.sort_unstable();
            assert_eq!(seen, vec![1, 2, 4, 4, 9]);
            // pre-order starts at the root
            assert_eq!(heap.iter().next(), Some(&1));
            assert_eq!((&heap).into_iter().count(), 5);
        });
    }

    #[test]
    fn test_first_view_matches_first_and_rest() {
        Leftist::MAX.natural(|factory| {
            let heap = factory.of([3, 7, 5]);
            let (first, rest) = heap.first_view().unwrap();
            assert_eq!(first, &7);
            assert_eq!(heap.first(), Ok(&7));
            assert_eq!(
                rest.sorted().collect::<Vec<_>>(),
                heap.rest().unwrap().sorted().collect::<Vec<_>>()
            );
        });
    }

    #[test]
    fn test_add_first_unchecked_builds_spine() {
        Leftist::MIN.natural(|factory| {
            let heap = factory.single(10).add_first_unchecked(5).add_first_unchecked(1);
            assert_eq!(heap.first(), Ok(&1));
            assert_eq!(heap.len(), 3);
            heap.check_invariant().unwrap();
        });
    }

    #[test]
    fn test_add_first_unchecked_misuse_is_detected() {
        Skew::MIN.natural(|factory| {
            let heap = factory.single(1).add_first_unchecked(5);
            let err = heap.check_invariant().unwrap_err();
            let HeapError::InvariantViolation(message) = err else {
                panic!("unexpected error {err:?}");
            };
            assert!(message.contains("heap order"), "{message}");
        });
    }

    #[test]
    fn test_range_queries() {
        Leftist::MIN.natural(|factory| {
            let heap = factory.of([5, 3, 8, 1, 5]);

            assert_eq!(sorted(&heap.take_until(&5)), vec![1, 3]);
            assert_eq!(sorted(&heap.take_to(&5)), vec![1, 3, 5, 5]);
            assert_eq!(sorted(&heap.drop_until(&5)), vec![5, 5, 8]);
            assert_eq!(sorted(&heap.drop_to(&5)), vec![8]);

            assert!(heap.take_until(&1).is_empty());
            assert!(heap.drop_to(&8).is_empty());
            assert_eq!(heap.take_to(&100).len(), 5);
            assert_eq!(heap.drop_until(&0).len(), 5);
        });
    }

    #[test]
    fn test_range_queries_keep_invariants() {
        Skew::MAX.natural(|factory| {
            let heap = factory.from_iter((0..200).map(|i| (i * 37) % 101));
            for bound in [0, 13, 50, 100] {
                for part in [
                    heap.take_until(&bound),
                    heap.take_to(&bound),
                    heap.drop_until(&bound),
                    heap.drop_to(&bound),
                ] {
                    part.check_invariant().unwrap();
                }
                // max heap: "before" means larger
                assert!(heap.take_until(&bound).iter().all(|&e| e > bound));
                assert!(heap.drop_to(&bound).iter().all(|&e| e < bound));
            }
        });
    }

    fn range_queries_on_long_spine<R: crate::Representation>(companion: crate::Min<R>) {
        companion.natural(|factory| {
            let heap = factory.from_sorted_unchecked(0..300_000);

            let below = heap.take_until(&150_000);
            assert_eq!(below.len(), 150_000);
            assert_eq!(below.first(), Ok(&0));
            below.check_invariant().unwrap();

            assert_eq!(heap.take_to(&299_999).len(), 300_000);

            let above = heap.drop_until(&150_000);
            assert_eq!(above.len(), 150_000);
            assert_eq!(above.first(), Ok(&150_000));

            let after = heap.drop_to(&150_000);
            assert_eq!(after.len(), 149_999);
            assert_eq!(after.first(), Ok(&150_001));
        });
    }

    #[test]
    fn test_range_queries_on_sorted_build() {
        range_queries_on_long_spine(Leftist::MIN);
        range_queries_on_long_spine(Skew::MIN);
    }

    #[test]
    fn test_drop_until_merges_scattered_subtrees() {
        Leftist::MIN.natural(|factory| {
            // many small kept subtrees hang off excluded nodes
            let heap = factory.from_iter((0..5000).map(|i| (i * 7919) % 5003));
            let above = heap.drop_until(&2500);
            above.check_invariant().unwrap();
            assert_eq!(above.len(), (0..5000).filter(|i| (i * 7919) % 5003 >= 2500).count());
            assert!(above.iter().all(|&e| e >= 2500));
        });
    }

    #[test]
    fn test_iter_through_heap_trait() {
        fn elements<H: Heap>(heap: &H) -> Vec<H::Item> {
            heap.iter().cloned().collect()
        }

        Skew::MAX.natural(|factory| {
            let mut seen = elements(&factory.of([3, 9, 1, 9]));
            seen.sort_unstable();
            assert_eq!(seen, vec![1, 3, 9, 9]);
            assert!(elements(&factory.empty()).is_empty());
        });
    }

    #[test]
    fn test_add_all_and_merge() {
        Leftist::MIN.natural(|factory| {
            let heap = factory.of([9, 4]).add_all(vec![7, 1, 4]);
            assert_eq!(heap.sorted().collect::<Vec<_>>(), vec![1, 4, 4, 7, 9]);

            let merged = heap.merge(&factory.empty());
            assert_eq!(merged.len(), 5);
            let merged = factory.empty().merge(&heap);
            assert_eq!(merged.first(), Ok(&1));
        });
    }

    #[test]
    fn test_debug_format() {
        Leftist::MIN.natural(|factory| {
            assert_eq!(format!("{:?}", factory.single(3)), "LeftistHeap[3]");
            assert_eq!(format!("{:?}", factory.empty()), "LeftistHeap[]");
        });
        Skew::MIN.natural(|factory| {
            assert_eq!(format!("{:?}", factory.single("x")), "SkewHeap[\"x\"]");
        });
    }

    #[test]
    fn test_shared_across_threads() {
        Leftist::MIN.natural(|factory| {
            let heap = factory.from_iter(0..1000);
            std::thread::scope(|scope| {
                let handles: Vec<_> = (0..4)
                    .map(|t| {
                        let heap = &heap;
                        scope.spawn(move || heap.drop_until(&(t * 250)).len())
                    })
                    .collect();
                let sizes: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
                assert_eq!(sizes, vec![1000, 750, 500, 250]);
            });
        });
    }
}
