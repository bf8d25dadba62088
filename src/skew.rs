//! Skew heap representation
//!
//! A skew heap is the self-adjusting cousin of the leftist heap: a heap-ordered
//! binary tree with no shape rule and no per-node bookkeeping. Merging walks the
//! right spines exactly like a leftist merge, but every rebuilt node swaps its
//! children unconditionally.
//!
//! - O(log n) amortized: add, merge, rest, as long as old versions are not reused
//! - O(n): len (nothing is cached)
//!
//! The amortized bound does not survive persistence. Re-merging the same old
//! version over and over repeats its expensive merge each time; that is an
//! accepted property of this representation, not a defect.
//!
//! # References
//!
//! - Sleator, D.D. and Tarjan, R.E. (1986). "Self-Adjusting Heaps".
//!   SIAM Journal on Computing 15(1):52-69.

use std::mem;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::factory::{Max, Min};
use crate::heap::BoundHeap;
use crate::order::Order;
use crate::representation::{sealed, Representation};

/// Companion for the skew representation
///
/// # Example
///
/// ```rust
/// use persistent_heaps::{Heap, Skew};
///
/// let tail = Skew::MIN.natural(|factory| {
///     let heap = factory.of([5, 3, 8, 1]);
///     heap.drop_until(&5).sorted().collect::<Vec<_>>()
/// });
/// assert_eq!(tail, vec![5, 8]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Skew;

impl Skew {
    /// Factory-factory for min-oriented skew heaps
    pub const MIN: Min<Skew> = Min::new();
    /// Factory-factory for max-oriented skew heaps
    pub const MAX: Max<Skew> = Max::new();
}

/// Heap value backed by a skew tree
pub type SkewHeap<'id, E, O> = BoundHeap<'id, E, O, Skew>;

/// Skew tree: empty, or a shared node
pub enum SkewTree<E> {
    /// No elements
    Empty,
    /// Root node, possibly shared with other trees
    Node(Arc<SkewNode<E>>),
}

/// Interior node of a [`SkewTree`]
pub struct SkewNode<E> {
    element: E,
    left: SkewTree<E>,
    right: SkewTree<E>,
}

impl<E> Clone for SkewTree<E> {
    fn clone(&self) -> Self {
        match self {
            SkewTree::Empty => SkewTree::Empty,
            SkewTree::Node(node) => SkewTree::Node(Arc::clone(node)),
        }
    }
}

impl<E> SkewTree<E> {
    fn take_node(&mut self) -> Option<Arc<SkewNode<E>>> {
        match mem::replace(self, SkewTree::Empty) {
            SkewTree::Empty => None,
            SkewTree::Node(node) => Some(node),
        }
    }
}

impl<E> Drop for SkewNode<E> {
    fn drop(&mut self) {
        let mut pending: SmallVec<[Arc<SkewNode<E>>; 8]> = SmallVec::new();
        pending.extend(self.left.take_node());
        pending.extend(self.right.take_node());
        while let Some(node) = pending.pop() {
            if let Ok(mut node) = Arc::try_unwrap(node) {
                pending.extend(node.left.take_node());
                pending.extend(node.right.take_node());
            }
        }
    }
}

#[inline]
fn new_node<E>(element: E, left: SkewTree<E>, right: SkewTree<E>) -> SkewTree<E> {
    SkewTree::Node(Arc::new(SkewNode {
        element,
        left,
        right,
    }))
}

fn merge_trees<E: Clone, O: Order<E>>(order: &O, a: &SkewTree<E>, b: &SkewTree<E>) -> SkewTree<E> {
    match (a, b) {
        (SkewTree::Empty, _) => b.clone(),
        (_, SkewTree::Empty) => a.clone(),
        (SkewTree::Node(x), SkewTree::Node(y)) => {
            // The merged spine goes left, the old left child moves right.
            if order.le(&x.element, &y.element) {
                new_node(
                    x.element.clone(),
                    merge_trees(order, &x.right, b),
                    x.left.clone(),
                )
            } else {
                new_node(
                    y.element.clone(),
                    merge_trees(order, &y.right, a),
                    y.left.clone(),
                )
            }
        }
    }
}

impl sealed::Sealed for Skew {}

impl Representation for Skew {
    const NAME: &'static str = "Skew";

    type Tree<E> = SkewTree<E>;

    fn empty<E>() -> SkewTree<E> {
        SkewTree::Empty
    }

    fn node<E>(element: E, left: SkewTree<E>, right: SkewTree<E>) -> SkewTree<E> {
        new_node(element, left, right)
    }

    fn view<E>(tree: &SkewTree<E>) -> Option<(&E, &SkewTree<E>, &SkewTree<E>)> {
        match tree {
            SkewTree::Empty => None,
            SkewTree::Node(node) => Some((&node.element, &node.left, &node.right)),
        }
    }

    fn size<E>(tree: &SkewTree<E>) -> usize {
        let mut count = 0;
        let mut stack: SmallVec<[&SkewTree<E>; 32]> = SmallVec::new();
        stack.push(tree);
        while let Some(SkewTree::Node(node)) = stack.pop() {
            count += 1;
            if let SkewTree::Node(_) = node.right {
                stack.push(&node.right);
            }
            if let SkewTree::Node(_) = node.left {
                stack.push(&node.left);
            }
        }
        count
    }

    fn merge<E: Clone, O: Order<E>>(order: &O, a: &SkewTree<E>, b: &SkewTree<E>) -> SkewTree<E> {
        merge_trees(order, a, b)
    }
}
