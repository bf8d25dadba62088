//! Leftist heap representation
//!
//! A leftist heap is a heap-ordered binary tree where every node satisfies the
//! shape rule `size(left) >= size(right)`. The rule keeps the right spine short:
//! a tree of `n` elements has a right spine of at most `log₂(n + 1)` nodes.
//!
//! - O(log n) worst-case: add, merge, rest
//! - O(1): first, len (sizes are cached per node)
//!
//! # Merge
//!
//! Merging two trees keeps the smaller root, keeps its left child and replaces
//! its right child by the merge of that right child with the other tree. The
//! recursion only walks right spines. Each rebuilt node swaps its children when
//! the right one grew larger than the left.
//!
//! # References
//!
//! - Crane, C.A. (1972). "Linear Lists and Priority Queues as Balanced Binary
//!   Trees". Stanford University.
//! - Okasaki, C. (1998). "Purely Functional Data Structures". Cambridge University Press.

use std::mem;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::factory::{Max, Min};
use crate::heap::BoundHeap;
use crate::order::Order;
use crate::representation::{sealed, Representation};

/// Companion for the leftist representation
///
/// # Example
///
/// ```rust
/// use persistent_heaps::{Heap, Leftist};
///
/// let top = Leftist::MIN.natural(|factory| {
///     let heap = factory.of([5, 3, 8, 1]);
///     heap.take_to(&5).sorted().collect::<Vec<_>>()
/// });
/// assert_eq!(top, vec![1, 3, 5]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Leftist;

impl Leftist {
    /// Factory-factory for min-oriented leftist heaps
    pub const MIN: Min<Leftist> = Min::new();
    /// Factory-factory for max-oriented leftist heaps
    pub const MAX: Max<Leftist> = Max::new();
}

/// Heap value backed by a leftist tree
pub type LeftistHeap<'id, E, O> = BoundHeap<'id, E, O, Leftist>;

/// Leftist tree: empty, or a shared node
pub enum LeftistTree<E> {
    /// No elements
    Empty,
    /// Root node, possibly shared with other trees
    Node(Arc<LeftistNode<E>>),
}

/// Interior node of a [`LeftistTree`]
pub struct LeftistNode<E> {
    size: usize,
    element: E,
    left: LeftistTree<E>,
    right: LeftistTree<E>,
}

impl<E> Clone for LeftistTree<E> {
    fn clone(&self) -> Self {
        match self {
            LeftistTree::Empty => LeftistTree::Empty,
            LeftistTree::Node(node) => LeftistTree::Node(Arc::clone(node)),
        }
    }
}

impl<E> LeftistTree<E> {
    #[inline]
    fn size(&self) -> usize {
        match self {
            LeftistTree::Empty => 0,
            LeftistTree::Node(node) => node.size,
        }
    }

    fn take_node(&mut self) -> Option<Arc<LeftistNode<E>>> {
        match mem::replace(self, LeftistTree::Empty) {
            LeftistTree::Empty => None,
            LeftistTree::Node(node) => Some(node),
        }
    }
}

impl<E> Drop for LeftistNode<E> {
    // Unlinks uniquely owned descendants one at a time so a long left spine
    // (what the sorted-input builders produce) does not recurse per node.
    fn drop(&mut self) {
        let mut pending: SmallVec<[Arc<LeftistNode<E>>; 8]> = SmallVec::new();
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

/// Builds a node, putting the larger subtree on the left
fn make_node<E>(element: E, a: LeftistTree<E>, b: LeftistTree<E>) -> LeftistTree<E> {
    let size = a.size() + b.size() + 1;
    let (left, right) = if a.size() >= b.size() { (a, b) } else { (b, a) };
    LeftistTree::Node(Arc::new(LeftistNode {
        size,
        element,
        left,
        right,
    }))
}

fn merge_trees<E: Clone, O: Order<E>>(
    order: &O,
    a: &LeftistTree<E>,
    b: &LeftistTree<E>,
) -> LeftistTree<E> {
    match (a, b) {
        (LeftistTree::Empty, _) => b.clone(),
        (_, LeftistTree::Empty) => a.clone(),
        (LeftistTree::Node(x), LeftistTree::Node(y)) => {
            if order.le(&x.element, &y.element) {
                make_node(
                    x.element.clone(),
                    x.left.clone(),
                    merge_trees(order, &x.right, b),
                )
            } else {
                make_node(
                    y.element.clone(),
                    y.left.clone(),
                    merge_trees(order, &y.right, a),
                )
            }
        }
    }
}

impl sealed::Sealed for Leftist {}

impl Representation for Leftist {
    const NAME: &'static str = "Leftist";

    type Tree<E> = LeftistTree<E>;

    fn empty<E>() -> LeftistTree<E> {
        LeftistTree::Empty
    }

    fn node<E>(element: E, left: LeftistTree<E>, right: LeftistTree<E>) -> LeftistTree<E> {
        make_node(element, left, right)
    }

    fn view<E>(tree: &LeftistTree<E>) -> Option<(&E, &LeftistTree<E>, &LeftistTree<E>)> {
        match tree {
            LeftistTree::Empty => None,
            LeftistTree::Node(node) => Some((&node.element, &node.left, &node.right)),
        }
    }

    fn size<E>(tree: &LeftistTree<E>) -> usize {
        tree.size()
    }

    fn merge<E: Clone, O: Order<E>>(
        order: &O,
        a: &LeftistTree<E>,
        b: &LeftistTree<E>,
    ) -> LeftistTree<E> {
        merge_trees(order, a, b)
    }

    fn check_shape<E>(tree: &LeftistTree<E>) -> Result<(), String> {
        let LeftistTree::Node(node) = tree else {
            return Ok(());
        };
        let (left, right) = (node.left.size(), node.right.size());
        if node.size != left + right + 1 {
            return Err(format!(
                "cached size {} does not match 1 + {} + {}",
                node.size, left, right
            ));
        }
        if left < right {
            return Err(format!(
                "leftist shape: left subtree has {left} elements, right has {right}"
            ));
        }
        Ok(())
    }
}
