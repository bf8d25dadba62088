//! Persistent Mergeable Heaps for Rust
//!
//! This crate provides immutable priority queues whose every operation returns a
//! new heap and leaves the old one intact, sharing structure between versions.
//!
//! # Features
//!
//! - **Leftist Heap**: O(log n) worst-case add, merge and rest; O(1) len
//! - **Skew Heap**: O(log n) amortized add, merge and rest while versions are
//!   not reused; no per-node bookkeeping
//! - **Bulk builds**: O(n) from arbitrary input, O(n) from pre-sorted input
//! - **Range queries**: `take_until`, `take_to`, `drop_until`, `drop_to`
//! - **Branded factories**: merging heaps built with different orderings,
//!   different representations or simply different factory instances is a
//!   compile error
//!
//! # Factories
//!
//! Heaps are minted by a [`Factory`], which binds one [`Order`] to one
//! representation. Factories are obtained from the factory-factories of each
//! representation companion ([`Leftist::MIN`], [`Leftist::MAX`], [`Skew::MIN`],
//! [`Skew::MAX`]) and live for the duration of a closure. See the
//! [`factory`] module for the branding rules.
//!
//! # Example
//!
//! ```rust
//! use persistent_heaps::{Heap, Leftist, MergeableHeap};
//!
//! Leftist::MIN.natural(|factory| {
//!     let heap = factory.of([5, 3, 8, 1]);
//!     assert_eq!(heap.first(), Ok(&1));
//!     assert_eq!(heap.rest().unwrap().sorted().collect::<Vec<_>>(), vec![3, 5, 8]);
//!     assert_eq!(heap.take_to(&5).sorted().collect::<Vec<_>>(), vec![1, 3, 5]);
//!     assert_eq!(heap.drop_until(&5).sorted().collect::<Vec<_>>(), vec![5, 8]);
//!
//!     let merged = factory.of([5, 7]).merge(&factory.of([4, 6]));
//!     assert_eq!(merged.sorted().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
//! });
//! ```

pub mod brand;
pub mod factory;
pub mod heap;
pub mod leftist;
pub mod order;
pub mod representation;
pub mod skew;
pub mod traits;

// Re-export the main types for convenience
pub use brand::Brand;
pub use factory::{Builder, Factory, Max, Min};
pub use heap::{BoundHeap, Iter};
pub use leftist::{Leftist, LeftistHeap};
pub use order::{ByKey, Natural, Order, Reverse};
pub use representation::Representation;
pub use skew::{Skew, SkewHeap};
pub use traits::{Heap, HeapError, MergeableHeap, Sorted};
