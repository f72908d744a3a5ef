//! # `sylva` - Partitioned Storage and Graph Traversal
//!
//! A single logical arena split into an ordered collection of partitions, used
//! as the adjacency storage for per-node edge lists, plus breadth-first,
//! depth-first and priority-first traversals that dispatch their callbacks
//! through a pluggable execution model.
//!
//! ## Architecture
//!
//! The crate is layered, leaves first:
//!
//! 1. **Storage** ([`storage`]):
//!    - [`PartitionedVec`]: one flat buffer plus a [`Boundaries`] sequence of
//!      cumulative partition ends
//!    - [`BucketedVec`]: one `Vec` per partition
//!    - [`PartitionCursor`]: random-access cursors tagged with their partition
//!    - ownership policies: values held directly ([`Independent`]) or through
//!      de-duplicated shared handles ([`Pooled`])
//!
//! 2. **Execution models** ([`concurrency`]):
//!    - [`Serial`], [`Asynchronous`], [`ThreadPool`] and, with the `parallel`
//!      feature, `RayonModel`
//!    - results always come back in submission order
//!
//! 3. **Graphs** ([`graph`]):
//!    - [`Graph`]: a façade storing node `i`'s edges in partition `i`
//!    - [`breadth_first_search`], [`depth_first_search`], [`priority_search`], [`priority_search_by`]
//!
//! ## Policies
//!
//! Every axis of variation is a type parameter, resolved at compile time:
//!
//! | Axis | Choices |
//! |---|---|
//! | backend | [`PartitionedVec`], [`BucketedVec`] |
//! | ownership | [`Independent`], [`Pooled`] |
//! | range checking | [`Strict`] (errors), [`Lenient`] (silent no-op) |
//! | directedness | [`Directed`], [`Undirected`] |
//! | callback | a closure, or [`NoOp`] |
//!
//! ## Example
//!
//! ```rust
//! use sylva::{breadth_first_search, NoOp, Serial, UndirectedGraph};
//!
//! let mut g: UndirectedGraph = UndirectedGraph::new();
//! for _ in 0..4 {
//!     g.add_node(());
//! }
//! for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
//!     g.add_edge(a, b, ()).unwrap();
//! }
//!
//! let order = breadth_first_search(
//!     &g,
//!     false,
//!     0,
//!     |node: usize| node,
//!     NoOp,
//!     NoOp,
//!     NoOp,
//!     Serial::new(),
//! )
//! .unwrap();
//! assert_eq!(order, vec![0, 1, 3, 2]);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod concurrency;
pub mod error;
pub mod graph;
pub mod storage;

pub use concurrency::{Asynchronous, ExecutionModel, Launch, Pipeline, PoolConfig, PoolState, Serial, ThreadPool};
#[cfg(feature = "parallel")]
pub use concurrency::RayonModel;
pub use error::{ConfigError, ExecutionError, ExecutionResult, StorageError, StorageResult};
pub use graph::{
    breadth_first_search, depth_first_search, priority_search, priority_search_by, Directed, DirectedGraph, Directedness, Edge,
    EdgeVisit, Graph, Network, NoOp, Undirected, UndirectedGraph,
};
pub use storage::{
    Boundaries, BucketedVec, DataPool, Independent, Lenient, PartitionCursor, PartitionPosition, PartitionedStorage,
    PartitionedVec, Pooled, SharedHandle, Strict, NPOS,
};

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // Policy markers are ZSTs.
    assert!(mem::size_of::<NoOp>() == 0);
    assert!(mem::size_of::<Directed>() == 0);
    assert!(mem::size_of::<Undirected>() == 0);
    assert!(mem::size_of::<Strict>() == 0);
    assert!(mem::size_of::<Independent>() == 0);

    // Unweighted edges are a bare target index.
    assert!(mem::size_of::<Edge>() == mem::size_of::<usize>());
};
