//! Graphs over partitioned edge storage, and traversals.
//!
//! A [`Graph`] stores one partition per node: partition `i` holds the edges
//! leaving node `i`. Undirected edges are stored once at each endpoint, so a
//! self-loop appears twice in its node's partition.
//!
//! The storage backend is a type parameter; both [`PartitionedVec`] (the
//! default) and [`BucketedVec`](crate::storage::BucketedVec) work.

pub mod containers;
pub mod traversal;

use core::fmt;
use core::marker::PhantomData;

use crate::error::{StorageError, StorageResult};
use crate::storage::{ForwardCursor, PartitionRange, PartitionedStorage, PartitionedVec, ReverseCursor};

pub use containers::{NodeContainer, NodePriorityQueue, NodeQueue, NodeStack};
pub use traversal::{
    breadth_first_search, depth_first_search, priority_search, priority_search_by, EdgeCallback, EdgeVisit,
    NodeCallback, NoOp, SecondEdgeCallback,
};

/// Marker trait for edge directionality.
pub trait Directedness: Send + Sync + 'static {
    /// Whether edges are one-way.
    const DIRECTED: bool;
}

/// Edges run from their host node to their target only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directed;

/// Edges connect both endpoints and are stored at each of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Undirected;

impl Directedness for Directed {
    const DIRECTED: bool = true;
}

impl Directedness for Undirected {
    const DIRECTED: bool = false;
}

/// A stored edge: the node it leads to plus an optional weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge<W = ()> {
    target: usize,
    weight: W,
}

impl<W> Edge<W> {
    /// Creates an edge to `target`.
    pub const fn new(target: usize, weight: W) -> Self {
        Self { target, weight }
    }

    /// The node this edge leads to.
    #[inline]
    pub fn target_node(&self) -> usize {
        self.target
    }

    /// The edge weight.
    #[inline]
    pub fn weight(&self) -> &W {
        &self.weight
    }
}

/// What the traversal engine needs from a graph.
pub trait Network {
    /// Directionality marker.
    type Direction: Directedness;
    /// Per-node weight.
    type NodeWeight;
    /// Per-edge weight.
    type EdgeWeight;
    /// Edge storage, one partition per node.
    type Storage: PartitionedStorage<Value = Edge<Self::EdgeWeight>>;

    /// Number of nodes.
    fn order(&self) -> usize;

    /// The edge storage.
    fn storage(&self) -> &Self::Storage;

    /// The weight of node `i`.
    fn node_weight(&self, i: usize) -> Option<&Self::NodeWeight>;

    /// Forward cursor at the first edge of node `i`.
    fn cbegin_edges(&self, i: usize) -> ForwardCursor<'_, <Self::Storage as PartitionedStorage>::Handle> {
        self.storage().begin_partition(i)
    }

    /// Forward cursor past the last edge of node `i`.
    fn cend_edges(&self, i: usize) -> ForwardCursor<'_, <Self::Storage as PartitionedStorage>::Handle> {
        self.storage().end_partition(i)
    }

    /// Reverse cursor at the last edge of node `i`.
    fn crbegin_edges(&self, i: usize) -> ReverseCursor<'_, <Self::Storage as PartitionedStorage>::Handle> {
        self.storage().rbegin_partition(i)
    }

    /// Reverse cursor before the first edge of node `i`.
    fn crend_edges(&self, i: usize) -> ReverseCursor<'_, <Self::Storage as PartitionedStorage>::Handle> {
        self.storage().rend_partition(i)
    }
}

/// A graph whose adjacency lists live in a partitioned storage.
pub struct Graph<D, NW = (), EW = (), S = PartitionedVec<Edge<EW>>> {
    edges: S,
    node_weights: Vec<NW>,
    _direction: PhantomData<(D, EW)>,
}

/// An undirected graph with the default storage.
pub type UndirectedGraph<NW = (), EW = ()> = Graph<Undirected, NW, EW>;
/// A directed graph with the default storage.
pub type DirectedGraph<NW = (), EW = ()> = Graph<Directed, NW, EW>;

impl<D, NW, EW, S> Graph<D, NW, EW, S>
where
    D: Directedness,
    S: PartitionedStorage<Value = Edge<EW>> + Default,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::with_storage(S::default())
    }
}

impl<D, NW, EW, S> Graph<D, NW, EW, S>
where
    D: Directedness,
    S: PartitionedStorage<Value = Edge<EW>>,
{
    /// Creates a graph on top of `storage`, which must hold no partitions.
    pub fn with_storage(mut storage: S) -> Self {
        storage.clear();
        Self {
            edges: storage,
            node_weights: Vec::new(),
            _direction: PhantomData,
        }
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, weight: NW) -> usize {
        self.edges.add_slot();
        self.node_weights.push(weight);
        self.node_weights.len() - 1
    }

    /// Adds an edge from `from` to `to`.
    ///
    /// For undirected graphs the edge is stored at both endpoints.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: EW) -> StorageResult<()>
    where
        EW: Clone,
    {
        let order = self.order();
        for index in [from, to] {
            if index >= order {
                return Err(crate::storage::partition_error("add_edge", index, order));
            }
        }
        if D::DIRECTED {
            self.edges.push_back_to_partition(from, Edge::new(to, weight))?;
        } else {
            self.edges
                .push_back_to_partition(from, Edge::new(to, weight.clone()))?;
            self.edges.push_back_to_partition(to, Edge::new(from, weight))?;
        }
        Ok(())
    }

    /// Number of nodes.
    #[inline]
    pub fn order(&self) -> usize {
        self.node_weights.len()
    }

    /// Number of edges; an undirected edge counts once.
    pub fn size(&self) -> usize {
        if D::DIRECTED {
            self.edges.len()
        } else {
            self.edges.len() / 2
        }
    }

    /// The weight of node `i`.
    pub fn node_weight(&self, i: usize) -> Option<&NW> {
        self.node_weights.get(i)
    }

    /// Replaces the weight of node `i`.
    pub fn set_node_weight(&mut self, i: usize, weight: NW) -> StorageResult<()> {
        let order = self.order();
        let slot = self
            .node_weights
            .get_mut(i)
            .ok_or_else(|| StorageError::PartitionOutOfRange {
                method: "set_node_weight",
                index: i,
                partitions: order,
            })?;
        *slot = weight;
        Ok(())
    }

    /// The stored edges of node `i`.
    pub fn edges(&self, i: usize) -> PartitionRange<'_, S::Handle, false> {
        self.edges.partition(i)
    }

    /// Targets of the edges of node `i`, in storage order.
    pub fn neighbours(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges(i).map(|h| S::resolve(h).target_node())
    }

    /// The edge storage.
    pub fn storage(&self) -> &S {
        &self.edges
    }
}

impl<D, NW, EW, S> Network for Graph<D, NW, EW, S>
where
    D: Directedness,
    S: PartitionedStorage<Value = Edge<EW>>,
{
    type Direction = D;
    type NodeWeight = NW;
    type EdgeWeight = EW;
    type Storage = S;

    fn order(&self) -> usize {
        self.order()
    }

    fn storage(&self) -> &S {
        &self.edges
    }

    fn node_weight(&self, i: usize) -> Option<&NW> {
        self.node_weights.get(i)
    }
}

impl<D, NW, EW, S> Default for Graph<D, NW, EW, S>
where
    D: Directedness,
    S: PartitionedStorage<Value = Edge<EW>> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D, NW: Clone, EW, S: Clone> Clone for Graph<D, NW, EW, S> {
    fn clone(&self) -> Self {
        Self {
            edges: self.edges.clone(),
            node_weights: self.node_weights.clone(),
            _direction: PhantomData,
        }
    }
}

impl<D, NW: fmt::Debug, EW, S: fmt::Debug> fmt::Debug for Graph<D, NW, EW, S>
where
    D: Directedness,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("directed", &D::DIRECTED)
            .field("node_weights", &self.node_weights)
            .field("edges", &self.edges)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::BucketedVec;

    #[test]
    fn undirected_edges_are_stored_at_both_ends() {
        let mut g: UndirectedGraph = Graph::new();
        for _ in 0..3 {
            g.add_node(());
        }
        g.add_edge(0, 1, ()).unwrap();
        g.add_edge(2, 2, ()).unwrap();

        assert_eq!(g.size(), 2);
        assert_eq!(g.neighbours(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(g.neighbours(1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(g.neighbours(2).collect::<Vec<_>>(), vec![2, 2]);
    }

    #[test]
    fn directed_edges_are_stored_once() {
        let mut g: Graph<Directed, (), u32, BucketedVec<Edge<u32>>> = Graph::new();
        g.add_node(());
        g.add_node(());
        g.add_edge(0, 1, 7).unwrap();

        assert_eq!(g.size(), 1);
        assert_eq!(g.edges(1).count(), 0);
        let first = g.cbegin_edges(0);
        assert_eq!(first.get().map(|e| *e.weight()), Some(7));
        assert_eq!(g.cend_edges(0) - first, 1);
    }

    #[test]
    fn edges_to_missing_nodes_are_rejected() {
        let mut g: DirectedGraph = Graph::new();
        g.add_node(());
        assert!(matches!(
            g.add_edge(0, 4, ()),
            Err(StorageError::PartitionOutOfRange { index: 4, .. })
        ));
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn node_weights_can_be_replaced() {
        let mut g: Graph<Undirected, &str> = Graph::new();
        let a = g.add_node("a");
        g.set_node_weight(a, "b").unwrap();
        assert_eq!(g.node_weight(a), Some(&"b"));
        assert!(g.set_node_weight(3, "c").is_err());
    }
}
