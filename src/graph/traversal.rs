//! Breadth-first, depth-first and priority-first search.
//!
//! All three searches share one engine. Node discovery is sequential and
//! fully determined by the graph, the start node and the container; the
//! [`ExecutionModel`] only decides *where and when* the callbacks run. Every
//! callback invocation becomes one task, and the search returns the model's
//! results in submission order.
//!
//! Four callbacks are accepted:
//! - `node_before` / `node_after`: run for each node before / after its edges
//! - `edge_first`: the first time an edge is traversed
//! - `edge_second`: the second traversal of an undirected edge (from its
//!   other endpoint, or the second stored copy of a self-loop)
//!
//! Pass [`NoOp`] for any callback that is not needed; nothing is scheduled
//! for it. For directed graphs `edge_second` only accepts [`NoOp`]:
//!
//! ```compile_fail
//! use sylva::concurrency::Serial;
//! use sylva::graph::{breadth_first_search, DirectedGraph, EdgeVisit, NoOp};
//!
//! let g: DirectedGraph = DirectedGraph::new();
//! let second = |_: EdgeVisit<()>| ();
//! breadth_first_search(&g, false, 0, NoOp, NoOp, NoOp, second, Serial::new());
//! ```
//!
//! Callback closures need annotated parameter types (`|node: usize|`,
//! `|edge: EdgeVisit<W>|`).

use core::cmp::Ordering;
use std::sync::Arc;

use tracing::trace;

use crate::concurrency::ExecutionModel;
use crate::error::ExecutionResult;
use crate::graph::containers::{NodeContainer, NodePriorityQueue, NodeQueue, NodeStack};
use crate::graph::{Directedness, Edge, Network, Undirected};
use crate::storage::{PartitionCursor, PartitionedStorage};

/// The "no callback" marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOp;

/// One traversal of a stored edge, handed to edge callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeVisit<W> {
    /// The node whose partition stores the edge.
    pub host: usize,
    /// The edge's offset inside its host's partition.
    pub offset: usize,
    /// A copy of the stored edge.
    pub edge: Edge<W>,
}

impl<W> EdgeVisit<W> {
    /// The node the edge is stored at.
    #[inline]
    pub fn host_node(&self) -> usize {
        self.host
    }

    /// The node the edge leads to.
    #[inline]
    pub fn target_node(&self) -> usize {
        self.edge.target_node()
    }

    /// The edge weight.
    #[inline]
    pub fn weight(&self) -> &W {
        self.edge.weight()
    }
}

/// A node callback, or [`NoOp`].
pub trait NodeCallback<'env, R: Send + 'env> {
    /// Schedules `callback(node)` on `model`.
    fn dispatch<M>(callback: &Arc<Self>, model: &mut M, node: usize) -> ExecutionResult<()>
    where
        M: ExecutionModel<'env, R>;
}

/// A first-traversal edge callback, or [`NoOp`].
pub trait EdgeCallback<'env, R: Send + 'env, W> {
    /// Schedules `callback(visit())` on `model`; `visit` is only evaluated
    /// if something is scheduled.
    fn dispatch<M, V>(callback: &Arc<Self>, model: &mut M, visit: V) -> ExecutionResult<()>
    where
        M: ExecutionModel<'env, R>,
        V: FnOnce() -> EdgeVisit<W>;
}

/// A second-traversal edge callback for graphs with directedness `D`.
///
/// Closures implement it only for [`Undirected`]; [`NoOp`] implements it
/// for every directedness.
pub trait SecondEdgeCallback<'env, R: Send + 'env, W, D: Directedness> {
    /// Schedules `callback(visit())` on `model`.
    fn dispatch<M, V>(callback: &Arc<Self>, model: &mut M, visit: V) -> ExecutionResult<()>
    where
        M: ExecutionModel<'env, R>,
        V: FnOnce() -> EdgeVisit<W>;
}

impl<'env, R: Send + 'env> NodeCallback<'env, R> for NoOp {
    #[inline]
    fn dispatch<M>(_: &Arc<Self>, _: &mut M, _: usize) -> ExecutionResult<()>
    where
        M: ExecutionModel<'env, R>,
    {
        Ok(())
    }
}

impl<'env, R: Send + 'env, W> EdgeCallback<'env, R, W> for NoOp {
    #[inline]
    fn dispatch<M, V>(_: &Arc<Self>, _: &mut M, _: V) -> ExecutionResult<()>
    where
        M: ExecutionModel<'env, R>,
        V: FnOnce() -> EdgeVisit<W>,
    {
        Ok(())
    }
}

impl<'env, R: Send + 'env, W, D: Directedness> SecondEdgeCallback<'env, R, W, D> for NoOp {
    #[inline]
    fn dispatch<M, V>(_: &Arc<Self>, _: &mut M, _: V) -> ExecutionResult<()>
    where
        M: ExecutionModel<'env, R>,
        V: FnOnce() -> EdgeVisit<W>,
    {
        Ok(())
    }
}

impl<'env, R, F> NodeCallback<'env, R> for F
where
    R: Send + 'env,
    F: Fn(usize) -> R + Send + Sync + 'env,
{
    #[inline]
    fn dispatch<M>(callback: &Arc<Self>, model: &mut M, node: usize) -> ExecutionResult<()>
    where
        M: ExecutionModel<'env, R>,
    {
        let f = Arc::clone(callback);
        model.push(move || f(node))
    }
}

impl<'env, R, W, F> EdgeCallback<'env, R, W> for F
where
    R: Send + 'env,
    W: Send + 'env,
    F: Fn(EdgeVisit<W>) -> R + Send + Sync + 'env,
{
    #[inline]
    fn dispatch<M, V>(callback: &Arc<Self>, model: &mut M, visit: V) -> ExecutionResult<()>
    where
        M: ExecutionModel<'env, R>,
        V: FnOnce() -> EdgeVisit<W>,
    {
        let f = Arc::clone(callback);
        let visit = visit();
        model.push(move || f(visit))
    }
}

impl<'env, R, W, F> SecondEdgeCallback<'env, R, W, Undirected> for F
where
    R: Send + 'env,
    W: Send + 'env,
    F: Fn(EdgeVisit<W>) -> R + Send + Sync + 'env,
{
    #[inline]
    fn dispatch<M, V>(callback: &Arc<Self>, model: &mut M, visit: V) -> ExecutionResult<()>
    where
        M: ExecutionModel<'env, R>,
        V: FnOnce() -> EdgeVisit<W>,
    {
        <F as EdgeCallback<'env, R, W>>::dispatch(callback, model, visit)
    }
}

/// Walks `[it, end)`, handing each stored edge and its offset to `f`.
fn for_each_edge<'a, S, const REVERSED: bool>(
    mut it: PartitionCursor<'a, S::Handle, REVERSED>,
    end: PartitionCursor<'a, S::Handle, REVERSED>,
    mut f: impl FnMut(usize, &S::Value) -> ExecutionResult<()>,
) -> ExecutionResult<()>
where
    S: PartitionedStorage + 'a,
{
    while it != end {
        if let Some(handle) = it.get() {
            let edge = S::resolve(handle);
            f(it.position().offset, &*edge)?;
        }
        it += 1;
    }
    Ok(())
}

/// Mutable state of one search run.
struct Run<C> {
    discovered: Vec<bool>,
    processed: Vec<bool>,
    num_discovered: usize,
    pending: C,
}

impl<C: NodeContainer> Run<C> {
    fn discover(&mut self, node: usize) {
        if let Some(seen) = self.discovered.get_mut(node) {
            if !*seen {
                *seen = true;
                self.num_discovered += 1;
                self.pending.push(node);
            }
        }
    }

    /// Index of the first undiscovered node at or after `from`.
    fn next_undiscovered(&self, from: usize) -> Option<usize> {
        (from..self.discovered.len()).find(|&i| !self.discovered[i])
    }
}

#[allow(clippy::too_many_arguments)]
fn search<'env, G, C, R, NB, NA, EF, ES, M>(
    graph: &G,
    find_disconnected: bool,
    start: usize,
    pending: C,
    node_before: NB,
    node_after: NA,
    edge_first: EF,
    edge_second: ES,
    mut model: M,
) -> ExecutionResult<Vec<R>>
where
    G: Network,
    G::EdgeWeight: Clone + Send + 'env,
    C: NodeContainer,
    R: Send + 'env,
    NB: NodeCallback<'env, R>,
    NA: NodeCallback<'env, R>,
    EF: EdgeCallback<'env, R, G::EdgeWeight>,
    ES: SecondEdgeCallback<'env, R, G::EdgeWeight, G::Direction>,
    M: ExecutionModel<'env, R>,
{
    let order = graph.order();
    if start >= order {
        return model.get();
    }

    let (node_before, node_after) = (Arc::new(node_before), Arc::new(node_after));
    let (edge_first, edge_second) = (Arc::new(edge_first), Arc::new(edge_second));
    let mut run = Run {
        discovered: vec![false; order],
        processed: vec![false; order],
        num_discovered: 0,
        pending,
    };

    let mut restart = 0;
    let mut seed = start;
    loop {
        run.discover(seed);

        while let Some(node) = run.pending.pop() {
            NB::dispatch(&node_before, &mut model, node)?;

            // Alternates for self-loops so that their two stored copies
            // count as one first and one second traversal.
            let mut loop_matched = true;
            let step = |offset: usize, edge: &Edge<G::EdgeWeight>| -> ExecutionResult<()> {
                let target = edge.target_node();
                let visit = || EdgeVisit {
                    host: node,
                    offset,
                    edge: edge.clone(),
                };
                if <G::Direction as Directedness>::DIRECTED {
                    EF::dispatch(&edge_first, &mut model, visit)?;
                } else {
                    let is_loop = target == node;
                    if is_loop {
                        loop_matched = !loop_matched;
                    }
                    let processed = run.processed.get(target).copied().unwrap_or(false);
                    if processed || (is_loop && loop_matched) {
                        ES::dispatch(&edge_second, &mut model, visit)?;
                    } else {
                        EF::dispatch(&edge_first, &mut model, visit)?;
                    }
                }
                run.discover(target);
                Ok(())
            };

            if C::REVERSE_EDGES {
                for_each_edge::<G::Storage, true>(graph.crbegin_edges(node), graph.crend_edges(node), step)?;
            } else {
                for_each_edge::<G::Storage, false>(graph.cbegin_edges(node), graph.cend_edges(node), step)?;
            }

            NA::dispatch(&node_after, &mut model, node)?;
            run.processed[node] = true;
        }

        if !find_disconnected || run.num_discovered == order {
            break;
        }
        match run.next_undiscovered(restart) {
            Some(node) => {
                trace!(seed = node, "restarting search in a disconnected component");
                restart = node;
                seed = node;
            }
            None => break,
        }
    }

    model.get()
}

/// Breadth-first search from `start`.
///
/// Nodes are expanded in discovery order and their edges walked front to
/// back. With `find_disconnected`, the search restarts from the lowest
/// undiscovered node until every node has been reached. A `start` outside
/// the graph schedules nothing.
#[allow(clippy::too_many_arguments)]
pub fn breadth_first_search<'env, G, R, NB, NA, EF, ES, M>(
    graph: &G,
    find_disconnected: bool,
    start: usize,
    node_before: NB,
    node_after: NA,
    edge_first: EF,
    edge_second: ES,
    model: M,
) -> ExecutionResult<Vec<R>>
where
    G: Network,
    G::EdgeWeight: Clone + Send + 'env,
    R: Send + 'env,
    NB: NodeCallback<'env, R>,
    NA: NodeCallback<'env, R>,
    EF: EdgeCallback<'env, R, G::EdgeWeight>,
    ES: SecondEdgeCallback<'env, R, G::EdgeWeight, G::Direction>,
    M: ExecutionModel<'env, R>,
{
    search(
        graph,
        find_disconnected,
        start,
        NodeQueue::new(),
        node_before,
        node_after,
        edge_first,
        edge_second,
        model,
    )
}

/// Depth-first search from `start`.
///
/// The most recently discovered node is expanded next and edges are walked
/// back to front, so that neighbours are expanded in storage order.
#[allow(clippy::too_many_arguments)]
pub fn depth_first_search<'env, G, R, NB, NA, EF, ES, M>(
    graph: &G,
    find_disconnected: bool,
    start: usize,
    node_before: NB,
    node_after: NA,
    edge_first: EF,
    edge_second: ES,
    model: M,
) -> ExecutionResult<Vec<R>>
where
    G: Network,
    G::EdgeWeight: Clone + Send + 'env,
    R: Send + 'env,
    NB: NodeCallback<'env, R>,
    NA: NodeCallback<'env, R>,
    EF: EdgeCallback<'env, R, G::EdgeWeight>,
    ES: SecondEdgeCallback<'env, R, G::EdgeWeight, G::Direction>,
    M: ExecutionModel<'env, R>,
{
    search(
        graph,
        find_disconnected,
        start,
        NodeStack::new(),
        node_before,
        node_after,
        edge_first,
        edge_second,
        model,
    )
}

/// Priority-first search from `start`.
///
/// The pending node with the greatest weight is expanded next; nodes of
/// equal weight are expanded in discovery order. Use
/// [`priority_search_by`] for any other ordering.
#[allow(clippy::too_many_arguments)]
pub fn priority_search<'env, G, R, NB, NA, EF, ES, M>(
    graph: &G,
    find_disconnected: bool,
    start: usize,
    node_before: NB,
    node_after: NA,
    edge_first: EF,
    edge_second: ES,
    model: M,
) -> ExecutionResult<Vec<R>>
where
    G: Network,
    G::NodeWeight: PartialOrd,
    G::EdgeWeight: Clone + Send + 'env,
    R: Send + 'env,
    NB: NodeCallback<'env, R>,
    NA: NodeCallback<'env, R>,
    EF: EdgeCallback<'env, R, G::EdgeWeight>,
    ES: SecondEdgeCallback<'env, R, G::EdgeWeight, G::Direction>,
    M: ExecutionModel<'env, R>,
{
    priority_search_by(
        graph,
        find_disconnected,
        start,
        node_before,
        node_after,
        edge_first,
        edge_second,
        model,
        |a: &G::NodeWeight, b: &G::NodeWeight| a.partial_cmp(b).unwrap_or(Ordering::Equal),
    )
}

/// Priority-first search ordered by `compare` on node weights.
///
/// The pending node that compares greatest is expanded next, so
/// `|a, b| b.cmp(a)` expands the lightest node first. Ties are expanded in
/// discovery order.
#[allow(clippy::too_many_arguments)]
pub fn priority_search_by<'env, G, R, NB, NA, EF, ES, M, C>(
    graph: &G,
    find_disconnected: bool,
    start: usize,
    node_before: NB,
    node_after: NA,
    edge_first: EF,
    edge_second: ES,
    model: M,
    compare: C,
) -> ExecutionResult<Vec<R>>
where
    G: Network,
    G::EdgeWeight: Clone + Send + 'env,
    R: Send + 'env,
    NB: NodeCallback<'env, R>,
    NA: NodeCallback<'env, R>,
    EF: EdgeCallback<'env, R, G::EdgeWeight>,
    ES: SecondEdgeCallback<'env, R, G::EdgeWeight, G::Direction>,
    M: ExecutionModel<'env, R>,
    C: Fn(&G::NodeWeight, &G::NodeWeight) -> Ordering,
{
    // Only discovered, in-range nodes are ever queued.
    let by_weight = |a: usize, b: usize| match (graph.node_weight(a), graph.node_weight(b)) {
        (Some(a), Some(b)) => compare(a, b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    };
    search(
        graph,
        find_disconnected,
        start,
        NodePriorityQueue::new(by_weight),
        node_before,
        node_after,
        edge_first,
        edge_second,
        model,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrency::Serial;
    use crate::graph::{DirectedGraph, UndirectedGraph};

    fn cycle() -> UndirectedGraph {
        let mut g = UndirectedGraph::new();
        for _ in 0..4 {
            g.add_node(());
        }
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
            g.add_edge(a, b, ()).unwrap();
        }
        g
    }

    #[derive(Debug, PartialEq)]
    enum Event {
        Node(usize),
        First(usize, usize),
        Second(usize, usize),
    }

    #[test]
    fn bfs_on_a_cycle_classifies_every_edge_copy() {
        let events = breadth_first_search(
            &cycle(),
            false,
            0,
            |n: usize| Event::Node(n),
            NoOp,
            |e: EdgeVisit<()>| Event::First(e.host_node(), e.target_node()),
            |e: EdgeVisit<()>| Event::Second(e.host_node(), e.target_node()),
            Serial::new(),
        )
        .unwrap();

        let nodes: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                Event::Node(n) => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(nodes, vec![0, 1, 3, 2]);
        assert_eq!(events.iter().filter(|e| matches!(e, Event::First(..))).count(), 4);
        assert_eq!(events.iter().filter(|e| matches!(e, Event::Second(..))).count(), 4);
        assert_eq!(events[1], Event::First(0, 1));
    }

    #[test]
    fn self_loop_copies_alternate() {
        let mut g = UndirectedGraph::new();
        g.add_node(());
        g.add_edge(0, 0, ()).unwrap();
        g.add_edge(0, 0, ()).unwrap();

        let kinds = depth_first_search(
            &g,
            false,
            0,
            NoOp,
            NoOp,
            |_: EdgeVisit<()>| 'f',
            |_: EdgeVisit<()>| 's',
            Serial::new(),
        )
        .unwrap();
        assert_eq!(kinds, vec!['f', 's', 'f', 's']);
    }

    #[test]
    fn out_of_range_start_schedules_nothing() {
        let results = breadth_first_search(
            &cycle(),
            true,
            9,
            |n: usize| n,
            NoOp,
            NoOp,
            NoOp,
            Serial::new(),
        )
        .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn directed_searches_only_use_first_traversals() {
        let mut g = DirectedGraph::new();
        for _ in 0..3 {
            g.add_node(());
        }
        g.add_edge(0, 1, ()).unwrap();
        g.add_edge(1, 0, ()).unwrap();
        g.add_edge(1, 2, ()).unwrap();

        let edges = breadth_first_search(
            &g,
            false,
            0,
            NoOp,
            NoOp,
            |e: EdgeVisit<()>| (e.host_node(), e.target_node()),
            NoOp,
            Serial::new(),
        )
        .unwrap();
        assert_eq!(edges, vec![(0, 1), (1, 0), (1, 2)]);
    }
}
