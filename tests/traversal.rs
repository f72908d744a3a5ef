//! Traversal order, edge classification and execution-model independence.

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use proptest::prelude::*;
use sylva::concurrency::{Asynchronous, Launch, ThreadPool};
use sylva::graph::{
    breadth_first_search, depth_first_search, priority_search, priority_search_by, DirectedGraph, Edge, EdgeVisit, Graph,
    NoOp, Undirected, UndirectedGraph,
};
use sylva::storage::BucketedVec;
use sylva::{ExecutionError, ExecutionModel, Serial};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Before(usize),
    After(usize),
    First(usize, usize),
    Second(usize, usize),
}

fn undirected(order: usize, edges: &[(usize, usize)]) -> UndirectedGraph {
    let mut g = UndirectedGraph::new();
    for _ in 0..order {
        g.add_node(());
    }
    for &(a, b) in edges {
        g.add_edge(a, b, ()).unwrap();
    }
    g
}

fn record_bfs<M>(g: &UndirectedGraph, start: usize, model: M) -> Vec<Event>
where
    M: ExecutionModel<'static, Event>,
{
    breadth_first_search(
        g,
        false,
        start,
        |n: usize| Event::Before(n),
        |n: usize| Event::After(n),
        |e: EdgeVisit<()>| Event::First(e.host_node(), e.target_node()),
        |e: EdgeVisit<()>| Event::Second(e.host_node(), e.target_node()),
        model,
    )
    .unwrap()
}

fn visited(events: &[Event]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match *e {
            Event::Before(n) => Some(n),
            _ => None,
        })
        .collect()
}

#[test]
fn bfs_on_a_four_cycle() {
    let g = undirected(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
    let events = record_bfs(&g, 0, Serial::new());

    assert_eq!(visited(&events), vec![0, 1, 3, 2]);
    let firsts = events.iter().filter(|e| matches!(e, Event::First(..))).count();
    let seconds = events.iter().filter(|e| matches!(e, Event::Second(..))).count();
    assert_eq!((firsts, seconds), (4, 4));

    // Before and after callbacks bracket each node's edges.
    assert_eq!(
        &events[..4],
        &[Event::Before(0), Event::First(0, 1), Event::First(0, 3), Event::After(0)]
    );
}

#[test]
fn dfs_expands_the_last_discovered_node_first() {
    let mut g = DirectedGraph::new();
    for _ in 0..4 {
        g.add_node(());
    }
    for (a, b) in [(0, 1), (0, 2), (1, 3), (2, 3)] {
        g.add_edge(a, b, ()).unwrap();
    }

    let order = depth_first_search(&g, false, 0, |n: usize| n, NoOp, NoOp, NoOp, Serial::new()).unwrap();
    assert_eq!(order, vec![0, 1, 3, 2]);
}

#[test]
fn dfs_walks_edges_back_to_front() {
    let g = undirected(3, &[(0, 1), (0, 2)]);
    let edges = depth_first_search(
        &g,
        false,
        0,
        NoOp,
        NoOp,
        |e: EdgeVisit<()>| (e.host_node(), e.offset),
        NoOp,
        Serial::new(),
    )
    .unwrap();
    assert_eq!(edges, vec![(0, 1), (0, 0)]);
}

#[test]
fn disconnected_pieces_are_found_on_request() {
    let g = undirected(5, &[(3, 4), (1, 2)]);
    let run = |find_disconnected| {
        breadth_first_search(&g, find_disconnected, 3, |n: usize| n, NoOp, NoOp, NoOp, Serial::new())
            .unwrap()
    };
    assert_eq!(run(false), vec![3, 4]);
    assert_eq!(run(true), vec![3, 4, 0, 1, 2]);
}

#[test]
fn priority_search_expands_heaviest_pending_node() {
    let mut g: UndirectedGraph<u32> = UndirectedGraph::new();
    for w in [0, 5, 9, 1, 7] {
        g.add_node(w);
    }
    for leaf in 1..5 {
        g.add_edge(0, leaf, ()).unwrap();
    }
    let order = priority_search(&g, false, 0, |n: usize| n, NoOp, NoOp, NoOp, Serial::new()).unwrap();
    assert_eq!(order, vec![0, 2, 4, 1, 3]);
}

#[test]
fn a_reversed_comparator_expands_the_lightest_node_first() {
    let mut g: UndirectedGraph<u32> = UndirectedGraph::new();
    for w in [0, 5, 1, 9, 1, 7] {
        g.add_node(w);
    }
    for leaf in 1..6 {
        g.add_edge(0, leaf, ()).unwrap();
    }
    let order = priority_search_by(
        &g,
        false,
        0,
        |n: usize| n,
        NoOp,
        NoOp,
        NoOp,
        Serial::new(),
        |a: &u32, b: &u32| b.cmp(a),
    )
    .unwrap();
    // Nodes 2 and 4 tie on weight 1 and leave in discovery order.
    assert_eq!(order, vec![0, 2, 4, 1, 5, 3]);

    let heaviest = priority_search(&g, false, 0, |n: usize| n, NoOp, NoOp, NoOp, Serial::new()).unwrap();
    assert_eq!(heaviest, vec![0, 3, 5, 1, 2, 4]);
}

#[test]
fn edge_weights_reach_the_callbacks() {
    let mut g: DirectedGraph<(), f64> = DirectedGraph::new();
    g.add_node(());
    g.add_node(());
    g.add_edge(0, 1, 2.5).unwrap();
    g.add_edge(1, 0, -1.0).unwrap();

    let weights = breadth_first_search(
        &g,
        false,
        0,
        NoOp,
        NoOp,
        |e: EdgeVisit<f64>| *e.weight(),
        NoOp,
        Serial::new(),
    )
    .unwrap();
    assert_eq!(weights, vec![2.5, -1.0]);
}

#[test]
fn backends_produce_the_same_traversal() {
    let edges = [(0, 1), (1, 2), (2, 2), (2, 3), (3, 0), (1, 4)];
    let flat = undirected(5, &edges);

    let mut buckets: Graph<Undirected, (), (), BucketedVec<Edge>> = Graph::new();
    for _ in 0..5 {
        buckets.add_node(());
    }
    for (a, b) in edges {
        buckets.add_edge(a, b, ()).unwrap();
    }

    let run = |model: Serial<Event>| {
        breadth_first_search(
            &buckets,
            false,
            0,
            |n: usize| Event::Before(n),
            |n: usize| Event::After(n),
            |e: EdgeVisit<()>| Event::First(e.host_node(), e.target_node()),
            |e: EdgeVisit<()>| Event::Second(e.host_node(), e.target_node()),
            model,
        )
        .unwrap()
    };
    assert_eq!(run(Serial::new()), record_bfs(&flat, 0, Serial::new()));
}

#[test]
fn every_model_returns_the_same_results() {
    let g = undirected(6, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (4, 4), (4, 5)]);
    let expected = record_bfs(&g, 0, Serial::new());

    assert_eq!(record_bfs(&g, 0, Asynchronous::new(Launch::Eager)), expected);
    assert_eq!(record_bfs(&g, 0, Asynchronous::new(Launch::Deferred)), expected);
    assert_eq!(record_bfs(&g, 0, ThreadPool::new(3).unwrap()), expected);
    assert_eq!(record_bfs(&g, 0, ThreadPool::multi_pipeline(3, 4).unwrap()), expected);
    #[cfg(feature = "parallel")]
    assert_eq!(record_bfs(&g, 0, sylva::RayonModel::new(2).unwrap()), expected);
}

#[test]
fn a_panicking_callback_aborts_the_search() {
    let g = undirected(3, &[(0, 1), (1, 2)]);
    let result = breadth_first_search(
        &g,
        false,
        0,
        |n: usize| {
            assert!(n != 1, "node one is forbidden");
            n
        },
        NoOp,
        NoOp,
        NoOp,
        Serial::new(),
    );
    match result {
        Err(ExecutionError::TaskPanicked(msg)) => assert!(msg.contains("forbidden")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn callbacks_may_borrow_under_the_serial_model() {
    let g = undirected(3, &[(0, 1), (1, 2)]);
    let labels = ["a", "b", "c"];
    let seen = breadth_first_search(&g, false, 0, |n: usize| labels[n], NoOp, NoOp, NoOp, Serial::new()).unwrap();
    assert_eq!(seen, vec!["a", "b", "c"]);
}

fn random_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..12).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..24)))
}

proptest! {
    #[test]
    fn bfs_visits_in_non_decreasing_distance((n, edges) in random_graph()) {
        let g = undirected(n, &edges);
        let order = breadth_first_search(&g, false, 0, |v: usize| v, NoOp, NoOp, NoOp, Serial::new()).unwrap();

        let mut oracle = UnGraph::<(), ()>::with_capacity(n, edges.len());
        for _ in 0..n {
            oracle.add_node(());
        }
        for &(a, b) in &edges {
            oracle.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        let distance = dijkstra(&oracle, NodeIndex::new(0), None, |_| 1usize);

        prop_assert_eq!(order.len(), distance.len());
        let distances: Vec<usize> = order.iter().map(|&v| distance[&NodeIndex::new(v)]).collect();
        prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]), "{:?}", distances);
    }

    #[test]
    fn dfs_with_restarts_reaches_every_node_once((n, edges) in random_graph()) {
        let g = undirected(n, &edges);
        let order = depth_first_search(&g, true, 0, |v: usize| v, NoOp, NoOp, NoOp, Serial::new()).unwrap();

        let mut sorted = order.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn each_undirected_edge_is_traversed_once_each_way((n, edges) in random_graph()) {
        let g = undirected(n, &edges);
        let events = breadth_first_search(
            &g,
            true,
            0,
            NoOp,
            NoOp,
            |_: EdgeVisit<()>| true,
            |_: EdgeVisit<()>| false,
            Serial::new(),
        )
        .unwrap();
        let firsts = events.iter().filter(|&&first| first).count();
        prop_assert_eq!(firsts, edges.len());
        prop_assert_eq!(events.len() - firsts, edges.len());
    }
}
