//! Property-based tests for graph construction and max-influence search
//!
//! Graphs are small enough that every simple path can be enumerated, so the
//! search result is checked against brute force.

use coprop::config::TrackedProp;
use coprop::influence_graph::{InfluenceGraph, NodeId};
use coprop::max_influence::find_max_influence;
use coprop::observation::{InMemoryStore, ObservationSequence};
use coprop::path::InfluencePath;
use proptest::prelude::*;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("P{}", i)).collect()
}

fn weighted_graph(n: usize, weights: &[f64]) -> InfluenceGraph {
    let names = names(n);
    let props = names.iter().map(|e| TrackedProp::new(e, "PTS", 10.5)).collect();
    let mut edges = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if i != j {
                edges.push((names[i].as_str(), names[j].as_str(), weights[i * n + j]));
            }
        }
    }
    InfluenceGraph::from_edges(props, &edges).unwrap()
}

/// Best product over all simple paths from `from` to `to`
fn brute_force_best(graph: &InfluenceGraph, from: NodeId, to: NodeId) -> f64 {
    fn dfs(
        graph: &InfluenceGraph,
        node: NodeId,
        to: NodeId,
        score: f64,
        visited: &mut Vec<NodeId>,
        best: &mut f64,
    ) {
        if node == to {
            *best = best.max(score);
            return;
        }
        for (next, w) in graph.neighbors(node) {
            if !visited.contains(&next) {
                visited.push(next);
                dfs(graph, next, to, score * w, visited, best);
                visited.pop();
            }
        }
    }

    let mut best = 0.0;
    dfs(graph, from, to, 1.0, &mut vec![from], &mut best);
    best
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<f64>)> {
    (2usize..6).prop_flat_map(|n| (Just(n), prop::collection::vec(0.0f64..=1.0, n * n)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_built_weights_in_unit_interval(
        logs in prop::collection::vec(prop::collection::vec(0.0f64..40.0, 0..12), 2..6),
        thresholds in prop::collection::vec(0.0f64..40.0, 6),
        alpha in 0.0f64..=1.0,
        window in 1usize..12,
    ) {
        // Property: every edge weight lies in [0, 1], no self-loops, for any window
        let beta = 1.0 - alpha;
        let names = names(logs.len());
        let props: Vec<TrackedProp> = names
            .iter()
            .zip(&thresholds)
            .map(|(e, &t)| TrackedProp::new(e, "PTS", t))
            .collect();
        let mut store = InMemoryStore::new();
        for (name, values) in names.iter().zip(&logs) {
            store.insert(name, ObservationSequence::from_metric("PTS", values));
        }

        let graph = InfluenceGraph::build(&props, &store, alpha, beta, window);
        prop_assert_eq!(graph.edges().count(), props.len() * (props.len() - 1));
        for (from, to, w) in graph.edges() {
            prop_assert_ne!(from, to);
            prop_assert!((0.0..=1.0 + 1e-12).contains(&w));
        }
        for node in graph.nodes() {
            let rate = graph.hit_rate(node).unwrap();
            prop_assert!((0.0..=1.0).contains(&rate));
        }
    }

    #[test]
    fn prop_anchor_invariants((n, weights) in graph_strategy(), anchor in 0usize..6) {
        let graph = weighted_graph(n, &weights);
        let anchor = NodeId((anchor % n) as u32);
        let state = find_max_influence(&graph, anchor).unwrap();

        prop_assert_eq!(state.score(anchor), 1.0);
        prop_assert_eq!(state.predecessor(anchor), None);
    }

    #[test]
    fn prop_scores_are_optimal_path_products((n, weights) in graph_strategy()) {
        let graph = weighted_graph(n, &weights);
        let anchor = NodeId(0);
        let state = find_max_influence(&graph, anchor).unwrap();

        for target in graph.nodes() {
            let nodes = state.path_to(target);
            if nodes.is_empty() {
                prop_assert_eq!(state.score(target), 0.0);
                prop_assert_eq!(brute_force_best(&graph, anchor, target), 0.0);
                continue;
            }

            // Score equals the product along the reconstructed path
            let path = InfluencePath::from_nodes(&graph, nodes).unwrap();
            prop_assert!((path.score - state.score(target)).abs() < 1e-12);

            // ...and that product is the best over all paths
            let best = brute_force_best(&graph, anchor, target);
            prop_assert!((best - state.score(target)).abs() < 1e-12);
        }
    }

    #[test]
    fn prop_extending_path_never_increases_score((n, weights) in graph_strategy()) {
        let graph = weighted_graph(n, &weights);
        let state = find_max_influence(&graph, NodeId(0)).unwrap();

        for target in graph.nodes() {
            let nodes = state.path_to(target);
            for len in 2..=nodes.len() {
                let shorter = InfluencePath::from_nodes(&graph, nodes[..len - 1].to_vec()).unwrap();
                let longer = InfluencePath::from_nodes(&graph, nodes[..len].to_vec()).unwrap();
                prop_assert!(longer.score <= shorter.score);
            }
        }
    }

    #[test]
    fn prop_search_is_idempotent((n, weights) in graph_strategy()) {
        let graph = weighted_graph(n, &weights);
        let first = find_max_influence(&graph, NodeId(0)).unwrap();
        let second = find_max_influence(&graph, NodeId(0)).unwrap();
        prop_assert_eq!(first, second);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_missing_metric_zeroes_outgoing_co_occurrence(
        values in prop::collection::vec(0.0f64..40.0, 1..12),
    ) {
        // Property: an entity whose metric never appears has hit rate 0 and
        // contributes only the target hit-rate term to its outgoing edges
        let props = vec![
            TrackedProp::new("Ghost", "FG3M", 1.5),
            TrackedProp::new("Other", "PTS", 20.0),
        ];
        let store = InMemoryStore::new()
            .with("Ghost", ObservationSequence::from_metric("PTS", &values))
            .with("Other", ObservationSequence::from_metric("PTS", &values));

        let graph = InfluenceGraph::build(&props, &store, 0.6, 0.4, 12);
        let ghost = graph.node_id("Ghost").unwrap();
        let other = graph.node_id("Other").unwrap();

        prop_assert_eq!(graph.hit_rate(ghost), Some(0.0));
        let expected = 0.4 * graph.hit_rate(other).unwrap();
        prop_assert_eq!(graph.weight(ghost, other), Some(0.6 * 0.0 + expected));
    }
}
