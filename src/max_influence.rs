//! Maximum-influence path search
//!
//! Single-source best-path search over an [`InfluenceGraph`]. Structurally it
//! is priority-queue relaxation as in shortest-path search, with two changes:
//! a path's score is the *product* of its edge weights, and the search keeps
//! the *largest* score per node.
//!
//! # Algorithm
//!
//! ```text
//! 1. score[anchor] = 1, score[other] = 0, pred[all] = none
//! 2. push (1, anchor) on a max-heap
//! 3. while heap not empty:
//!      (s, u) = pop highest score
//!      for each edge u → v with weight w:
//!        if s * w > score[v]:
//!          score[v] = s * w; pred[v] = u; push (s * w, v)
//! ```
//!
//! Every weight lies in `[0, 1]`, so extending a path never raises its score.
//! Each push follows a strict improvement of a node's score, which bounds the
//! number of pushes and guarantees termination. Nodes may be popped more than
//! once; a stale pop carries a score no better than the node's current one, so
//! none of its relaxations can succeed and it is inert.
//!
//! Equal candidates never replace an existing predecessor. Heap entries with
//! equal scores pop in ascending entity-name order.
//!
//! # Example
//!
//! ```
//! use coprop::config::TrackedProp;
//! use coprop::influence_graph::InfluenceGraph;
//! use coprop::max_influence::find_max_influence;
//!
//! # fn main() -> coprop::error::Result<()> {
//! let props = vec![
//!     TrackedProp::new("A", "PTS", 20.5),
//!     TrackedProp::new("B", "PTS", 20.5),
//!     TrackedProp::new("C", "PTS", 20.5),
//! ];
//! let graph = InfluenceGraph::from_edges(
//!     props,
//!     &[("A", "B", 0.8), ("A", "C", 0.1), ("B", "C", 0.5), ("C", "B", 0.2)],
//! )?;
//!
//! let anchor = graph.node_id("A").unwrap();
//! let state = find_max_influence(&graph, anchor)?;
//!
//! let c = graph.node_id("C").unwrap();
//! assert!((state.score(c) - 0.4).abs() < 1e-12);
//! assert_eq!(state.predecessor(c), graph.node_id("B"));
//! # Ok(())
//! # }
//! ```

use crate::error::{InfluenceError, Result};
use crate::influence_graph::{InfluenceGraph, NodeId};
use crate::path::reconstruct_path;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Scores and predecessors produced by one search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    anchor: NodeId,

    /// Best product score found per node
    scores: Vec<f64>,

    /// Preceding node on each node's best path
    predecessors: Vec<Option<NodeId>>,

    /// Number of heap pops, stale ones included
    pops: usize,
}

impl SearchState {
    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    /// Best score for a node (`0.0` if unreached or unknown)
    pub fn score(&self, node: NodeId) -> f64 {
        self.scores.get(node.index()).copied().unwrap_or(0.0)
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessors.get(node.index()).copied().flatten()
    }

    pub fn predecessors(&self) -> &[Option<NodeId>] {
        &self.predecessors
    }

    /// Whether the search reached `node` (the anchor always counts)
    pub fn is_reached(&self, node: NodeId) -> bool {
        node == self.anchor || self.predecessor(node).is_some()
    }

    /// Best path from the anchor to `target`; empty if unreached
    pub fn path_to(&self, target: NodeId) -> Vec<NodeId> {
        reconstruct_path(&self.predecessors, self.anchor, target)
    }

    pub fn pops(&self) -> usize {
        self.pops
    }
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    score: f64,
    name_rank: usize,
    node: NodeId,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Highest score first, then smallest entity name
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.name_rank.cmp(&self.name_rank))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

/// Run the maximum-influence search from `anchor`
///
/// # Errors
///
/// Returns [`InfluenceError::InvalidAnchor`] if `anchor` is not a node of
/// `graph`. No search state is allocated in that case.
///
/// # Performance
///
/// - Time complexity: O(P · N) where P = heap pops (bounded by the number of
///   strict improvements plus one)
/// - Space complexity: O(N + P)
pub fn find_max_influence(graph: &InfluenceGraph, anchor: NodeId) -> Result<SearchState> {
    if anchor.index() >= graph.node_count() {
        return Err(InfluenceError::InvalidAnchor {
            anchor: format!("node {}", anchor.0),
        });
    }

    let n = graph.node_count();
    let mut scores = vec![0.0; n];
    let mut predecessors: Vec<Option<NodeId>> = vec![None; n];
    scores[anchor.index()] = 1.0;

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry {
        score: 1.0,
        name_rank: graph.name_rank(anchor),
        node: anchor,
    });

    let mut pops = 0;
    while let Some(HeapEntry { score, node, .. }) = heap.pop() {
        pops += 1;

        for (neighbor, weight) in graph.neighbors(node) {
            let candidate = score * weight;
            if candidate > scores[neighbor.index()] {
                scores[neighbor.index()] = candidate;
                predecessors[neighbor.index()] = Some(node);
                heap.push(HeapEntry {
                    score: candidate,
                    name_rank: graph.name_rank(neighbor),
                    node: neighbor,
                });
            }
        }
    }

    tracing::debug!(
        "Max-influence search from {:?}: {} pops, {} nodes reached",
        graph.prop(anchor).map(|p| p.entity.as_str()),
        pops,
        predecessors.iter().filter(|p| p.is_some()).count() + 1
    );

    Ok(SearchState {
        anchor,
        scores,
        predecessors,
        pops,
    })
}

/// Run the search from the node whose entity is `entity`
///
/// # Errors
///
/// Returns [`InfluenceError::InvalidAnchor`] if no node tracks `entity`.
pub fn find_max_influence_from(graph: &InfluenceGraph, entity: &str) -> Result<SearchState> {
    let anchor = graph
        .node_id(entity)
        .ok_or_else(|| InfluenceError::InvalidAnchor {
            anchor: entity.to_string(),
        })?;
    find_max_influence(graph, anchor)
}
