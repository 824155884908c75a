//! Influence path reconstruction

use crate::influence_graph::{InfluenceGraph, NodeId};
use serde::{Deserialize, Serialize};

/// Recover the best path from `anchor` to `target` by following predecessor links
///
/// Walks backward from `target` until a node without a predecessor is reached,
/// then reverses. Returns an empty path when `target` was never reached
/// (no predecessor and not the anchor); callers treat that as "no path found".
pub fn reconstruct_path(
    predecessors: &[Option<NodeId>],
    anchor: NodeId,
    target: NodeId,
) -> Vec<NodeId> {
    if target.index() >= predecessors.len() {
        return Vec::new();
    }
    if target != anchor && predecessors[target.index()].is_none() {
        return Vec::new();
    }

    let mut path = vec![target];
    let mut current = target;
    while let Some(prev) = predecessors.get(current.index()).copied().flatten() {
        // A predecessor chain can't be longer than the node set
        if path.len() > predecessors.len() {
            tracing::warn!("Predecessor chain from {:?} does not terminate", target);
            return Vec::new();
        }
        path.push(prev);
        current = prev;
    }

    path.reverse();
    path
}

/// An anchor-to-target path with its product score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencePath {
    pub nodes: Vec<NodeId>,
    pub score: f64,
}

impl InfluencePath {
    /// Product of the edge weights along `nodes` in `graph`
    ///
    /// A single-node path scores 1.0. Returns `None` if any hop is not an edge.
    pub fn from_nodes(graph: &InfluenceGraph, nodes: Vec<NodeId>) -> Option<Self> {
        let score = nodes
            .windows(2)
            .try_fold(1.0, |acc, hop| graph.weight(hop[0], hop[1]).map(|w| acc * w))?;
        Some(Self { nodes, score })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Prop labels along the path, e.g. `["LeBron James oPTS", "Anthony Davis oREB"]`
    pub fn labels(&self, graph: &InfluenceGraph) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(|&n| graph.prop(n).map(|p| p.label()))
            .collect()
    }
}
