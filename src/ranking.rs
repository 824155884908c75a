//! Top-K ranking of props most likely to hit alongside the anchor

use crate::influence_graph::{InfluenceGraph, NodeId};
use crate::max_influence::SearchState;
use crate::path::InfluencePath;
use serde::{Deserialize, Serialize};

/// One ranked target prop with its best path from the anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTarget {
    pub node: NodeId,
    pub entity: String,
    pub metric: String,
    pub threshold: f64,
    pub score: f64,
    /// Prop labels from anchor to target
    pub path: Vec<String>,
    #[serde(skip)]
    pub nodes: Vec<NodeId>,
}

/// Rank the non-anchor nodes of `graph` by descending search score
///
/// The ranking keeps the `k` best scores (configuration order breaks ties),
/// then drops any target whose path is empty because the search never
/// reached it.
pub fn rank_targets(graph: &InfluenceGraph, state: &SearchState, k: usize) -> Vec<RankedTarget> {
    let mut candidates: Vec<NodeId> = graph.nodes().filter(|&n| n != state.anchor()).collect();
    // Stable sort: equal scores stay in configuration order
    candidates.sort_by(|&a, &b| state.score(b).total_cmp(&state.score(a)));

    candidates
        .into_iter()
        .take(k)
        .filter_map(|node| {
            let nodes = state.path_to(node);
            if nodes.is_empty() {
                tracing::debug!("No path from anchor to {:?}", graph.prop(node).map(|p| &p.entity));
                return None;
            }
            let prop = graph.prop(node)?;
            let path = InfluencePath {
                nodes,
                score: state.score(node),
            };
            Some(RankedTarget {
                node,
                entity: prop.entity.clone(),
                metric: prop.metric.clone(),
                threshold: prop.threshold,
                score: path.score,
                path: path.labels(graph),
                nodes: path.nodes,
            })
        })
        .collect()
}
