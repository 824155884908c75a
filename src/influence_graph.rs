//! Influence graph construction from per-entity game logs
//!
//! Every tracked prop becomes a node. For every ordered pair `(p1, p2)` with
//! `p1 != p2` the graph carries an edge whose weight blends how often `p2` hits
//! when `p1` hits with how often `p2` hits at all:
//!
//! ```text
//! weight(p1 → p2) = ALPHA * P(p2 hits | p1 hits) + BETA * HitRate(p2)
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ ObservationStore                                          │
//! │   "LeBron James" → [{PTS: 28, REB: 8, ...}, ...]          │
//! └──────────────────────────────────────────────────────────┘
//!                          │
//!                          │ InfluenceGraph::build()
//!                          ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │ Dense N×N weight matrix (row = source, col = target)      │
//! │                                                            │
//! │        A     B     C                                       │
//! │   A    -   0.80  0.10                                      │
//! │   B  0.35    -   0.50                                      │
//! │   C  0.05  0.20    -                                       │
//! └──────────────────────────────────────────────────────────┘
//!                          │
//!                          │ find_max_influence()
//!                          ▼
//!             scores + predecessors per node
//! ```
//!
//! The node set is fixed once the board is loaded, so nodes are plain indices
//! into an arena of [`TrackedProp`]s and the weights live in one flat matrix.
//!
//! # Example
//!
//! ```
//! use coprop::config::TrackedProp;
//! use coprop::influence_graph::InfluenceGraph;
//! use coprop::observation::{InMemoryStore, ObservationSequence};
//!
//! let props = vec![
//!     TrackedProp::new("A", "PTS", 20.5),
//!     TrackedProp::new("B", "REB", 8.5),
//! ];
//! let store = InMemoryStore::new()
//!     .with("A", ObservationSequence::from_metric("PTS", &[25.0, 18.0]))
//!     .with("B", ObservationSequence::from_metric("REB", &[10.0, 9.0]));
//!
//! let graph = InfluenceGraph::build(&props, &store, 0.6, 0.4, 10);
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 2);
//! ```

use crate::config::{InfluenceConfig, TrackedProp};
use crate::error::{InfluenceError, Result};
use crate::hit_rate::{conditional_co_occurrence, hit_rate};
use crate::observation::{ObservationSequence, ObservationStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a node (tracked prop) in an [`InfluenceGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Complete directed weighted graph over tracked props
///
/// # Node Representation
///
/// - Each tracked prop becomes a node, in configuration order
/// - `NodeId` is the prop's 0-based position on the board
///
/// # Edge Representation
///
/// - All `N × (N − 1)` ordered pairs carry an edge; there are no self-loops
/// - Weight lies in `[0, 1]` whenever `alpha + beta <= 1`
/// - Weights are asymmetric in general
#[derive(Debug, Clone)]
pub struct InfluenceGraph {
    props: Vec<TrackedProp>,

    /// Per-node hit rate over the recent window
    hit_rates: Vec<f64>,

    /// Row-major `N × N` matrix; the diagonal is always 0 and never traversed
    weights: Vec<f64>,

    entity_to_node: HashMap<String, NodeId>,

    /// Position of each node in ascending entity-name order
    name_rank: Vec<usize>,
}

impl InfluenceGraph {
    /// Build the graph from observation data
    ///
    /// Each entity's sequence is cut to its `window` most recent records.
    /// Entities the store has no data for are treated as having zero
    /// observations, so all their terms fall back to `0.0`.
    ///
    /// # Performance
    ///
    /// - Time complexity: O(N² · W) where W = window length
    /// - Space complexity: O(N²)
    pub fn build(
        props: &[TrackedProp],
        store: &dyn ObservationStore,
        alpha: f64,
        beta: f64,
        window: usize,
    ) -> Self {
        let sequences: Vec<ObservationSequence> = props
            .iter()
            .map(|prop| match store.sequence(&prop.entity) {
                Some(seq) => seq.truncated(window),
                None => {
                    tracing::debug!("No observations for {}, using empty window", prop.entity);
                    ObservationSequence::default()
                }
            })
            .collect();

        // Phase 1: hit rate per node
        let hit_rates: Vec<f64> = props
            .iter()
            .zip(&sequences)
            .map(|(prop, seq)| hit_rate(seq, prop))
            .collect();

        // Phase 2: one edge per ordered pair
        let n = props.len();
        let mut weights = vec![0.0; n * n];
        for (i, (p1, s1)) in props.iter().zip(&sequences).enumerate() {
            for (j, (p2, s2)) in props.iter().zip(&sequences).enumerate() {
                if i == j {
                    continue;
                }
                let corr = conditional_co_occurrence(s1, p1, s2, p2);
                weights[i * n + j] = alpha * corr + beta * hit_rates[j];
            }
        }

        tracing::debug!(
            "Built influence graph: {} nodes, {} edges",
            n,
            n * n.saturating_sub(1)
        );

        Self::assemble(props.to_vec(), hit_rates, weights)
    }

    /// Build the graph for a validated configuration
    pub fn from_config(config: &InfluenceConfig, store: &dyn ObservationStore) -> Self {
        Self::build(
            &config.tracked_props(),
            store,
            config.alpha,
            config.beta,
            config.recent_window,
        )
    }

    /// Build a graph from explicit edge weights
    ///
    /// Pairs not listed get weight `0.0`; hit rates are all `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`InfluenceError::InvalidConfig`] for an unknown entity, a
    /// self-loop, or a weight outside `[0, 1]`.
    pub fn from_edges(props: Vec<TrackedProp>, edges: &[(&str, &str, f64)]) -> Result<Self> {
        let n = props.len();
        let mut graph = Self::assemble(props, vec![0.0; n], vec![0.0; n * n]);

        for &(from, to, weight) in edges {
            let lookup = |entity: &str| {
                graph.node_id(entity).ok_or_else(|| {
                    InfluenceError::InvalidConfig(format!("unknown entity '{}' in edge", entity))
                })
            };
            let (src, dst) = (lookup(from)?, lookup(to)?);
            if src == dst {
                return Err(InfluenceError::InvalidConfig(format!(
                    "self-loop on '{}'",
                    from
                )));
            }
            if !(0.0..=1.0).contains(&weight) {
                return Err(InfluenceError::InvalidConfig(format!(
                    "weight {} for {} -> {} is outside [0, 1]",
                    weight, from, to
                )));
            }
            graph.weights[src.index() * n + dst.index()] = weight;
        }

        Ok(graph)
    }

    fn assemble(props: Vec<TrackedProp>, hit_rates: Vec<f64>, weights: Vec<f64>) -> Self {
        let entity_to_node = props
            .iter()
            .enumerate()
            .map(|(idx, prop)| (prop.entity.clone(), NodeId(idx as u32)))
            .collect();

        let mut by_name: Vec<usize> = (0..props.len()).collect();
        by_name.sort_by(|&a, &b| props[a].entity.cmp(&props[b].entity));
        let mut name_rank = vec![0; props.len()];
        for (rank, idx) in by_name.into_iter().enumerate() {
            name_rank[idx] = rank;
        }

        Self {
            props,
            hit_rates,
            weights,
            entity_to_node,
            name_rank,
        }
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.props.len()
    }

    /// Get the number of edges in the graph (always `N × (N − 1)`)
    pub fn edge_count(&self) -> usize {
        let n = self.node_count();
        n * n.saturating_sub(1)
    }

    /// All node ids in configuration order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.props.len()).map(|idx| NodeId(idx as u32))
    }

    /// Get the prop for a node
    pub fn prop(&self, node: NodeId) -> Option<&TrackedProp> {
        self.props.get(node.index())
    }

    pub fn props(&self) -> &[TrackedProp] {
        &self.props
    }

    /// Look up the node for an entity name
    pub fn node_id(&self, entity: &str) -> Option<NodeId> {
        self.entity_to_node.get(entity).copied()
    }

    /// Hit rate of a node's prop over the recent window
    pub fn hit_rate(&self, node: NodeId) -> Option<f64> {
        self.hit_rates.get(node.index()).copied()
    }

    /// Weight of `from → to`, `None` for self-loops or unknown nodes
    pub fn weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let n = self.node_count();
        if from == to || from.index() >= n || to.index() >= n {
            return None;
        }
        Some(self.weights[from.index() * n + to.index()])
    }

    /// Outgoing edges of a node with their weights, in configuration order
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let n = self.node_count();
        let row = node.index();
        (0..n)
            .filter(move |&col| col != row && row < n)
            .map(move |col| (NodeId(col as u32), self.weights[row * n + col]))
    }

    /// Every edge as `(from, to, weight)`
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.nodes()
            .flat_map(move |from| self.neighbors(from).map(move |(to, w)| (from, to, w)))
    }

    /// Rank of a node's entity name in ascending lexical order
    pub(crate) fn name_rank(&self, node: NodeId) -> usize {
        self.name_rank[node.index()]
    }

    /// Serializable node/edge listing for external renderers
    pub fn to_export(&self) -> GraphExport {
        GraphExport {
            nodes: self
                .nodes()
                .map(|node| {
                    let prop = &self.props[node.index()];
                    ExportNode {
                        id: node,
                        entity: prop.entity.clone(),
                        metric: prop.metric.clone(),
                        threshold: prop.threshold,
                        hit_rate: self.hit_rates[node.index()],
                    }
                })
                .collect(),
            edges: self
                .edges()
                .map(|(from, to, weight)| ExportEdge {
                    from: self.props[from.index()].entity.clone(),
                    to: self.props[to.index()].entity.clone(),
                    weight,
                })
                .collect(),
        }
    }
}

/// Node set, edge set and weights in a generic form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: NodeId,
    pub entity: String,
    pub metric: String,
    pub threshold: f64,
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportEdge {
    pub from: String,
    pub to: String,
    pub weight: f64,
}
