//! End-to-end influence analysis
//!
//! Stages run strictly in order, each completing before the next starts:
//!
//! ```text
//! anchor check → observations → hit rates / co-occurrence → graph → search → top-K
//! ```
//!
//! An anchor that is not on the board fails the run before the store is
//! consulted or any graph work happens. The graph is read-only once built and
//! may be searched from any number of anchors via
//! [`InfluenceAnalysis::search_graph`].

use crate::config::{InfluenceConfig, TrackedProp};
use crate::error::{InfluenceError, Result};
use crate::influence_graph::InfluenceGraph;
use crate::max_influence::{find_max_influence_from, SearchState};
use crate::observation::ObservationStore;
use crate::ranking::{rank_targets, RankedTarget};

/// Output of one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub anchor: TrackedProp,
    pub graph: InfluenceGraph,
    pub state: SearchState,
    pub targets: Vec<RankedTarget>,
}

/// Analysis pipeline bound to a validated configuration
#[derive(Debug, Clone)]
pub struct InfluenceAnalysis {
    config: InfluenceConfig,
}

impl InfluenceAnalysis {
    /// Create a pipeline, validating `config` first
    pub fn new(config: InfluenceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &InfluenceConfig {
        &self.config
    }

    /// Fail with [`InfluenceError::InvalidAnchor`] unless `anchor` is a configured entity
    pub fn validate_anchor(&self, anchor: &str) -> Result<()> {
        if self.config.contains_entity(anchor) {
            Ok(())
        } else {
            Err(InfluenceError::InvalidAnchor {
                anchor: anchor.to_string(),
            })
        }
    }

    /// Build the complete influence graph from `store`
    pub fn build_graph(&self, store: &dyn ObservationStore) -> InfluenceGraph {
        InfluenceGraph::from_config(&self.config, store)
    }

    /// Search an already-built graph from `anchor` and rank the top-K targets
    pub fn search_graph(
        &self,
        graph: &InfluenceGraph,
        anchor: &str,
    ) -> Result<(SearchState, Vec<RankedTarget>)> {
        let state = find_max_influence_from(graph, anchor)?;
        let targets = rank_targets(graph, &state, self.config.top_k);
        Ok((state, targets))
    }

    /// Run the whole pipeline for `anchor`
    ///
    /// # Errors
    ///
    /// Returns [`InfluenceError::InvalidAnchor`] before touching `store` if
    /// `anchor` is not configured.
    pub fn run(&self, anchor: &str, store: &dyn ObservationStore) -> Result<AnalysisReport> {
        self.validate_anchor(anchor)?;

        let graph = self.build_graph(store);
        let (state, targets) = self.search_graph(&graph, anchor)?;
        let anchor = graph
            .prop(state.anchor())
            .cloned()
            .ok_or_else(|| InfluenceError::InvalidAnchor {
                anchor: anchor.to_string(),
            })?;

        tracing::info!(
            "{}: {} ranked target(s) out of {} props",
            anchor.label(),
            targets.len(),
            graph.node_count()
        );

        Ok(AnalysisReport {
            anchor,
            graph,
            state,
            targets,
        })
    }
}
