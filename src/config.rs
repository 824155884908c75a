//! Prop board configuration
//!
//! The board is an ordered list of entities, each with one or more
//! `(metric, threshold)` lines, plus the blending coefficients used when
//! weighting graph edges. Only the first line of an entity is ever tracked:
//! an entity contributes exactly one node to the influence graph.
//!
//! # Example TOML
//! ```toml
//! alpha = 0.6
//! beta = 0.4
//! recent_window = 10
//! top_k = 5
//!
//! [[prop]]
//! entity = "LeBron James"
//! lines = [{ metric = "PTS", threshold = 25.5 }]
//! ```

use crate::error::{InfluenceError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const DEFAULT_BOARD: &str = include_str!("../props-default.toml");

/// Tolerance used when checking that `alpha + beta` does not exceed 1.0
const COEFFICIENT_EPSILON: f64 = 1e-9;

fn default_alpha() -> f64 {
    0.6
}

fn default_beta() -> f64 {
    0.4
}

fn default_recent_window() -> usize {
    10
}

fn default_top_k() -> usize {
    5
}

/// A single over line: the metric is a hit when it strictly exceeds `threshold`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropLine {
    pub metric: String,
    pub threshold: f64,
}

/// One configured entity with its lines, in configuration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropEntry {
    pub entity: String,
    pub lines: Vec<PropLine>,
}

/// The (entity, metric, threshold) triple that becomes one graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedProp {
    pub entity: String,
    pub metric: String,
    pub threshold: f64,
}

impl TrackedProp {
    pub fn new(entity: impl Into<String>, metric: impl Into<String>, threshold: f64) -> Self {
        Self {
            entity: entity.into(),
            metric: metric.into(),
            threshold,
        }
    }

    /// Whether an observed value counts as a hit for this prop
    pub fn is_hit(&self, value: f64) -> bool {
        value > self.threshold
    }

    /// Display label, e.g. `LeBron James oPTS`
    pub fn label(&self) -> String {
        format!("{} o{}", self.entity, self.metric)
    }
}

/// Complete configuration for an influence analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceConfig {
    /// Weight of the conditional co-occurrence term in an edge
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Weight of the target's own hit rate in an edge
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Number of most recent observations considered per entity
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,

    /// Number of ranked targets reported
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(rename = "prop", default)]
    pub props: Vec<PropEntry>,
}

impl InfluenceConfig {
    /// Build a configuration from props with default coefficients
    pub fn with_props(props: Vec<PropEntry>) -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            recent_window: default_recent_window(),
            top_k: default_top_k(),
            props,
        }
    }

    /// Load the prop board embedded in the binary
    pub fn default_board() -> anyhow::Result<Self> {
        let config: Self =
            toml::from_str(DEFAULT_BOARD).context("Failed to parse embedded props-default.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a prop board from a TOML file
    ///
    /// # Errors
    /// Returns error if the file can't be read, has invalid TOML syntax, or
    /// fails [`InfluenceConfig::validate`].
    pub fn from_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read prop board: {}", path.as_ref().display())
        })?;
        let config: Self = toml::from_str(&content).with_context(|| {
            format!("Failed to parse TOML prop board: {}", path.as_ref().display())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Tracked props in configuration order, one per entity (first line only)
    pub fn tracked_props(&self) -> Vec<TrackedProp> {
        self.props
            .iter()
            .filter_map(|entry| {
                if entry.lines.len() > 1 {
                    tracing::debug!(
                        "{}: tracking {} only, ignoring {} additional line(s)",
                        entry.entity,
                        entry.lines[0].metric,
                        entry.lines.len() - 1
                    );
                }
                entry
                    .lines
                    .first()
                    .map(|line| TrackedProp::new(&entry.entity, &line.metric, line.threshold))
            })
            .collect()
    }

    /// Whether `entity` is one of the configured props
    pub fn contains_entity(&self, entity: &str) -> bool {
        self.props.iter().any(|entry| entry.entity == entity)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.props.is_empty() {
            return Err(InfluenceError::InvalidConfig(
                "at least one prop must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.props {
            if !seen.insert(entry.entity.as_str()) {
                return Err(InfluenceError::InvalidConfig(format!(
                    "duplicate entity '{}'",
                    entry.entity
                )));
            }
            if entry.lines.is_empty() {
                return Err(InfluenceError::InvalidConfig(format!(
                    "entity '{}' has no lines",
                    entry.entity
                )));
            }
            if let Some(line) = entry.lines.iter().find(|l| !l.threshold.is_finite()) {
                return Err(InfluenceError::InvalidConfig(format!(
                    "entity '{}' has a non-finite threshold for {}",
                    entry.entity, line.metric
                )));
            }
        }

        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(InfluenceError::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }

        let sum = self.alpha + self.beta;
        if sum > 1.0 + COEFFICIENT_EPSILON {
            return Err(InfluenceError::InvalidConfig(format!(
                "alpha + beta must not exceed 1, got {}",
                sum
            )));
        }
        if sum < 1.0 - COEFFICIENT_EPSILON {
            tracing::warn!(
                "alpha + beta = {} (< 1); edge weights will be scaled down",
                sum
            );
        }

        if self.recent_window == 0 {
            return Err(InfluenceError::InvalidConfig(
                "recent_window must be >= 1".to_string(),
            ));
        }

        if self.top_k == 0 {
            return Err(InfluenceError::InvalidConfig(
                "top_k must be >= 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(entity: &str, lines: &[(&str, f64)]) -> PropEntry {
        PropEntry {
            entity: entity.to_string(),
            lines: lines
                .iter()
                .map(|(m, t)| PropLine {
                    metric: m.to_string(),
                    threshold: *t,
                })
                .collect(),
        }
    }

    #[test]
    fn test_default_board() {
        let config = InfluenceConfig::default_board().unwrap();
        assert_eq!(config.alpha, 0.6);
        assert_eq!(config.beta, 0.4);
        assert_eq!(config.recent_window, 10);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.props.len(), 20);

        let props = config.tracked_props();
        assert_eq!(props[0], TrackedProp::new("LeBron James", "PTS", 25.5));
        assert_eq!(props[10], TrackedProp::new("Nikola Jokic", "AST", 9.5));
        assert!(config.contains_entity("D'Angelo Russell"));
        assert!(!config.contains_entity("Michael Jordan"));
    }

    #[test]
    fn test_first_line_only() {
        let config = InfluenceConfig::with_props(vec![entry(
            "A",
            &[("PTS", 20.5), ("REB", 8.5)],
        )]);
        let props = config.tracked_props();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].metric, "PTS");
        assert_eq!(props[0].threshold, 20.5);
    }

    #[test]
    fn test_parse_with_defaults() {
        let toml = r#"
            [[prop]]
            entity = "A"
            lines = [{ metric = "PTS", threshold = 10.0 }]

            [[prop]]
            entity = "B"
            lines = [{ metric = "AST", threshold = 4.5 }, { metric = "REB", threshold = 3.0 }]
        "#;
        let config: InfluenceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.alpha, 0.6);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.props.len(), 2);
        assert_eq!(config.props[1].lines.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_label_and_hit() {
        let prop = TrackedProp::new("Derrick White", "FG3M", 3.5);
        assert_eq!(prop.label(), "Derrick White oFG3M");
        assert!(prop.is_hit(4.0));
        assert!(!prop.is_hit(3.5));
    }

    #[test]
    fn test_validate_rejects_empty() {
        let config = InfluenceConfig::with_props(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_entity() {
        let config = InfluenceConfig::with_props(vec![
            entry("A", &[("PTS", 1.0)]),
            entry("A", &[("REB", 1.0)]),
        ]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate entity 'A'"));
    }

    #[test]
    fn test_validate_rejects_entity_without_lines() {
        let config = InfluenceConfig::with_props(vec![entry("A", &[])]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_threshold() {
        let config = InfluenceConfig::with_props(vec![entry("A", &[("PTS", f64::NAN)])]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_coefficients() {
        let mut config = InfluenceConfig::with_props(vec![entry("A", &[("PTS", 1.0)])]);
        config.alpha = 0.7;
        config.beta = 0.4;
        assert!(config.validate().is_err());

        config.alpha = 0.5;
        config.beta = 0.3;
        assert!(config.validate().is_ok());

        config.alpha = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_window_and_top_k() {
        let mut config = InfluenceConfig::with_props(vec![entry("A", &[("PTS", 1.0)])]);
        config.recent_window = 0;
        assert!(config.validate().is_err());

        config.recent_window = 10;
        config.top_k = 0;
        assert!(config.validate().is_err());
    }
}
