//! Text and JSON formatting of analysis results

use crate::analysis::AnalysisReport;
use crate::influence_graph::InfluenceGraph;
use crate::ranking::RankedTarget;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// JSON document for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub anchor: String,
    pub metric: String,
    pub threshold: f64,
    pub targets: Vec<RankedTarget>,
}

impl JsonReport {
    pub fn from_report(report: &AnalysisReport) -> Self {
        Self {
            anchor: report.anchor.entity.clone(),
            metric: report.anchor.metric.clone(),
            threshold: report.anchor.threshold,
            targets: report.targets.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize JSON report")
    }
}

/// One ranked line: `Path: A oPTS -> B oREB | Score: 0.4000`
pub fn format_target(target: &RankedTarget) -> String {
    format!("Path: {} | Score: {:.4}", target.path.join(" -> "), target.score)
}

/// Human-readable ranking
pub fn format_text(report: &AnalysisReport, top_k: usize) -> String {
    let mut output = format!(
        "Top {} most likely props to hit if {} hits:\n",
        top_k, report.anchor.entity
    );
    if report.targets.is_empty() {
        output.push_str("No influence paths found.\n");
    }
    for target in &report.targets {
        output.push_str(&format_target(target));
        output.push('\n');
    }
    output
}

/// Per-prop hit rate table
pub fn format_hit_rates(graph: &InfluenceGraph) -> String {
    let width = graph
        .props()
        .iter()
        .map(|p| p.label().len())
        .max()
        .unwrap_or(0);

    let mut output = String::from("Hit rates over recent window:\n");
    for node in graph.nodes() {
        if let (Some(prop), Some(rate)) = (graph.prop(node), graph.hit_rate(node)) {
            output.push_str(&format!(
                "  {:<width$}  {:>5.2}  (line {})\n",
                prop.label(),
                rate,
                prop.threshold,
                width = width
            ));
        }
    }
    output
}
