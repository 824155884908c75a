//! Graphviz DOT export of the influence graph
//!
//! Produces a `digraph` with one node per prop and one edge per ordered pair,
//! labelled with its weight rounded to two decimals. Render with e.g.
//! `dot -Tsvg graph.dot -o graph.svg` or `neato` for a spring layout.

use crate::influence_graph::InfluenceGraph;

/// DOT output formatter
#[derive(Debug)]
pub struct DotOutput<'a> {
    graph: &'a InfluenceGraph,
    title: String,
    min_weight: f64,
}

impl<'a> DotOutput<'a> {
    pub fn new(graph: &'a InfluenceGraph) -> Self {
        Self {
            graph,
            title: "Prop Influence Graph".to_string(),
            min_weight: 0.0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Omit edges whose weight is below `min_weight`
    pub fn with_min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = min_weight;
        self
    }

    /// Escape a string for use inside a double-quoted DOT ID
    fn escape(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }

    /// Generate DOT output as string
    pub fn to_dot(&self) -> String {
        let mut output = String::from("digraph influence {\n");
        output.push_str(&format!("  label=\"{}\";\n", Self::escape(&self.title)));
        output.push_str("  node [shape=ellipse, style=filled, fillcolor=lightblue, fontsize=6];\n");
        output.push_str("  edge [fontsize=6];\n");

        for node in self.graph.nodes() {
            if let Some(prop) = self.graph.prop(node) {
                output.push_str(&format!(
                    "  n{} [label=\"{}\"];\n",
                    node.0,
                    Self::escape(&prop.label())
                ));
            }
        }

        for (from, to, weight) in self.graph.edges() {
            if weight < self.min_weight {
                continue;
            }
            output.push_str(&format!(
                "  n{} -> n{} [label=\"{:.2}\", weight={:.2}];\n",
                from.0, to.0, weight, weight
            ));
        }

        output.push_str("}\n");
        output
    }
}
