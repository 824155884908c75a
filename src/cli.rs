//! CLI argument parsing for coprop

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for ranked results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "coprop")]
#[command(version)]
#[command(about = "Rank the props most likely to hit alongside an anchor prop", long_about = None)]
pub struct Cli {
    /// Prop board TOML file (defaults to the embedded board)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory of per-player CSV game logs (e.g. LeBron_James.csv)
    #[arg(short = 'l', long = "logs", value_name = "DIR", default_value = "nba_logs")]
    pub logs: PathBuf,

    /// Anchor entity (exact match); prompted on stdin when omitted
    #[arg(short = 'a', long = "anchor", value_name = "NAME")]
    pub anchor: Option<String>,

    /// Number of ranked targets to report
    #[arg(short = 'k', long = "top", value_name = "K")]
    pub top_k: Option<usize>,

    /// Weight of the conditional co-occurrence term
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Weight of the target hit-rate term
    #[arg(long = "beta", value_name = "BETA")]
    pub beta: Option<f64>,

    /// Number of most recent games per player
    #[arg(short = 'w', long = "window", value_name = "GAMES")]
    pub window: Option<usize>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the influence graph as Graphviz DOT
    #[arg(long = "dot", value_name = "FILE")]
    pub dot: Option<PathBuf>,

    /// Omit DOT edges lighter than this weight
    #[arg(long = "dot-min-weight", value_name = "WEIGHT", default_value = "0.0")]
    pub dot_min_weight: f64,

    /// Write the influence graph nodes and edges as JSON
    #[arg(long = "graph-json", value_name = "FILE")]
    pub graph_json: Option<PathBuf>,

    /// Print per-prop hit rates before the ranking
    #[arg(long = "show-hit-rates")]
    pub show_hit_rates: bool,

    /// List configured props and exit
    #[arg(long = "list-props")]
    pub list_props: bool,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
