use anyhow::{Context, Result};
use clap::Parser;
use coprop::analysis::InfluenceAnalysis;
use coprop::cli::{Cli, OutputFormat};
use coprop::config::InfluenceConfig;
use coprop::dot_output::DotOutput;
use coprop::observation::CsvLogStore;
use coprop::report;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the prop board and apply command-line overrides
fn load_config(args: &Cli) -> Result<InfluenceConfig> {
    let mut config = match &args.config {
        Some(path) => InfluenceConfig::from_toml(path)?,
        None => InfluenceConfig::default_board()?,
    };

    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }
    if let Some(beta) = args.beta {
        config.beta = beta;
    }
    if let Some(window) = args.window {
        config.recent_window = window;
    }
    if let Some(top_k) = args.top_k {
        config.top_k = top_k;
    }

    Ok(config)
}

/// Print configured props, one per line
fn print_props(config: &InfluenceConfig) {
    for prop in config.tracked_props() {
        println!("{} (line {})", prop.label(), prop.threshold);
    }
}

/// Read the anchor name from stdin after a prompt
fn prompt_anchor() -> Result<String> {
    print!("Enter starting player name (exact match): ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read anchor from stdin")?;
    Ok(line.trim().to_string())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let analysis = InfluenceAnalysis::new(config)?;

    if args.list_props {
        print_props(analysis.config());
        return Ok(());
    }

    let anchor = match &args.anchor {
        Some(anchor) => anchor.clone(),
        None => prompt_anchor()?,
    };

    // Reject unknown anchors before any log loading or graph work
    analysis.validate_anchor(&anchor)?;

    let store = CsvLogStore::from_dir(&args.logs, analysis.config().recent_window)?;
    tracing::debug!("Loaded logs for {} player(s)", store.len());

    let outcome = analysis.run(&anchor, &store)?;

    if args.show_hit_rates {
        println!("{}", report::format_hit_rates(&outcome.graph));
    }

    match args.format {
        OutputFormat::Text => {
            println!();
            print!("{}", report::format_text(&outcome, analysis.config().top_k));
        }
        OutputFormat::Json => {
            println!("{}", report::JsonReport::from_report(&outcome).to_json()?);
        }
    }

    if let Some(path) = &args.dot {
        let dot = DotOutput::new(&outcome.graph)
            .with_title("NBA Prop Influence Graph")
            .with_min_weight(args.dot_min_weight)
            .to_dot();
        std::fs::write(path, dot)
            .with_context(|| format!("Failed to write DOT graph: {}", path.display()))?;
    }

    if let Some(path) = &args.graph_json {
        let json = serde_json::to_string_pretty(&outcome.graph.to_export())
            .context("Failed to serialize graph")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write graph JSON: {}", path.display()))?;
    }

    Ok(())
}
