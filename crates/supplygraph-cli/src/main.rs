//! Supplygraph CLI - Command-line interface for supply-chain reasoning.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "supplygraph")]
#[command(author, version, about = "Supplygraph - Supply-chain ontology and reasoning agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: discover supplygraph.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Dataset file, overriding the config
    #[arg(short, long, global = true)]
    dataset: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a supplygraph.toml with default settings
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Ask one or more questions within a single session
    Query {
        /// Questions, answered in order
        #[arg(required = true)]
        queries: Vec<String>,

        /// Strategy: simple_reflex, model_based or goal_based
        #[arg(short, long)]
        agent: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List inventory held at a location
    Inventory {
        /// Location id
        location: String,
    },

    /// Show network KPIs and health
    Analytics {
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank locations by utilization
    Rank {
        /// Number of locations to show
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Print the network projection as JSON
    Network,

    /// Export the full ontology
    Export {
        /// Output file path
        output: PathBuf,
    },

    /// Check a dataset file without loading it
    Validate {
        /// Dataset file (default: the configured dataset)
        path: Option<PathBuf>,
    },

    /// Find the shortest connection between two entities
    Path {
        /// Source entity id
        from: String,
        /// Target entity id
        to: String,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = commands::Source {
        config: cli.config,
        dataset: cli.dataset,
    };

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Query { queries, agent, json } => {
            commands::query::run(&source, &queries, agent.as_deref(), json)
        }
        Commands::Inventory { location } => commands::inventory::run(&source, &location),
        Commands::Analytics { json } => commands::analytics::run(&source, json),
        Commands::Rank { top } => commands::rank::run(&source, top),
        Commands::Network => commands::network::run(&source),
        Commands::Export { output } => commands::export::run(&source, &output),
        Commands::Validate { path } => commands::validate::run(&source, path),
        Commands::Path { from, to } => commands::path::run(&source, &from, &to),
    }
}
