//! swarmlet CLI
//!
//! Command-line interface for ranking cluster snapshots.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use swarmlet_core::{LoggingConfig, SchedulerConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// swarmlet - node ranking for swarm-style container placement
#[derive(Parser, Debug)]
#[command(name = "swarmlet")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Scheduler configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank the nodes of a snapshot for its workload
    Rank {
        /// Snapshot file (JSON)
        snapshot: PathBuf,

        /// Strategy to use (overrides the config file)
        #[arg(long)]
        strategy: Option<String>,

        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        output: commands::OutputFormat,
    },

    /// Print the single node the workload would be placed on
    Select {
        /// Snapshot file (JSON)
        snapshot: PathBuf,

        /// Strategy to use (overrides the config file)
        #[arg(long)]
        strategy: Option<String>,
    },

    /// List the available strategies
    Strategies,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SchedulerConfig::from_file(path)?,
        None => SchedulerConfig::default(),
    };

    init_logging(&config.logging, cli.verbose);
    debug!(
        path = ?cli.config,
        strategy = %config.strategy,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Rank {
            snapshot,
            strategy,
            output,
        } => {
            if let Some(name) = strategy {
                config.strategy = name;
            }
            commands::rank(&config, &snapshot, output)?;
        }
        Commands::Select { snapshot, strategy } => {
            if let Some(name) = strategy {
                config.strategy = name;
            }
            commands::select(&config, &snapshot)?;
        }
        Commands::Strategies => {
            commands::strategies(&config);
        }
    }

    Ok(())
}

/// Initialize logging
///
/// `RUST_LOG` wins over the configured level; `--verbose` forces debug.
fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = if logging.format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
