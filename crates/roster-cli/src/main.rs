use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "roster",
    about = "Shift roster optimizer",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a roster request and print the schedule.
    ///
    /// The request is a JSON document with `config` and `submissions`.
    /// Solver settings are read from a TOML or YAML file, chosen by
    /// extension.
    Solve {
        /// Request file (JSON)
        #[arg(short, long)]
        input: PathBuf,
        /// Solver configuration (.toml, .yaml or .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the time budget in seconds
        #[arg(long)]
        seconds: Option<u64>,
        /// Override the search node limit
        #[arg(long)]
        node_limit: Option<u64>,
        /// Print the per-shift narrative instead of JSON
        #[arg(short, long)]
        narrative: bool,
        /// Write the result JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a request and report the model size without solving.
    Validate {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Aggregate statistics over one or more saved schedules.
    Stats {
        /// Schedule files (JSON)
        #[arg(required = true)]
        schedules: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roster=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            input,
            config,
            seconds,
            node_limit,
            narrative,
            output,
        } => {
            let mut solver_config = commands::load_solver_config(config.as_deref())?;
            if let Some(seconds) = seconds {
                solver_config = solver_config.with_time_limit(Duration::from_secs(seconds));
            }
            if let Some(limit) = node_limit {
                solver_config = solver_config.with_node_limit(limit);
            }
            commands::solve::solve(&input, &solver_config, narrative, output.as_deref())
        }
        Commands::Validate { input } => commands::validate::validate(&input),
        Commands::Stats { schedules } => commands::stats::stats(&schedules),
    }
}
