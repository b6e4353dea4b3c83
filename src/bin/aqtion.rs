//! aqtion CLI - Train value-table learners on side-scrolling levels
//!
//! This CLI provides a unified interface for:
//! - Training one-step or backward-credit learners on a curriculum of levels
//! - Rendering levels as the simulator sees them
//!
//! Logging goes to stderr and is filtered with `RUST_LOG` (default `info`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aqtion")]
#[command(version, about = "Q-learning agents for tile-based platformer levels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a learner on one or more levels, then evaluate it
    Train(Box<aqtion::cli::commands::train::TrainArgs>),

    /// Print a level and the agent's starting view
    Render(aqtion::cli::commands::render::RenderArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => aqtion::cli::commands::train::execute(*args),
        Commands::Render(args) => aqtion::cli::commands::render::execute(args),
    }
}
