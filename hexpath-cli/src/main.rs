//! HEXPATH CLI - Command-line interface
//!
//! Commands:
//! - map: Print a generated or scenario map
//! - path: Search a route between two tiles
//! - simulate: Walk a unit along a route tick by tick

mod map_cmd;
mod path_cmd;
mod scene;
mod simulate_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexpath")]
#[command(about = "HEXPATH hex map pathfinding and movement harness")]
struct Cli {
    /// Seed for generated maps (overrides the scenario's seed)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the terrain grid
    Map(map_cmd::MapArgs),
    /// Find a route between two tiles
    Path(path_cmd::PathArgs),
    /// Walk a unit along a route
    Simulate(simulate_cmd::SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Map(args) => map_cmd::run(args, cli.seed),
        Commands::Path(args) => path_cmd::run(args, cli.seed),
        Commands::Simulate(args) => simulate_cmd::run(args, cli.seed),
    }
}
