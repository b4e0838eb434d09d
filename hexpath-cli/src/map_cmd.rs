//! Map command - print the terrain grid
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_scene(), report_map()
//! - Level 3: print_text_map(), print_json_map()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;

use hexpath_core::{mapgen, HexGrid, TerrainKind};

use crate::scene::{load_scene, MapSourceArgs, Scene};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub source: MapSourceArgs,

    /// Print per-terrain tile counts after the map
    #[arg(long)]
    pub stats: bool,

    /// Output the map as JSON (rows of terrain symbols)
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run map command
pub fn run(args: MapArgs, seed: Option<u64>) -> Result<()> {
    let scene = load_scene(&args.source, seed)?;
    report_map(&scene, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn report_map(scene: &Scene, args: &MapArgs) -> Result<()> {
    if args.json {
        print_json_map(scene)
    } else {
        print_text_map(&scene.grid, args.stats);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn print_text_map(grid: &HexGrid, stats: bool) {
    println!("{}x{} tiles", grid.columns(), grid.rows());
    for (row, line) in grid.render_rows().iter().enumerate() {
        println!("{}", stagger_row(row, line));
    }

    if stats {
        println!();
        for (kind, count) in mapgen::terrain_counts(grid) {
            println!(
                "{:<9} {} {:>6} ({:.1}%)",
                format!("{:?}", kind),
                kind.symbol(),
                count,
                percent(count, grid.len())
            );
        }
    }
}

fn print_json_map(scene: &Scene) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonCount {
        terrain: TerrainKind,
        tiles: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonMap<'a> {
        name: &'a str,
        columns: usize,
        rows: usize,
        hex_size: f32,
        seed: u64,
        terrain: Vec<String>,
        counts: Vec<JsonCount>,
    }

    let grid = &scene.grid;
    let output = JsonMap {
        name: &scene.config.name,
        columns: grid.columns(),
        rows: grid.rows(),
        hex_size: grid.layout().hex_size,
        seed: scene.config.map.seed,
        terrain: grid.render_rows(),
        counts: mapgen::terrain_counts(grid)
            .into_iter()
            .map(|(terrain, tiles)| JsonCount { terrain, tiles })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Space the symbols out and indent odd rows, matching the tile layout
fn stagger_row(row: usize, line: &str) -> String {
    let spaced = line
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ");
    if row % 2 == 1 {
        format!(" {}", spaced)
    } else {
        spaced
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}
