//! Path command - search a route between two tiles
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_scene(), find_route(), report_route()
//! - Level 3: print_text_route(), print_json_route()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use glam::Vec2;

use hexpath_core::{GridCoord, HexGrid, PathError, PathResult};

use crate::scene::{load_scene, parse_coord, MapSourceArgs, Scene};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PathArgs {
    #[command(flatten)]
    pub source: MapSourceArgs,

    /// Start tile as COLUMN,ROW
    #[arg(long, value_parser = parse_coord, allow_hyphen_values = true)]
    pub from: GridCoord,

    /// Goal tile as COLUMN,ROW
    #[arg(long, value_parser = parse_coord, allow_hyphen_values = true)]
    pub to: GridCoord,

    /// Movement budget (defaults to the scenario's movement budget)
    #[arg(long)]
    pub budget: Option<f32>,

    /// Output the route as JSON
    #[arg(long)]
    pub json: bool,
}

/// Search request plus its outcome
struct RouteReport {
    from: GridCoord,
    to: GridCoord,
    budget: f32,
    outcome: Result<PathResult, PathError>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run path command
///
/// 1. Load the map
/// 2. Search the route
/// 3. Print the route or why there is none
pub fn run(args: PathArgs, seed: Option<u64>) -> Result<()> {
    let scene = load_scene(&args.source, seed)?;

    let report = find_route(&scene, &args);

    report_route(&scene.grid, &report, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn find_route(scene: &Scene, args: &PathArgs) -> RouteReport {
    let budget = args
        .budget
        .unwrap_or(scene.config.movement.movement_budget);

    tracing::info!("Searching {} -> {} (budget {})", args.from, args.to, budget);

    let outcome = scene
        .config
        .pathfinder()
        .search(&scene.grid, args.from, args.to, budget);

    RouteReport {
        from: args.from,
        to: args.to,
        budget,
        outcome,
    }
}

fn report_route(grid: &HexGrid, report: &RouteReport, json: bool) -> Result<()> {
    if json {
        print_json_route(report)
    } else {
        print_text_route(grid, report);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn print_text_route(grid: &HexGrid, report: &RouteReport) {
    let result = match &report.outcome {
        Ok(result) => result,
        Err(e) => {
            println!("No path {} -> {}: {}", report.from, report.to, e);
            return;
        }
    };

    println!("\n=== Route {} -> {} ===", report.from, report.to);
    println!("Tiles:      {}", result.tiles.len());
    println!("Cost:       {:.1} / {}", result.cost, report.budget);
    println!("Length:     {:.1}", result.path.length());
    println!("Expansions: {}", result.expansions);
    println!();

    for (step, (coord, point)) in result.tiles.iter().zip(result.path.iter()).enumerate() {
        let terrain = grid
            .terrain(*coord)
            .map(|t| format!("{:?}", t))
            .unwrap_or_default();
        println!(
            "{:>4}  {:<10} {:<9} {}",
            step,
            coord.to_string(),
            terrain,
            format_point(*point)
        );
    }
}

fn print_json_route(report: &RouteReport) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonRoute {
        from: GridCoord,
        to: GridCoord,
        budget: f32,
        found: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        cost: Option<f32>,
        expansions: Option<usize>,
        tiles: Vec<GridCoord>,
        waypoints: Vec<Vec2>,
    }

    let output = match &report.outcome {
        Ok(result) => JsonRoute {
            from: report.from,
            to: report.to,
            budget: report.budget,
            found: true,
            reason: None,
            cost: Some(result.cost),
            expansions: Some(result.expansions),
            tiles: result.tiles.clone(),
            waypoints: result.path.waypoints().to_vec(),
        },
        Err(e) => JsonRoute {
            from: report.from,
            to: report.to,
            budget: report.budget,
            found: false,
            reason: Some(e.to_string()),
            cost: None,
            expansions: None,
            tiles: Vec::new(),
            waypoints: Vec::new(),
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

pub(crate) fn format_point(point: Vec2) -> String {
    format!("({:.1}, {:.1})", point.x, point.y)
}
