//! Simulate command - walk a unit along a searched route
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: place_unit(), issue_order(), step_until_idle(), report_results()
//! - Level 3: per-tick event logging
//! - Level 4: formatting utilities

use anyhow::{ensure, Context, Result};
use clap::Args;
use glam::Vec2;

use hexpath_core::{GridCoord, TickEvent, UnitId, UnitKind, UnitRoster};

use crate::path_cmd::format_point;
use crate::scene::{load_scene, parse_coord, MapSourceArgs, Scene};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub source: MapSourceArgs,

    /// Start tile as COLUMN,ROW
    #[arg(long, value_parser = parse_coord, allow_hyphen_values = true)]
    pub from: GridCoord,

    /// Goal tile as COLUMN,ROW
    #[arg(long, value_parser = parse_coord, allow_hyphen_values = true)]
    pub to: GridCoord,

    /// Seconds per simulation tick
    #[arg(long, default_value = "0.016")]
    pub dt: f32,

    /// Stop after this many ticks even if the unit is still moving
    #[arg(long, default_value = "10000")]
    pub max_ticks: usize,
}

/// How the walk went
#[derive(Clone, Debug)]
struct WalkSummary {
    waypoints: usize,
    reached: usize,
    ticks: usize,
    arrived: bool,
    final_position: Vec2,
    points_remaining: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Load the map and the scenario's units
/// 2. Place the simulated unit and order it to the goal
/// 3. Tick until it arrives or the tick limit runs out
/// 4. Report where it ended up
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "--dt must be positive, got {}",
        args.dt
    );

    let scene = load_scene(&args.source, seed)?;
    let mut roster = scene.config.build_roster(&scene.grid)?;

    let unit = place_unit(&scene, &mut roster, args.from)?;
    let waypoints = issue_order(&scene, &mut roster, unit, args.to)?;

    let summary = step_until_idle(&mut roster, unit, waypoints, &args);

    report_results(&summary, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn place_unit(scene: &Scene, roster: &mut UnitRoster, at: GridCoord) -> Result<UnitId> {
    roster
        .spawn_at(&scene.grid, at, UnitKind::Warrior)
        .with_context(|| format!("Start {} is outside the map", at))
}

/// Select the unit and click on the goal tile's center
fn issue_order(
    scene: &Scene,
    roster: &mut UnitRoster,
    unit: UnitId,
    goal: GridCoord,
) -> Result<usize> {
    let target = scene
        .grid
        .spatial_center(goal)
        .with_context(|| format!("Goal {} is outside the map", goal))?;

    roster.select(unit);
    let waypoints = roster
        .order_move(&scene.grid, &scene.config.pathfinder(), target)
        .with_context(|| format!("Cannot order unit to {}", goal))?;

    tracing::info!(
        "Ordered {:?} to {}: {} waypoints, {:.1} units long",
        unit,
        goal,
        waypoints,
        roster.current_path().length()
    );

    Ok(waypoints)
}

fn step_until_idle(
    roster: &mut UnitRoster,
    unit: UnitId,
    waypoints: usize,
    args: &SimulateArgs,
) -> WalkSummary {
    let mut reached = 0;
    let mut ticks = 0;
    let mut arrived = false;

    while ticks < args.max_ticks && !arrived {
        ticks += 1;
        for (id, event) in roster.update(args.dt) {
            if id != unit {
                continue;
            }
            match event {
                TickEvent::Reached { .. } => reached += 1,
                TickEvent::Arrived => {
                    reached += 1;
                    arrived = true;
                }
                _ => {}
            }
            log_event(roster, id, event, ticks, args.dt);
        }
    }

    if !arrived {
        tracing::warn!("Unit still moving after {} ticks", ticks);
    }

    let (final_position, points_remaining) = roster
        .get(unit)
        .map(|u| (u.position(), u.mover.movement_points_remaining()))
        .unwrap_or((Vec2::ZERO, 0.0));

    WalkSummary {
        waypoints,
        reached,
        ticks,
        arrived,
        final_position,
        points_remaining,
    }
}

fn report_results(summary: &WalkSummary, args: &SimulateArgs) {
    println!("\n=== Simulation {} -> {} ===", args.from, args.to);
    println!("Arrived:          {}", if summary.arrived { "yes" } else { "no" });
    println!("Waypoints:        {}/{}", summary.reached, summary.waypoints);
    println!(
        "Ticks:            {} ({})",
        summary.ticks,
        format_seconds(summary.ticks as f32 * args.dt)
    );
    println!("Final position:   {}", format_point(summary.final_position));
    println!("Points remaining: {:.1}", summary.points_remaining);
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn log_event(roster: &UnitRoster, unit: UnitId, event: TickEvent, tick: usize, dt: f32) {
    let position = roster
        .get(unit)
        .map(|u| format_point(u.position()))
        .unwrap_or_default();
    let at = format_seconds(tick as f32 * dt);

    match event {
        TickEvent::Reached { index } => {
            tracing::info!("[{}] reached waypoint {} at {}", at, index, position)
        }
        TickEvent::Arrived => tracing::info!("[{}] arrived at {}", at, position),
        _ => {}
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_seconds(seconds: f32) -> String {
    format!("{:.2}s", seconds)
}
