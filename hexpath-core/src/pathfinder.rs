//! Budgeted A* search over the hex grid
//!
//! The search expands tiles in `g + h` order, prunes any edge whose
//! accumulated cost would exceed the movement budget, and translates the
//! winning tile route into world-space waypoints (tile centers).

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::Deref;

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::SearchConfig;
use crate::grid::{GridCoord, HexGrid};

// ============================================================================
// HEURISTIC
// ============================================================================

/// Coarse hex distance estimate: `max(|dx|, |dy|) + 0.5 * min(|dx|, |dy|)`.
///
/// Not admissible for this offset layout, so returned routes are not
/// guaranteed to be the cheapest.
pub fn heuristic(a: GridCoord, b: GridCoord) -> f32 {
    let dx = a.column.abs_diff(b.column) as f32;
    let dy = a.row.abs_diff(b.row) as f32;
    dx.max(dy) + 0.5 * dx.min(dy)
}

// ============================================================================
// TYPES
// ============================================================================

/// Ordered world-space waypoints. Empty means "could not move there".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path(Vec<Vec2>);

impl Path {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self(waypoints)
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.0
    }

    pub fn into_waypoints(self) -> Vec<Vec2> {
        self.0
    }

    /// Sum of segment lengths between consecutive waypoints
    pub fn length(&self) -> f32 {
        self.0.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl Deref for Path {
    type Target = [Vec2];

    fn deref(&self) -> &[Vec2] {
        &self.0
    }
}

impl From<Vec<Vec2>> for Path {
    fn from(waypoints: Vec<Vec2>) -> Self {
        Self(waypoints)
    }
}

impl From<Path> for Vec<Vec2> {
    fn from(path: Path) -> Self {
        path.0
    }
}

/// Successful search outcome
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
    /// Tile route from start to goal, both inclusive
    pub tiles: Vec<GridCoord>,
    /// Tile centers of `tiles`
    pub path: Path,
    /// Accumulated entry cost of every tile after the start
    pub cost: f32,
    /// Nodes closed before the goal was popped
    pub expansions: usize,
}

/// Why a search produced no path
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("start {0} is outside the grid")]
    StartOutOfBounds(GridCoord),

    #[error("start {0} is not walkable")]
    StartBlocked(GridCoord),

    #[error("goal {0} is outside the grid")]
    GoalOutOfBounds(GridCoord),

    #[error("goal {0} is not walkable")]
    GoalBlocked(GridCoord),

    #[error("goal is unreachable within a budget of {budget}")]
    Unreachable { budget: f32 },

    #[error("search gave up after {limit} expansions")]
    ExpansionLimit { limit: usize },
}

/// Open-set entry. Ordered so `BinaryHeap` pops the lowest `g + h`, and
/// among equal scores the earliest pushed.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    coord: GridCoord,
    g_cost: f32,
    h_cost: f32,
    seq: u64,
}

impl SearchNode {
    fn f_cost(&self) -> f32 {
        self.g_cost + self.h_cost
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost()
            .total_cmp(&self.f_cost())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

// ============================================================================
// PATH FINDER
// ============================================================================

/// A* path finder with optional expansion cap
#[derive(Clone, Debug, Default)]
pub struct PathFinder {
    config: SearchConfig,
}

impl PathFinder {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Path finder that gives up after `limit` expansions
    pub fn with_max_expansions(limit: usize) -> Self {
        Self::new(SearchConfig {
            max_expansions: Some(limit),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find a path, collapsing every failure into an empty [`Path`]
    pub fn find_path(
        &self,
        grid: &HexGrid,
        start: GridCoord,
        goal: GridCoord,
        movement_budget: f32,
    ) -> Path {
        self.search(grid, start, goal, movement_budget)
            .map(|result| result.path)
            .unwrap_or_default()
    }

    /// Find a path and report why when there is none.
    ///
    /// A NaN budget is treated as nothing affordable (`Unreachable`).
    pub fn search(
        &self,
        grid: &HexGrid,
        start: GridCoord,
        goal: GridCoord,
        movement_budget: f32,
    ) -> Result<PathResult, PathError> {
        let outcome = self.run(grid, start, goal, movement_budget);
        match &outcome {
            Ok(result) => tracing::debug!(
                "path {} -> {}: {} tiles, cost {:.1}, {} expansions",
                start,
                goal,
                result.tiles.len(),
                result.cost,
                result.expansions
            ),
            Err(e) => tracing::debug!("no path {} -> {}: {}", start, goal, e),
        }
        outcome
    }

    fn run(
        &self,
        grid: &HexGrid,
        start: GridCoord,
        goal: GridCoord,
        budget: f32,
    ) -> Result<PathResult, PathError> {
        validate_endpoints(grid, start, goal)?;
        // NaN compares false against every cost, which would disable pruning
        if budget.is_nan() {
            return Err(PathError::Unreachable { budget });
        }

        let mut open = BinaryHeap::new();
        let mut best_g: FxHashMap<GridCoord, f32> = FxHashMap::default();
        let mut parents: FxHashMap<GridCoord, GridCoord> = FxHashMap::default();
        let mut closed: FxHashSet<GridCoord> = FxHashSet::default();
        let mut seq = 0u64;
        let mut expansions = 0usize;

        open.push(SearchNode {
            coord: start,
            g_cost: 0.0,
            h_cost: heuristic(start, goal),
            seq,
        });
        best_g.insert(start, 0.0);

        while let Some(current) = open.pop() {
            if closed.contains(&current.coord) {
                continue;
            }
            // Superseded by a cheaper push of the same tile
            if best_g
                .get(&current.coord)
                .is_some_and(|&g| current.g_cost > g)
            {
                continue;
            }

            if current.coord == goal {
                let tiles = reconstruct(&parents, start, goal, grid.len());
                let path: Path = tiles
                    .iter()
                    .filter_map(|&c| grid.spatial_center(c))
                    .collect::<Vec<_>>()
                    .into();
                return Ok(PathResult {
                    tiles,
                    path,
                    cost: current.g_cost,
                    expansions,
                });
            }

            if let Some(limit) = self.config.max_expansions {
                if expansions >= limit {
                    return Err(PathError::ExpansionLimit { limit });
                }
            }

            closed.insert(current.coord);
            expansions += 1;

            for neighbor in grid.neighbors(current.coord) {
                if closed.contains(&neighbor) {
                    continue;
                }

                let new_g = current.g_cost + grid.movement_cost(neighbor);
                if new_g > budget {
                    continue;
                }

                let improves = best_g.get(&neighbor).map_or(true, |&g| new_g < g);
                if improves {
                    best_g.insert(neighbor, new_g);
                    parents.insert(neighbor, current.coord);
                    seq += 1;
                    open.push(SearchNode {
                        coord: neighbor,
                        g_cost: new_g,
                        h_cost: heuristic(neighbor, goal),
                        seq,
                    });
                }
            }
        }

        Err(PathError::Unreachable { budget })
    }
}

/// Search with default settings, returning an empty path on failure
pub fn find_path(grid: &HexGrid, start: GridCoord, goal: GridCoord, movement_budget: f32) -> Path {
    PathFinder::default().find_path(grid, start, goal, movement_budget)
}

// ============================================================================
// HELPERS
// ============================================================================

fn validate_endpoints(grid: &HexGrid, start: GridCoord, goal: GridCoord) -> Result<(), PathError> {
    if !grid.contains(start) {
        return Err(PathError::StartOutOfBounds(start));
    }
    if !grid.is_walkable(start) {
        return Err(PathError::StartBlocked(start));
    }
    if !grid.contains(goal) {
        return Err(PathError::GoalOutOfBounds(goal));
    }
    if !grid.is_walkable(goal) {
        return Err(PathError::GoalBlocked(goal));
    }
    Ok(())
}

/// Follow parent links from `goal` back to `start`. At most `max_steps`
/// links are followed.
fn reconstruct(
    parents: &FxHashMap<GridCoord, GridCoord>,
    start: GridCoord,
    goal: GridCoord,
    max_steps: usize,
) -> Vec<GridCoord> {
    let mut route = vec![goal];
    let mut current = goal;
    while current != start && route.len() <= max_steps {
        match parents.get(&current) {
            Some(&parent) => {
                route.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    route.reverse();
    route
}

// ============================================================================
// TESTS
// ============================================================================
