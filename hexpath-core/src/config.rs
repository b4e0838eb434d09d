//! Scenario configuration loaded from JSON

use std::path::Path;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use crate::grid::{GridCoord, GridError, HexGrid};
use crate::layout::{HexLayout, DEFAULT_HEX_SIZE};
use crate::mapgen;
use crate::pathfinder::PathFinder;
use crate::units::{UnitKind, UnitRoster};

/// Limits applied to a single path search
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Give up after this many closed nodes (None = search the whole grid)
    pub max_expansions: Option<usize>,
}

/// Per-unit movement tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// World units per second
    pub speed: f32,
    /// Distance at which a waypoint counts as reached
    pub reach_threshold: f32,
    /// Movement points granted per order; also the search budget
    pub movement_budget: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 200.0,
            reach_threshold: 5.0,
            movement_budget: 100.0,
        }
    }
}

impl MovementConfig {
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_budget(mut self, movement_budget: f32) -> Self {
        self.movement_budget = movement_budget;
        self
    }

    pub fn with_reach_threshold(mut self, reach_threshold: f32) -> Self {
        self.reach_threshold = reach_threshold;
        self
    }
}

/// Map source: a literal terrain map, or a seeded random one
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub columns: usize,
    pub rows: usize,
    pub hex_size: f32,
    pub seed: u64,
    /// One string per row (`P H M F W`); overrides generation and size
    pub terrain: Option<Vec<String>>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            columns: 240,
            rows: 180,
            hex_size: DEFAULT_HEX_SIZE,
            seed: 42,
            terrain: None,
        }
    }
}

impl MapConfig {
    pub fn layout(&self) -> HexLayout {
        HexLayout::new(self.hex_size)
    }

    /// Build the grid this config describes
    pub fn build_grid(&self) -> Result<HexGrid, GridError> {
        match &self.terrain {
            Some(rows) => HexGrid::from_rows(rows.as_slice(), self.layout()),
            None if self.columns == 0 || self.rows == 0 => Err(GridError::Empty),
            None => Ok(mapgen::generate(self.columns, self.rows, self.layout(), self.seed)),
        }
    }
}

/// Unit placed on the map at scenario start
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSpawn {
    pub kind: UnitKind,
    pub column: i32,
    pub row: i32,
}

impl UnitSpawn {
    pub fn coord(&self) -> GridCoord {
        GridCoord::new(self.column, self.row)
    }
}

/// Full scenario description
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: String,
    pub map: MapConfig,
    pub movement: MovementConfig,
    pub search: SearchConfig,
    pub units: Vec<UnitSpawn>,
}

impl ScenarioConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid scenario: {}", path.display()))
    }

    /// Parse and validate a JSON document
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: ScenarioConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn pathfinder(&self) -> PathFinder {
        PathFinder::new(self.search.clone())
    }

    /// Place every configured unit on its tile center
    pub fn build_roster(&self, grid: &HexGrid) -> anyhow::Result<UnitRoster> {
        let mut roster = UnitRoster::new(self.movement.clone());
        for spawn in &self.units {
            ensure!(
                grid.is_walkable(spawn.coord()),
                "{:?} spawn {} is off the map or on impassable terrain",
                spawn.kind,
                spawn.coord()
            );
            roster.spawn_at(grid, spawn.coord(), spawn.kind);
        }
        Ok(roster)
    }

    /// Reject values the movement and search code cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        let m = &self.movement;
        ensure!(
            m.speed.is_finite() && m.speed > 0.0,
            "movement.speed must be positive, got {}",
            m.speed
        );
        ensure!(
            m.reach_threshold.is_finite() && m.reach_threshold >= 0.0,
            "movement.reach_threshold must be non-negative, got {}",
            m.reach_threshold
        );
        ensure!(
            !m.movement_budget.is_nan() && m.movement_budget >= 0.0,
            "movement.movement_budget must be non-negative, got {}",
            m.movement_budget
        );
        ensure!(
            self.map.hex_size.is_finite() && self.map.hex_size > 0.0,
            "map.hex_size must be positive, got {}",
            self.map.hex_size
        );
        Ok(())
    }
}
