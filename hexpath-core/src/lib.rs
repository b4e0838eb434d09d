//! HEXPATH Core - Hex map movement engine
//!
//! This crate provides the movement layer for a hex strategy map:
//! - Terrain kinds and their entry costs
//! - Offset-coordinate hex grid with world-space tile centers
//! - Budgeted A* path search
//! - Frame-stepped waypoint following
//! - Seeded map generation and JSON scenarios
//! - Unit roster with selection and move orders

pub mod terrain;
pub mod layout;
pub mod grid;
pub mod pathfinder;
pub mod movement;
pub mod mapgen;
pub mod config;
pub mod units;

// Re-exports for convenient access
pub use terrain::{TerrainKind, TERRAIN_KINDS};
pub use layout::{HexLayout, DEFAULT_HEX_SIZE};
pub use grid::{GridCoord, GridError, HexGrid, Tile};
pub use pathfinder::{find_path, heuristic, Path, PathError, PathFinder, PathResult};
pub use movement::{MotionPhase, MovementController, TickEvent};
pub use config::{MapConfig, MovementConfig, ScenarioConfig, SearchConfig, UnitSpawn};
pub use units::{OrderError, Unit, UnitId, UnitKind, UnitRoster, UNIT_RADIUS};
