//! Unit roster: selection, move orders and per-frame updates

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::MovementConfig;
use crate::grid::{GridCoord, HexGrid};
use crate::movement::{MovementController, TickEvent};
use crate::pathfinder::{Path, PathError, PathFinder};

/// Radius of a unit's body, used for click selection
pub const UNIT_RADIUS: f32 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Settler,
    Warrior,
    Builder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

/// A unit on the map
#[derive(Clone, Debug)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub mover: MovementController,
}

impl Unit {
    pub fn position(&self) -> Vec2 {
        self.mover.position()
    }

    /// Whether `point` lies on the unit's body
    pub fn contains(&self, point: Vec2) -> bool {
        self.position().distance(point) <= UNIT_RADIUS
    }
}

/// Why a move order was refused
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("no unit selected")]
    NoSelection,

    #[error("unknown unit {0:?}")]
    UnknownUnit(UnitId),

    #[error("grid has no tiles")]
    EmptyGrid,

    #[error("route has fewer than two waypoints")]
    Degenerate,

    #[error(transparent)]
    Path(#[from] PathError),
}

/// All units of one side, plus the current selection
#[derive(Clone, Debug)]
pub struct UnitRoster {
    units: Vec<Unit>,
    selected: Option<UnitId>,
    next_id: u32,
    movement: MovementConfig,
    current_path: Path,
}

impl UnitRoster {
    pub fn new(movement: MovementConfig) -> Self {
        Self {
            units: Vec::new(),
            selected: None,
            next_id: 0,
            movement,
            current_path: Path::default(),
        }
    }

    pub fn add_unit(&mut self, position: Vec2, kind: UnitKind) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units.push(Unit {
            id,
            kind,
            mover: MovementController::new(position, &self.movement),
        });
        id
    }

    /// Place a unit on the center of `coord`; None when off the grid
    pub fn spawn_at(&mut self, grid: &HexGrid, coord: GridCoord, kind: UnitKind) -> Option<UnitId> {
        grid.spatial_center(coord)
            .map(|center| self.add_unit(center, kind))
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn selected(&self) -> Option<&Unit> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Route of the most recent accepted order
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn movement(&self) -> &MovementConfig {
        &self.movement
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Select the first unit under `point`. The old selection is always dropped.
    pub fn select_at(&mut self, point: Vec2) -> Option<UnitId> {
        self.deselect();
        self.selected = self.units.iter().find(|u| u.contains(point)).map(|u| u.id);
        self.selected
    }

    pub fn select(&mut self, id: UnitId) -> bool {
        self.selected = self.get(id).map(|u| u.id);
        self.selected.is_some()
    }

    /// Drop the selection and the displayed route
    pub fn deselect(&mut self) {
        self.selected = None;
        self.current_path = Path::default();
    }

    // ========================================================================
    // ORDERS
    // ========================================================================

    /// Send the selected unit toward the tile nearest `target`
    pub fn order_move(
        &mut self,
        grid: &HexGrid,
        finder: &PathFinder,
        target: Vec2,
    ) -> Result<usize, OrderError> {
        let id = self.selected.ok_or(OrderError::NoSelection)?;
        let goal = grid.nearest_coord(target).ok_or(OrderError::EmptyGrid)?;
        self.order_unit(id, grid, finder, goal)
    }

    /// Send unit `id` toward `goal`. Returns the number of waypoints.
    pub fn order_unit(
        &mut self,
        id: UnitId,
        grid: &HexGrid,
        finder: &PathFinder,
        goal: GridCoord,
    ) -> Result<usize, OrderError> {
        self.current_path = Path::default();
        let budget = self.movement.movement_budget;

        let unit = self.get_mut(id).ok_or(OrderError::UnknownUnit(id))?;
        let start = grid
            .nearest_coord(unit.position())
            .ok_or(OrderError::EmptyGrid)?;

        let result = finder.search(grid, start, goal, budget)?;
        if result.path.len() < 2 {
            return Err(OrderError::Degenerate);
        }

        unit.mover.set_path(result.path.waypoints().to_vec());
        tracing::debug!(
            "unit {:?} ordered {} -> {} ({} waypoints)",
            id,
            start,
            goal,
            result.path.len()
        );

        let waypoints = result.path.len();
        self.current_path = result.path;
        Ok(waypoints)
    }

    /// Tick every unit. Returns the events of units that did something.
    pub fn update(&mut self, delta_time: f32) -> Vec<(UnitId, TickEvent)> {
        self.units
            .iter_mut()
            .map(|u| (u.id, u.mover.tick(delta_time)))
            .filter(|(_, event)| *event != TickEvent::Idle)
            .collect()
    }

    pub fn any_moving(&self) -> bool {
        self.units.iter().any(|u| u.mover.is_moving())
    }
}
