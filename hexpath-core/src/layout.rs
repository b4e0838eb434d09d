//! Pixel layout of tile centers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::GridCoord;

/// Default hex radius in world units
pub const DEFAULT_HEX_SIZE: f32 = 30.0;

const SQRT_3: f32 = 1.732_050_8;

/// Maps grid coordinates to world-space tile centers.
///
/// Rows are stacked at `1.5 * size` and every odd row is shifted right by
/// half a tile width, giving the zig-zag tiling the maps are drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HexLayout {
    pub hex_size: f32,
}

impl HexLayout {
    pub const fn new(hex_size: f32) -> Self {
        Self { hex_size }
    }

    /// Horizontal distance between neighboring centers in one row
    pub fn tile_width(&self) -> f32 {
        SQRT_3 * self.hex_size
    }

    /// Vertical distance between consecutive rows
    pub fn row_spacing(&self) -> f32 {
        1.5 * self.hex_size
    }

    /// World-space center of a tile
    pub fn center(&self, coord: GridCoord) -> Vec2 {
        let shift = if coord.row.rem_euclid(2) == 1 { 0.5 } else { 0.0 };
        Vec2::new(
            self.tile_width() * (coord.column as f32 + shift),
            self.row_spacing() * coord.row as f32,
        )
    }
}

impl Default for HexLayout {
    fn default() -> Self {
        Self::new(DEFAULT_HEX_SIZE)
    }
}
