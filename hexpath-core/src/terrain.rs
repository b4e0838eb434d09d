//! Terrain kinds and their traversal costs

use serde::{Deserialize, Serialize};

/// Kind of terrain covering a tile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    #[default]
    Plains,
    Hills,
    Mountain,
    Forest,
    Water,
}

/// Every terrain kind, in declaration order
pub const TERRAIN_KINDS: [TerrainKind; 5] = [
    TerrainKind::Plains,
    TerrainKind::Hills,
    TerrainKind::Mountain,
    TerrainKind::Forest,
    TerrainKind::Water,
];

impl TerrainKind {
    /// Cost of entering a tile of this kind.
    ///
    /// Blocked kinds report `f32::INFINITY`; callers are expected to gate on
    /// [`TerrainKind::is_walkable`] before adding costs.
    pub fn movement_cost(self) -> f32 {
        match self {
            TerrainKind::Plains => 1.0,
            TerrainKind::Forest => 1.5,
            TerrainKind::Hills => 2.0,
            TerrainKind::Mountain | TerrainKind::Water => f32::INFINITY,
        }
    }

    pub fn is_walkable(self) -> bool {
        !matches!(self, TerrainKind::Mountain | TerrainKind::Water)
    }

    /// Single-character map symbol
    pub fn symbol(self) -> char {
        match self {
            TerrainKind::Plains => 'P',
            TerrainKind::Hills => 'H',
            TerrainKind::Mountain => 'M',
            TerrainKind::Forest => 'F',
            TerrainKind::Water => 'W',
        }
    }

    /// Parse a map symbol (case-insensitive)
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'P' => Some(TerrainKind::Plains),
            'H' => Some(TerrainKind::Hills),
            'M' => Some(TerrainKind::Mountain),
            'F' => Some(TerrainKind::Forest),
            'W' => Some(TerrainKind::Water),
            _ => None,
        }
    }
}
