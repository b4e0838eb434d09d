//! Hex terrain grid with offset coordinates

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::layout::HexLayout;
use crate::terrain::TerrainKind;

/// Offset grid coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub column: i32,
    pub row: i32,
}

impl GridCoord {
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Offset table for this coordinate's column parity
    pub fn neighbor_offsets(&self) -> &'static [(i32, i32); 6] {
        if self.column.rem_euclid(2) == 0 {
            &EVEN_COLUMN_NEIGHBORS
        } else {
            &ODD_COLUMN_NEIGHBORS
        }
    }

    /// The adjacent coordinates, bounds not checked. Offsets that would
    /// leave the i32 range are dropped.
    pub fn adjacent(self) -> impl Iterator<Item = GridCoord> {
        self.neighbor_offsets().iter().filter_map(move |&(dc, dr)| {
            Some(GridCoord::new(
                self.column.checked_add(dc)?,
                self.row.checked_add(dr)?,
            ))
        })
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Neighbor offsets (dcolumn, drow) for even columns.
/// Order is significant: it decides search tie-breaks.
pub const EVEN_COLUMN_NEIGHBORS: [(i32, i32); 6] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, 0),
    (0, 1),
    (1, 1),
];

/// Neighbor offsets (dcolumn, drow) for odd columns
pub const ODD_COLUMN_NEIGHBORS: [(i32, i32); 6] = [
    (1, 0),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

/// A single grid cell
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainKind,
    center: Vec2,
}

impl Tile {
    pub fn movement_cost(&self) -> f32 {
        self.terrain.movement_cost()
    }

    pub fn is_walkable(&self) -> bool {
        self.terrain.is_walkable()
    }

    /// World-space center, fixed at grid construction
    pub fn center(&self) -> Vec2 {
        self.center
    }
}

/// Errors raised while building a grid
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("grid has no tiles")]
    Empty,

    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown terrain symbol {symbol:?} at column {column}, row {row}")]
    UnknownSymbol {
        symbol: char,
        column: usize,
        row: usize,
    },
}

// ============================================================================
// GRID
// ============================================================================

/// Rectangular terrain grid, read-only once built
#[derive(Clone, Debug)]
pub struct HexGrid {
    columns: usize,
    rows: usize,
    /// Column-major: index = column * rows + row
    tiles: Vec<Tile>,
    layout: HexLayout,
}

impl HexGrid {
    /// Build a grid, asking `terrain` for the kind of every tile
    pub fn new<F>(columns: usize, rows: usize, layout: HexLayout, mut terrain: F) -> Self
    where
        F: FnMut(GridCoord) -> TerrainKind,
    {
        let mut tiles = Vec::with_capacity(columns * rows);
        for column in 0..columns {
            for row in 0..rows {
                let coord = GridCoord::new(column as i32, row as i32);
                tiles.push(Tile {
                    terrain: terrain(coord),
                    center: layout.center(coord),
                });
            }
        }
        Self {
            columns,
            rows,
            tiles,
            layout,
        }
    }

    /// Grid covered by a single terrain kind
    pub fn filled(columns: usize, rows: usize, layout: HexLayout, kind: TerrainKind) -> Self {
        Self::new(columns, rows, layout, |_| kind)
    }

    /// Parse a text map: one string per row, one symbol per column.
    /// Whitespace inside a row is ignored.
    pub fn from_rows<S: AsRef<str>>(lines: &[S], layout: HexLayout) -> Result<Self, GridError> {
        let mut parsed: Vec<Vec<TerrainKind>> = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let kinds = line
                .as_ref()
                .chars()
                .filter(|c| !c.is_whitespace())
                .enumerate()
                .map(|(column, symbol)| {
                    TerrainKind::from_symbol(symbol).ok_or(GridError::UnknownSymbol {
                        symbol,
                        column,
                        row,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push(kinds);
        }

        let columns = parsed.first().map(Vec::len).unwrap_or(0);
        if columns == 0 {
            return Err(GridError::Empty);
        }
        if let Some((row, kinds)) = parsed.iter().enumerate().find(|(_, k)| k.len() != columns) {
            return Err(GridError::RaggedRow {
                row,
                expected: columns,
                found: kinds.len(),
            });
        }

        let rows = parsed.len();
        Ok(Self::new(columns, rows, layout, |coord| {
            parsed[coord.row as usize][coord.column as usize]
        }))
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn layout(&self) -> HexLayout {
        self.layout
    }

    /// Check if a coordinate lies inside the grid
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.column >= 0
            && coord.row >= 0
            && (coord.column as usize) < self.columns
            && (coord.row as usize) < self.rows
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.column as usize * self.rows + coord.row as usize)
        } else {
            None
        }
    }

    pub fn tile(&self, coord: GridCoord) -> Option<&Tile> {
        self.index(coord).map(|i| &self.tiles[i])
    }

    pub fn terrain(&self, coord: GridCoord) -> Option<TerrainKind> {
        self.tile(coord).map(|t| t.terrain)
    }

    /// Iterate coordinates in storage order (column by column)
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let rows = self.rows;
        (0..self.tiles.len()).map(move |i| GridCoord::new((i / rows) as i32, (i % rows) as i32))
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// In bounds and not Water/Mountain
    pub fn is_walkable(&self, coord: GridCoord) -> bool {
        self.tile(coord).is_some_and(Tile::is_walkable)
    }

    /// Cost of entering `coord`; infinite when blocked or off the grid
    pub fn movement_cost(&self, coord: GridCoord) -> f32 {
        self.tile(coord)
            .map(Tile::movement_cost)
            .unwrap_or(f32::INFINITY)
    }

    /// Walkable neighbors of `coord`, in parity-table order
    pub fn neighbors(&self, coord: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        coord.adjacent().filter(move |&n| self.is_walkable(n))
    }

    pub fn spatial_center(&self, coord: GridCoord) -> Option<Vec2> {
        self.tile(coord).map(Tile::center)
    }

    /// Coordinate whose tile center is closest to `point`
    pub fn nearest_coord(&self, point: Vec2) -> Option<GridCoord> {
        self.coords()
            .zip(self.tiles.iter())
            .map(|(coord, tile)| (coord, tile.center.distance_squared(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(coord, _)| coord)
    }

    /// Text form accepted by [`HexGrid::from_rows`]
    pub fn render_rows(&self) -> Vec<String> {
        (0..self.rows as i32)
            .map(|row| {
                (0..self.columns as i32)
                    .filter_map(|column| self.terrain(GridCoord::new(column, row)))
                    .map(TerrainKind::symbol)
                    .collect()
            })
            .collect()
    }
}
