//! Seeded random terrain generation

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::grid::HexGrid;
use crate::layout::HexLayout;
use crate::terrain::{TerrainKind, TERRAIN_KINDS};

/// Cumulative percentage thresholds for a d100 roll
const TERRAIN_ROLLS: [(u32, TerrainKind); 5] = [
    (60, TerrainKind::Plains),
    (75, TerrainKind::Forest),
    (85, TerrainKind::Hills),
    (95, TerrainKind::Water),
    (100, TerrainKind::Mountain),
];

/// Pick a terrain kind with the standard distribution
/// (Plains 60%, Forest 15%, Hills 10%, Water 10%, Mountain 5%)
pub fn roll_terrain<R: Rng>(rng: &mut R) -> TerrainKind {
    let roll = rng.gen_range(0..100u32);
    TERRAIN_ROLLS
        .iter()
        .find(|(limit, _)| roll < *limit)
        .map(|&(_, kind)| kind)
        .unwrap_or(TerrainKind::Plains)
}

/// Generate a random map. The same seed always yields the same map.
pub fn generate(columns: usize, rows: usize, layout: HexLayout, seed: u64) -> HexGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    HexGrid::new(columns, rows, layout, |_| roll_terrain(&mut rng))
}

/// Number of tiles of each kind, in [`TERRAIN_KINDS`] order
pub fn terrain_counts(grid: &HexGrid) -> [(TerrainKind, usize); 5] {
    let mut counts = TERRAIN_KINDS.map(|kind| (kind, 0usize));
    for coord in grid.coords() {
        if let Some(kind) = grid.terrain(coord) {
            if let Some(entry) = counts.iter_mut().find(|(k, _)| *k == kind) {
                entry.1 += 1;
            }
        }
    }
    counts
}
