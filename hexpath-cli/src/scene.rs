//! Shared map-source arguments and scene loading for every command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexpath_core::{GridCoord, HexGrid, MapConfig, ScenarioConfig, DEFAULT_HEX_SIZE};

/// Where the map comes from: a scenario file or a generated map
#[derive(Args, Clone, Debug)]
pub struct MapSourceArgs {
    /// Scenario JSON file (map, movement, search and units)
    #[arg(long, value_name = "FILE")]
    pub scenario: Option<PathBuf>,

    /// Generated map width in tiles
    #[arg(long, default_value = "40", conflicts_with = "scenario")]
    pub columns: usize,

    /// Generated map height in tiles
    #[arg(long, default_value = "30", conflicts_with = "scenario")]
    pub rows: usize,

    /// Hex size in world units
    #[arg(long, default_value_t = DEFAULT_HEX_SIZE, conflicts_with = "scenario")]
    pub hex_size: f32,
}

/// A loaded scenario and the grid it describes
pub struct Scene {
    pub config: ScenarioConfig,
    pub grid: HexGrid,
}

/// Load the scenario (file or generated) and build its grid.
///
/// `seed` overrides the map seed of either source.
pub fn load_scene(args: &MapSourceArgs, seed: Option<u64>) -> Result<Scene> {
    let mut config = match &args.scenario {
        Some(path) => ScenarioConfig::load(path)?,
        None => generated_scenario(args)?,
    };
    if let Some(seed) = seed {
        config.map.seed = seed;
    }

    let grid = config
        .map
        .build_grid()
        .with_context(|| format!("Failed to build map for scenario '{}'", config.name))?;

    tracing::info!(
        "Loaded map '{}': {}x{} tiles, hex size {}",
        config.name,
        grid.columns(),
        grid.rows(),
        grid.layout().hex_size
    );

    Ok(Scene { config, grid })
}

fn generated_scenario(args: &MapSourceArgs) -> Result<ScenarioConfig> {
    let config = ScenarioConfig {
        name: "generated".to_string(),
        map: MapConfig {
            columns: args.columns,
            rows: args.rows,
            hex_size: args.hex_size,
            ..Default::default()
        },
        ..Default::default()
    };
    config.validate()?;
    Ok(config)
}

/// Parse a `C,R` tile coordinate
pub fn parse_coord(s: &str) -> Result<GridCoord, String> {
    let (column, row) = s
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN,ROW, got '{}'", s))?;
    let column = column
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad column '{}': {}", column.trim(), e))?;
    let row = row
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad row '{}': {}", row.trim(), e))?;
    Ok(GridCoord::new(column, row))
}
