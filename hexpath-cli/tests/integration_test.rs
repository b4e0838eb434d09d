//! Integration tests for the HEXPATH movement engine
//!
//! Tests the full stack: scenario config, grid, path search, movement and
//! the unit roster working together

use hexpath_core::{
    find_path, mapgen, GridCoord, HexGrid, HexLayout, OrderError, PathError, PathFinder,
    ScenarioConfig, TerrainKind, TickEvent, UnitKind, UnitRoster,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Plains with a water river down column 3, fordable only at row 4
fn river_scenario() -> ScenarioConfig {
    ScenarioConfig::from_json(
        r#"{
            "name": "river",
            "map": {
                "terrain": [
                    "PPPWPPP",
                    "PPPWPPP",
                    "PFPWPHP",
                    "PPPWPPP",
                    "PPPPPPP",
                    "PPPWPPP"
                ]
            },
            "movement": { "speed": 240.0, "movement_budget": 100.0 },
            "units": [
                { "kind": "Settler", "column": 0, "row": 0 },
                { "kind": "Warrior", "column": 6, "row": 5 }
            ]
        }"#,
    )
    .unwrap()
}

fn random_walkable(grid: &HexGrid, rng: &mut ChaCha8Rng) -> GridCoord {
    loop {
        let coord = GridCoord::new(
            rng.gen_range(0..grid.columns() as i32),
            rng.gen_range(0..grid.rows() as i32),
        );
        if grid.is_walkable(coord) {
            return coord;
        }
    }
}

fn is_adjacent(a: GridCoord, b: GridCoord) -> bool {
    a.adjacent().any(|n| n == b)
}

// ============================================================================
// PATH SEARCH ON SCENARIO MAPS
// ============================================================================

#[test]
fn test_route_uses_the_ford() {
    let config = river_scenario();
    let grid = config.map.build_grid().unwrap();
    let result = config
        .pathfinder()
        .search(&grid, GridCoord::new(0, 0), GridCoord::new(6, 0), 100.0)
        .unwrap();

    assert!(result.tiles.contains(&GridCoord::new(3, 4)));
    for tile in &result.tiles {
        assert!(grid.is_walkable(*tile), "route crosses {}", tile);
    }
    for pair in result.tiles.windows(2) {
        assert!(is_adjacent(pair[0], pair[1]), "{} -> {} is not a step", pair[0], pair[1]);
    }
}

#[test]
fn test_tight_budget_cannot_reach_far_bank() {
    let config = river_scenario();
    let grid = config.map.build_grid().unwrap();
    let path = find_path(&grid, GridCoord::new(0, 0), GridCoord::new(6, 0), 4.0);
    assert!(path.is_empty());
}

#[test]
fn test_waypoints_are_tile_centers() {
    let config = river_scenario();
    let grid = config.map.build_grid().unwrap();
    let result = PathFinder::default()
        .search(&grid, GridCoord::new(0, 5), GridCoord::new(2, 0), 100.0)
        .unwrap();

    assert_eq!(result.tiles.len(), result.path.len());
    for (tile, point) in result.tiles.iter().zip(result.path.iter()) {
        assert_eq!(grid.spatial_center(*tile), Some(*point));
    }
}

// ============================================================================
// RANDOM MAPS
// ============================================================================

#[test]
fn test_random_routes_are_valid() {
    let grid = mapgen::generate(40, 30, HexLayout::default(), 11);
    let finder = PathFinder::default();
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let mut found = 0;
    for _ in 0..50 {
        let start = random_walkable(&grid, &mut rng);
        let goal = random_walkable(&grid, &mut rng);
        let budget = 40.0;

        match finder.search(&grid, start, goal, budget) {
            Ok(result) => {
                found += 1;
                assert_eq!(result.tiles.first(), Some(&start));
                assert_eq!(result.tiles.last(), Some(&goal));
                assert!(result.cost <= budget);

                let cost: f32 = result.tiles[1..]
                    .iter()
                    .map(|&c| grid.movement_cost(c))
                    .sum();
                assert!((cost - result.cost).abs() < 1e-3);

                for pair in result.tiles.windows(2) {
                    assert!(is_adjacent(pair[0], pair[1]));
                }
            }
            Err(e) => assert!(matches!(e, PathError::Unreachable { .. })),
        }
    }
    assert!(found > 0);
}

#[test]
fn test_search_is_deterministic() {
    let grid = mapgen::generate(30, 30, HexLayout::default(), 5);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..10 {
        let start = random_walkable(&grid, &mut rng);
        let goal = random_walkable(&grid, &mut rng);
        let a = find_path(&grid, start, goal, 60.0);
        let b = find_path(&grid, start, goal, 60.0);
        assert_eq!(a, b);
    }
}

#[test]
fn test_expansion_cap_bounds_work() {
    // Goal walled in: an uncapped search floods the whole map
    let grid = HexGrid::new(50, 50, HexLayout::default(), |c| {
        let near = (c.column - 49).abs() <= 1 && (c.row - 49).abs() <= 1;
        if near && c != GridCoord::new(49, 49) {
            TerrainKind::Mountain
        } else {
            TerrainKind::Plains
        }
    });

    let capped = PathFinder::with_max_expansions(100).search(
        &grid,
        GridCoord::new(0, 0),
        GridCoord::new(49, 49),
        f32::INFINITY,
    );
    assert_eq!(capped, Err(PathError::ExpansionLimit { limit: 100 }));

    let uncapped = PathFinder::default().search(
        &grid,
        GridCoord::new(0, 0),
        GridCoord::new(49, 49),
        f32::INFINITY,
    );
    assert!(matches!(uncapped, Err(PathError::Unreachable { .. })));
}

// ============================================================================
// ROSTER + MOVEMENT
// ============================================================================

#[test]
fn test_scenario_units_walk_to_goal() {
    let config = river_scenario();
    let grid = config.map.build_grid().unwrap();
    let finder = config.pathfinder();
    let mut roster = config.build_roster(&grid).unwrap();
    assert_eq!(roster.len(), 2);

    // Click on the settler, then on the far bank
    let settler_at = grid.spatial_center(GridCoord::new(0, 0)).unwrap();
    let settler = roster.select_at(settler_at).unwrap();
    assert_eq!(roster.selected().map(|u| u.kind), Some(UnitKind::Settler));

    let goal = GridCoord::new(6, 1);
    let target = grid.spatial_center(goal).unwrap();
    let waypoints = roster.order_move(&grid, &finder, target).unwrap();
    assert_eq!(roster.current_path().len(), waypoints);

    let mut arrivals = 0;
    let mut reached = 0;
    for _ in 0..5_000 {
        for (id, event) in roster.update(1.0 / 30.0) {
            assert_eq!(id, settler);
            match event {
                TickEvent::Reached { .. } => reached += 1,
                TickEvent::Arrived => arrivals += 1,
                _ => {}
            }
        }
        if !roster.any_moving() {
            break;
        }
    }

    assert_eq!(arrivals, 1);
    assert_eq!(reached + arrivals, waypoints);
    assert_eq!(roster.get(settler).map(|u| u.position()), Some(target));
}

#[test]
fn test_order_into_river_is_refused() {
    let config = river_scenario();
    let grid = config.map.build_grid().unwrap();
    let mut roster = config.build_roster(&grid).unwrap();

    let warrior_at = grid.spatial_center(GridCoord::new(6, 5)).unwrap();
    assert!(roster.select_at(warrior_at).is_some());

    let water = grid.spatial_center(GridCoord::new(3, 2)).unwrap();
    let err = roster
        .order_move(&grid, &config.pathfinder(), water)
        .unwrap_err();
    assert!(matches!(err, OrderError::Path(PathError::GoalBlocked(_))));
    assert!(roster.current_path().is_empty());
    assert!(!roster.any_moving());
}

#[test]
fn test_click_on_empty_ground_deselects() {
    let config = river_scenario();
    let grid = config.map.build_grid().unwrap();
    let mut roster = config.build_roster(&grid).unwrap();

    let settler_at = grid.spatial_center(GridCoord::new(0, 0)).unwrap();
    assert!(roster.select_at(settler_at).is_some());

    let empty = grid.spatial_center(GridCoord::new(3, 4)).unwrap();
    assert!(roster.select_at(empty).is_none());

    let err = roster
        .order_move(&grid, &config.pathfinder(), settler_at)
        .unwrap_err();
    assert!(matches!(err, OrderError::NoSelection));
}
