//! Properties every generated level must satisfy, checked over many seeds

use dg_core::dungeon::{
    CellType, Direction, Glyphs, Grid, MapRenderer, connect_rooms, generate_level,
    is_valid_direction, place_rooms,
};
use dg_core::{DEFAULT_MAX_DRAWS, GameRng, GenerationConfig};
use proptest::prelude::*;

fn assert_reciprocal(grid: &Grid) {
    let size = grid.size();
    for (x, y) in grid.positions() {
        for dir in Direction::ALL {
            let here = grid.cell(x, y).has_connection(dir);
            match dir.step(x, y, size) {
                Some((nx, ny)) => {
                    let there = grid.cell(nx, ny).has_connection(dir.opposite());
                    assert_eq!(here, there, "({}, {}) {} vs ({}, {})", x, y, dir, nx, ny);
                }
                None => assert!(!here, "({}, {}) links {} off the grid", x, y, dir),
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_level_invariants(seed in any::<u64>()) {
        let level = generate_level(&GenerationConfig::default(), &mut GameRng::new(seed)).unwrap();
        let grid = &level.grid;

        prop_assert!((2..=10).contains(&level.room_count));
        prop_assert_eq!(grid.room_count(), level.room_count);
        prop_assert_eq!(grid.count_type(CellType::None), 0);
        prop_assert!(grid.are_all_rooms_connected());
        assert_reciprocal(grid);

        let starts: Vec<_> = grid
            .positions()
            .filter(|&(x, y)| grid.cell(x, y).is_start())
            .collect();
        let teleports: Vec<_> = grid
            .positions()
            .filter(|&(x, y)| grid.cell(x, y).has_teleport())
            .collect();
        prop_assert_eq!(starts.len(), 1);
        prop_assert_eq!(teleports.len(), 1);
        prop_assert!(grid.cell(starts[0].0, starts[0].1).is_room());
        prop_assert!(grid.cell(teleports[0].0, teleports[0].1).is_room());

        // Only corridors and rooms carry links; corridors always do
        for (x, y) in grid.positions() {
            let cell = grid.cell(x, y);
            match cell.typ {
                CellType::Corridor => {
                    prop_assert!(cell.is_connected());
                }
                CellType::Empty => {
                    prop_assert!(!cell.is_connected());
                }
                CellType::Room => {}
                CellType::None => unreachable!(),
            }
        }
    }

    #[test]
    fn prop_placement_only_creates_rooms(seed in any::<u64>(), count in 2usize..=10) {
        let mut rng = GameRng::new(seed);
        let mut grid = Grid::new(4);
        place_rooms(&mut grid, count, &mut rng, DEFAULT_MAX_DRAWS).unwrap();
        prop_assert_eq!(grid.room_count(), count);
        prop_assert_eq!(grid.count_type(CellType::Empty), 16 - count);

        // Connecting never adds or removes rooms
        let rooms_before: Vec<_> = grid.rooms().collect();
        connect_rooms(&mut grid, &mut rng, DEFAULT_MAX_DRAWS).unwrap();
        let rooms_after: Vec<_> = grid.rooms().collect();
        prop_assert_eq!(rooms_before, rooms_after);
        prop_assert!(grid.check_invariants().is_ok());
    }

    #[test]
    fn prop_valid_direction_monotonic(seed in any::<u64>(), count in 1usize..=10) {
        let mut grid = Grid::new(4);
        place_rooms(&mut grid, count, &mut GameRng::new(seed), DEFAULT_MAX_DRAWS).unwrap();

        // Stepping back against the scan direction only widens the scanned area
        for (x, y) in grid.positions() {
            for dir in Direction::ALL {
                if !is_valid_direction(&grid, x, y, dir) {
                    continue;
                }
                if let Some((bx, by)) = dir.opposite().step(x, y, 4) {
                    prop_assert!(is_valid_direction(&grid, bx, by, dir));
                }
            }
        }
    }

    #[test]
    fn prop_render_shape_and_purity(seed in any::<u64>()) {
        let level = generate_level(&GenerationConfig::default(), &mut GameRng::new(seed)).unwrap();
        let renderer = MapRenderer::new(Glyphs::ASCII);

        let map = renderer.render(&level.grid);
        prop_assert_eq!(&map, &renderer.render(&level.grid));

        let lines: Vec<&str> = map.lines().collect();
        prop_assert_eq!(lines.len(), 12);
        for (row, line) in lines.iter().enumerate() {
            prop_assert_eq!(line.len(), 12);
            for (col, c) in line.chars().enumerate() {
                if row % 3 != 1 && col % 3 != 1 {
                    prop_assert_eq!(c, '.');
                }
            }
        }

        // Each room shows exactly one center glyph
        let centers = map.chars().filter(|c| matches!(c, 'O' | '@' | 'T' | '&')).count();
        prop_assert_eq!(centers, level.room_count);
    }

    #[test]
    fn prop_larger_grids(seed in any::<u64>(), grid_size in 4usize..=8) {
        let config = GenerationConfig {
            grid_size,
            room_mean: 8,
            room_sigma: 5,
            ..GenerationConfig::default()
        };
        let level = generate_level(&config, &mut GameRng::new(seed)).unwrap();
        prop_assert_eq!(level.grid.size(), grid_size);
        prop_assert!((3..=13).contains(&level.room_count));
        prop_assert!(level.grid.check_markers().is_ok());
        assert_reciprocal(&level.grid);
    }
}

#[test]
fn test_forced_corners_every_touched_cell_is_corridor() {
    for seed in 0..200 {
        let mut grid = Grid::with_rooms(4, &[(0, 0), (3, 3)]);
        connect_rooms(&mut grid, &mut GameRng::new(seed), DEFAULT_MAX_DRAWS).unwrap();

        for (x, y) in grid.positions() {
            let cell = grid.cell(x, y);
            if (x, y) == (0, 0) || (x, y) == (3, 3) {
                assert_eq!(cell.typ, CellType::Room);
                assert!(cell.is_connected());
            } else if cell.is_connected() {
                assert_eq!(cell.typ, CellType::Corridor);
            }
        }
        assert_reciprocal(&grid);
    }
}
