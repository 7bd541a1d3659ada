//! Level generation
//!
//! Runs the three phases over a fresh grid:
//! 1. Place the sampled number of rooms on random empty cells
//! 2. Until every room has a link, walk from a random unlinked room,
//!    carving toward rooms until the walk runs out of directions
//! 3. Mark a random room as the start and another (possibly the same) as
//!    the teleporter
//!
//! Every random pick is rejection sampling over uniform draws, capped at
//! `max_draws` per pick.

use serde::Serialize;
use tracing::{debug, info, trace};

use super::cell::{Cell, CellFlags, CellType};
use super::direction::Direction;
use super::grid::Grid;
use super::reachability::{has_available_connections, is_valid_direction};
use super::render::{Glyphs, MapRenderer};
use super::room_count::RoomCountSampler;
use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::rng::RandomSource;

/// A finished level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedLevel {
    /// Sampled number of rooms
    pub room_count: usize,
    pub grid: Grid,
}

impl GeneratedLevel {
    /// Render the level's map with the given glyphs
    pub fn render(&self, glyphs: Glyphs) -> String {
        MapRenderer::new(glyphs).render(&self.grid)
    }
}

/// Generate a complete level
pub fn generate_level<R: RandomSource + ?Sized>(
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<GeneratedLevel, GenerationError> {
    config.validate()?;

    let sampled = RoomCountSampler::from_config(config).sample(rng, config.max_draws)?;
    // Validation keeps the band at or above MIN_ROOM_COUNT
    let room_count = usize::try_from(sampled).unwrap_or_default();
    info!(room_count, "Number of rooms: {}", room_count);

    let mut grid = Grid::new(config.grid_size);
    place_rooms(&mut grid, room_count, rng, config.max_draws)?;
    connect_rooms(&mut grid, rng, config.max_draws)?;
    assign_markers(&mut grid, rng, config.max_draws)?;
    grid.check_markers()?;

    info!("Dungeon generation finished");
    Ok(GeneratedLevel { room_count, grid })
}

/// Place `count` rooms on distinct random empty cells
pub fn place_rooms<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    count: usize,
    rng: &mut R,
    max_draws: u32,
) -> Result<(), GenerationError> {
    for _ in 0..count {
        let (x, y) = pick_cell(grid, rng, max_draws, "placing a room", |cell| {
            cell.typ == CellType::Empty
        })?;
        grid.place_room(x, y);
        trace!(x, y, "placed room");
    }
    debug!(rooms = grid.room_count(), "placement done");
    Ok(())
}

/// Carve paths until every room has at least one link
///
/// Rooms only need a link each; the rooms are not guaranteed to form a
/// single network.
pub fn connect_rooms<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    max_draws: u32,
) -> Result<(), GenerationError> {
    while !grid.are_all_rooms_connected() {
        let (x, y) = pick_cell(grid, rng, max_draws, "picking an unlinked room", |cell| {
            cell.is_room() && !cell.is_connected()
        })?;

        // Only a room alone on the grid has nowhere to go
        if !has_available_connections(grid, x, y) {
            return Err(GenerationError::IsolatedRoom { x, y });
        }

        let steps = carve_path(grid, x, y, rng, max_draws)?;
        debug!(x, y, steps, "carved path");
    }
    Ok(())
}

/// Random walk from `(x, y)`, carving a link at every step
///
/// Each step picks a random direction that is not yet carved and leads toward
/// a room, carves it and moves along. The walk stops where no such direction
/// is left. Returns the number of steps taken.
///
/// Every step sets a link that was unset, so a walk takes at most
/// `4·size²` steps.
pub fn carve_path<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    x: usize,
    y: usize,
    rng: &mut R,
    max_draws: u32,
) -> Result<usize, GenerationError> {
    let (mut px, mut py) = (x, y);
    let mut steps = 0;

    while has_available_connections(grid, px, py) {
        let dir = pick_direction(grid, px, py, rng, max_draws)?;

        // A valid direction always has a room beyond it, so the step stays on the grid
        let (nx, ny) = grid.carve(px, py, dir).ok_or_else(|| {
            GenerationError::InvariantViolated(format!("({px}, {py}) carved {dir} off the grid"))
        })?;
        trace!(from_x = px, from_y = py, %dir, "carve");

        (px, py) = (nx, ny);
        steps += 1;
    }

    Ok(steps)
}

/// Mark one random room as the start and one as the teleporter
pub fn assign_markers<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    max_draws: u32,
) -> Result<(), GenerationError> {
    let (sx, sy) = pick_cell(grid, rng, max_draws, "picking the start room", Cell::is_room)?;
    grid.mark(sx, sy, CellFlags::START);

    let (tx, ty) = pick_cell(grid, rng, max_draws, "picking the teleport room", Cell::is_room)?;
    grid.mark(tx, ty, CellFlags::TELEPORT);

    debug!(start = ?(sx, sy), teleport = ?(tx, ty), "markers placed");
    Ok(())
}

/// Draw uniform cells until one passes `accept`
fn pick_cell<R, F>(
    grid: &Grid,
    rng: &mut R,
    max_draws: u32,
    stage: &'static str,
    accept: F,
) -> Result<(usize, usize), GenerationError>
where
    R: RandomSource + ?Sized,
    F: Fn(&Cell) -> bool,
{
    for _ in 0..max_draws {
        let (x, y) = rng.random_cell(grid.size());
        if accept(grid.cell(x, y)) {
            return Ok((x, y));
        }
    }
    Err(GenerationError::DrawLimitExceeded {
        stage,
        draws: max_draws,
    })
}

/// Draw uniform directions until one is uncarved and leads toward a room
fn pick_direction<R: RandomSource + ?Sized>(
    grid: &Grid,
    x: usize,
    y: usize,
    rng: &mut R,
    max_draws: u32,
) -> Result<Direction, GenerationError> {
    for _ in 0..max_draws {
        let Some(dir) = Direction::from_index(rng.rn2(4) as usize) else {
            continue;
        };
        if !grid.cell(x, y).has_connection(dir) && is_valid_direction(grid, x, y, dir) {
            return Ok(dir);
        }
    }
    Err(GenerationError::DrawLimitExceeded {
        stage: "picking a direction",
        draws: max_draws,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Connections;
    use crate::rng::GameRng;
    use crate::DEFAULT_MAX_DRAWS;

    /// Cells reachable from `(x, y)` by following links
    fn linked_component(grid: &Grid, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut seen = vec![(x, y)];
        let mut stack = vec![(x, y)];
        while let Some((cx, cy)) = stack.pop() {
            for dir in Direction::ALL {
                if !grid.cell(cx, cy).has_connection(dir) {
                    continue;
                }
                if let Some(next) = dir.step(cx, cy, grid.size()) {
                    if !seen.contains(&next) {
                        seen.push(next);
                        stack.push(next);
                    }
                }
            }
        }
        seen
    }

    #[test]
    fn test_place_rooms_exact_count() {
        let mut rng = GameRng::new(42);
        for count in [2, 6, 10, 16] {
            let mut grid = Grid::new(4);
            place_rooms(&mut grid, count, &mut rng, DEFAULT_MAX_DRAWS).unwrap();
            assert_eq!(grid.room_count(), count);
            assert_eq!(grid.count_type(CellType::Empty), 16 - count);
        }
    }

    #[test]
    fn test_place_too_many_rooms_fails() {
        let mut rng = GameRng::new(42);
        let mut grid = Grid::new(2);
        let err = place_rooms(&mut grid, 5, &mut rng, 200).unwrap_err();
        assert_eq!(
            err,
            GenerationError::DrawLimitExceeded {
                stage: "placing a room",
                draws: 200,
            }
        );
        assert_eq!(grid.room_count(), 4);
    }

    #[test]
    fn test_carve_path_single_link() {
        let mut rng = GameRng::new(42);
        let mut grid = Grid::with_rooms(4, &[(0, 0), (1, 0)]);

        let steps = carve_path(&mut grid, 0, 0, &mut rng, DEFAULT_MAX_DRAWS).unwrap();
        assert_eq!(steps, 1);
        assert_eq!(grid.cell(0, 0).connections, Connections::RIGHT);
        assert_eq!(grid.cell(1, 0).connections, Connections::LEFT);
        assert_eq!(grid.count_type(CellType::Corridor), 0);
    }

    #[test]
    fn test_carve_path_through_empty_cell() {
        let mut rng = GameRng::new(7);
        let mut grid = Grid::with_rooms(4, &[(0, 0), (2, 0)]);

        let steps = carve_path(&mut grid, 0, 0, &mut rng, DEFAULT_MAX_DRAWS).unwrap();
        assert_eq!(steps, 2);
        assert_eq!(grid.cell(1, 0).typ, CellType::Corridor);
        assert_eq!(
            grid.cell(1, 0).connections,
            Connections::LEFT | Connections::RIGHT
        );
        assert_eq!(grid.cell(2, 0).typ, CellType::Room);
        assert!(grid.check_invariants().is_ok());
    }

    #[test]
    fn test_carve_path_without_directions_is_noop() {
        let mut rng = GameRng::new(42);
        let mut grid = Grid::with_rooms(4, &[(1, 1)]);
        assert_eq!(carve_path(&mut grid, 1, 1, &mut rng, 10), Ok(0));
        assert!(!grid.is_connected(1, 1));
    }

    #[test]
    fn test_connect_opposite_corners() {
        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            let mut grid = Grid::with_rooms(4, &[(0, 0), (3, 3)]);

            connect_rooms(&mut grid, &mut rng, DEFAULT_MAX_DRAWS).unwrap();

            assert!(grid.are_all_rooms_connected());
            assert_eq!(grid.cell(0, 0).typ, CellType::Room);
            assert_eq!(grid.cell(3, 3).typ, CellType::Room);
            assert_eq!(grid.room_count(), 2);
            assert!(grid.check_invariants().is_ok());

            // Two rooms in opposite corners can't be linked without corridors
            assert!(grid.count_type(CellType::Corridor) > 0);

            // Every carved cell belongs to a path that starts at a room
            let mut covered = linked_component(&grid, 0, 0);
            covered.extend(linked_component(&grid, 3, 3));
            for (x, y) in grid.positions() {
                if grid.is_connected(x, y) {
                    assert!(
                        covered.contains(&(x, y)),
                        "seed {}: stray link at ({}, {})",
                        seed,
                        x,
                        y
                    );
                } else {
                    assert_eq!(grid.cell(x, y).typ, CellType::Empty);
                }
            }
        }
    }

    #[test]
    fn test_connect_lone_room_is_an_error() {
        let mut rng = GameRng::new(42);
        let mut grid = Grid::with_rooms(4, &[(2, 1)]);
        assert_eq!(
            connect_rooms(&mut grid, &mut rng, DEFAULT_MAX_DRAWS),
            Err(GenerationError::IsolatedRoom { x: 2, y: 1 })
        );
    }

    #[test]
    fn test_connect_with_no_rooms_is_noop() {
        let mut rng = GameRng::new(42);
        let mut grid = Grid::new(4);
        connect_rooms(&mut grid, &mut rng, DEFAULT_MAX_DRAWS).unwrap();
        assert_eq!(grid, Grid::new(4));
    }

    #[test]
    fn test_assign_markers_on_single_room() {
        let mut rng = GameRng::new(42);
        let mut grid = Grid::with_rooms(4, &[(3, 0)]);
        assign_markers(&mut grid, &mut rng, DEFAULT_MAX_DRAWS).unwrap();

        assert_eq!(grid.start(), Some((3, 0)));
        assert_eq!(grid.teleport(), Some((3, 0)));
        assert_eq!(MapRenderer::default().center_glyph(grid.cell(3, 0)), '&');
    }

    #[test]
    fn test_assign_markers_without_rooms_fails() {
        let mut rng = GameRng::new(42);
        let mut grid = Grid::new(4);
        assert!(matches!(
            assign_markers(&mut grid, &mut rng, 100),
            Err(GenerationError::DrawLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_generate_level() {
        let mut rng = GameRng::new(42);
        let level = generate_level(&GenerationConfig::default(), &mut rng).unwrap();

        assert!((2..=10).contains(&level.room_count));
        assert_eq!(level.grid.room_count(), level.room_count);
        assert!(level.grid.are_all_rooms_connected());
        assert!(level.grid.check_markers().is_ok());

        let start = level.grid.start().unwrap();
        let teleport = level.grid.teleport().unwrap();
        assert!(level.grid.cell(start.0, start.1).is_room());
        assert!(level.grid.cell(teleport.0, teleport.1).is_room());
    }

    #[test]
    fn test_generate_level_reproducible() {
        let config = GenerationConfig::default();
        let a = generate_level(&config, &mut GameRng::new(99)).unwrap();
        let b = generate_level(&config, &mut GameRng::new(99)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.render(Glyphs::UNICODE), b.render(Glyphs::UNICODE));
    }

    #[test]
    fn test_generate_level_rejects_bad_config() {
        let config = GenerationConfig {
            grid_size: 2,
            ..GenerationConfig::default()
        };
        let err = generate_level(&config, &mut GameRng::new(1)).unwrap_err();
        assert!(matches!(err, GenerationError::Config(_)));
    }

    #[test]
    fn test_generate_level_through_trait_object() {
        let mut rng = GameRng::new(5);
        let source: &mut dyn RandomSource = &mut rng;
        let level = generate_level(&GenerationConfig::default(), source).unwrap();
        assert!(level.grid.check_markers().is_ok());
    }
}
