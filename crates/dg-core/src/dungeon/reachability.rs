//! Direction look-ahead
//!
//! A direction is worth carving from `(x, y)` when some room lies anywhere in
//! the part of the grid strictly beyond the point on that side. This is a
//! global look-ahead, not an adjacency test: a corridor started that way may
//! still wander before it gets there.

use super::direction::Direction;
use super::grid::Grid;

/// Whether any room lies strictly beyond `(x, y)` in direction `dir`
///
/// - `Up`: every column, rows `0..y`
/// - `Right`: columns `x+1..size`, every row
/// - `Down`: every column, rows `y+1..size`
/// - `Left`: columns `0..x`, every row
///
/// Always false at the grid edge facing `dir`.
pub fn is_valid_direction(grid: &Grid, x: usize, y: usize, dir: Direction) -> bool {
    let size = grid.size();
    let (cols, rows) = match dir {
        Direction::Up => (0..size, 0..y),
        Direction::Right => (x + 1..size, 0..size),
        Direction::Down => (0..size, y + 1..size),
        Direction::Left => (0..x, 0..size),
    };

    cols.into_iter().any(|i| {
        rows.clone()
            .any(|j| grid.get(i, j).is_some_and(|cell| cell.is_room()))
    })
}

/// Directions from `(x, y)` that are not yet carved and lead toward a room
pub fn available_directions(
    grid: &Grid,
    x: usize,
    y: usize,
) -> impl Iterator<Item = Direction> + '_ {
    Direction::ALL.into_iter().filter(move |&dir| {
        !grid.cell(x, y).has_connection(dir) && is_valid_direction(grid, x, y, dir)
    })
}

/// Whether `(x, y)` has any direction left to carve
pub fn has_available_connections(grid: &Grid, x: usize, y: usize) -> bool {
    available_directions(grid, x, y).next().is_some()
}
