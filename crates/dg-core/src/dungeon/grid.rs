//! Room grid state
//!
//! The grid is a square of [`Cell`]s indexed `cells[x][y]`, with `y` growing
//! downward. It owns every check over cell state; connection bits are only
//! changed through [`Grid::carve`], which sets both halves of a link together.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellFlags, CellType};
use super::direction::Direction;
use crate::error::GenerationError;

/// The level's room grid
///
/// Deserializing checks the dimensions and [`Grid::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    size: usize,
    /// Cells, indexed `[x][y]`
    cells: Vec<Vec<Cell>>,
}

/// Unchecked serialized form of a [`Grid`]
#[derive(Deserialize)]
struct GridData {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl TryFrom<GridData> for Grid {
    type Error = GenerationError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let size = data.size;
        if data.cells.len() != size || data.cells.iter().any(|col| col.len() != size) {
            return Err(violation(format!("cells do not form a {size}x{size} grid")));
        }

        let grid = Grid {
            size,
            cells: data.cells,
        };
        grid.check_invariants()?;
        Ok(grid)
    }
}

impl Grid {
    /// Allocate a `size` x `size` grid of empty cells
    pub fn new(size: usize) -> Self {
        let mut grid = Self {
            size,
            cells: vec![vec![Cell::default(); size]; size],
        };
        grid.clear();
        grid
    }

    /// Grid with rooms already placed at the given positions
    ///
    /// Panics if a position lies outside the grid.
    pub fn with_rooms(size: usize, rooms: &[(usize, usize)]) -> Self {
        let mut grid = Self::new(size);
        for &(x, y) in rooms {
            grid.cells[x][y].typ = CellType::Room;
        }
        grid
    }

    /// Reset every cell to empty, with no connections and no markers
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.clear();
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at `(x, y)`; panics out of bounds
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[x][y]
    }

    /// Cell at `(x, y)`, or None out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.cells.get(x).and_then(|col| col.get(y))
    }

    /// Every position, column by column
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size).flat_map(move |x| (0..self.size).map(move |y| (x, y)))
    }

    /// Positions of all room cells
    pub fn rooms(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.positions()
            .filter(move |&(x, y)| self.cells[x][y].is_room())
    }

    /// Number of room cells
    pub fn room_count(&self) -> usize {
        self.rooms().count()
    }

    /// Number of cells of the given type
    pub fn count_type(&self, typ: CellType) -> usize {
        self.cells.iter().flatten().filter(|c| c.typ == typ).count()
    }

    /// Turn an empty cell into a room. Returns false if the cell was not empty.
    pub fn place_room(&mut self, x: usize, y: usize) -> bool {
        let cell = &mut self.cells[x][y];
        if cell.typ != CellType::Empty {
            return false;
        }
        cell.typ = CellType::Room;
        true
    }

    /// Set a marker on a cell
    pub fn mark(&mut self, x: usize, y: usize, flag: CellFlags) {
        self.cells[x][y].flags.insert(flag);
    }

    /// Whether any link is carved from `(x, y)`
    pub fn is_connected(&self, x: usize, y: usize) -> bool {
        self.cells[x][y].is_connected()
    }

    /// Number of links carved from `(x, y)`
    pub fn degree(&self, x: usize, y: usize) -> u32 {
        self.cells[x][y].connections.degree()
    }

    /// Whether every room has at least one link
    ///
    /// This is a per-room degree check. Two groups of rooms that are linked
    /// internally but not to each other still pass.
    pub fn are_all_rooms_connected(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.is_room())
            .all(Cell::is_connected)
    }

    /// Carve a link from `(x, y)` toward `dir`
    ///
    /// Sets the connection on both cells and turns an empty neighbor into a
    /// corridor. Returns the neighbor's position, or None (leaving the grid
    /// untouched) when `dir` points off the grid.
    pub fn carve(&mut self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (nx, ny) = dir.step(x, y, self.size)?;

        self.cells[x][y].connections.insert(dir.connection());

        let next = &mut self.cells[nx][ny];
        next.connections.insert(dir.opposite().connection());
        if next.typ == CellType::Empty {
            next.typ = CellType::Corridor;
        }

        Some((nx, ny))
    }

    /// Position of the starting room, if marked
    pub fn start(&self) -> Option<(usize, usize)> {
        self.positions().find(|&(x, y)| self.cells[x][y].is_start())
    }

    /// Position of the teleporter, if marked
    pub fn teleport(&self) -> Option<(usize, usize)> {
        self.positions().find(|&(x, y)| self.cells[x][y].has_teleport())
    }

    /// Verify structural invariants that hold at every stage after `clear`
    ///
    /// - no cell is uninitialized
    /// - every link is reciprocated by the neighbor, and none leaves the grid
    /// - only rooms and corridors carry links
    /// - markers only sit on rooms, at most one of each
    pub fn check_invariants(&self) -> Result<(), GenerationError> {
        let mut starts = 0;
        let mut teleports = 0;

        for (x, y) in self.positions() {
            let cell = &self.cells[x][y];

            if cell.typ == CellType::None {
                return Err(violation(format!("cell ({x}, {y}) is uninitialized")));
            }
            if cell.is_connected() && !cell.typ.is_passable() {
                return Err(violation(format!(
                    "{} cell ({x}, {y}) has connections",
                    cell.typ
                )));
            }

            for dir in Direction::ALL {
                if !cell.has_connection(dir) {
                    continue;
                }
                let Some((nx, ny)) = dir.step(x, y, self.size) else {
                    return Err(violation(format!("cell ({x}, {y}) links {dir} off the grid")));
                };
                if !self.cells[nx][ny].has_connection(dir.opposite()) {
                    return Err(violation(format!(
                        "link {dir} from ({x}, {y}) is not reciprocated by ({nx}, {ny})"
                    )));
                }
            }

            if !cell.flags.is_empty() && !cell.is_room() {
                return Err(violation(format!(
                    "marker on {} cell ({x}, {y})",
                    cell.typ
                )));
            }
            starts += usize::from(cell.is_start());
            teleports += usize::from(cell.has_teleport());
        }

        if starts > 1 || teleports > 1 {
            return Err(violation(format!(
                "{starts} start markers and {teleports} teleport markers"
            )));
        }
        Ok(())
    }

    /// Verify that exactly one start and one teleport are marked
    pub fn check_markers(&self) -> Result<(), GenerationError> {
        self.check_invariants()?;
        if self.start().is_none() {
            return Err(violation("no start marker".to_string()));
        }
        if self.teleport().is_none() {
            return Err(violation("no teleport marker".to_string()));
        }
        Ok(())
    }
}

fn violation(message: String) -> GenerationError {
    GenerationError::InvariantViolated(message)
}
