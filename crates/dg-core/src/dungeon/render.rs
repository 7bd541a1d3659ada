//! Text map rendering
//!
//! Each grid cell becomes a 3x3 block of characters. The block center shows
//! what the cell holds, the four edge-middles show carved links, and the
//! corners always stay background:
//!
//! ```text
//! ·#·
//! #@·
//! ·#·
//! ```

use super::cell::{Cell, CellType};
use super::direction::Direction;
use super::grid::Grid;
use crate::consts::RENDER_SCALE;

/// Characters used by [`MapRenderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub background: char,
    pub connector: char,
    pub room: char,
    pub corridor: char,
    pub start: char,
    pub teleport: char,
    /// Start and teleport on the same room
    pub start_teleport: char,
}

impl Glyphs {
    /// Classic glyph set
    pub const UNICODE: Glyphs = Glyphs {
        background: '·',
        connector: '#',
        room: '▓',
        corridor: '#',
        start: '@',
        teleport: 'T',
        start_teleport: '&',
    };

    /// Plain ASCII for terminals without box characters
    pub const ASCII: Glyphs = Glyphs {
        background: '.',
        connector: '#',
        room: 'O',
        corridor: '#',
        start: '@',
        teleport: 'T',
        start_teleport: '&',
    };
}

impl Default for Glyphs {
    fn default() -> Self {
        Self::UNICODE
    }
}

/// Renders a finished grid as text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapRenderer {
    glyphs: Glyphs,
}

impl MapRenderer {
    pub fn new(glyphs: Glyphs) -> Self {
        Self { glyphs }
    }

    /// Glyph for the center of a cell's block
    pub fn center_glyph(&self, cell: &Cell) -> char {
        let g = &self.glyphs;
        match (cell.is_start(), cell.has_teleport()) {
            (true, true) => g.start_teleport,
            (true, false) => g.start,
            (false, true) => g.teleport,
            (false, false) => match cell.typ {
                CellType::Room => g.room,
                CellType::Corridor => g.corridor,
                CellType::Empty | CellType::None => g.background,
            },
        }
    }

    /// Character grid of `3·size` rows by `3·size` columns, indexed `[row][col]`
    pub fn render_glyphs(&self, grid: &Grid) -> Vec<Vec<char>> {
        let side = grid.size() * RENDER_SCALE;
        let mut canvas = vec![vec![self.glyphs.background; side]; side];

        for (x, y) in grid.positions() {
            let cell = grid.cell(x, y);
            let col = x * RENDER_SCALE + 1;
            let row = y * RENDER_SCALE + 1;

            for dir in Direction::ALL {
                let (dx, dy) = dir.offset();
                let edge_col = col.wrapping_add_signed(dx as isize);
                let edge_row = row.wrapping_add_signed(dy as isize);
                canvas[edge_row][edge_col] = if cell.has_connection(dir) {
                    self.glyphs.connector
                } else {
                    self.glyphs.background
                };
            }

            canvas[row][col] = self.center_glyph(cell);
        }

        canvas
    }

    /// Rendered map, one line per character row
    pub fn render(&self, grid: &Grid) -> String {
        let canvas = self.render_glyphs(grid);
        let mut output = String::with_capacity(canvas.len() * (canvas.len() + 1) * 3);
        for row in &canvas {
            output.extend(row.iter());
            output.push('\n');
        }
        output
    }
}
