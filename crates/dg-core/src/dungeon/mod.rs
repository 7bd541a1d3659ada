//! Dungeon generation
//!
//! Contains the room grid, direction look-ahead, room-count sampling, the
//! connection walk and the text renderer.

mod cell;
mod direction;
mod generation;
mod grid;
mod reachability;
mod render;
mod room_count;

pub use cell::{Cell, CellFlags, CellType};
pub use direction::{Connections, Direction};
pub use generation::{
    GeneratedLevel, assign_markers, carve_path, connect_rooms, generate_level, place_rooms,
};
pub use grid::Grid;
pub use reachability::{available_directions, has_available_connections, is_valid_direction};
pub use render::{Glyphs, MapRenderer};
pub use room_count::RoomCountSampler;
