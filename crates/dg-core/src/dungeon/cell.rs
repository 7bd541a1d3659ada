//! Grid cell types

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::direction::{Connections, Direction};

/// What occupies a grid cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    /// Not yet initialized; never present after [`super::Grid::clear`]
    #[default]
    None = 0,
    Empty = 1,
    /// Pass-through waypoint of a carved path
    Corridor = 2,
    /// Placed room
    Room = 3,
}

impl CellType {
    /// Check if a carved path may pass through this cell
    pub const fn is_passable(&self) -> bool {
        matches!(self, CellType::Corridor | CellType::Room)
    }
}

bitflags! {
    /// Markers placed on rooms after connection
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// Player starting position
        const START = 0x01;
        /// Level teleporter
        const TELEPORT = 0x02;
    }
}

// Manual serde impl for CellFlags
impl Serialize for CellFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(CellFlags::from_bits_truncate(bits))
    }
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Cell type
    pub typ: CellType,
    /// Carved links toward neighbors
    pub connections: Connections,
    /// Start/teleport markers
    pub flags: CellFlags,
}

impl Cell {
    /// An initialized cell with nothing in it
    pub const fn empty() -> Self {
        Self {
            typ: CellType::Empty,
            connections: Connections::empty(),
            flags: CellFlags::empty(),
        }
    }

    /// Reset to an empty cell with no connections and no markers
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Whether any link is carved from this cell
    pub const fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }

    /// Whether the link toward `dir` is carved
    pub const fn has_connection(&self, dir: Direction) -> bool {
        self.connections.has(dir)
    }

    pub const fn is_room(&self) -> bool {
        matches!(self.typ, CellType::Room)
    }

    pub const fn is_start(&self) -> bool {
        self.flags.contains(CellFlags::START)
    }

    pub const fn has_teleport(&self) -> bool {
        self.flags.contains(CellFlags::TELEPORT)
    }
}
