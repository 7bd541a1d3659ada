//! Cardinal directions and per-cell connection bits

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// One of the four grid directions
///
/// The discriminants are the connection indices `Up=0, Right=1, Down=2, Left=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

/// Per-direction data: (opposite, dx, dy)
const DIRECTION_TABLE: [(Direction, i32, i32); 4] = [
    (Direction::Down, 0, -1),
    (Direction::Left, 1, 0),
    (Direction::Up, 0, 1),
    (Direction::Right, -1, 0),
];

impl Direction {
    /// All directions in index order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Connection index of this direction
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for a connection index, if in range
    pub const fn from_index(index: usize) -> Option<Direction> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            _ => None,
        }
    }

    /// The direction pointing back
    pub const fn opposite(self) -> Direction {
        DIRECTION_TABLE[self.index()].0
    }

    /// Grid offset of one step; y grows downward
    pub const fn offset(self) -> (i32, i32) {
        let (_, dx, dy) = DIRECTION_TABLE[self.index()];
        (dx, dy)
    }

    /// Connection bit for this direction
    pub const fn connection(self) -> Connections {
        match self {
            Direction::Up => Connections::UP,
            Direction::Right => Connections::RIGHT,
            Direction::Down => Connections::DOWN,
            Direction::Left => Connections::LEFT,
        }
    }

    /// Neighbor of `(x, y)` on a `size` x `size` grid, or None past the edge
    pub fn step(self, x: usize, y: usize, size: usize) -> Option<(usize, usize)> {
        let (dx, dy) = self.offset();
        let nx = x.checked_add_signed(dx as isize)?;
        let ny = y.checked_add_signed(dy as isize)?;
        (nx < size && ny < size).then_some((nx, ny))
    }
}

bitflags! {
    /// Carved links from a cell toward its neighbors
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Connections: u8 {
        const UP = 1 << 0;
        const RIGHT = 1 << 1;
        const DOWN = 1 << 2;
        const LEFT = 1 << 3;
    }
}

impl Connections {
    /// Whether the link toward `dir` is carved
    pub const fn has(self, dir: Direction) -> bool {
        self.contains(dir.connection())
    }

    /// Number of carved links
    pub const fn degree(self) -> u32 {
        self.bits().count_ones()
    }
}

// Manual serde impl for Connections
impl Serialize for Connections {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Connections {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Connections::from_bits_truncate(bits))
    }
}
