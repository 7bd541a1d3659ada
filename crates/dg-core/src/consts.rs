//! Generation constants
//!
//! These are the defaults of [`crate::GenerationConfig`].

/// Side length of the room grid
pub const GRID_SIZE: usize = 4;

/// Center of the room-count distribution
pub const ROOM_COUNT_MEAN: i32 = 6;

/// Spread of the room-count distribution; also the half-width of the
/// acceptance band
pub const ROOM_COUNT_SIGMA: i32 = 4;

/// Largest accepted grid side; random cell draws take a `u32` bound
pub const MAX_GRID_SIZE: usize = 256;

/// Smallest room count a level may have. A lone room has no direction to
/// carve toward, so it could never become connected.
pub const MIN_ROOM_COUNT: i32 = 2;

/// Each grid cell renders as a square block of this many characters
pub const RENDER_SCALE: usize = 3;

/// Default cap on draws for any single rejection-sampling loop
pub const DEFAULT_MAX_DRAWS: u32 = 1_000_000;
