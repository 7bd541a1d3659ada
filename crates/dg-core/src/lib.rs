//! dg-core: Room-grid dungeon level generation
//!
//! Samples a room count, places rooms on a small square grid, links them with
//! random-walk corridors and renders the result as a text map.
//!
//! Generation performs no I/O. Randomness comes from a [`RandomSource`], so
//! callers may plug in their own engine's generator.

pub mod config;
pub mod dungeon;
pub mod error;

mod consts;
mod rng;

pub use config::GenerationConfig;
pub use consts::*;
pub use dungeon::{GeneratedLevel, generate_level};
pub use error::{ConfigError, GenerationError};
pub use rng::{GameRng, RandomSource};
