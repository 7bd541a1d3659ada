//! Configuration and generation errors

use thiserror::Error;

/// Errors from loading or validating a [`crate::GenerationConfig`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Could not read config '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Line {line}: expected OPTIONS=..., found '{text}'")]
    MalformedLine { line: usize, text: String },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value '{value}' for option {option}")]
    InvalidValue { option: String, value: String },

    #[error("Grid size {0} is too small (minimum 2)")]
    GridTooSmall(usize),

    #[error("Grid size {size} is too large (maximum {max})")]
    GridTooLarge { size: usize, max: usize },

    #[error("Room sigma {0} must not be negative")]
    NegativeSigma(i32),

    #[error("Minimum room count {min} is below {required}")]
    TooFewRooms { min: i32, required: i32 },

    #[error("Maximum room count {max} exceeds the {cells} cells of the grid")]
    TooManyRooms { max: i32, cells: usize },

    #[error("max_draws must be at least 1")]
    ZeroDrawLimit,
}

/// Errors raised while generating a level
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Gave up {stage} after {draws} random draws")]
    DrawLimitExceeded { stage: &'static str, draws: u32 },

    #[error("Room at ({x}, {y}) has no direction to connect toward")]
    IsolatedRoom { x: usize, y: usize },

    #[error("Grid invariant violated: {0}")]
    InvariantViolated(String),
}
