//! Generation configuration
//!
//! Handles the tunable constants of a generation run and loading them from a
//! dungeonrc file. The rc format mirrors a nethackrc: `#` comments, blank
//! lines, and `OPTIONS=` lines holding comma-separated `key:value` pairs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_MAX_DRAWS, GRID_SIZE, MAX_GRID_SIZE, MIN_ROOM_COUNT, ROOM_COUNT_MEAN,
    ROOM_COUNT_SIGMA,
};
use crate::error::ConfigError;

/// Tunable parameters of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Side length of the square room grid
    pub grid_size: usize,
    /// Center of the room-count distribution
    pub room_mean: i32,
    /// Spread and acceptance half-width of the room-count distribution
    pub room_sigma: i32,
    /// Cap on draws for any single rejection-sampling loop
    pub max_draws: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            room_mean: ROOM_COUNT_MEAN,
            room_sigma: ROOM_COUNT_SIGMA,
            max_draws: DEFAULT_MAX_DRAWS,
        }
    }
}

impl GenerationConfig {
    /// Load a configuration from a dungeonrc file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::parse_config(&contents)
    }

    /// Parse a configuration from dungeonrc text, starting from the defaults
    pub fn parse_config(contents: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some(opts) = line.strip_prefix("OPTIONS=") else {
                return Err(ConfigError::MalformedLine {
                    line: index + 1,
                    text: line.to_string(),
                });
            };

            for opt in opts.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                config.parse_option(opt)?;
            }
        }

        Ok(config)
    }

    /// Parse a single `key:value` or `key=value` option
    fn parse_option(&mut self, opt: &str) -> Result<(), ConfigError> {
        let (key, value) = opt
            .split_once(':')
            .or_else(|| opt.split_once('='))
            .ok_or_else(|| ConfigError::InvalidValue {
                option: opt.to_string(),
                value: String::new(),
            })?;

        self.set_option(key.trim(), value.trim())
    }

    /// Set an option by name
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            option: name.to_string(),
            value: value.to_string(),
        };

        match name {
            "grid_size" | "gridsize" => self.grid_size = value.parse().map_err(|_| invalid())?,
            "room_mean" | "mean" => self.room_mean = value.parse().map_err(|_| invalid())?,
            "room_sigma" | "sigma" => self.room_sigma = value.parse().map_err(|_| invalid())?,
            "max_draws" => self.max_draws = value.parse().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Serialize back to dungeonrc text
    pub fn to_config_string(&self) -> String {
        format!(
            "OPTIONS=grid_size:{},room_mean:{},room_sigma:{},max_draws:{}\n",
            self.grid_size, self.room_mean, self.room_sigma, self.max_draws
        )
    }

    /// Check that every rejection-sampling loop of a run can succeed
    ///
    /// The room-count band must lie within `[MIN_ROOM_COUNT, grid_size²]`:
    /// placement needs a free cell for every room, and a level needs a second
    /// room so the first has somewhere to connect to.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        if self.room_sigma < 0 {
            return Err(ConfigError::NegativeSigma(self.room_sigma));
        }
        if self.min_rooms() < MIN_ROOM_COUNT {
            return Err(ConfigError::TooFewRooms {
                min: self.min_rooms(),
                required: MIN_ROOM_COUNT,
            });
        }
        let cells = self.cell_count();
        if usize::try_from(self.max_rooms()).map_or(true, |max| max > cells) {
            return Err(ConfigError::TooManyRooms {
                max: self.max_rooms(),
                cells,
            });
        }
        if self.max_draws == 0 {
            return Err(ConfigError::ZeroDrawLimit);
        }
        Ok(())
    }

    /// Lowest room count the sampler can return
    pub fn min_rooms(&self) -> i32 {
        self.room_mean.saturating_sub(self.room_sigma)
    }

    /// Highest room count the sampler can return
    pub fn max_rooms(&self) -> i32 {
        self.room_mean.saturating_add(self.room_sigma)
    }

    /// Number of cells on the grid, saturating for sizes `validate` rejects
    pub fn cell_count(&self) -> usize {
        self.grid_size.saturating_mul(self.grid_size)
    }
}
