//! Room-count sampling
//!
//! The number of rooms on a level follows a normal distribution, drawn with a
//! Box-Muller transform and truncated toward zero. Draws outside
//! `[mean - sigma, mean + sigma]` are discarded and redrawn, so the result
//! always lies within one sigma of the mean.

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use tracing::trace;

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::rng::RandomSource;

/// Draws the target room count of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomCountSampler {
    pub mean: i32,
    pub sigma: i32,
}

impl RoomCountSampler {
    pub fn new(mean: i32, sigma: i32) -> Self {
        Self { mean, sigma }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.room_mean, config.room_sigma)
    }

    /// Accepted room counts
    pub fn band(&self) -> RangeInclusive<i32> {
        self.mean.saturating_sub(self.sigma)..=self.mean.saturating_add(self.sigma)
    }

    /// One candidate count, before the band check
    ///
    /// Consumes exactly two uniform draws.
    pub fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R) -> i32 {
        let u1 = rng.next_unit();
        let u2 = rng.next_unit();

        let radius = (-2.0 * (1.0 - u1).ln()).sqrt();
        let angle = 2.0 * PI * (1.0 - u2);
        let value = f64::from(self.mean) + f64::from(self.sigma) * radius * angle.sin();

        // `as` truncates toward zero and saturates
        value as i32
    }

    /// Draw until a candidate falls inside [`Self::band`]
    ///
    /// Fails after `max_draws` rejected candidates.
    pub fn sample<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        max_draws: u32,
    ) -> Result<i32, GenerationError> {
        let band = self.band();
        for _ in 0..max_draws {
            let count = self.draw(rng);
            if band.contains(&count) {
                return Ok(count);
            }
            trace!(count, "room count outside band, redrawing");
        }
        Err(GenerationError::DrawLimitExceeded {
            stage: "sampling the room count",
            draws: max_draws,
        })
    }
}
