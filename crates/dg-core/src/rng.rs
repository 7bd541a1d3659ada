//! Random number generation
//!
//! Generation only ever asks for two primitives: a uniform float in `[0, 1)`
//! and a uniform integer in `[0, n)`. [`RandomSource`] names exactly those, so
//! a host engine can supply its own generator. [`GameRng`] is the default,
//! a seeded ChaCha RNG for reproducible levels.

use rand::distributions::Standard;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Uniform random primitives consumed by the generator
pub trait RandomSource {
    /// Uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `0..n`
    ///
    /// Returns 0 if n is 0.
    fn rn2(&mut self, n: u32) -> u32;

    /// Uniform grid coordinate on a `size` x `size` grid
    fn random_cell(&mut self, size: usize) -> (usize, usize) {
        let x = self.rn2(size as u32) as usize;
        let y = self.rn2(size as u32) as usize;
        (x, y)
    }
}

/// Level generator RNG
///
/// Wraps ChaCha8Rng for reproducible generation.
/// Note: RNG state is not serialized - a deserialized RNG restarts from its seed.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

// Custom serialization - only serialize seed, recreate RNG on deserialize
impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn next_unit(&mut self) -> f64 {
        self.rng.sample(Standard)
    }

    fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
