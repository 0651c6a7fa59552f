//! Per-object random seeding.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Hands every object its own reproducible seed and generator.
///
/// Object `index` is seeded with `base_seed + index`, so a fixed base seed
/// reproduces a run exactly and every object in a run gets a distinct seed.
#[derive(Debug, Clone)]
pub struct RandomService {
    base_seed: u64,
    current_seed: u64,
    rng: Xoshiro256PlusPlus,
}

impl RandomService {
    pub fn new(base_seed: u64) -> Self {
        Self {
            base_seed,
            current_seed: base_seed,
            rng: Xoshiro256PlusPlus::seed_from_u64(base_seed),
        }
    }

    /// Use `fixed` when given, otherwise [`RandomService::default_seed`].
    pub fn from_seed_option(fixed: Option<u64>) -> Self {
        Self::new(fixed.unwrap_or_else(Self::default_seed))
    }

    /// Seed derived from the wall clock at process start.
    pub fn default_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    pub fn current_seed(&self) -> u64 {
        self.current_seed
    }

    /// Seed of object `index`.
    pub fn seed_for(&self, index: usize) -> u64 {
        self.base_seed.wrapping_add(index as u64)
    }

    /// Reseed the generator and return the seed.
    pub fn seed(&mut self, value: u64) -> u64 {
        self.current_seed = value;
        self.rng = Xoshiro256PlusPlus::seed_from_u64(value);
        value
    }

    pub fn rng_mut(&mut self) -> &mut Xoshiro256PlusPlus {
        &mut self.rng
    }
}
