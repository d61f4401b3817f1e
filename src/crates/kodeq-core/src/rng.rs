//! Seeded random number source shared by the runtime

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};

/// Reseedable uniform integer generator
///
/// One instance lives in the environment and backs the `RND(lo, hi)`
/// expression built-in. Modules that need randomness own their own generator.
#[derive(Debug, Clone)]
pub struct Rng {
    inner: StdRng,
    seed: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the operating system. Output is not reproducible.
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().gen::<u64>();
        Rng::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.inner = StdRng::seed_from_u64(seed);
    }

    /// Uniform integer in `min..=max`. Reversed bounds are swapped.
    pub fn uniform(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.inner.gen_range(lo..=hi)
    }
}

impl Default for Rng {
    fn default() -> Self {
        Rng::new(0)
    }
}
