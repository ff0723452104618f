//! RNG module - small deterministic generator for bot decisions
//!
//! The bot only needs coin flips, uniform floats and a name suffix, so a plain
//! LCG is enough. Seeding it explicitly keeps whole matches reproducible in
//! tests; [`SimpleRng::from_time`] is used when no seed is configured.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{BOT_NAME_PREFIX, BOT_NAME_SUFFIX_MAX};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Seed from the wall clock (sub-second nanos mixed with seconds)
    pub fn from_time() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::new(now.subsec_nanos() ^ (now.as_secs() as u32))
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Uniform float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Fair coin flip.
    ///
    /// Uses the top bit; the low bits of an LCG alternate.
    pub fn next_bool(&mut self) -> bool {
        self.next_u32() >> 31 == 1
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Generate a player name like `Henk_4711` (suffix in `0..=65536`).
pub fn random_bot_name(rng: &mut SimpleRng) -> String {
    format!(
        "{}{}",
        BOT_NAME_PREFIX,
        rng.next_range(BOT_NAME_SUFFIX_MAX + 1)
    )
}
