//! # engine::rng
//!
//! Pluggable randomness for the feed generator.
//!
//! The generator never reaches for a global RNG; it draws from a
//! [`RandomSource`] it owns. Production mounts use [`SystemRandom`] (optionally
//! seeded for reproducible demos), tests script exact draws with
//! [`ScriptedRandom`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform floats in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_f64(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

// ─── SystemRandom ─────────────────────────────────────────────────────────────

/// `rand`-backed source.
pub struct SystemRandom(StdRng);

impl SystemRandom {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Same seed, same candle series.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SystemRandom {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

// ─── ScriptedRandom ───────────────────────────────────────────────────────────

/// Replays a fixed list of draws, wrapping around at the end.
///
/// Values are clamped into `[0, 1)`. An empty script always yields `0.0`.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
    draws:  u64,
}

impl ScriptedRandom {
    pub fn cycle(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| if v.is_finite() { v.clamp(0.0, 1.0 - f64::EPSILON) } else { 0.0 })
            .collect();
        Self { values, cursor: 0, draws: 0 }
    }

    /// Total number of draws served so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}
