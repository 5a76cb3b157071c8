//! Seeds and the sine-based pseudo-random sequence
//!
//! Every trait draw flows from a single [`SineRng`]:
//! `rand(s) = frac(sin(s) * 10000)`, advancing `s` by one per draw.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A portrait seed
///
/// Non-positive raw values are replaced by [`Seed::FALLBACK`] on
/// construction, so a `Seed` is always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Seed(i64);

impl Seed {
    /// Seed used in place of zero or negative input.
    pub const FALLBACK: i64 = 1337;

    /// Create a seed, coercing non-positive values to the fallback
    pub fn new(raw: i64) -> Self {
        if raw <= 0 {
            Self(Self::FALLBACK)
        } else {
            Self(raw)
        }
    }

    /// The effective seed value
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Whether a raw value would be replaced by the fallback
    pub fn is_coerced(raw: i64) -> bool {
        raw <= 0
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self(Self::FALLBACK)
    }
}

impl From<i64> for Seed {
    fn from(raw: i64) -> Self {
        Self::new(raw)
    }
}

impl From<Seed> for i64 {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fractional part of `sin(x) * 10000`, always in `[0, 1)`
pub fn sine_fraction(x: f64) -> f64 {
    let v = x.sin() * 10000.0;
    let frac = v - v.floor();
    // v slightly below an integer can round up to exactly 1.0
    if frac >= 1.0 { 0.0 } else { frac }
}

/// Sine-based deterministic sequence
#[derive(Debug, Clone)]
pub struct SineRng {
    state: i64,
    draws: u32,
}

impl SineRng {
    /// Start a sequence at the given seed
    pub fn new(seed: Seed) -> Self {
        Self {
            state: seed.value(),
            draws: 0,
        }
    }

    /// Next value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        let value = sine_fraction(self.state as f64);
        self.state = self.state.wrapping_add(1);
        self.draws += 1;
        value
    }

    /// Next integer in `[min, max]` (inclusive)
    ///
    /// Swapped bounds are reordered rather than rejected.
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (hi as i128 - lo as i128 + 1) as f64;
        let offset = (self.next_f64() * span).floor() as i128;
        (lo as i128 + offset).min(hi as i128) as i64
    }

    /// Pick an element of a non-empty slice
    ///
    /// Returns `None` only for an empty slice; a draw is consumed either way
    /// so the sequence stays aligned.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            self.next_f64();
            return None;
        }
        let idx = self.range(0, items.len() as i64 - 1) as usize;
        items.get(idx)
    }

    /// Bernoulli trial with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> u32 {
        self.draws
    }
}
