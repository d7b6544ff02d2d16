//! Random source for spawn, drop and fire decisions
//!
//! Every random draw in the simulation goes through [`RandomSource`] so tests
//! can swap in a scripted sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform random draws in `[0, 1)`
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;

    /// Uniform index in `0..len` (0 when `len` is 0)
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }
}

/// PCG-backed random source used in real runs
#[derive(Debug, Clone)]
pub struct SimRng(Pcg32);

impl SimRng {
    /// Seed from the thread RNG (runs are not reproducible)
    pub fn from_entropy() -> Self {
        Self(Pcg32::from_rng(&mut rand::rng()))
    }

    pub fn seeded(seed: u64) -> Self {
        Self(Pcg32::seed_from_u64(seed))
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SimRng {
    fn next_f32(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Cycles through a fixed list of draws. An empty list always yields 0.0.
#[derive(Debug, Clone, Default)]
pub struct SequenceRng {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Always returns `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRng {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
