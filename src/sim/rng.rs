//! Random source capability
//!
//! Spawning and prompt rotation draw from a `RandomSource` injected into the
//! session, so a fixed seed (or a scripted source) replays a run exactly.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::catalog::KindId;

/// Uniform randomness needed by the simulation
pub trait RandomSource {
    /// Uniform real in [0, 1)
    fn unit(&mut self) -> f64;

    /// Uniform index in `0..len` (`len` > 0)
    fn index(&mut self, len: usize) -> usize;

    /// Uniformly shuffle a list of kinds in place
    fn shuffle_kinds(&mut self, kinds: &mut [KindId]);

    /// Uniform real in [min, max)
    fn range(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.unit()
    }

    /// True with probability `p` (clamped to [0, 1])
    fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.unit() < p
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn unit(&mut self) -> f64 {
        (**self).unit()
    }

    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }

    fn shuffle_kinds(&mut self, kinds: &mut [KindId]) {
        (**self).shuffle_kinds(kinds)
    }
}

/// PCG-backed source, reproducible from its seed
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the thread RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn shuffle_kinds(&mut self, kinds: &mut [KindId]) {
        kinds.shuffle(&mut self.rng);
    }
}

/// Replays a fixed cycle of unit values; shuffles are left in registry order.
///
/// Handy for scenario tests that need exact spawn positions and choices.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    /// `values` are clamped into [0, 1); an empty script always yields 0
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }

    fn index(&mut self, len: usize) -> usize {
        ((self.unit() * len as f64) as usize).min(len.saturating_sub(1))
    }

    fn shuffle_kinds(&mut self, _kinds: &mut [KindId]) {}
}
