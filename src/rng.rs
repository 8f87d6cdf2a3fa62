//! Randomness source for the simulation engine
//!
//! The engine never reaches for a global generator. Every chamber shuffle
//! and time draw goes through a [`RandomSource`] handed in by the caller,
//! so tests can swap in [`ScriptedRandom`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::simulation::chamber::Slot;

pub trait RandomSource {
    /// Uniform float in `[0, 1)`
    fn next_uniform(&mut self) -> f64;

    /// Permute chamber slots in place
    fn shuffle(&mut self, slots: &mut [Slot]);

    /// Uniform float in `[low, high)`
    fn uniform_between(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_uniform()
    }
}

/// Production source backed by `StdRng`
pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SystemRandom {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    fn shuffle(&mut self, slots: &mut [Slot]) {
        slots.shuffle(&mut self.rng);
    }
}

/// Deterministic source that replays scripted values.
///
/// `shuffle` moves the loaded slot to the next scripted position (or leaves
/// the chamber untouched once the script runs out). `next_uniform` pops the
/// next scripted value, falling back to a fixed value when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    uniforms: VecDeque<f64>,
    loaded_positions: VecDeque<usize>,
    fallback_uniform: f64,
    uniforms_drawn: usize,
}

impl Default for ScriptedRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self {
            uniforms: VecDeque::new(),
            loaded_positions: VecDeque::new(),
            fallback_uniform: 0.5,
            uniforms_drawn: 0,
        }
    }

    pub fn with_uniforms(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.uniforms.extend(values);
        self
    }

    pub fn with_loaded_positions(mut self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.loaded_positions.extend(positions);
        self
    }

    pub fn with_fallback_uniform(mut self, value: f64) -> Self {
        self.fallback_uniform = value;
        self
    }

    /// How many uniforms have been consumed so far
    pub fn uniforms_drawn(&self) -> usize {
        self.uniforms_drawn
    }
}

impl RandomSource for ScriptedRandom {
    fn next_uniform(&mut self) -> f64 {
        self.uniforms_drawn += 1;
        self.uniforms.pop_front().unwrap_or(self.fallback_uniform)
    }

    fn shuffle(&mut self, slots: &mut [Slot]) {
        let Some(target) = self.loaded_positions.pop_front() else {
            return;
        };
        if let Some(current) = slots.iter().position(|slot| slot.is_loaded()) {
            let target = target.min(slots.len() - 1);
            slots.swap(current, target);
        }
    }
}
