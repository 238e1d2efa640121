//! Seedable sampling helpers and the squashing function used by every neuron.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Sampling granularity: ranges are scaled to whole thousandths.
const FLOAT_SCALE: f32 = 1000.0;

/// Random source threaded through construction, mutation and crossover.
///
/// Floats are quantized to steps of 0.001 so that two runs with the same
/// seed produce bit-identical networks.
#[derive(Clone, Debug)]
pub struct NeuroRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl NeuroRng {
    /// Create a generator with a specific seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a generator seeded from the current time
    pub fn from_entropy() -> Self {
        // Nanoseconds since the epoch, high bits folded into the low 64
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| {
                let nanos = d.as_nanos();
                (nanos as u64) ^ ((nanos >> 64) as u64)
            })
            .unwrap_or(0);
        log::debug!("Seeding from clock: {}", seed);
        Self::new(seed)
    }

    /// Use the given seed if there is one, otherwise fall back to the clock
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None => Self::from_entropy(),
        }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in `[min, max)`, quantized to 0.001.
    ///
    /// An empty range yields the (truncated) lower bound.
    pub fn random_float(&mut self, min: f32, max: f32) -> f32 {
        let lo = (min * FLOAT_SCALE) as i32;
        let hi = (max * FLOAT_SCALE) as i32;
        if hi <= lo {
            return lo as f32 / FLOAT_SCALE;
        }
        self.rng.gen_range(lo..hi) as f32 / FLOAT_SCALE
    }

    /// Uniform integer in `[min, max)`; an empty range yields `min`.
    pub fn random_int(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Bernoulli trial with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.random_float(0.0, 1.0) < p
    }
}

/// `2 / (1 + e^(-2x)) - 1`, a tanh-shaped squash into (-1, 1).
#[inline]
pub fn activation(x: f32) -> f32 {
    2.0 / (1.0 + (-2.0 * x).exp()) - 1.0
}
