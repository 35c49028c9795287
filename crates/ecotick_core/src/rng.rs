//! Deterministic random source.
//!
//! Every stochastic decision in a tick goes through a [`RandomSource`]. Two
//! engines seeded identically and driven by the same commands therefore
//! produce bit-identical outcomes.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Uniform `[0, 1)` stream with an explicit seed.
pub trait RandomSource {
    /// Restarts the stream from `seed`.
    fn reseed(&mut self, seed: u32);

    /// Next uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// `true` with probability `p`. Always consumes exactly one draw.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index in `0..len`. Always consumes exactly one draw, even when
    /// `len == 0` (in which case the result is 0 and must not be used).
    fn pick(&mut self, len: usize) -> usize {
        let roll = self.next_f64();
        if len == 0 {
            return 0;
        }
        ((roll * len as f64) as usize).min(len - 1)
    }
}

/// Position of a [`SeededRng`] stream, enough to resume it exactly.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngState {
    pub seed: u32,
    pub word_pos: u128,
}

/// ChaCha8-backed random source.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u32,
    inner: ChaCha8Rng,
}

impl SeededRng {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(u64::from(seed)),
        }
    }

    /// Fresh seed from OS entropy. Only used outside the tick loop.
    #[must_use]
    pub fn random_seed() -> u32 {
        rand::random::<u32>()
    }

    #[must_use]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[must_use]
    pub fn state(&self) -> RngState {
        RngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    #[must_use]
    pub fn from_state(state: RngState) -> Self {
        let mut rng = Self::new(state.seed);
        rng.inner.set_word_pos(state.word_pos);
        rng
    }
}

impl RandomSource for SeededRng {
    fn reseed(&mut self, seed: u32) {
        *self = Self::new(seed);
    }

    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}
