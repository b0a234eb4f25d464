//! Deterministic random sources
//!
//! Two generators with different jobs:
//! - [`LayoutRng`] drives procedural placement inside the engines (dots,
//!   walls, enemy jitter, lanes). Its recurrence is fixed and must not
//!   change: identical seed + identical call sequence means identical
//!   layouts, which is what makes a daily challenge replayable.
//! - [`seeded_stream`] is the PCG stream behind parameter and flavor-text
//!   generation. Anything derived from it is a pure function of the seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Multiplier of the layout LCG.
pub const LCG_MULTIPLIER: u64 = 9301;
/// Increment of the layout LCG.
pub const LCG_INCREMENT: u64 = 49297;
/// Modulus of the layout LCG.
pub const LCG_MODULUS: u64 = 233280;

/// Linear congruential generator with explicit state.
///
/// The state is owned here, never threaded through parameter values: a
/// `GameParameters::layout_seed` is only the *initial* state this generator
/// is constructed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRng {
    state: u64,
}

impl LayoutRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance the state and return a value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT)
            % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Uniform value in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Roll against a probability in `[0, 1]`.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform index into a non-empty collection of length `len`.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }

    /// Current raw state (after however many draws have happened).
    pub fn state(&self) -> u64 {
        self.state
    }
}

/// Seeded stream for parameter and flavor derivation.
pub fn seeded_stream(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Fresh non-reproducible seed, for callers that did not supply one.
pub fn random_seed() -> u64 {
    rand::rng().random_range(0..1_000_000)
}
