//! Review selection: which due word to ask next, and in which direction.

use crate::error::{CoreError, Result};
use crate::types::{Direction, ReviewSession, WordPair};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random choices made when picking a review.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Fair coin.
    fn coin_flip(&mut self) -> bool;
}

/// Adapts any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    pub fn from_os_rng() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Reproducible sequence, for tests and simulations.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }

    fn coin_flip(&mut self) -> bool {
        self.0.random_bool(0.5)
    }
}

/// Pick one due word uniformly and a direction with equal odds.
///
/// Callers are expected to check the due set first; an empty one is
/// reported as [`CoreError::NoDueWords`].
pub fn select_review<R: RandomSource + ?Sized>(
    due: &[WordPair],
    rng: &mut R,
) -> Result<ReviewSession> {
    if due.is_empty() {
        return Err(CoreError::NoDueWords);
    }

    let word = due[rng.pick_index(due.len())].clone();
    let direction = if rng.coin_flip() {
        Direction::AToB
    } else {
        Direction::BToA
    };

    Ok(ReviewSession::new(word, direction))
}
