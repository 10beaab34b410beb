//! Uniform random choice among candidates.

use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;

pub struct RandomAudioSelector {
    rng: Mutex<StdRng>,
}

impl RandomAudioSelector {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence, for reproducible tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Pick one candidate. Callers must check non-emptiness first.
    pub fn select<'a, T>(&self, candidates: &'a [T]) -> Result<&'a T> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        candidates.choose(&mut *rng).ok_or(Error::EmptyCandidateSet)
    }
}

impl Default for RandomAudioSelector {
    fn default() -> Self {
        Self::new()
    }
}
