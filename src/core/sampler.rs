/// Random index selection, injected into generation so tests can script it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks a uniform index in `0..len`.
///
/// Generation only ever asks for an index into a non-empty list: the state
/// list for random seeding, or a successor list when advancing the chain.
pub trait IndexSampler {
    /// `len` is always greater than zero.
    fn sample_index(&mut self, len: usize) -> usize;
}

impl<S: IndexSampler + ?Sized> IndexSampler for &mut S {
    fn sample_index(&mut self, len: usize) -> usize {
        (**self).sample_index(len)
    }
}

/// Adapts any `rand` generator into an [`IndexSampler`].
#[derive(Debug, Clone)]
pub struct RandomSampler<R: Rng = StdRng> {
    rng: R,
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RandomSampler<StdRng> {
    /// Reproducible sampler: the same seed replays the same choices.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> IndexSampler for RandomSampler<R> {
    fn sample_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed script of indices, each reduced modulo the requested
/// length. Returns 0 once the script runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSampler {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedSampler {
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }

    /// Always picks the first candidate.
    pub fn first() -> Self {
        Self::default()
    }

    /// How many scripted picks have been consumed.
    pub fn calls(&self) -> usize {
        self.cursor
    }
}

impl IndexSampler for ScriptedSampler {
    fn sample_index(&mut self, len: usize) -> usize {
        let pick = self.script.get(self.cursor).copied().unwrap_or(0);
        self.cursor += 1;
        pick % len
    }
}
