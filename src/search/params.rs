//! Search parameters.

use serde::{Deserialize, Serialize};

/// Tunable knobs for the genetic search.
///
/// Defaults match the reference tuning; the only parameter most
/// callers touch is [`with_seed`](SearchParams::with_seed) for
/// reproducible runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Candidates per generation.
    pub population_size: usize,
    /// Maximum outer-loop iterations.
    pub max_iter: usize,
    /// Hard cap on any candidate's simulation cycle.
    pub max_cycles: i64,
    /// Mutation rate in percent (0–100).
    pub mutation_rate: f64,
    /// Weight of the objective stock in the fitness.
    pub score_alpha: f64,
    /// Weight of intermediate stocks in the fitness.
    pub score_beta: f64,
    /// Per-hop decay applied to intermediate stocks.
    pub score_decay: f64,
    /// RNG seed; `None` seeds from the wall clock.
    pub seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_iter: 1000,
            max_cycles: 50_000,
            mutation_rate: 10.0,
            score_alpha: 1.0,
            score_beta: 0.1,
            score_decay: 0.7,
            seed: None,
        }
    }
}

impl SearchParams {
    /// Creates the default parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the per-candidate cycle cap.
    pub fn with_max_cycles(mut self, max_cycles: i64) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Sets the mutation rate (percent).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 100.0);
        self
    }

    /// Fixes the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
