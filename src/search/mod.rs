//! Genetic search over launch schedules.
//!
//! The driver keeps a population of simulated candidates, sorts by
//! fitness, and breeds the next generation from the two best: half the
//! population re-simulates under their positional guidance, the rest
//! is fresh random walks. The wall-clock budget is checked at every
//! outer iteration and between child constructions; an in-progress
//! candidate is always completed, so the worst-case overshoot is one
//! candidate.
//!
//! # Quick start
//!
//! ```no_run
//! use std::time::Duration;
//! use krpsim::analysis::analyze_str;
//! use krpsim::search::{solve, SearchParams};
//!
//! let cfg = analyze_str("a:3\np:(a:1):(b:1):2\noptimize:(b)\n").unwrap();
//! let params = SearchParams::default().with_seed(42);
//! let best = solve(&cfg, Duration::from_secs(2), &params);
//! println!("{} launches in {} cycles", best.trace.len(), best.cycle);
//! ```

mod generator;
mod params;
mod score;

pub use generator::generate;
pub use params::SearchParams;
pub use score::score;

use std::cmp::Reverse;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::models::Config;
use crate::sim::Candidate;

/// Runs the genetic search within `budget` and returns the best
/// candidate found.
///
/// Never fails: with no budget at all the result is the initialized
/// empty candidate. Tolerates empty and singleton populations by
/// skipping crossover and falling back to random generation.
pub fn solve(cfg: &Config, budget: Duration, params: &SearchParams) -> Candidate {
    let start = Instant::now();
    let seed = params.seed.unwrap_or_else(wall_clock_seed);
    let mut rng = SmallRng::seed_from_u64(seed);
    log::debug!("search seeded with {seed}");

    let mut best = Candidate::new(cfg);
    let mut best_score: Option<i64> = None;

    let mut population: Vec<Candidate> = Vec::with_capacity(params.population_size);
    for i in 0..params.population_size {
        if start.elapsed() > budget {
            break;
        }
        population.push(generate(cfg, params, None, &mut rng));
        log::debug!("generated candidate {} of {}", i + 1, params.population_size);
    }

    for iter in 0..params.max_iter {
        if start.elapsed() > budget {
            break;
        }

        // Descending score, ties broken by smaller cycle.
        population.sort_by_cached_key(|c| (Reverse(score(c, cfg, params)), c.cycle));

        if let Some(first) = population.first() {
            let first_score = score(first, cfg, params);
            if best_score.map_or(true, |b| first_score > b) {
                log::info!(
                    "iteration {iter}: new best score {first_score} ({} launches, {} cycles)",
                    first.trace.len(),
                    first.cycle
                );
                best = first.clone();
                best_score = Some(first_score);
            }
        }

        // Parents survive the refill by deep copy; children mutate
        // independent state.
        let parents: Option<(Candidate, Candidate)> = (population.len() >= 2)
            .then(|| (population[0].clone(), population[1].clone()));
        population.clear();

        if let Some((p1, p2)) = &parents {
            while population.len() < params.population_size / 2 {
                if start.elapsed() > budget {
                    break;
                }
                population.push(generate(cfg, params, Some((p1, p2)), &mut rng));
            }
        }
        while population.len() < params.population_size {
            if start.elapsed() > budget {
                break;
            }
            population.push(generate(cfg, params, None, &mut rng));
        }
    }

    best
}

/// Default seed source: sub-second wall-clock jitter.
fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::from(d.subsec_nanos()) ^ d.as_secs())
        .unwrap_or(0)
}
