//! Guided candidate generation.
//!
//! Builds one candidate by simulating from the initial stocks to
//! termination. At every step the runnable set is narrowed to a choice
//! list — the cycle filter drops processes marked `in_cycle`, the cap
//! filter drops cap-blocked ones, each with a reinstate-one rule so
//! the walk is never starved artificially — and one choice is applied:
//!
//! 1. the first parent's launch at this position, if still runnable
//!    and the mutation draw allows it;
//! 2. otherwise the second parent's launch, under the complementary
//!    draw;
//! 3. otherwise a uniform pick from the choice list (mutation), which
//!    may be the wait pseudo-choice.
//!
//! Without parents the same loop degenerates to a guided random walk.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::models::{Config, ProcessId};
use crate::sim::{Candidate, Choice, Simulation};

use super::SearchParams;

/// Simulates one fresh candidate, optionally steered by two parents.
pub fn generate<R: Rng>(
    cfg: &Config,
    params: &SearchParams,
    parents: Option<(&Candidate, &Candidate)>,
    rng: &mut R,
) -> Candidate {
    let mut sim = Simulation::new(cfg);
    let (parent1, parent2) = match parents {
        Some((p1, p2)) => (Some(p1), Some(p2)),
        None => (None, None),
    };
    let half_rate = params.mutation_rate / 2.0;

    let mut step = 0usize;
    while sim.candidate().cycle < params.max_cycles {
        let choices = filtered_choices(cfg, &sim);
        if choices.is_empty() {
            break;
        }

        let from_parent = |parent: Option<&Candidate>| -> Option<Choice> {
            let entry = parent?.trace.get(step)?;
            let choice = Choice::Launch(entry.process);
            choices.contains(&choice).then_some(choice)
        };

        let r = rng.random_range(0.0..100.0);
        let choice = if r < 100.0 - half_rate {
            from_parent(parent1)
        } else {
            None
        };
        let choice = choice.or_else(|| {
            if r <= 100.0 - half_rate {
                from_parent(parent2)
            } else {
                None
            }
        });
        let choice = choice.unwrap_or_else(|| *choices.choose(rng).unwrap());

        sim.advance(choice);
        sim.reconcile();
        step += 1;
    }

    sim.into_candidate()
}

/// Narrows the runnable set to the choice list for one step.
///
/// The underlying runnable bookkeeping is never touched; both filters
/// build a view. The wait pseudo-choice sits at the tail exactly when
/// something is in flight.
fn filtered_choices(cfg: &Config, sim: &Simulation<'_>) -> Vec<Choice> {
    let runnable = sim.runnable().processes();

    // Cycle filter: drop in-cycle processes unless that would leave no
    // launchable choice at all.
    let mut kept: Vec<ProcessId> = runnable
        .iter()
        .copied()
        .filter(|&pid| !cfg.processes[pid].in_cycle)
        .collect();
    if kept.is_empty() {
        if let Some(&first) = runnable.first() {
            kept.push(first);
        }
    }

    // Cap filter: drop cap-blocked processes. Reinstate one only when
    // nothing is in flight, otherwise waiting remains possible.
    let stocks = &sim.candidate().stocks;
    let mut open: Vec<ProcessId> = kept
        .iter()
        .copied()
        .filter(|&pid| !cfg.caps.is_blocked(&cfg.processes[pid], stocks))
        .collect();
    if open.is_empty() && !sim.candidate().has_running() {
        if let Some(&first) = kept.first() {
            open.push(first);
        }
    }

    let mut choices: Vec<Choice> = open.into_iter().map(Choice::Launch).collect();
    if sim.candidate().has_running() {
        choices.push(Choice::Wait);
    }
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_str;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn make_params() -> SearchParams {
        SearchParams::default()
    }

    #[test]
    fn test_random_walk_exhausts_single_chain() {
        let cfg = analyze_str(
            "a:3\n\
             p:(a:1):(b:1):2\n\
             q:(b:1):(c:1):3\n\
             optimize:(c)\n",
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let candidate = generate(&cfg, &make_params(), None, &mut rng);

        // The only maximal run converts everything: a=0, b=0, c=3.
        let c = cfg.items.lookup("c").unwrap();
        assert_eq!(candidate.stocks[c], 3);
        assert!(candidate.stocks.iter().all(|&q| q >= 0));
        assert!(candidate.cycle >= 5);
        assert!(!candidate.has_running());
    }

    #[test]
    fn test_single_launch_then_wait() {
        // One x, one slow process: exactly one launch at cycle 0, then a
        // forced wait to cycle 10.
        let cfg = analyze_str("x:1\nslow:(x:1):(y:1):10\noptimize:(y)\n").unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let candidate = generate(&cfg, &make_params(), None, &mut rng);

        assert_eq!(candidate.trace.len(), 1);
        assert_eq!(candidate.trace[0].cycle, 0);
        assert_eq!(candidate.cycle, 10);
        let x = cfg.items.lookup("x").unwrap();
        let y = cfg.items.lookup("y").unwrap();
        assert_eq!(candidate.stocks[x], 0);
        assert_eq!(candidate.stocks[y], 1);
    }

    #[test]
    fn test_cycle_trap_makes_progress() {
        // Both processes are in an obvious cycle; the reinstate rule
        // must still let the walk run f then g instead of stalling.
        let cfg = analyze_str(
            "a:1\n\
             f:(a:1):(b:1):1\n\
             g:(b:1):(a:1):1\n\
             optimize:(a)\n",
        )
        .unwrap();
        let params = make_params().with_max_cycles(10);
        let mut rng = SmallRng::seed_from_u64(1);
        let candidate = generate(&cfg, &params, None, &mut rng);

        assert!(!candidate.trace.is_empty(), "walk stalled at cycle 0");
        assert!(candidate.cycle > 0);
        let f = 0;
        let g = 1;
        assert!(candidate.trace.iter().any(|t| t.process == f));
        assert!(candidate.trace.iter().any(|t| t.process == g));
    }

    #[test]
    fn test_cap_exempt_objective_allows_full_conversion() {
        // Factor regime anchored at the objective: all 100 inputs must
        // remain launchable.
        let cfg = analyze_str("in:100\nheavy:(in:1):(out:1):1\noptimize:(out)\n").unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let candidate = generate(&cfg, &make_params(), None, &mut rng);

        let out = cfg.items.lookup("out").unwrap();
        assert_eq!(candidate.trace.len(), 100);
        assert_eq!(candidate.stocks[out], 100);
    }

    #[test]
    fn test_trace_cycles_non_decreasing() {
        let cfg = analyze_str(
            "wood:10\n\
             saw:(wood:2):(plank:1):1\n\
             build:(plank:3):(chair:1):2\n\
             optimize:(chair)\n",
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        let candidate = generate(&cfg, &make_params(), None, &mut rng);

        let cycles: Vec<i64> = candidate.trace.iter().map(|t| t.cycle).collect();
        assert!(cycles.windows(2).all(|w| w[0] <= w[1]));
        // Maximal run: 5 saws, 1 build, 2 planks left over.
        let chair = cfg.items.lookup("chair").unwrap();
        let plank = cfg.items.lookup("plank").unwrap();
        assert_eq!(candidate.stocks[chair], 1);
        assert_eq!(candidate.stocks[plank], 2);
    }

    #[test]
    fn test_parent_guidance_replays_feasible_prefix() {
        let cfg = analyze_str(
            "a:3\n\
             p:(a:1):(b:1):2\n\
             q:(b:1):(c:1):3\n\
             optimize:(c)\n",
        )
        .unwrap();
        // Zero mutation: every step either follows a parent or, where
        // the parents' entries are not runnable, falls back to a
        // uniform pick. The child must stay feasible throughout.
        let params = make_params().with_mutation_rate(0.0);
        let mut rng = SmallRng::seed_from_u64(5);
        let parent1 = generate(&cfg, &params, None, &mut rng);
        let parent2 = generate(&cfg, &params, None, &mut rng);
        let child = generate(&cfg, &params, Some((&parent1, &parent2)), &mut rng);

        assert!(child.stocks.iter().all(|&q| q >= 0));
        let c = cfg.items.lookup("c").unwrap();
        assert_eq!(child.stocks[c], 3);
    }

    #[test]
    fn test_max_cycles_bounds_simulation() {
        let cfg = analyze_str(
            "a:1\n\
             f:(a:1):(b:1):1\n\
             g:(b:1):(a:1):1\n\
             optimize:(a)\n",
        )
        .unwrap();
        let params = make_params().with_max_cycles(25);
        let mut rng = SmallRng::seed_from_u64(2);
        let candidate = generate(&cfg, &params, None, &mut rng);
        assert!(candidate.cycle >= 25);
        // One wait past the cap at most: each hop is one cycle here.
        assert!(candidate.cycle <= 26);
    }
}
