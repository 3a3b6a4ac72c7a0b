//! Candidate fitness.
//!
//! Two branches, selected by the optimize keys:
//!
//! - pure `time`: score is inversely proportional to elapsed cycles;
//! - any item objective: the objective stock weighted by `alpha`, plus
//!   every reachable intermediate stock discounted by
//!   `decay^dist` and weighted by `beta`. Unreachable items earn
//!   nothing.
//!
//! A mixed `(time; goal)` list scores by the goal branch. Scores are
//! truncated to integers; the driver breaks ties by smaller cycle.

use crate::models::Config;
use crate::sim::Candidate;

use super::SearchParams;

/// Base score for a zero-cycle candidate under the time objective.
const TIME_SCORE_BASE: i64 = 100_000;

/// Computes the fitness of a finished candidate. Higher is better.
pub fn score(candidate: &Candidate, cfg: &Config, params: &SearchParams) -> i64 {
    let goal = match cfg.goal {
        Some(goal) => goal,
        None => {
            return if candidate.cycle == 0 {
                TIME_SCORE_BASE
            } else {
                TIME_SCORE_BASE / candidate.cycle
            };
        }
    };

    let target = candidate.stocks[goal] as f64;
    let mut interm = 0.0;
    for (item, &qty) in candidate.stocks.iter().enumerate() {
        if item == goal || qty <= 0 {
            continue;
        }
        if let Some(dist) = cfg.dist[item] {
            interm += params.score_decay.powi(dist as i32) * qty as f64;
        }
    }

    (params.score_alpha * target + params.score_beta * interm) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_str;

    fn make_params() -> SearchParams {
        SearchParams::default()
    }

    #[test]
    fn test_time_objective_inverse_in_cycle() {
        let cfg = analyze_str("a:1\np:(a:1):(b:1):1\noptimize:(time)\n").unwrap();
        let mut candidate = Candidate::new(&cfg);
        assert_eq!(score(&candidate, &cfg, &make_params()), 100_000);
        candidate.cycle = 10;
        assert_eq!(score(&candidate, &cfg, &make_params()), 10_000);
        candidate.cycle = 100;
        assert_eq!(score(&candidate, &cfg, &make_params()), 1_000);
    }

    #[test]
    fn test_goal_stock_dominates() {
        let cfg = analyze_str(
            "a:3\n\
             p:(a:1):(b:1):2\n\
             q:(b:1):(c:1):3\n\
             optimize:(c)\n",
        )
        .unwrap();
        let c = cfg.items.lookup("c").unwrap();
        let b = cfg.items.lookup("b").unwrap();
        let params = make_params();

        let mut with_goal = Candidate::new(&cfg);
        with_goal.stocks[c] = 2;
        let mut with_interm = Candidate::new(&cfg);
        with_interm.stocks[b] = 2;

        assert!(score(&with_goal, &cfg, &params) > score(&with_interm, &cfg, &params));
    }

    #[test]
    fn test_intermediate_decay_by_distance() {
        let cfg = analyze_str(
            "a:0\n\
             p:(a:1):(b:1):1\n\
             q:(b:1):(c:1):1\n\
             optimize:(c)\n",
        )
        .unwrap();
        let a = cfg.items.lookup("a").unwrap();
        let b = cfg.items.lookup("b").unwrap();
        let params = make_params();

        // dist: b=1, a=2. A unit of b outweighs a unit of a.
        let mut near = Candidate::new(&cfg);
        near.stocks[b] = 100;
        let mut far = Candidate::new(&cfg);
        far.stocks[a] = 100;
        // beta * decay^1 * 100 = 7 vs beta * decay^2 * 100 = 4.9.
        assert_eq!(score(&near, &cfg, &params), 7);
        assert_eq!(score(&far, &cfg, &params), 4);
    }

    #[test]
    fn test_unreachable_stock_ignored() {
        // `ash` cannot reach the goal; stockpiles of it score zero.
        let cfg = analyze_str(
            "a:1\n\
             make:(a:1):(goal:1):1\n\
             burn:(goal:1):(ash:1):1\n\
             optimize:(goal)\n",
        )
        .unwrap();
        // The filter drops `burn` (it does not produce toward the goal),
        // so only reachable items remain; a candidate holding a scores
        // via decay, empty candidate scores zero.
        let params = make_params();
        let empty = Candidate::new(&cfg);
        let base = score(&empty, &cfg, &params);
        // initial a:1 at dist 1 contributes beta * decay = 0.07 -> trunc 0.
        assert_eq!(base, 0);
    }

    #[test]
    fn test_mixed_keys_prefer_goal_branch() {
        let cfg = analyze_str("a:1\np:(a:1):(b:1):4\noptimize:(time;b)\n").unwrap();
        let b = cfg.items.lookup("b").unwrap();
        let params = make_params();
        let mut candidate = Candidate::new(&cfg);
        candidate.cycle = 4;
        candidate.stocks[b] = 3;
        // Goal branch: alpha * 3 = 3, not 100000/4.
        assert_eq!(score(&candidate, &cfg, &params), 3);
    }
}
