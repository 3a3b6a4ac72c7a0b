//! Candidate schedule state.
//!
//! A candidate is one simulated schedule: current cycle, stocks, the
//! min-heap of in-flight completions, and the append-only launch
//! trace. Candidates are self-contained values — cloning one gives an
//! independent simulation, which is how parents survive child
//! construction in the genetic driver.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::models::{Config, ProcessId};

/// A launch event: `process` started at `cycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Launch cycle.
    pub cycle: i64,
    /// Launched process id.
    pub process: ProcessId,
}

/// An in-flight process instance, ordered by finish cycle ascending
/// (through `Reverse` in the candidate's max-heap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Completion {
    /// Cycle at which the results materialize.
    pub finish: i64,
    /// Process id.
    pub process: ProcessId,
}

/// One search individual: a schedule under construction or finished.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    /// Current simulation cycle; never decreases.
    pub cycle: i64,
    /// Current stock per item id.
    pub stocks: Vec<i64>,
    /// In-flight completions; every finish is ≥ `cycle`.
    pub running: BinaryHeap<Reverse<Completion>>,
    /// Launch events in non-decreasing cycle order.
    pub trace: Vec<TraceEntry>,
}

impl Candidate {
    /// A fresh candidate at cycle 0 with the configuration's initial stocks.
    pub fn new(cfg: &Config) -> Self {
        Self {
            cycle: 0,
            stocks: cfg.initial_stocks.clone(),
            running: BinaryHeap::new(),
            trace: Vec::new(),
        }
    }

    /// Earliest in-flight finish cycle, if any.
    pub fn next_finish(&self) -> Option<i64> {
        self.running.peek().map(|Reverse(c)| c.finish)
    }

    /// Whether any process is in flight.
    pub fn has_running(&self) -> bool {
        !self.running.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_str;

    #[test]
    fn test_new_copies_initial_stocks() {
        let cfg = analyze_str("a:3\np:(a:1):(b:1):2\noptimize:(b)\n").unwrap();
        let candidate = Candidate::new(&cfg);
        assert_eq!(candidate.cycle, 0);
        assert_eq!(candidate.stocks, cfg.initial_stocks);
        assert!(candidate.trace.is_empty());
        assert_eq!(candidate.next_finish(), None);
    }

    #[test]
    fn test_completion_heap_orders_by_finish() {
        let mut heap: BinaryHeap<Reverse<Completion>> = BinaryHeap::new();
        heap.push(Reverse(Completion {
            finish: 7,
            process: 0,
        }));
        heap.push(Reverse(Completion {
            finish: 3,
            process: 1,
        }));
        heap.push(Reverse(Completion {
            finish: 5,
            process: 2,
        }));
        let order: Vec<i64> = std::iter::from_fn(|| heap.pop().map(|Reverse(c)| c.finish)).collect();
        assert_eq!(order, vec![3, 5, 7]);
    }
}
