//! Incremental runnable-set maintenance.
//!
//! For each process the set tracks `missing`: how many *distinct* need
//! items currently sit below their required quantity. A process is
//! runnable exactly when `missing == 0`. Stock changes feed in through
//! [`RunnableSet::on_increase`] and [`RunnableSet::on_decrease`],
//! which touch only the processes registered for the changed item in
//! the inverted needers index — never the whole catalogue.
//!
//! The set is the single source of truth for runnability; the cycle
//! and cap filters in the generator build views over it without
//! mutating it.

use crate::models::{Config, ProcessId};

/// The set of currently runnable processes, maintained incrementally.
#[derive(Debug, Clone)]
pub struct RunnableSet {
    /// Per process: number of distinct under-supplied need items.
    missing: Vec<usize>,
    /// Per process: whether it is in `runnable`.
    flags: Vec<bool>,
    /// Runnable process ids, kept sorted ascending.
    runnable: Vec<ProcessId>,
}

impl RunnableSet {
    /// Computes the set from scratch for the given stocks.
    pub fn from_stocks(cfg: &Config, stocks: &[i64]) -> Self {
        let mut set = Self {
            missing: vec![0; cfg.processes.len()],
            flags: vec![false; cfg.processes.len()],
            runnable: Vec::new(),
        };
        for (pid, process) in cfg.processes.iter().enumerate() {
            set.missing[pid] = process
                .needs
                .iter()
                .filter(|&&(item, qty)| stocks[item] < qty)
                .count();
            if set.missing[pid] == 0 {
                set.insert(pid);
            }
        }
        set
    }

    /// Records that `item`'s stock rose from `old` to `new`.
    pub fn on_increase(&mut self, cfg: &Config, item: usize, old: i64, new: i64) {
        for &(pid, qty) in &cfg.needers_by_item[item] {
            if old < qty && qty <= new {
                self.missing[pid] -= 1;
                if self.missing[pid] == 0 {
                    self.insert(pid);
                }
            }
        }
    }

    /// Records that `item`'s stock fell from `old` to `new`.
    pub fn on_decrease(&mut self, cfg: &Config, item: usize, old: i64, new: i64) {
        for &(pid, qty) in &cfg.needers_by_item[item] {
            if new < qty && qty <= old {
                if self.missing[pid] == 0 {
                    self.remove(pid);
                }
                self.missing[pid] += 1;
            }
        }
    }

    /// Re-inserts any process whose missing count is zero but whose
    /// runnable flag is unset.
    pub fn reconcile(&mut self) {
        for pid in 0..self.missing.len() {
            if self.missing[pid] == 0 && !self.flags[pid] {
                self.insert(pid);
            }
        }
    }

    /// Runnable process ids, ascending.
    pub fn processes(&self) -> &[ProcessId] {
        &self.runnable
    }

    /// Whether `pid` is currently runnable.
    pub fn is_runnable(&self, pid: ProcessId) -> bool {
        self.flags[pid]
    }

    /// Missing count for `pid`.
    pub fn missing(&self, pid: ProcessId) -> usize {
        self.missing[pid]
    }

    /// Whether no process is runnable.
    pub fn is_empty(&self) -> bool {
        self.runnable.is_empty()
    }

    fn insert(&mut self, pid: ProcessId) {
        if self.flags[pid] {
            return;
        }
        self.flags[pid] = true;
        let pos = self.runnable.partition_point(|&p| p < pid);
        self.runnable.insert(pos, pid);
    }

    fn remove(&mut self, pid: ProcessId) {
        if !self.flags[pid] {
            return;
        }
        self.flags[pid] = false;
        if let Ok(pos) = self.runnable.binary_search(&pid) {
            self.runnable.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_str;

    fn sample_config() -> Config {
        analyze_str(
            "a:2\n\
             p:(a:2):(b:1):1\n\
             q:(a:1;b:1):(c:1):1\n\
             optimize:(c)\n",
        )
        .unwrap()
    }

    #[test]
    fn test_initial_set() {
        let cfg = sample_config();
        let set = RunnableSet::from_stocks(&cfg, &cfg.initial_stocks);
        // a=2: p runnable, q missing b.
        assert_eq!(set.processes(), &[0]);
        assert_eq!(set.missing(1), 1);
    }

    #[test]
    fn test_decrease_removes() {
        let cfg = sample_config();
        let mut set = RunnableSet::from_stocks(&cfg, &cfg.initial_stocks);
        // Consume both a: p's need crosses below its threshold.
        set.on_decrease(&cfg, 0, 2, 0);
        assert!(set.is_empty());
        assert_eq!(set.missing(0), 1);
        assert_eq!(set.missing(1), 2);
    }

    #[test]
    fn test_increase_inserts_once_satisfied() {
        let cfg = sample_config();
        let mut set = RunnableSet::from_stocks(&cfg, &cfg.initial_stocks);
        set.on_decrease(&cfg, 0, 2, 0);
        // b appears: q still misses a.
        set.on_increase(&cfg, 1, 0, 1);
        assert_eq!(set.missing(1), 1);
        assert!(set.is_empty());
        // a comes back: both runnable again.
        set.on_increase(&cfg, 0, 0, 2);
        assert_eq!(set.processes(), &[0, 1]);
    }

    #[test]
    fn test_threshold_crossing_only() {
        let cfg = sample_config();
        let mut set = RunnableSet::from_stocks(&cfg, &cfg.initial_stocks);
        // 2 -> 3 crosses no threshold for p (needs 2, already satisfied).
        set.on_increase(&cfg, 0, 2, 3);
        assert_eq!(set.processes(), &[0]);
        // 3 -> 2 crosses none either.
        set.on_decrease(&cfg, 0, 3, 2);
        assert_eq!(set.processes(), &[0]);
    }

    #[test]
    fn test_no_duplicate_insert() {
        let cfg = sample_config();
        let mut set = RunnableSet::from_stocks(&cfg, &cfg.initial_stocks);
        set.reconcile();
        set.reconcile();
        assert_eq!(set.processes(), &[0]);
    }
}
