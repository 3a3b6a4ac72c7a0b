//! Configuration model.
//!
//! [`RawConfig`] is the name-based output of the parser. The analyzer
//! turns it into a [`Config`]: item references resolved to dense ids
//! and decorated with the derived fields the search consumes — the
//! distance field, the inverted needers index, and the stock-cap
//! policy. A `Config` is frozen once analysis completes.

use serde::{Deserialize, Serialize};

use super::item::{ItemId, ItemTable, RawItem};
use super::process::{Process, ProcessId, RawProcess};

/// Parsed but unanalyzed configuration.
///
/// Initial stocks keep file order so that item ids are assigned
/// deterministically by first appearance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    /// `(name, qty)` pairs in file order.
    pub initial_stocks: Vec<RawItem>,
    /// Process catalogue in declaration order.
    pub processes: Vec<RawProcess>,
    /// Optimization keys: the literal token `time` or item names.
    pub optimize_keys: Vec<String>,
}

/// One entry of the `optimize` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizeKey {
    /// Minimize total elapsed cycles.
    Time,
    /// Maximize the final quantity of the named item.
    Stock(String),
}

impl OptimizeKey {
    /// Parses a raw optimize token. `time` is matched case-insensitively.
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("time") {
            OptimizeKey::Time
        } else {
            OptimizeKey::Stock(token.to_string())
        }
    }
}

/// How per-item stock caps are interpreted during search.
///
/// Caps are pruning hints: a process whose every result is over cap is
/// withheld from the generator's choice set, but never from the
/// underlying runnable bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CapRegime {
    /// Static per-item bounds derived from the limiting item's initial
    /// stock (the limiting item has zero net production).
    Absolute {
        /// Initial stock of the limiting item.
        limiting_initial_stock: i64,
    },
    /// Bounds proportional to the limiting item's current stock (the
    /// limiting item has positive net production).
    Factor,
    /// No limiting item could be chosen; nothing is ever capped.
    Uncapped,
}

/// Per-item stock caps used to prune the generator's choice set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapPolicy {
    /// Which interpretation applies.
    pub regime: CapRegime,
    /// The limiting item, if one was chosen.
    pub limiting_item: Option<ItemId>,
    /// Static bound per item; `None` = never capped. Read in the
    /// `Absolute` regime.
    pub abs_cap: Vec<Option<i64>>,
    /// Proportionality factor per item; `None` = never capped. Read in
    /// the `Factor` regime.
    pub factor: Vec<Option<f64>>,
}

impl CapPolicy {
    /// A policy that never caps anything, sized for `item_count` items.
    pub fn uncapped(item_count: usize) -> Self {
        Self {
            regime: CapRegime::Uncapped,
            limiting_item: None,
            abs_cap: vec![None; item_count],
            factor: vec![None; item_count],
        }
    }

    /// Whether `item` currently holds more than its cap allows.
    pub fn is_over_cap(&self, item: ItemId, stocks: &[i64]) -> bool {
        match self.regime {
            CapRegime::Absolute { .. } => match self.abs_cap[item] {
                Some(cap) => stocks[item] > cap,
                None => false,
            },
            CapRegime::Factor => match (self.factor[item], self.limiting_item) {
                (Some(factor), Some(limiting)) => {
                    stocks[item] as f64 > stocks[limiting] as f64 * factor
                }
                _ => false,
            },
            CapRegime::Uncapped => false,
        }
    }

    /// Whether `process` is cap-blocked: every result over cap.
    ///
    /// Processes with no results are never cap-blocked.
    pub fn is_blocked(&self, process: &Process, stocks: &[i64]) -> bool {
        !process.results.is_empty()
            && process
                .results
                .iter()
                .all(|&(item, _)| self.is_over_cap(item, stocks))
    }
}

/// Analyzed configuration: the frozen input to search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Initial stock quantity per item id.
    pub initial_stocks: Vec<i64>,
    /// Surviving process catalogue, id = index.
    pub processes: Vec<Process>,
    /// Optimization keys in file order.
    pub optimize_keys: Vec<OptimizeKey>,
    /// Primary non-time objective item, if any.
    pub goal: Option<ItemId>,
    /// Production distance from each item to the primary objective;
    /// `None` = the item cannot reach it.
    pub dist: Vec<Option<u32>>,
    /// Inverted needs index: for each item, the processes that consume
    /// it and the quantity they require.
    pub needers_by_item: Vec<Vec<(ProcessId, i64)>>,
    /// Stock-cap pruning policy.
    pub caps: CapPolicy,
    /// Item name interning table.
    pub items: ItemTable,
}

impl Config {
    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the objective is purely elapsed time.
    pub fn optimizes_time_only(&self) -> bool {
        self.optimize_keys.iter().all(|k| *k == OptimizeKey::Time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimize_key_from_token() {
        assert_eq!(OptimizeKey::from_token("time"), OptimizeKey::Time);
        assert_eq!(OptimizeKey::from_token("TIME"), OptimizeKey::Time);
        assert_eq!(
            OptimizeKey::from_token("gold"),
            OptimizeKey::Stock("gold".into())
        );
    }

    #[test]
    fn test_uncapped_policy_blocks_nothing() {
        let policy = CapPolicy::uncapped(2);
        let process = Process {
            name: "p".into(),
            needs: vec![(0, 1)],
            results: vec![(1, 1)],
            delay: 1,
            in_cycle: false,
        };
        assert!(!policy.is_over_cap(1, &[0, 1_000_000]));
        assert!(!policy.is_blocked(&process, &[0, 1_000_000]));
    }

    #[test]
    fn test_absolute_cap() {
        let mut policy = CapPolicy::uncapped(2);
        policy.regime = CapRegime::Absolute {
            limiting_initial_stock: 10,
        };
        policy.limiting_item = Some(0);
        policy.abs_cap = vec![Some(10), Some(4)];
        assert!(!policy.is_over_cap(1, &[10, 4]));
        assert!(policy.is_over_cap(1, &[10, 5]));
    }

    #[test]
    fn test_factor_cap_tracks_limiting_stock() {
        let mut policy = CapPolicy::uncapped(2);
        policy.regime = CapRegime::Factor;
        policy.limiting_item = Some(0);
        policy.factor = vec![None, Some(2.0)];
        // Cap on item 1 is 2x the limiting item's current stock.
        assert!(!policy.is_over_cap(1, &[3, 6]));
        assert!(policy.is_over_cap(1, &[3, 7]));
    }

    #[test]
    fn test_no_result_process_never_blocked() {
        let mut policy = CapPolicy::uncapped(1);
        policy.regime = CapRegime::Absolute {
            limiting_initial_stock: 0,
        };
        policy.abs_cap = vec![Some(0)];
        let sink = Process {
            name: "sink".into(),
            needs: vec![(0, 1)],
            results: Vec::new(),
            delay: 1,
            in_cycle: false,
        };
        assert!(!policy.is_blocked(&sink, &[5]));
    }
}
