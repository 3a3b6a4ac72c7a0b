//! Process model.
//!
//! A process is a deterministic transformation: it consumes a fixed
//! multiset of items at launch and produces a fixed multiset when it
//! finishes, `delay` cycles later. A process may run any number of
//! instances in parallel with itself.

use serde::{Deserialize, Serialize};

use super::item::{ItemId, RawItem};

/// Dense process identifier, valid as an index into the catalogue.
pub type ProcessId = usize;

/// A process as parsed from a configuration file, item references by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProcess {
    /// Unique process name.
    pub name: String,
    /// Items consumed at launch.
    pub needs: Vec<RawItem>,
    /// Items produced at finish. May be empty.
    pub results: Vec<RawItem>,
    /// Cycles between launch and finish.
    pub delay: i64,
}

/// An analyzed process, item references resolved to dense ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    /// Unique process name.
    pub name: String,
    /// `(item, qty)` pairs consumed at launch; qty > 0.
    pub needs: Vec<(ItemId, i64)>,
    /// `(item, qty)` pairs produced at finish; qty > 0.
    pub results: Vec<(ItemId, i64)>,
    /// Cycles between launch and finish; ≥ 0.
    pub delay: i64,
    /// Whether the analyzer marked this process as part of an obvious
    /// production cycle. Pruning hint only, never a correctness gate.
    pub in_cycle: bool,
}

impl Process {
    /// Whether every need is covered by `stocks`.
    pub fn needs_satisfied(&self, stocks: &[i64]) -> bool {
        self.needs.iter().all(|&(id, qty)| stocks[id] >= qty)
    }

    /// Quantity of `item` among this process's results, 0 if absent.
    pub fn produces(&self, item: ItemId) -> i64 {
        self.results
            .iter()
            .find(|&&(id, _)| id == item)
            .map(|&(_, qty)| qty)
            .unwrap_or(0)
    }
}
