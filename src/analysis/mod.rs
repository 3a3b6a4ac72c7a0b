//! Configuration analysis.
//!
//! Turns a parsed [`RawConfig`] into the frozen [`Config`] the search
//! consumes. Passes run in a fixed order:
//!
//! 1. duplicate process name check;
//! 2. production-distance field toward the primary objective;
//! 3. objective-relevant process filter (with keep-original fallback);
//! 4. item indexing — dense ids by first appearance across stocks,
//!    then each surviving process's needs, then its results;
//! 5. inverted needers index;
//! 6. max-stock cap policy;
//! 7. obvious-cycle marking.
//!
//! The distance field and the filter operate on item names; everything
//! from indexing on works with dense ids.

mod caps;
mod cycles;
mod distance;
mod filter;

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{CapPolicy, Config, ItemTable, OptimizeKey, Process, RawConfig, RawItem};

/// Semantic configuration errors, detected before search starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// Two processes share a name.
    #[error("duplicate process name: '{name}'")]
    DuplicateProcessName {
        /// The repeated name.
        name: String,
    },
    /// An optimize key names an item that appears nowhere in the
    /// configuration.
    #[error("optimize key names unknown item: '{name}'")]
    UnknownOptimizeItem {
        /// The unresolved key.
        name: String,
    },
}

/// Runs all analysis passes over a parsed configuration.
pub fn analyze(raw: RawConfig) -> Result<Config, AnalysisError> {
    let mut seen = HashSet::new();
    for process in &raw.processes {
        if !seen.insert(process.name.as_str()) {
            return Err(AnalysisError::DuplicateProcessName {
                name: process.name.clone(),
            });
        }
    }

    let optimize_keys: Vec<OptimizeKey> = raw
        .optimize_keys
        .iter()
        .map(|k| OptimizeKey::from_token(k))
        .collect();
    let goal_names: Vec<String> = optimize_keys
        .iter()
        .filter_map(|k| match k {
            OptimizeKey::Stock(name) => Some(name.clone()),
            OptimizeKey::Time => None,
        })
        .collect();

    let dist_by_name = goal_names
        .first()
        .map(|goal| distance::build_distance(&raw.processes, goal))
        .unwrap_or_default();

    let raw_processes = if goal_names.is_empty() {
        raw.processes
    } else {
        filter::objective_relevant(raw.processes, &goal_names)
    };

    // Item indexing: stocks first, then needs and results per process.
    let mut items = ItemTable::new();
    let mut initial_stocks = Vec::new();
    for stock in &raw.initial_stocks {
        let id = items.intern(&stock.name);
        if id == initial_stocks.len() {
            initial_stocks.push(stock.qty);
        }
    }
    let mut processes: Vec<Process> = Vec::with_capacity(raw_processes.len());
    for raw_process in raw_processes {
        let resolve = |items: &mut ItemTable, list: &[RawItem]| {
            list.iter()
                .map(|item| (items.intern(&item.name), item.qty))
                .collect::<Vec<_>>()
        };
        let needs = resolve(&mut items, &raw_process.needs);
        let results = resolve(&mut items, &raw_process.results);
        processes.push(Process {
            name: raw_process.name,
            needs,
            results,
            delay: raw_process.delay,
            in_cycle: false,
        });
    }
    initial_stocks.resize(items.len(), 0);

    let goal = match goal_names.first() {
        Some(name) => Some(items.lookup(name).ok_or_else(|| {
            AnalysisError::UnknownOptimizeItem { name: name.clone() }
        })?),
        None => None,
    };
    let mut objectives = Vec::new();
    for name in &goal_names {
        objectives.push(
            items
                .lookup(name)
                .ok_or_else(|| AnalysisError::UnknownOptimizeItem { name: name.clone() })?,
        );
    }

    let dist: Vec<Option<u32>> = (0..items.len())
        .map(|id| dist_by_name.get(items.name(id)).copied())
        .collect();

    let mut needers_by_item: Vec<Vec<(usize, i64)>> = vec![Vec::new(); items.len()];
    for (pid, process) in processes.iter().enumerate() {
        for &(item, qty) in &process.needs {
            needers_by_item[item].push((pid, qty));
        }
    }

    let caps = match goal {
        Some(goal) => caps::compute(&processes, &initial_stocks, goal, &objectives, items.len()),
        None => CapPolicy::uncapped(items.len()),
    };

    cycles::mark_obvious_cycles(&mut processes);

    Ok(Config {
        initial_stocks,
        processes,
        optimize_keys,
        goal,
        dist,
        needers_by_item,
        caps,
        items,
    })
}

/// Convenience: parse and analyze in one step.
pub fn analyze_str(input: &str) -> Result<Config, ConfigError> {
    let raw = crate::parse::parse_config(input)?;
    Ok(analyze(raw)?)
}

/// Either stage of configuration loading can fail.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Syntactic failure.
    #[error(transparent)]
    Parse(#[from] crate::parse::ParseError),
    /// Semantic failure.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
