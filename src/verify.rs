//! Trace verification.
//!
//! Replays a launch trace against a parsed configuration and checks
//! feasibility: every launched process must exist and every launch
//! must find its needs in stock once all completions due by its cycle
//! have been realized. After the last line the remaining completions
//! are drained and the final stocks reported.
//!
//! Trace lines match `<cycle>:<process-name>`; `#` begins a comment.
//! The verifier works on the *raw* configuration so that traces
//! referencing processes outside the analyzer's objective filter are
//! still judged against the full catalogue.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ItemTable, RawConfig};

/// Feasibility errors, with enough context to locate the failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// A line is neither a launch, a comment, nor blank.
    #[error("bad trace line {line}: '{content}'")]
    BadTraceLine {
        /// 1-based line number.
        line: usize,
        /// Offending content, trimmed.
        content: String,
    },
    /// The trace launches a process the configuration does not define.
    #[error("line {line}: unknown process '{name}'")]
    UnknownProcess {
        /// 1-based line number.
        line: usize,
        /// Unresolved process name.
        name: String,
    },
    /// Launch cycles must never decrease along the trace.
    #[error("line {line}: cycle {cycle} is before cycle {previous}")]
    NonMonotonicCycle {
        /// 1-based line number.
        line: usize,
        /// This line's cycle.
        cycle: i64,
        /// The previous line's cycle.
        previous: i64,
    },
    /// A launch would drive a stock negative.
    #[error(
        "cycle {cycle}: cannot launch '{process}', stock '{item}' has {have} of {need} required"
    )]
    InsufficientStock {
        /// Launch cycle.
        cycle: i64,
        /// Launched process name.
        process: String,
        /// Under-supplied item name.
        item: String,
        /// Quantity on hand.
        have: i64,
        /// Quantity required.
        need: i64,
    },
}

/// Outcome of a successful replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Cycle after draining every completion.
    pub cycle: i64,
    /// Final `(name, qty)` stocks in first-appearance order.
    pub final_stocks: Vec<(String, i64)>,
    /// Number of launches replayed.
    pub launches: usize,
}

/// Replays `trace` against `cfg`, returning the final state or the
/// first feasibility violation.
pub fn verify_trace(cfg: &RawConfig, trace: &str) -> Result<VerifyReport, VerifyError> {
    let mut items = ItemTable::new();
    let mut stocks: Vec<i64> = Vec::new();
    let intern = |items: &mut ItemTable, stocks: &mut Vec<i64>, name: &str| {
        let id = items.intern(name);
        if id == stocks.len() {
            stocks.push(0);
        }
        id
    };
    for stock in &cfg.initial_stocks {
        let id = intern(&mut items, &mut stocks, &stock.name);
        stocks[id] = stock.qty;
    }
    // Resolve catalogue items up front so replay works on ids and the
    // report covers every item.
    struct ResolvedProcess {
        name: String,
        needs: Vec<(usize, i64)>,
        results: Vec<(usize, i64)>,
        delay: i64,
    }
    let processes: Vec<ResolvedProcess> = cfg
        .processes
        .iter()
        .map(|p| ResolvedProcess {
            name: p.name.clone(),
            needs: p
                .needs
                .iter()
                .map(|i| (intern(&mut items, &mut stocks, &i.name), i.qty))
                .collect(),
            results: p
                .results
                .iter()
                .map(|i| (intern(&mut items, &mut stocks, &i.name), i.qty))
                .collect(),
            delay: p.delay,
        })
        .collect();

    let by_name: HashMap<&str, usize> = processes
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.name.as_str(), idx))
        .collect();

    let mut cycle: i64 = 0;
    let mut launches = 0usize;
    // (finish, process index), earliest finish first.
    let mut running: BinaryHeap<Reverse<(i64, usize)>> = BinaryHeap::new();

    for (idx, raw_line) in trace.lines().enumerate() {
        let lineno = idx + 1;
        let line = match raw_line.find('#') {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let (launch_cycle, name) =
            parse_trace_line(line).ok_or_else(|| VerifyError::BadTraceLine {
                line: lineno,
                content: line.to_string(),
            })?;
        if launch_cycle < cycle {
            return Err(VerifyError::NonMonotonicCycle {
                line: lineno,
                cycle: launch_cycle,
                previous: cycle,
            });
        }
        cycle = launch_cycle;

        // Realize completions due before this launch.
        while let Some(&Reverse((finish, pid))) = running.peek() {
            if finish > cycle {
                break;
            }
            running.pop();
            for &(id, qty) in &processes[pid].results {
                stocks[id] += qty;
            }
        }

        let pid = *by_name
            .get(name)
            .ok_or_else(|| VerifyError::UnknownProcess {
                line: lineno,
                name: name.to_string(),
            })?;
        let process = &processes[pid];
        for &(id, qty) in &process.needs {
            if stocks[id] < qty {
                return Err(VerifyError::InsufficientStock {
                    cycle,
                    process: process.name.clone(),
                    item: items.name(id).to_string(),
                    have: stocks[id],
                    need: qty,
                });
            }
        }
        for &(id, qty) in &process.needs {
            stocks[id] -= qty;
        }
        running.push(Reverse((cycle + process.delay, pid)));
        launches += 1;
    }

    // Drain the remaining completions.
    while let Some(Reverse((finish, pid))) = running.pop() {
        cycle = cycle.max(finish);
        for &(id, qty) in &processes[pid].results {
            stocks[id] += qty;
        }
    }

    let final_stocks = items
        .iter()
        .map(|(id, name)| (name.to_string(), stocks[id]))
        .collect();

    Ok(VerifyReport {
        cycle,
        final_stocks,
        launches,
    })
}

/// Parses `<cycle>:<process-name>`; names match `[^:#\s]+`.
fn parse_trace_line(line: &str) -> Option<(i64, &str)> {
    let (cycle, name) = line.split_once(':')?;
    let cycle = cycle.trim();
    if cycle.is_empty() || !cycle.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let name = name.trim();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c != ':' && c != '#' && !c.is_whitespace());
    if !valid {
        return None;
    }
    Some((cycle.parse().ok()?, name))
}
