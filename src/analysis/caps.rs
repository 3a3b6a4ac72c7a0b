//! Max-stock cap derivation.
//!
//! Walks the reverse producer graph from the primary objective,
//! accumulating how much of each item the reachable processes need and
//! produce. The item with the smallest nonnegative net production is
//! the **limiting item**: it bounds how far the rest of the stocks can
//! usefully grow, and every other item's cap is expressed relative to
//! it. Two regimes fall out:
//!
//! - the limiting item has zero net production: its initial stock is
//!   all there ever is, so caps are static (`Absolute`);
//! - the limiting item has positive net production: caps scale with
//!   its current stock (`Factor`).
//!
//! Caps prune the generator's choice set and nothing else; objective
//! items are never capped.

use crate::models::{CapPolicy, CapRegime, ItemId, Process};

/// Derives the cap policy for the catalogue, anchored at `goal`.
///
/// `objectives` are all non-time optimize items; they are exempt from
/// capping regardless of regime.
pub(crate) fn compute(
    processes: &[Process],
    initial_stocks: &[i64],
    goal: ItemId,
    objectives: &[ItemId],
    item_count: usize,
) -> CapPolicy {
    let mut needed = vec![0i64; item_count];
    let mut produced = vec![0i64; item_count];
    let mut in_walk = vec![false; item_count];

    // Reverse-producer walk from the goal; each process contributes its
    // quantities once.
    let mut visited_item = vec![false; item_count];
    let mut visited_process = vec![false; processes.len()];
    let mut stack = vec![goal];
    visited_item[goal] = true;
    in_walk[goal] = true;
    while let Some(item) = stack.pop() {
        for (pid, process) in processes.iter().enumerate() {
            if visited_process[pid] || process.produces(item) == 0 {
                continue;
            }
            visited_process[pid] = true;
            for &(i, qty) in &process.needs {
                needed[i] += qty;
                in_walk[i] = true;
                if !visited_item[i] {
                    visited_item[i] = true;
                    stack.push(i);
                }
            }
            for &(i, qty) in &process.results {
                produced[i] += qty;
                in_walk[i] = true;
            }
        }
    }

    // Net production per walked item. Items with net = 0 can only limit
    // if some initial stock exists to ration out.
    let net = |i: ItemId| produced[i] - needed[i];
    let mut limiting: Option<ItemId> = None;
    for i in 0..item_count {
        if !in_walk[i] || net(i) < 0 {
            continue;
        }
        if net(i) == 0 && initial_stocks[i] == 0 {
            continue;
        }
        match limiting {
            Some(best) if net(best) <= net(i) => {}
            _ => limiting = Some(i),
        }
    }

    let mut policy = CapPolicy::uncapped(item_count);
    let limiting_item = match limiting {
        Some(l) => l,
        None => return policy,
    };
    policy.limiting_item = Some(limiting_item);
    let is_objective = |i: ItemId| objectives.contains(&i);

    if net(limiting_item) == 0 {
        let s0 = initial_stocks[limiting_item];
        let per_unit = s0 / needed[limiting_item];
        policy.regime = CapRegime::Absolute {
            limiting_initial_stock: s0,
        };
        for i in 0..item_count {
            if !in_walk[i] || is_objective(i) {
                continue;
            }
            policy.abs_cap[i] = Some(if i == limiting_item {
                s0
            } else {
                needed[i] * per_unit
            });
        }
    } else {
        policy.regime = CapRegime::Factor;
        for i in 0..item_count {
            if !in_walk[i] || is_objective(i) || i == limiting_item {
                continue;
            }
            let ratio = net(i) as f64 / net(limiting_item) as f64;
            if ratio >= 0.0 {
                policy.factor[i] = Some(ratio);
            }
        }
    }

    policy
}
