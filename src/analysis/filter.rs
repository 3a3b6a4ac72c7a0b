//! Objective-relevant process filter.
//!
//! When the objective names concrete items, processes that cannot
//! contribute to them are dead weight for the search. The filter keeps
//! exactly the processes reachable by reverse traversal from the
//! objective items: producers of an objective item, then producers of
//! those producers' needs, transitively. Everything else is dropped.
//!
//! If nothing survives (the objective is a raw material no process
//! produces), the original catalogue is kept so the search still has
//! moves to explore.

use std::collections::HashSet;

use crate::models::RawProcess;

/// Returns the processes relevant to `goals`, or the original list
/// when the filter would empty the catalogue.
pub(crate) fn objective_relevant(processes: Vec<RawProcess>, goals: &[String]) -> Vec<RawProcess> {
    let mut targets: HashSet<&str> = goals.iter().map(String::as_str).collect();
    let mut kept = vec![false; processes.len()];

    // Fixpoint: each round admits processes producing a current target
    // and widens the target set with their needs.
    loop {
        let mut changed = false;
        for (idx, process) in processes.iter().enumerate() {
            if kept[idx] {
                continue;
            }
            if process.results.iter().any(|r| targets.contains(r.name.as_str())) {
                kept[idx] = true;
                changed = true;
                for need in &process.needs {
                    targets.insert(need.name.as_str());
                }
            }
        }
        if !changed {
            break;
        }
    }

    if kept.iter().any(|&k| k) {
        processes
            .into_iter()
            .zip(kept)
            .filter_map(|(p, keep)| keep.then_some(p))
            .collect()
    } else {
        processes
    }
}
