//! Production-distance field.
//!
//! Assigns each item the number of production hops separating it from
//! the primary objective: the objective itself is at distance 0, the
//! needs of any process producing a distance-`d` item are at most
//! `d + 1` away. Computed as a breadth-first traversal of the reverse
//! producer graph, so the first assignment an item receives is already
//! its minimum. Items never reached stay undefined.
//!
//! The field is consumed only by the scorer, which discounts
//! intermediate stocks by `decay^dist`.

use std::collections::{HashMap, VecDeque};

use crate::models::RawProcess;

/// Computes hop distances from every item name to `goal`.
pub(crate) fn build_distance(processes: &[RawProcess], goal: &str) -> HashMap<String, u32> {
    let mut dist: HashMap<String, u32> = HashMap::new();
    dist.insert(goal.to_string(), 0);

    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(goal.to_string());

    while let Some(item) = queue.pop_front() {
        let d = dist[&item];
        for process in processes {
            if !process.results.iter().any(|r| r.name == item) {
                continue;
            }
            for need in &process.needs {
                if !dist.contains_key(&need.name) {
                    dist.insert(need.name.clone(), d + 1);
                    queue.push_back(need.name.clone());
                }
            }
        }
    }

    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawItem, RawProcess};

    fn make_process(name: &str, needs: &[(&str, i64)], results: &[(&str, i64)]) -> RawProcess {
        RawProcess {
            name: name.into(),
            needs: needs.iter().map(|&(n, q)| RawItem::new(n, q)).collect(),
            results: results.iter().map(|&(n, q)| RawItem::new(n, q)).collect(),
            delay: 1,
        }
    }

    #[test]
    fn test_linear_chain() {
        let processes = vec![
            make_process("p", &[("a", 1)], &[("b", 1)]),
            make_process("q", &[("b", 1)], &[("c", 1)]),
        ];
        let dist = build_distance(&processes, "c");
        assert_eq!(dist.get("c"), Some(&0));
        assert_eq!(dist.get("b"), Some(&1));
        assert_eq!(dist.get("a"), Some(&2));
    }

    #[test]
    fn test_unreachable_item_undefined() {
        let processes = vec![
            make_process("p", &[("a", 1)], &[("b", 1)]),
            make_process("other", &[("x", 1)], &[("y", 1)]),
        ];
        let dist = build_distance(&processes, "b");
        assert_eq!(dist.get("a"), Some(&1));
        assert_eq!(dist.get("x"), None);
        assert_eq!(dist.get("y"), None);
    }

    #[test]
    fn test_shortest_path_wins() {
        // Two routes to the goal: direct (1 hop) and via an intermediate
        // (2 hops). The direct route must win.
        let processes = vec![
            make_process("long1", &[("ore", 1)], &[("ingot", 1)]),
            make_process("long2", &[("ingot", 1)], &[("goal", 1)]),
            make_process("short", &[("ore", 1)], &[("goal", 1)]),
        ];
        let dist = build_distance(&processes, "goal");
        assert_eq!(dist.get("ore"), Some(&1));
        assert_eq!(dist.get("ingot"), Some(&1));
    }

    #[test]
    fn test_cycle_terminates() {
        let processes = vec![
            make_process("f", &[("a", 1)], &[("b", 1)]),
            make_process("g", &[("b", 1)], &[("a", 1)]),
        ];
        let dist = build_distance(&processes, "a");
        assert_eq!(dist.get("a"), Some(&0));
        assert_eq!(dist.get("b"), Some(&1));
    }
}
