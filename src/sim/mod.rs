//! Simulator core.
//!
//! Advances a [`Candidate`] cycle by cycle through a single primitive,
//! [`Simulation::advance`], whose choice is either a process launch or
//! the wait pseudo-choice (jump to the earliest in-flight completion).
//! Stocks, the completion heap, and the incrementally maintained
//! runnable set stay consistent across every step.

mod candidate;
mod runnable;

pub use candidate::{Candidate, Completion, TraceEntry};
pub use runnable::RunnableSet;

use std::cmp::Reverse;

use crate::models::{Config, ProcessId};

/// One step decision for the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Launch the process now; the cycle does not advance.
    Launch(ProcessId),
    /// Advance the cycle to the earliest in-flight completion and
    /// realize every completion due by then.
    Wait,
}

/// A candidate paired with its runnable bookkeeping.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    cfg: &'a Config,
    candidate: Candidate,
    runnable: RunnableSet,
}

impl<'a> Simulation<'a> {
    /// Starts a fresh simulation from the configuration's initial stocks.
    pub fn new(cfg: &'a Config) -> Self {
        let candidate = Candidate::new(cfg);
        let runnable = RunnableSet::from_stocks(cfg, &candidate.stocks);
        Self {
            cfg,
            candidate,
            runnable,
        }
    }

    /// The candidate being built.
    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    /// The runnable bookkeeping.
    pub fn runnable(&self) -> &RunnableSet {
        &self.runnable
    }

    /// Finishes the simulation, yielding the candidate.
    pub fn into_candidate(self) -> Candidate {
        self.candidate
    }

    /// Applies one step.
    ///
    /// `Launch` requires the process's needs to be satisfied; `Wait`
    /// requires at least one process in flight. A `Wait` with nothing
    /// in flight is a no-op.
    pub fn advance(&mut self, choice: Choice) {
        match choice {
            Choice::Wait => self.wait(),
            Choice::Launch(pid) => self.launch(pid),
        }
    }

    /// Re-inserts processes whose missing count reached zero while
    /// their runnable flag was unset.
    pub fn reconcile(&mut self) {
        self.runnable.reconcile();
    }

    fn wait(&mut self) {
        let Some(finish) = self.candidate.next_finish() else {
            return;
        };
        self.candidate.cycle = finish;
        while let Some(&Reverse(completion)) = self.candidate.running.peek() {
            if completion.finish > self.candidate.cycle {
                break;
            }
            self.candidate.running.pop();
            for &(item, qty) in &self.cfg.processes[completion.process].results {
                let old = self.candidate.stocks[item];
                self.candidate.stocks[item] += qty;
                self.runnable
                    .on_increase(self.cfg, item, old, self.candidate.stocks[item]);
            }
        }
    }

    fn launch(&mut self, pid: ProcessId) {
        let process = &self.cfg.processes[pid];
        self.candidate.running.push(Reverse(Completion {
            finish: self.candidate.cycle + process.delay,
            process: pid,
        }));
        for &(item, qty) in &process.needs {
            let old = self.candidate.stocks[item];
            self.candidate.stocks[item] -= qty;
            self.runnable
                .on_decrease(self.cfg, item, old, self.candidate.stocks[item]);
        }
        self.candidate.trace.push(TraceEntry {
            cycle: self.candidate.cycle,
            process: pid,
        });
    }
}
