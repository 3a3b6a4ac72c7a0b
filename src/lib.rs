//! Resource-transformation scheduling by genetic search.
//!
//! Given an initial inventory of named items, a catalogue of processes
//! (each consuming a fixed multiset of items and producing another
//! after a fixed delay, freely parallelizable with itself), and an
//! objective — minimize elapsed cycles or maximize designated stocks —
//! this crate searches for a launch schedule that respects stock
//! availability at every launch and scores well within a wall-clock
//! budget.
//!
//! # Modules
//!
//! - **`models`**: Value types — items, processes, raw and analyzed
//!   configurations, the stock-cap policy
//! - **`parse`**: The textual configuration grammar
//! - **`analysis`**: Analyzer passes — item indexing, distance field,
//!   objective filter, stock caps, obvious-cycle marks
//! - **`sim`**: Simulator core — candidate state, completion heap,
//!   incrementally maintained runnable set
//! - **`search`**: Guided candidate generation, scoring, and the
//!   genetic driver
//! - **`verify`**: Trace replay and feasibility checking
//!
//! # Pipeline
//!
//! `parse → analyze → search(budget) → emit trace`. The analyzer
//! decorates the configuration once; the search is the sole consumer
//! of that decoration, and the verifier replays emitted traces against
//! the raw catalogue.
//!
//! # Quick start
//!
//! ```
//! use std::time::Duration;
//! use krpsim::analysis::analyze_str;
//! use krpsim::search::{solve, SearchParams};
//!
//! let cfg = analyze_str(
//!     "wood:10\n\
//!      saw:(wood:2):(plank:1):1\n\
//!      build:(plank:3):(chair:1):2\n\
//!      optimize:(chair)\n",
//! )
//! .unwrap();
//! let params = SearchParams::default()
//!     .with_population_size(10)
//!     .with_max_iter(3)
//!     .with_seed(42);
//! let best = solve(&cfg, Duration::from_secs(1), &params);
//! assert!(best.stocks[cfg.items.lookup("chair").unwrap()] >= 1);
//! ```

pub mod analysis;
pub mod models;
pub mod parse;
pub mod search;
pub mod sim;
pub mod verify;
