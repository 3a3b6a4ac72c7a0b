//! Simulator CLI.
//!
//! `krpsim <config-file> <delay-in-seconds>`: parses the
//! configuration, searches a launch schedule within the wall-clock
//! budget, and prints the trace with the final stocks.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{arg, Command};

use krpsim::analysis::analyze;
use krpsim::models::RawConfig;
use krpsim::parse::parse_config;
use krpsim::search::{solve, SearchParams};

fn cli() -> Command {
    Command::new("krpsim")
        .about("Searches a launch schedule for a resource-transformation configuration")
        .arg_required_else_help(true)
        .arg(arg!(<CONFIG> "Path to a configuration file").value_parser(clap::value_parser!(PathBuf)))
        .arg(arg!(<DELAY> "Wall-clock budget in seconds").value_parser(clap::value_parser!(f64)))
        .arg(arg!(--seed [SEED] "RNG seed for reproducible runs").value_parser(clap::value_parser!(u64)))
        .arg(arg!(--"dump-config" "Print the parsed configuration and exit"))
}

fn main() {
    env_logger::init();
    let matches = cli().get_matches();
    let config_path = matches.get_one::<PathBuf>("CONFIG").cloned().unwrap_or_default();
    let delay = matches.get_one::<f64>("DELAY").copied().unwrap_or_default();
    let seed = matches.get_one::<u64>("seed").copied();
    let dump = matches.get_flag("dump-config");

    if let Err(e) = run(&config_path, delay, seed, dump) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(config_path: &PathBuf, delay: f64, seed: Option<u64>, dump: bool) -> Result<()> {
    if !delay.is_finite() || delay < 0.0 {
        bail!("invalid delay: {delay}");
    }
    let budget = Duration::from_secs_f64(delay);

    let text = fs::read_to_string(config_path)
        .with_context(|| format!("cannot open {}", config_path.display()))?;
    let raw = parse_config(&text)?;

    if dump {
        print_config(&raw);
        return Ok(());
    }

    println!("\nInitial stocks:");
    for stock in &raw.initial_stocks {
        println!("{}: {}", stock.name, stock.qty);
    }

    let cfg = analyze(raw)?;
    let mut params = SearchParams::default();
    if let Some(seed) = seed {
        params = params.with_seed(seed);
    }
    let best = solve(&cfg, budget, &params);

    println!("\nSimulation trace:");
    for entry in &best.trace {
        println!("{}:{}", entry.cycle, cfg.processes[entry.process].name);
    }
    println!("\nTotal cycles:{}", best.cycle);

    println!("\nFinal stocks:");
    for (id, name) in cfg.items.iter() {
        println!("{}: {}", name, best.stocks[id]);
    }

    Ok(())
}

fn print_config(cfg: &RawConfig) {
    println!("Stocks ({})", cfg.initial_stocks.len());
    for stock in &cfg.initial_stocks {
        println!("  - {} : {}", stock.name, stock.qty);
    }
    println!("\nProcesses ({})", cfg.processes.len());
    for process in &cfg.processes {
        println!("  - {} (delay {})", process.name, process.delay);
        let join = |items: &[krpsim::models::RawItem]| {
            items
                .iter()
                .map(|i| format!("{}:{}", i.name, i.qty))
                .collect::<Vec<_>>()
                .join(" ")
        };
        println!("    needs  : {}", join(&process.needs));
        println!("    results: {}", join(&process.results));
    }
    println!("\nOptimize: {}", cfg.optimize_keys.join(" "));
}
