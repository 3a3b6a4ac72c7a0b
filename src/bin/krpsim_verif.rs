//! Verifier CLI.
//!
//! `krpsim_verif <config-file> <trace-file>`: replays the trace
//! against the configuration and reports feasibility, the final cycle,
//! and the final stocks.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{arg, Command};

use krpsim::parse::parse_config;
use krpsim::verify::verify_trace;

fn cli() -> Command {
    Command::new("krpsim_verif")
        .about("Verifies a launch trace against a configuration")
        .arg_required_else_help(true)
        .arg(arg!(<CONFIG> "Path to a configuration file").value_parser(clap::value_parser!(PathBuf)))
        .arg(arg!(<TRACE> "Path to a trace file").value_parser(clap::value_parser!(PathBuf)))
}

fn main() {
    env_logger::init();
    let matches = cli().get_matches();
    let config_path = matches.get_one::<PathBuf>("CONFIG").cloned().unwrap_or_default();
    let trace_path = matches.get_one::<PathBuf>("TRACE").cloned().unwrap_or_default();

    if let Err(e) = run(&config_path, &trace_path) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(config_path: &PathBuf, trace_path: &PathBuf) -> Result<()> {
    let config_text = fs::read_to_string(config_path)
        .with_context(|| format!("cannot open {}", config_path.display()))?;
    let cfg = parse_config(&config_text)?;

    let trace_text = fs::read_to_string(trace_path)
        .with_context(|| format!("cannot open trace {}", trace_path.display()))?;

    println!("Verifying trace {}...", trace_path.display());
    let report = verify_trace(&cfg, &trace_text)?;

    println!("Trace is valid: {} launches.", report.launches);
    println!("\nTotal cycles:{}", report.cycle);
    println!("\nFinal stocks:");
    for (name, qty) in &report.final_stocks {
        println!("{name}: {qty}");
    }

    Ok(())
}
