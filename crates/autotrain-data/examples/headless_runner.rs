//! Headless runner: loads every bundled scenario, runs it, prints a summary
//! per control tick, and checks that two runs dispatch identically.
//!
//! Run with: `RUST_LOG=autotrain_core=debug cargo run --package autotrain-data --example headless_runner`

use std::path::Path;

use autotrain_core::report::TickReport;
use autotrain_data::{load_scenario, ScenarioRunner};
use tracing_subscriber::EnvFilter;

const CONTROL_TICKS: usize = 12;

fn run(dir: &Path) -> Vec<TickReport> {
    let scenario = load_scenario(dir).unwrap_or_else(|e| {
        panic!("failed to load scenario '{}': {e}", dir.display());
    });
    ScenarioRunner::new(scenario).run_control_ticks(CONTROL_TICKS)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let scenarios_dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios"));
    let mut dirs: Vec<_> = std::fs::read_dir(scenarios_dir)
        .expect("failed to read scenarios directory")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    for dir in &dirs {
        let name = dir.file_name().map(|n| n.to_string_lossy().into_owned());
        println!("--- {} ---", name.unwrap_or_default());

        let first = run(dir);
        for report in &first {
            println!(
                "    tick {:>5}: idle={} dispatched={} committed={} pending={} residual_supply={} skipped={}",
                report.tick,
                report.idle_units,
                report.dispatched.len(),
                report.committed(),
                report.pending,
                report.residual_supply,
                report.skipped.len(),
            );
        }

        // Run 2 -- determinism check
        let second = run(dir);
        let same = first.len() == second.len()
            && first.iter().zip(&second).all(|(a, b)| {
                a.dispatched.len() == b.dispatched.len()
                    && a.pending == b.pending
                    && a.committed() == b.committed()
            });
        if same {
            println!("    Determinism: PASS");
        } else {
            println!("    Determinism: FAIL");
            std::process::exit(1);
        }
        println!();
    }

    println!("All {} scenarios passed.", dirs.len());
}
