//! Roulette simulation tool
//!
//! Runs repeated Russian roulette trials and reports per-participant
//! elimination statistics on the console, as JSON, and as PNG bar charts.
//!
//! Usage:
//!   cargo run -- --help
//!   cargo run -- --players 3 --epochs 100000
//!   cargo run -- --variant extended --epochs 500 --games-per-epoch 100
//!   cargo run -- --settings config/roulette_settings.json --output results.json

use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use roulette::{CliArgs, DebugLogConfig, SimConfig, SimResult, publish_all, run_simulation, sinks_for};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    DebugLogConfig::load_with_flag(args.debug_log).init_tracing(args.quiet);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> SimResult<()> {
    let config = SimConfig::from_cli(args)?;
    // Build sinks up front so a bad font path fails before a long run
    let mut sinks = sinks_for(&config)?;
    let report = run_simulation(&config)?;
    publish_all(&report, &mut sinks)
}
