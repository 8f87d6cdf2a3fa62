//! Top-level simulation driver

use std::time::Instant;
use tracing::info;

use crate::error::SimResult;
use crate::rng::{RandomSource, SystemRandom};

use super::aggregator::EpochAggregator;
use super::config::SimConfig;
use super::report::SimulationReport;
use super::stats::StatsReporter;

/// Run a full simulation with the system random source
pub fn run_simulation(config: &SimConfig) -> SimResult<SimulationReport> {
    let mut rng = SystemRandom::from_seed_option(config.seed);
    run_with_source(config, &mut rng)
}

/// Run a full simulation against an explicit random source
pub fn run_with_source<R: RandomSource + ?Sized>(
    config: &SimConfig,
    rng: &mut R,
) -> SimResult<SimulationReport> {
    let aggregator = EpochAggregator::new(config)?;
    let started = Instant::now();
    let run = aggregator.run(rng)?;
    let elapsed = started.elapsed();

    let reporter = StatsReporter::new(config.variant);
    let mut report = SimulationReport::for_config(config);
    report.participants = reporter.report(&run.totals);
    report.total_trials = run.trials;
    report.trials_with_hit = run.trials_with_hit;
    report.replacements = run.replacements;
    report.elapsed_ms = elapsed.as_millis() as u64;
    report.epoch_statistics = run.epochs;

    info!(
        run_id = %report.run_id,
        trials = report.total_trials,
        hits = report.trials_with_hit,
        elapsed_ms = report.elapsed_ms,
        "Simulation complete"
    );
    Ok(report)
}
