//! Roulette - Russian roulette elimination statistics
//!
//! This crate provides the trial/epoch simulation engine, its statistics,
//! and the console, JSON and chart reporters that consume them.

pub mod constants;
pub mod debug_logging;
pub mod error;
pub mod reporting;
pub mod rng;
pub mod simulation;

// Re-export commonly used types for convenience
pub use constants::*;
pub use debug_logging::DebugLogConfig;
pub use error::{SimError, SimResult};
pub use reporting::{ChartRenderer, ChartSpec, StatsSink, publish_all, sinks_for};
pub use rng::{RandomSource, ScriptedRandom, SystemRandom};
pub use simulation::{
    Accumulators, ChamberFactory, CliArgs, EpochAggregator, ParticipantId, ParticipantStats,
    Roster, SimConfig, SimulationReport, StatsReporter, TrialOutcome, TrialRunner, TurnSequencer,
    Variant, run_simulation, run_with_source,
};
