//! Simulation engine - repeated Russian roulette trials
//!
//! Builds chambers, rotates turns, detects eliminations, and folds the
//! outcomes of many trials (and, in the extended variant, epochs) into
//! per-participant statistics.

pub mod aggregator;
pub mod chamber;
pub mod config;
pub mod report;
pub mod roster;
pub mod runner;
pub mod stats;
pub mod trial;
pub mod turn;

pub use aggregator::{AggregateRun, EpochAggregator};
pub use chamber::{Chamber, ChamberFactory, Slot};
pub use config::{CliArgs, SimConfig, Variant};
pub use report::{EpochStatistics, SimulationReport};
pub use roster::{Accumulators, Origin, Participant, ParticipantId, Roster};
pub use runner::{run_simulation, run_with_source};
pub use stats::{ParticipantStats, StatsReporter, Totals};
pub use trial::{Elimination, TrialOutcome, TrialRunner};
pub use turn::TurnSequencer;
