//! Turning accumulated counts into rates and averages

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{AVERAGE_DECIMALS, PERCENT_DECIMALS};

use super::config::Variant;
use super::roster::{Accumulators, ParticipantId};

/// Per-participant fold of accumulators over an averaging window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Trials the participant was seated for
    pub trials: u64,
    pub deaths: u64,
    pub time_total: f64,
    /// Sum of sampled nervosity values (one sample per epoch)
    pub nervosity_sum: f64,
    pub nervosity_samples: u64,
    pub death_turns: BTreeMap<u32, u64>,
}

impl Totals {
    /// Snapshot accumulators that covered `trials` trials.
    /// `sample_nervosity` records the current nervosity as one sample.
    pub fn from_accumulators(acc: &Accumulators, trials: u64, sample_nervosity: bool) -> Self {
        Self {
            trials,
            deaths: acc.deaths,
            time_total: acc.time_total,
            nervosity_sum: if sample_nervosity { acc.nervosity } else { 0.0 },
            nervosity_samples: u64::from(sample_nervosity),
            death_turns: acc.death_turns.clone(),
        }
    }

    pub fn absorb(&mut self, other: &Totals) {
        self.trials += other.trials;
        self.deaths += other.deaths;
        self.time_total += other.time_total;
        self.nervosity_sum += other.nervosity_sum;
        self.nervosity_samples += other.nervosity_samples;
        for (turn, count) in &other.death_turns {
            *self.death_turns.entry(*turn).or_insert(0) += count;
        }
    }

    pub fn survivals(&self) -> u64 {
        self.trials.saturating_sub(self.deaths)
    }
}

/// Final statistics for one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantStats {
    pub name: String,
    pub deaths: u64,
    /// Percentage, 2 decimals
    pub death_rate: f64,
    /// Percentage, 2 decimals
    pub survival_rate: f64,
    /// Seconds of reaction time per survived trial (extended only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_time_per_survival: Option<f64>,
    /// Mean sampled nervosity (extended only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_nervosity: Option<f64>,
    #[serde(default)]
    pub death_turns: BTreeMap<u32, u64>,
}

/// Pure conversion from totals to statistics records
#[derive(Debug, Clone, Copy)]
pub struct StatsReporter {
    variant: Variant,
}

impl StatsReporter {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    pub fn participant(&self, id: ParticipantId, totals: &Totals) -> ParticipantStats {
        let trials = totals.trials as f64;
        let extended = self.variant == Variant::Extended;

        ParticipantStats {
            name: id.to_string(),
            deaths: totals.deaths,
            death_rate: round_to(ratio(totals.deaths as f64, trials) * 100.0, PERCENT_DECIMALS),
            survival_rate: round_to(
                ratio(totals.survivals() as f64, trials) * 100.0,
                PERCENT_DECIMALS,
            ),
            avg_time_per_survival: extended.then(|| {
                round_to(
                    ratio(totals.time_total, totals.survivals() as f64),
                    AVERAGE_DECIMALS,
                )
            }),
            avg_nervosity: extended.then(|| {
                round_to(
                    ratio(totals.nervosity_sum, totals.nervosity_samples as f64),
                    AVERAGE_DECIMALS,
                )
            }),
            death_turns: totals.death_turns.clone(),
        }
    }

    pub fn report(
        &self,
        totals: &BTreeMap<ParticipantId, Totals>,
    ) -> BTreeMap<ParticipantId, ParticipantStats> {
        totals
            .iter()
            .map(|(id, t)| (*id, self.participant(*id, t)))
            .collect()
    }
}

/// `numerator / denominator`, or zero when the denominator is zero
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
