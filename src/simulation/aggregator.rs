//! Running many trials and folding their outcomes

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::constants::{NERVOSITY_PER_SURVIVED_GAME, NERVOSITY_RESET_MAX, NERVOSITY_RESET_MIN};
use crate::error::SimResult;
use crate::rng::RandomSource;

use super::chamber::ChamberFactory;
use super::config::{SimConfig, Variant};
use super::report::EpochStatistics;
use super::roster::{ParticipantId, Roster};
use super::stats::{StatsReporter, Totals};
use super::trial::TrialRunner;

/// Everything a run produced before it is turned into a report
#[derive(Debug, Clone)]
pub struct AggregateRun {
    pub roster: Roster,
    /// Lineup totals over the whole run
    pub totals: BTreeMap<ParticipantId, Totals>,
    pub trials: u64,
    pub trials_with_hit: u64,
    pub replacements: u64,
    /// Extended only, and only when requested
    pub epochs: Vec<EpochStatistics>,
}

impl AggregateRun {
    pub fn total_deaths(&self) -> u64 {
        self.totals.values().map(|t| t.deaths).sum()
    }
}

pub struct EpochAggregator {
    config: SimConfig,
    runner: TrialRunner,
}

impl EpochAggregator {
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        config.validate()?;
        let factory = ChamberFactory::new(config.chamber_size)?;
        Ok(Self {
            config: config.clone(),
            runner: TrialRunner::new(config.variant, factory),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn run<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SimResult<AggregateRun> {
        info!(
            variant = ?self.config.variant,
            participants = self.config.participants,
            chamber_size = self.config.chamber_size,
            trials = self.config.total_trials(),
            "Starting simulation"
        );
        match self.config.variant {
            Variant::Simple => self.run_simple(rng),
            Variant::Extended => self.run_extended(rng),
        }
    }

    /// One persistent roster, `epochs` independent trials, no resets
    fn run_simple<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SimResult<AggregateRun> {
        let mut roster = Roster::new(self.config.participants);
        let lineup = roster.lineup().to_vec();
        let mut active = Vec::with_capacity(lineup.len());
        let mut trials_with_hit = 0u64;

        for _ in 0..self.config.epochs {
            active.clone_from(&lineup);
            let outcome = self.runner.run(&mut roster, &mut active, rng)?;
            if outcome.elimination.is_some() {
                trials_with_hit += 1;
            }
        }

        let totals = roster
            .lineup_accumulators()
            .map(|(id, acc)| (id, Totals::from_accumulators(acc, self.config.epochs, false)))
            .collect();

        Ok(AggregateRun {
            replacements: roster.replacements_spawned(),
            roster,
            totals,
            trials: self.config.epochs,
            trials_with_hit,
            epochs: Vec::new(),
        })
    }

    /// `epochs` stress cycles of `games_per_epoch` trials each
    fn run_extended<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SimResult<AggregateRun> {
        let games = self.config.games_per_epoch;
        let reporter = StatsReporter::new(Variant::Extended);
        let mut roster = Roster::new(self.config.participants);
        let lineup = roster.lineup().to_vec();
        let mut active = Vec::with_capacity(lineup.len());
        let mut totals: BTreeMap<ParticipantId, Totals> =
            lineup.iter().map(|id| (*id, Totals::default())).collect();
        let mut per_epoch = Vec::new();
        let mut trials = 0u64;
        let mut trials_with_hit = 0u64;

        for epoch in 0..self.config.epochs {
            roster.begin_epoch(|| rng.uniform_between(NERVOSITY_RESET_MIN, NERVOSITY_RESET_MAX));

            for _ in 0..games {
                active.clone_from(&lineup);
                let outcome = self.runner.run(&mut roster, &mut active, rng)?;
                trials += 1;
                if outcome.elimination.is_some() {
                    trials_with_hit += 1;
                }
                roster.reward_survivors(NERVOSITY_PER_SURVIVED_GAME);
            }

            let epoch_totals: BTreeMap<ParticipantId, Totals> = roster
                .lineup_accumulators()
                .map(|(id, acc)| (id, Totals::from_accumulators(acc, games, true)))
                .collect();
            for (id, epoch_total) in &epoch_totals {
                totals.entry(*id).or_default().absorb(epoch_total);
            }

            debug!(
                epoch = epoch + 1,
                deaths = roster.total_lineup_deaths(),
                replacements = roster.live_replacements(),
                "Epoch complete"
            );

            if self.config.per_epoch {
                per_epoch.push(EpochStatistics {
                    epoch: epoch + 1,
                    participants: reporter.report(&epoch_totals),
                });
            }
        }

        Ok(AggregateRun {
            replacements: roster.replacements_spawned(),
            roster,
            totals,
            trials,
            trials_with_hit,
            epochs: per_epoch,
        })
    }
}
