//! Participants and their per-run / per-epoch accumulators

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::NERVOSITY_PER_EMPTY_SHOT;

/// Stable participant identity (0-based, displayed 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u32);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Part of the persistent lineup
    Lineup,
    /// Stepped in for an eliminated participant mid-trial
    Replacement,
}

/// Mutable counters for one participant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accumulators {
    pub deaths: u64,
    /// Simulated reaction time summed over survived shots (seconds)
    pub time_total: f64,
    pub nervosity: f64,
    /// Turn number -> eliminations on that turn
    pub death_turns: BTreeMap<u32, u64>,
}

impl Accumulators {
    pub fn with_nervosity(nervosity: f64) -> Self {
        Self {
            nervosity,
            ..Self::default()
        }
    }

    pub fn record_death(&mut self, turn: u32) {
        self.deaths += 1;
        *self.death_turns.entry(turn).or_insert(0) += 1;
    }

    /// Survived an empty slot: `time_draw` is scaled by nervosity before stress rises
    pub fn record_empty_shot(&mut self, time_draw: f64) {
        self.time_total += time_draw * self.nervosity;
        self.nervosity += NERVOSITY_PER_EMPTY_SHOT;
    }

    pub fn reset_epoch(&mut self, nervosity: f64) {
        self.deaths = 0;
        self.time_total = 0.0;
        self.death_turns.clear();
        self.nervosity = nervosity;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub origin: Origin,
    pub acc: Accumulators,
}

/// Identity -> accumulator mapping plus the ordered lineup
#[derive(Debug, Clone)]
pub struct Roster {
    participants: BTreeMap<ParticipantId, Participant>,
    lineup: Vec<ParticipantId>,
    next_id: u32,
    replacements_spawned: u64,
}

impl Roster {
    pub fn new(count: u32) -> Self {
        let lineup: Vec<ParticipantId> = (0..count).map(ParticipantId).collect();
        let participants = lineup
            .iter()
            .map(|&id| {
                (
                    id,
                    Participant {
                        id,
                        origin: Origin::Lineup,
                        acc: Accumulators::default(),
                    },
                )
            })
            .collect();
        Self {
            participants,
            lineup,
            next_id: count,
            replacements_spawned: 0,
        }
    }

    pub fn lineup(&self) -> &[ParticipantId] {
        &self.lineup
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    pub fn accumulators(&self, id: ParticipantId) -> Option<&Accumulators> {
        self.participants.get(&id).map(|p| &p.acc)
    }

    pub fn accumulators_mut(&mut self, id: ParticipantId) -> Option<&mut Accumulators> {
        self.participants.get_mut(&id).map(|p| &mut p.acc)
    }

    /// Lineup members in lineup order
    pub fn lineup_accumulators(&self) -> impl Iterator<Item = (ParticipantId, &Accumulators)> {
        self.lineup
            .iter()
            .filter_map(|id| self.participants.get(id).map(|p| (*id, &p.acc)))
    }

    /// Register a fresh participant that never played before
    pub fn spawn_replacement(&mut self, nervosity: f64) -> ParticipantId {
        let id = ParticipantId(self.next_id);
        self.next_id += 1;
        self.replacements_spawned += 1;
        self.participants.insert(
            id,
            Participant {
                id,
                origin: Origin::Replacement,
                acc: Accumulators::with_nervosity(nervosity),
            },
        );
        id
    }

    /// Total replacements over the roster's lifetime, including pruned ones
    pub fn replacements_spawned(&self) -> u64 {
        self.replacements_spawned
    }

    /// Replacement records currently held
    pub fn live_replacements(&self) -> usize {
        self.participants.len() - self.lineup.len()
    }

    /// Drop replacement records and reset the lineup with freshly drawn nervosity
    pub fn begin_epoch(&mut self, mut draw_nervosity: impl FnMut() -> f64) {
        self.participants
            .retain(|_, participant| participant.origin == Origin::Lineup);
        for id in &self.lineup {
            if let Some(participant) = self.participants.get_mut(id) {
                participant.acc.reset_epoch(draw_nervosity());
            }
        }
    }

    /// Bump nervosity of every lineup member still without a death this epoch
    pub fn reward_survivors(&mut self, increment: f64) {
        for id in &self.lineup {
            if let Some(participant) = self.participants.get_mut(id) {
                if participant.acc.deaths == 0 {
                    participant.acc.nervosity += increment;
                }
            }
        }
    }

    pub fn total_lineup_deaths(&self) -> u64 {
        self.lineup_accumulators().map(|(_, acc)| acc.deaths).sum()
    }
}
