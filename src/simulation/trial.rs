//! Single-trial execution

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::{NERVOSITY_RESET_MAX, NERVOSITY_RESET_MIN, TIME_TAKEN_MAX, TIME_TAKEN_MIN};
use crate::error::{SimError, SimResult};
use crate::rng::RandomSource;

use super::chamber::{Chamber, ChamberFactory, Slot};
use super::config::Variant;
use super::roster::{ParticipantId, Roster};
use super::turn::TurnSequencer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    pub participant: ParticipantId,
    /// 1-based turn on which the loaded slot fired
    pub turn: u32,
}

/// Result of a single trial
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialOutcome {
    pub elimination: Option<Elimination>,
    pub turns_taken: u32,
    /// Extended variant: who took the eliminated participant's seat
    pub replacement: Option<ParticipantId>,
}

/// Plays out chambers against an active roster
#[derive(Debug, Clone, Copy)]
pub struct TrialRunner {
    variant: Variant,
    factory: ChamberFactory,
}

impl TrialRunner {
    pub fn new(variant: Variant, factory: ChamberFactory) -> Self {
        Self { variant, factory }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Run one trial on a freshly built chamber
    pub fn run<R: RandomSource + ?Sized>(
        &self,
        roster: &mut Roster,
        active: &mut Vec<ParticipantId>,
        rng: &mut R,
    ) -> SimResult<TrialOutcome> {
        let chamber = self.factory.build(rng);
        self.run_chamber(chamber, roster, active, rng)
    }

    /// Run one trial on the given chamber.
    ///
    /// The simple variant fires every slot; the extended variant stops at
    /// the first elimination after seating a replacement.
    pub fn run_chamber<R: RandomSource + ?Sized>(
        &self,
        mut chamber: Chamber,
        roster: &mut Roster,
        active: &mut Vec<ParticipantId>,
        rng: &mut R,
    ) -> SimResult<TrialOutcome> {
        if chamber.is_empty() {
            return Err(SimError::invalid("trial started with an empty chamber"));
        }

        let mut sequencer = TurnSequencer::for_variant(self.variant);
        let mut outcome = TrialOutcome::default();
        let mut turn = 0u32;

        while !chamber.is_empty() {
            let Some(index) = sequencer.next_actor(chamber.remaining(), active.len()) else {
                break;
            };
            let Some(slot) = chamber.fire() else {
                break;
            };
            turn += 1;
            let actor = active[index];

            match slot {
                Slot::Loaded => {
                    if let Some(acc) = roster.accumulators_mut(actor) {
                        acc.record_death(turn);
                    }
                    outcome.elimination = Some(Elimination {
                        participant: actor,
                        turn,
                    });
                    trace!(participant = %actor, turn, "eliminated");

                    if self.variant == Variant::Extended {
                        let nervosity = rng.uniform_between(NERVOSITY_RESET_MIN, NERVOSITY_RESET_MAX);
                        let replacement = roster.spawn_replacement(nervosity);
                        active[index] = replacement;
                        outcome.replacement = Some(replacement);
                        break;
                    }
                }
                Slot::Empty => {
                    if self.variant == Variant::Extended {
                        let draw = rng.uniform_between(TIME_TAKEN_MIN, TIME_TAKEN_MAX);
                        if let Some(acc) = roster.accumulators_mut(actor) {
                            acc.record_empty_shot(draw);
                        }
                    }
                }
            }
        }

        outcome.turns_taken = turn;
        Ok(outcome)
    }
}
