//! Turn order within a trial

use super::config::Variant;

/// Picks the index (into the active roster) of whoever shoots next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSequencer {
    /// Rotate by one after every turn, starting from the first participant
    RoundRobin { next: usize },
    /// Reindex every turn from the slots left in the cylinder
    ChamberModulo,
}

impl TurnSequencer {
    /// Fresh sequencer for one trial
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Simple => TurnSequencer::RoundRobin { next: 0 },
            Variant::Extended => TurnSequencer::ChamberModulo,
        }
    }

    /// `remaining` is the slot count before the shot is taken.
    /// Returns `None` when nobody is left to act.
    pub fn next_actor(&mut self, remaining: usize, active: usize) -> Option<usize> {
        if active == 0 {
            return None;
        }
        match self {
            TurnSequencer::RoundRobin { next } => {
                let index = *next % active;
                *next = (index + 1) % active;
                Some(index)
            }
            TurnSequencer::ChamberModulo => Some(remaining % active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_ignores_remaining_slots() {
        let mut sequencer = TurnSequencer::for_variant(Variant::Simple);
        let picks: Vec<_> = (0..6)
            .rev()
            .map(|remaining| sequencer.next_actor(remaining + 1, 3).unwrap())
            .collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_chamber_modulo_reindexes_each_turn() {
        let mut sequencer = TurnSequencer::for_variant(Variant::Extended);
        // Six-slot cylinder, three shooters: 6%3, 5%3, 4%3, 3%3, 2%3, 1%3
        let picks: Vec<_> = (1..=6)
            .rev()
            .map(|remaining| sequencer.next_actor(remaining, 3).unwrap())
            .collect();
        assert_eq!(picks, vec![0, 2, 1, 0, 2, 1]);
    }

    #[test]
    fn test_no_actor_when_roster_empty() {
        let mut simple = TurnSequencer::for_variant(Variant::Simple);
        let mut extended = TurnSequencer::for_variant(Variant::Extended);
        assert_eq!(simple.next_actor(6, 0), None);
        assert_eq!(extended.next_actor(6, 0), None);
    }

    #[test]
    fn test_round_robin_single_participant() {
        let mut sequencer = TurnSequencer::for_variant(Variant::Simple);
        for remaining in (1..=6).rev() {
            assert_eq!(sequencer.next_actor(remaining, 1), Some(0));
        }
    }
}
