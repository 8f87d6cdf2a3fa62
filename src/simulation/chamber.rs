//! Chamber construction
//!
//! A chamber is a front-consumed sequence of slots with exactly one
//! loaded slot, placed by a full permutation of the cylinder.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::{LOADED_SLOTS, MIN_CHAMBER_SIZE};
use crate::error::{SimError, SimResult};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Empty,
    Loaded,
}

impl Slot {
    pub fn is_loaded(self) -> bool {
        matches!(self, Slot::Loaded)
    }
}

/// Remaining slots of one trial's cylinder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chamber {
    slots: VecDeque<Slot>,
}

impl Chamber {
    pub fn from_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Pop the front-most slot
    pub fn fire(&mut self) -> Option<Slot> {
        self.slots.pop_front()
    }

    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_loaded()).count()
    }

    /// Index of the loaded slot counted from the front, if still present
    pub fn loaded_position(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_loaded())
    }
}

/// Builds fresh, shuffled chambers of a fixed size
#[derive(Debug, Clone, Copy)]
pub struct ChamberFactory {
    size: usize,
}

impl ChamberFactory {
    pub fn new(size: u32) -> SimResult<Self> {
        if size < MIN_CHAMBER_SIZE {
            return Err(SimError::invalid(format!(
                "chamber size must be at least {}, got {}",
                MIN_CHAMBER_SIZE, size
            )));
        }
        Ok(Self {
            size: size as usize,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn build<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Chamber {
        let mut slots = vec![Slot::Empty; self.size - LOADED_SLOTS];
        slots.extend(std::iter::repeat_n(Slot::Loaded, LOADED_SLOTS));
        rng.shuffle(&mut slots);
        Chamber::from_slots(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRandom, SystemRandom};

    #[test]
    fn test_rejects_tiny_chambers() {
        assert!(ChamberFactory::new(0).is_err());
        assert!(ChamberFactory::new(1).is_err());
        assert!(ChamberFactory::new(2).is_ok());
    }

    #[test]
    fn test_exactly_one_loaded_slot() {
        let factory = ChamberFactory::new(6).unwrap();
        let mut rng = SystemRandom::seeded(1);
        for _ in 0..1_000 {
            let chamber = factory.build(&mut rng);
            assert_eq!(chamber.remaining(), 6);
            assert_eq!(chamber.loaded_count(), 1);
        }
    }

    #[test]
    fn test_loaded_position_roughly_uniform() {
        let factory = ChamberFactory::new(6).unwrap();
        let mut rng = SystemRandom::seeded(99);
        let mut counts = [0u32; 6];
        let builds = 60_000;
        for _ in 0..builds {
            let position = factory.build(&mut rng).loaded_position().unwrap();
            counts[position] += 1;
        }
        for (position, count) in counts.iter().enumerate() {
            let share = *count as f64 / builds as f64;
            assert!(
                (share - 1.0 / 6.0).abs() < 0.01,
                "position {} share {} not near 1/6",
                position,
                share
            );
        }
    }

    #[test]
    fn test_fire_consumes_from_front() {
        let factory = ChamberFactory::new(4).unwrap();
        let mut rng = ScriptedRandom::new().with_loaded_positions([1]);
        let mut chamber = factory.build(&mut rng);

        assert_eq!(chamber.fire(), Some(Slot::Empty));
        assert_eq!(chamber.loaded_position(), Some(0));
        assert_eq!(chamber.fire(), Some(Slot::Loaded));
        assert_eq!(chamber.loaded_count(), 0);
        assert_eq!(chamber.remaining(), 2);
        chamber.fire();
        chamber.fire();
        assert!(chamber.is_empty());
        assert_eq!(chamber.fire(), None);
    }
}
