//! A single evolving agent

use serde::{Deserialize, Serialize};

use super::genome::Genome;

/// Stable handle shared with the physics/render collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CritterId(pub u32);

/// Contact state for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactState {
    #[default]
    Idle,
    TouchingGoal,
    TouchingHazard,
}

/// A critter and its per-generation bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Critter {
    pub id: CritterId,
    pub genome: Genome,
    /// Reward accrued this episode
    pub fitness: f64,
    /// Generation this critter was bred for (never changes)
    born_at: u32,
    /// Level-triggered contact flag, cleared once consumed
    pub contact: ContactState,
    pub alive: bool,
}

impl Critter {
    pub fn new(id: CritterId, genome: Genome, born_at: u32) -> Self {
        Self {
            id,
            genome,
            fitness: 0.0,
            born_at,
            contact: ContactState::Idle,
            alive: true,
        }
    }

    pub fn born_at(&self) -> u32 {
        self.born_at
    }

    /// Generations survived as of `generation`
    pub fn age(&self, generation: u32) -> u32 {
        assert!(
            generation >= self.born_at,
            "critter {:?} observed at generation {} before its birth at {}",
            self.id,
            generation,
            self.born_at
        );
        generation - self.born_at
    }

    /// Clear episode state ahead of a new generation
    pub fn reset(&mut self) {
        self.fitness = 0.0;
        self.contact = ContactState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn critter(born_at: u32) -> Critter {
        Critter::new(CritterId(7), Genome::from_genes(vec![Vec2::X; 4]), born_at)
    }

    #[test]
    fn test_new_critter_is_fresh() {
        let c = critter(3);
        assert_eq!(c.fitness, 0.0);
        assert_eq!(c.contact, ContactState::Idle);
        assert!(c.alive);
        assert_eq!(c.born_at(), 3);
    }

    #[test]
    fn test_age() {
        let c = critter(3);
        assert_eq!(c.age(3), 0);
        assert_eq!(c.age(10), 7);
    }

    #[test]
    #[should_panic(expected = "before its birth")]
    fn test_age_before_birth_panics() {
        critter(5).age(4);
    }

    #[test]
    fn test_reset() {
        let mut c = critter(1);
        c.fitness = 0.75;
        c.contact = ContactState::TouchingGoal;
        c.reset();
        assert_eq!(c.fitness, 0.0);
        assert_eq!(c.contact, ContactState::Idle);
        assert_eq!(c.born_at(), 1);
    }
}
