//! Simulation state
//!
//! Everything the evolutionary loop mutates lives in one value: no globals.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bridge::{ContactEvent, ContactKind};
use super::critter::CritterId;
use super::population::Population;
use crate::settings::Settings;

/// Complete simulation state (deterministic for a given seed and contact stream)
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Shared random source for every genetic operator
    pub rng: Pcg32,
    /// Generations completed; 0 until bootstrap
    pub generation: u32,
    /// Tick index within the current episode
    pub tick: usize,
    /// Live critters
    pub population: Population,
    /// Contacts reported since the last tick
    pub inbox: Vec<ContactEvent>,
    /// Critters killed during the current episode
    pub deaths: u32,
    /// Next critter ID
    next_id: u32,
}

impl SimulationState {
    /// Create an empty, not yet bootstrapped state
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            generation: 0,
            tick: 0,
            population: Population::new(settings.max_population),
            inbox: Vec::new(),
            deaths: 0,
            next_id: 1,
        }
    }

    /// Allocate a new critter ID
    pub fn next_critter_id(&mut self) -> CritterId {
        let id = CritterId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Queue a contact for the next tick
    pub fn report_contact(&mut self, id: CritterId, kind: ContactKind) {
        self.inbox.push(ContactEvent { id, kind });
    }

    /// Whether the opening generation has been bred
    pub fn is_bootstrapped(&self) -> bool {
        self.generation > 0
    }
}
