//! Bounded collection of live critters with aggregate stats

use serde::{Deserialize, Serialize};

use super::critter::{Critter, CritterId};

/// Live critters, at most `max` of them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    critters: Vec<Critter>,
    max: usize,
}

impl Population {
    pub fn new(max: usize) -> Self {
        Self {
            critters: Vec::with_capacity(max),
            max,
        }
    }

    pub fn len(&self) -> usize {
        self.critters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.critters.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn critters(&self) -> &[Critter] {
        &self.critters
    }

    pub fn iter(&self) -> impl Iterator<Item = &Critter> {
        self.critters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Critter> {
        self.critters.iter_mut()
    }

    pub fn get(&self, id: CritterId) -> Option<&Critter> {
        self.critters.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CritterId) -> Option<&mut Critter> {
        self.critters.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: CritterId) -> bool {
        self.get(id).is_some()
    }

    /// Add a critter; panics if the bound or identity invariant would break
    pub fn push(&mut self, critter: Critter) {
        assert!(
            self.critters.len() < self.max,
            "population is already at its bound of {}",
            self.max
        );
        assert!(
            !self.contains(critter.id),
            "critter {:?} is already in the population",
            critter.id
        );
        self.critters.push(critter);
    }

    /// Remove every critter that is no longer alive, returning their ids
    pub fn remove_dead(&mut self) -> Vec<CritterId> {
        let dead: Vec<CritterId> = self
            .critters
            .iter()
            .filter(|c| !c.alive)
            .map(|c| c.id)
            .collect();
        self.critters.retain(|c| c.alive);
        dead
    }

    /// Stable ascending sort by fitness (ties keep their current order)
    pub fn sort_by_fitness(&mut self) {
        self.critters.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
    }

    /// Sort, then detach the `count` lowest-fitness critters
    pub fn cull_lowest(&mut self, count: usize) -> Vec<Critter> {
        self.sort_by_fitness();
        let count = count.min(self.critters.len());
        self.critters.drain(..count).collect()
    }

    /// Clear episode state on every member
    pub fn reset_all(&mut self) {
        for critter in &mut self.critters {
            critter.reset();
        }
    }

    /// Highest fitness, 0 when empty
    pub fn max_fitness(&self) -> f64 {
        self.critters
            .iter()
            .map(|c| c.fitness)
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Mean fitness, 0 when empty
    pub fn average_fitness(&self) -> f64 {
        if self.critters.is_empty() {
            return 0.0;
        }
        self.critters.iter().map(|c| c.fitness).sum::<f64>() / self.critters.len() as f64
    }

    /// Oldest member's age at `generation`, 0 when empty
    pub fn max_age(&self, generation: u32) -> u32 {
        self.critters
            .iter()
            .map(|c| c.age(generation))
            .max()
            .unwrap_or(0)
    }

    /// Mean age at `generation`, 0 when empty
    pub fn average_age(&self, generation: u32) -> f64 {
        if self.critters.is_empty() {
            return 0.0;
        }
        let total: u64 = self.critters.iter().map(|c| c.age(generation) as u64).sum();
        total as f64 / self.critters.len() as f64
    }
}
