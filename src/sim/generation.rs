//! Generational transition: selection, reproduction, replenishment, reset

use serde::{Deserialize, Serialize};

use super::bridge::PhysicsBridge;
use super::critter::Critter;
use super::genome::{Genome, reproduce};
use super::state::SimulationState;
use crate::consts::ORIGIN;
use crate::settings::{BreedOrder, Settings};

/// Summary of one completed generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation that was just evaluated (0 for bootstrap)
    pub generation: u32,
    /// Live critters at the end of the episode
    pub evaluated: usize,
    /// Critters killed mid-episode
    pub deaths: u32,
    pub max_fitness: f64,
    pub average_fitness: f64,
    /// Mean fitness of the survivors before their reset
    pub survivor_fitness: f64,
    pub culled: usize,
    pub survivors: usize,
    pub born: usize,
}

/// Breed the opening population from nothing
pub fn bootstrap<B: PhysicsBridge>(
    state: &mut SimulationState,
    settings: &Settings,
    bridge: &mut B,
) -> GenerationReport {
    assert!(
        !state.is_bootstrapped() && state.population.is_empty(),
        "simulation is already bootstrapped"
    );
    advance_generation(state, settings, bridge)
}

/// Run the transition from the current generation to the next
pub fn advance_generation<B: PhysicsBridge>(
    state: &mut SimulationState,
    settings: &Settings,
    bridge: &mut B,
) -> GenerationReport {
    let evaluated = state.population.len();
    let max_fitness = state.population.max_fitness();
    let average_fitness = state.population.average_fitness();
    let cull = settings.cull_count(evaluated);
    let survivors = evaluated - cull;
    // Known before the cull so both breed orders fill the same slots
    let vacancies = state.population.max().saturating_sub(survivors);
    let next_generation = state.generation + 1;

    state.population.sort_by_fitness();
    let (culled, offspring) = match settings.breed_order {
        BreedOrder::CullThenBreed => {
            let culled = state.population.cull_lowest(cull);
            let offspring = breed(state, settings, vacancies);
            (culled, offspring)
        }
        BreedOrder::BreedThenCull => {
            let offspring = breed(state, settings, vacancies);
            let culled = state.population.cull_lowest(cull);
            (culled, offspring)
        }
    };

    for critter in &culled {
        bridge.despawn(critter.id);
    }
    let survivor_fitness = state.population.average_fitness();

    state.population.reset_all();
    for critter in state.population.iter() {
        bridge.reset(critter.id, ORIGIN);
    }

    let born = offspring.len();
    for genome in offspring {
        let id = state.next_critter_id();
        state.population.push(Critter::new(id, genome, next_generation));
        bridge.spawn(id, ORIGIN);
    }

    let report = GenerationReport {
        generation: state.generation,
        evaluated,
        deaths: state.deaths,
        max_fitness,
        average_fitness,
        survivor_fitness,
        culled: culled.len(),
        survivors,
        born,
    };

    log::info!(
        "Generation {}: {} evaluated, {} died, avg fitness {:.4} (max {:.4}) -> culled {}, survivors avg {:.4}, bred {}",
        report.generation,
        report.evaluated,
        report.deaths,
        report.average_fitness,
        report.max_fitness,
        report.culled,
        report.survivor_fitness,
        report.born,
    );

    state.generation = next_generation;
    state.tick = 0;
    state.deaths = 0;
    if !state.inbox.is_empty() {
        log::debug!("Dropping {} stale contacts at generation change", state.inbox.len());
        state.inbox.clear();
    }

    report
}

/// Breed `count` genomes from the current population
fn breed(state: &mut SimulationState, settings: &Settings, count: usize) -> Vec<Genome> {
    let parents = state.population.critters();
    let rng = &mut state.rng;
    (0..count)
        .map(|_| reproduce(rng, parents, settings))
        .collect()
}
