//! Read-only HUD data
//!
//! Snapshots are cheap copies of aggregate stats; the display layer never
//! touches the simulation directly.

use serde::{Deserialize, Serialize};

use crate::sim::SimulationState;

/// Aggregate view of the simulation at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub generation: u32,
    pub tick: usize,
    pub population: usize,
    pub max_fitness: f64,
    pub average_fitness: f64,
    pub max_age: u32,
    pub average_age: f64,
}

impl Telemetry {
    pub fn capture(state: &SimulationState) -> Self {
        let population = &state.population;
        Self {
            generation: state.generation,
            tick: state.tick,
            population: population.len(),
            max_fitness: population.max_fitness(),
            average_fitness: population.average_fitness(),
            max_age: population.max_age(state.generation),
            average_age: population.average_age(state.generation),
        }
    }

    /// Average fitness as a percentage truncated to two decimals
    pub fn average_fitness_percent(&self) -> f64 {
        (self.average_fitness * 10_000.0).floor() / 100.0
    }

    /// Two-line HUD overlay text
    pub fn summary_text(&self) -> String {
        format!(
            "Generation: {}\nAvg Fitness: {}%",
            self.generation,
            self.average_fitness_percent()
        )
    }

    /// Full single-line status for logs
    pub fn status_line(&self) -> String {
        format!(
            "gen {} tick {} | pop {} | fitness avg {:.4} max {:.4} | age avg {:.2} max {}",
            self.generation,
            self.tick,
            self.population,
            self.average_fitness,
            self.max_fitness,
            self.average_age,
            self.max_age
        )
    }
}
