//! Critter Evo - a generational genetic algorithm steering critters to a goal
//!
//! Core modules:
//! - `sim`: Deterministic evolutionary core (genomes, episodes, generations)
//! - `settings`: Data-driven policy configuration and variant presets
//! - `telemetry`: Read-only HUD data derived from the simulation
//! - `arena`: Minimal point-mass collaborator for headless runs

pub mod arena;
pub mod settings;
pub mod sim;
pub mod telemetry;

pub use settings::{Settings, SettingsError, Variant};
pub use telemetry::Telemetry;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    use glam::Vec2;

    /// Ticks per episode (one gene per tick)
    pub const EPISODE_LENGTH: usize = 200;
    /// Population bound restored after every generation
    pub const MAX_POPULATION: usize = 100;
    /// Magnitude of every randomly sampled acceleration gene
    pub const ACCEL_MAGNITUDE: f32 = 2000.0;
    /// Per-gene mutation probability
    pub const MUTATION_RATE: f64 = 0.01;
    /// Fraction of the population culled each generation
    pub const SELECTION_FRACTION: f64 = 0.5;

    /// World dimensions
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;

    /// Spawn point every critter returns to between episodes
    pub const ORIGIN: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT - 20.0);
    /// Default goal position (top centre)
    pub const GOAL: Vec2 = Vec2::new(WIDTH / 2.0, 20.0);

    /// Fixed physics timestep used by the reference arena (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Sprite heading for a velocity, in radians
///
/// Sprites face "up" at rotation 0, so the result is offset by a quarter turn.
/// A stationary critter keeps heading 0.
#[inline]
pub fn heading(velocity: Vec2) -> f32 {
    if velocity.length_squared() <= f32::EPSILON {
        return 0.0;
    }
    normalize_angle(velocity.y.atan2(velocity.x) + std::f32::consts::FRAC_PI_2)
}
