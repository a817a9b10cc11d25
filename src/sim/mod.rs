//! Deterministic evolutionary core
//!
//! All selection and reproduction logic lives here. This module must be pure
//! and deterministic:
//! - Seeded RNG only
//! - Tick-driven; no transition interleaves with a tick
//! - Stable ordering (stable fitness sort, ids allocated monotonically)
//! - No rendering or physics; bodies are owned by a `PhysicsBridge`

pub mod bridge;
pub mod critter;
pub mod episode;
pub mod generation;
pub mod genome;
pub mod population;
pub mod state;

pub use bridge::{ContactEvent, ContactKind, PhysicsBridge};
pub use critter::{ContactState, Critter, CritterId};
pub use episode::tick;
pub use generation::{GenerationReport, advance_generation, bootstrap};
pub use genome::{Genome, random_gene, reproduce, select_parent};
pub use population::Population;
pub use state::SimulationState;
