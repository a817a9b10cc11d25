//! Boundary with the physics/render collaborator
//!
//! The core never moves bodies itself. It asks the bridge to spawn, steer,
//! hold, reset and despawn them, and hears back about contacts through
//! [`SimulationState::report_contact`](super::SimulationState::report_contact).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::critter::CritterId;

/// What a critter's body overlapped this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactKind {
    Goal,
    Hazard,
}

/// One level-triggered contact report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub id: CritterId,
    pub kind: ContactKind,
}

/// Requests the core makes of whoever owns bodies and sprites
pub trait PhysicsBridge {
    /// Create a body for a new critter at `position`
    fn spawn(&mut self, id: CritterId, position: Vec2);
    /// Release every resource tied to `id`
    fn despawn(&mut self, id: CritterId);
    /// Apply this tick's acceleration
    fn accelerate(&mut self, id: CritterId, acceleration: Vec2);
    /// Stop the body in place (zero velocity and acceleration)
    fn hold(&mut self, id: CritterId);
    /// Move the body back to `origin` at rest
    fn reset(&mut self, id: CritterId, origin: Vec2);
}
