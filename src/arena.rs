//! Point-mass arena for headless runs
//!
//! The smallest collaborator that can drive the core: explicit Euler bodies,
//! walls that stop motion, circular goal/hazard regions. It is not a physics
//! engine and makes no attempt at rigid-body behavior.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{ContactKind, CritterId, PhysicsBridge, SimulationState};

/// Collision radius of a critter body (32px sprite)
pub const BODY_RADIUS: f32 = 16.0;
/// Radius of the goal region
pub const GOAL_RADIUS: f32 = 16.0;
/// Radius of each default hazard
pub const HAZARD_RADIUS: f32 = 40.0;

/// A circular region in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a body of `body_radius` at `pos` overlaps this circle
    pub fn overlaps(&self, pos: Vec2, body_radius: f32) -> bool {
        (pos - self.center).length() <= self.radius + body_radius
    }
}

/// Kinematic state of one critter body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
}

impl Body {
    fn at_rest(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
        }
    }

    /// Integrate one step and stop against the world bounds
    fn integrate(&mut self, dt: f32, bounds: Vec2) {
        self.vel += self.acc * dt;
        self.pos += self.vel * dt;

        let min = Vec2::splat(BODY_RADIUS);
        let max = bounds - Vec2::splat(BODY_RADIUS);
        if self.pos.x < min.x || self.pos.x > max.x {
            self.pos.x = self.pos.x.clamp(min.x, max.x);
            self.vel.x = 0.0;
        }
        if self.pos.y < min.y || self.pos.y > max.y {
            self.pos.y = self.pos.y.clamp(min.y, max.y);
            self.vel.y = 0.0;
        }
    }
}

/// World with one goal and any number of hazards
#[derive(Debug, Clone)]
pub struct Arena {
    pub bounds: Vec2,
    pub goal: Circle,
    pub hazards: Vec<Circle>,
    /// Bodies keyed by critter (ordered for deterministic contact reports)
    bodies: BTreeMap<CritterId, Body>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// Empty arena with the goal at the top centre and no hazards
    pub fn new() -> Self {
        Self {
            bounds: Vec2::new(WIDTH, HEIGHT),
            goal: Circle::new(GOAL, GOAL_RADIUS),
            hazards: Vec::new(),
            bodies: BTreeMap::new(),
        }
    }

    /// Arena with a row of hazards between the origin and the goal
    pub fn with_default_hazards() -> Self {
        let mut arena = Self::new();
        let y = HEIGHT / 2.0;
        arena.hazards = [-0.3f32, 0.0, 0.3]
            .iter()
            .map(|&offset| Circle::new(Vec2::new(WIDTH * (0.5 + offset), y), HAZARD_RADIUS))
            .collect();
        arena
    }

    pub fn body(&self, id: CritterId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advance every body and report overlaps into the simulation inbox
    pub fn step(&mut self, dt: f32, state: &mut SimulationState) {
        for (&id, body) in self.bodies.iter_mut() {
            body.integrate(dt, self.bounds);

            if self.goal.overlaps(body.pos, BODY_RADIUS) {
                state.report_contact(id, ContactKind::Goal);
            }
            if self.hazards.iter().any(|h| h.overlaps(body.pos, BODY_RADIUS)) {
                state.report_contact(id, ContactKind::Hazard);
            }
        }
    }
}

impl PhysicsBridge for Arena {
    fn spawn(&mut self, id: CritterId, position: Vec2) {
        self.bodies.insert(id, Body::at_rest(position));
    }

    fn despawn(&mut self, id: CritterId) {
        self.bodies.remove(&id);
    }

    fn accelerate(&mut self, id: CritterId, acceleration: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.acc = acceleration;
        }
    }

    fn hold(&mut self, id: CritterId) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.vel = Vec2::ZERO;
            body.acc = Vec2::ZERO;
        }
    }

    fn reset(&mut self, id: CritterId, origin: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            *body = Body::at_rest(origin);
        }
    }
}
