//! Fixed-length episode tick
//!
//! Advances every live critter by one tick: consume contacts, accrue reward or
//! penalty, hand the active gene to the bridge. The tick that completes the
//! episode also runs the generational transition.

use std::collections::BTreeMap;

use super::bridge::{ContactKind, PhysicsBridge};
use super::critter::{ContactState, CritterId};
use super::generation::{GenerationReport, advance_generation};
use super::state::SimulationState;
use crate::settings::{HazardPolicy, Settings};

/// Advance the simulation by one episode tick
///
/// Returns the report of the generation that ended on this tick, if any.
pub fn tick<B: PhysicsBridge>(
    state: &mut SimulationState,
    settings: &Settings,
    bridge: &mut B,
) -> Option<GenerationReport> {
    assert!(
        state.is_bootstrapped(),
        "simulation must be bootstrapped before ticking"
    );

    consume_contacts(state, settings);

    let t = state.tick;
    for critter in state.population.iter_mut() {
        if !critter.alive {
            continue;
        }
        match critter.contact {
            ContactState::TouchingGoal => {
                critter.fitness += settings.goal_reward();
                bridge.hold(critter.id);
            }
            ContactState::TouchingHazard => match settings.hazard_policy {
                HazardPolicy::Penalize => critter.fitness -= settings.hazard_penalty(),
                HazardPolicy::Lethal => critter.alive = false,
                HazardPolicy::None => {}
            },
            ContactState::Idle => {
                if let Some(gene) = critter.genome.gene(t) {
                    bridge.accelerate(critter.id, gene);
                }
            }
        }
        critter.contact = ContactState::Idle;
    }

    for id in state.population.remove_dead() {
        log::debug!("Critter {:?} died at tick {}", id, t);
        bridge.despawn(id);
        state.deaths += 1;
    }

    state.tick += 1;
    if state.tick >= settings.episode_length {
        return Some(advance_generation(state, settings, bridge));
    }
    None
}

/// Drain the inbox into per-critter contact flags
///
/// A goal contact outranks a hazard contact in the same tick; repeats of the
/// same contact count once. Returns the ids whose contacts were dropped, in
/// ascending order.
fn consume_contacts(state: &mut SimulationState, settings: &Settings) -> Vec<CritterId> {
    let mut merged: BTreeMap<CritterId, ContactState> = BTreeMap::new();
    for event in state.inbox.drain(..) {
        if event.kind == ContactKind::Hazard && settings.hazard_policy == HazardPolicy::None {
            continue;
        }
        let entry = merged.entry(event.id).or_default();
        *entry = match (*entry, event.kind) {
            (_, ContactKind::Goal) => ContactState::TouchingGoal,
            (ContactState::Idle, ContactKind::Hazard) => ContactState::TouchingHazard,
            (current, ContactKind::Hazard) => current,
        };
    }

    let mut dropped = Vec::new();
    for (id, contact) in merged {
        match state.population.get_mut(id) {
            Some(critter) if critter.alive => critter.contact = contact,
            _ => {
                log::debug!("Dropping contact for unknown critter {:?}", id);
                dropped.push(id);
            }
        }
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ORIGIN;
    use crate::settings::Variant;
    use crate::sim::bridge::testing::{Call, RecordingBridge};
    use crate::sim::generation::bootstrap;
    use glam::Vec2;

    fn start(settings: &Settings) -> (SimulationState, RecordingBridge) {
        let mut state = SimulationState::new(2024, settings);
        let mut bridge = RecordingBridge::default();
        bootstrap(&mut state, settings, &mut bridge);
        bridge.clear();
        (state, bridge)
    }

    fn first_id(state: &SimulationState) -> CritterId {
        state.population.critters()[0].id
    }

    #[test]
    #[should_panic(expected = "bootstrapped")]
    fn test_tick_requires_bootstrap() {
        let settings = Settings::default();
        let mut state = SimulationState::new(1, &settings);
        tick(&mut state, &settings, &mut RecordingBridge::default());
    }

    #[test]
    fn test_idle_critters_receive_their_gene() {
        let settings = Settings {
            max_population: 3,
            episode_length: 10,
            ..Default::default()
        };
        let (mut state, mut bridge) = start(&settings);

        tick(&mut state, &settings, &mut bridge);
        tick(&mut state, &settings, &mut bridge);

        assert_eq!(state.tick, 2);
        let id = first_id(&state);
        let expected = state.population.get(id).unwrap().genome.gene(1).unwrap();
        assert!(bridge.calls.contains(&Call::Accelerate(id, expected)));
        assert_eq!(bridge.count(|c| matches!(c, Call::Accelerate(..))), 6);
    }

    #[test]
    fn test_goal_accrues_every_flagged_tick() {
        let settings = Settings {
            max_population: 2,
            episode_length: 20,
            ..Default::default()
        };
        let (mut state, mut bridge) = start(&settings);
        let id = first_id(&state);

        for _ in 0..3 {
            state.report_contact(id, ContactKind::Goal);
            // Duplicate reports within a tick are a single level
            state.report_contact(id, ContactKind::Goal);
            tick(&mut state, &settings, &mut bridge);
        }
        // Not flagged: no reward
        tick(&mut state, &settings, &mut bridge);

        let critter = state.population.get(id).unwrap();
        assert!((critter.fitness - 3.0 / 20.0).abs() < 1e-12);
        assert_eq!(critter.contact, ContactState::Idle);
        assert_eq!(bridge.count(|c| *c == Call::Hold(id)), 3);
        assert_eq!(
            bridge.count(|c| matches!(c, Call::Accelerate(cid, _) if *cid == id)),
            1
        );
    }

    #[test]
    fn test_goal_outranks_hazard_in_same_tick() {
        let settings = Settings {
            max_population: 2,
            episode_length: 20,
            ..Settings::from_preset(Variant::Lethal)
        };
        let (mut state, mut bridge) = start(&settings);
        let id = first_id(&state);

        state.report_contact(id, ContactKind::Hazard);
        state.report_contact(id, ContactKind::Goal);
        tick(&mut state, &settings, &mut bridge);

        let critter = state.population.get(id).unwrap();
        assert!(critter.alive);
        assert!((critter.fitness - 1.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_contacts_dropped_in_id_order() {
        let settings = Settings {
            max_population: 2,
            ..Settings::from_preset(Variant::Penalize)
        };
        let (mut state, _) = start(&settings);
        let known = first_id(&state);

        for id in [900, 300, 700, 300] {
            state.report_contact(CritterId(id), ContactKind::Hazard);
        }
        state.report_contact(known, ContactKind::Goal);

        let dropped = consume_contacts(&mut state, &settings);

        assert_eq!(dropped, vec![CritterId(300), CritterId(700), CritterId(900)]);
        assert!(state.inbox.is_empty());
        assert_eq!(
            state.population.get(known).unwrap().contact,
            ContactState::TouchingGoal
        );
    }

    #[test]
    fn test_penalize_ten_ticks() {
        let settings = Settings {
            max_population: 4,
            ..Settings::from_preset(Variant::Penalize)
        };
        let (mut state, mut bridge) = start(&settings);
        let id = first_id(&state);

        for _ in 0..10 {
            state.report_contact(id, ContactKind::Hazard);
            tick(&mut state, &settings, &mut bridge);
        }

        let critter = state.population.get(id).unwrap();
        let expected = -10.0 * 2.0 / settings.episode_length as f64;
        assert!((critter.fitness - expected).abs() < 1e-12);
        assert!(critter.alive);
        assert_eq!(state.population.len(), 4);
        assert_eq!(state.deaths, 0);
    }

    #[test]
    fn test_hazard_ignored_without_policy() {
        let settings = Settings {
            max_population: 2,
            ..Settings::from_preset(Variant::Classic)
        };
        let (mut state, mut bridge) = start(&settings);
        let id = first_id(&state);

        state.report_contact(id, ContactKind::Hazard);
        tick(&mut state, &settings, &mut bridge);

        let critter = state.population.get(id).unwrap();
        assert_eq!(critter.fitness, 0.0);
        assert_eq!(bridge.count(|c| matches!(c, Call::Accelerate(cid, _) if *cid == id)), 1);
    }

    #[test]
    fn test_lethal_hazard_at_tick_fifty() {
        let settings = Settings {
            max_population: 6,
            ..Settings::from_preset(Variant::Lethal)
        };
        assert_eq!(settings.episode_length, 200);
        let (mut state, mut bridge) = start(&settings);
        let id = first_id(&state);
        let doomed_genome = state.population.get(id).unwrap().genome.clone();

        for _ in 0..50 {
            tick(&mut state, &settings, &mut bridge);
        }
        assert_eq!(state.tick, 50);
        state.report_contact(id, ContactKind::Hazard);
        tick(&mut state, &settings, &mut bridge);

        assert_eq!(state.tick, 51);
        assert!(!state.population.contains(id));
        assert_eq!(state.population.len(), 5);
        assert_eq!(state.deaths, 1);
        assert!(bridge.calls.contains(&Call::Despawn(id)));

        // Late reports for the dead critter are dropped
        state.report_contact(id, ContactKind::Goal);
        tick(&mut state, &settings, &mut bridge);
        assert!(!state.population.contains(id));

        // The dead genome is never bred from
        let mut report = None;
        while report.is_none() {
            report = tick(&mut state, &settings, &mut bridge);
        }
        let report = report.unwrap();
        assert_eq!(report.deaths, 1);
        assert_eq!(report.evaluated, 5);
        assert_eq!(state.population.len(), 6);
        assert!(state
            .population
            .iter()
            .all(|c| c.id != id && c.genome != doomed_genome));
    }

    #[test]
    fn test_episode_end_triggers_transition() {
        let settings = Settings {
            max_population: 4,
            episode_length: 5,
            ..Default::default()
        };
        let (mut state, mut bridge) = start(&settings);
        let id = first_id(&state);

        for step in 0..4 {
            state.report_contact(id, ContactKind::Goal);
            assert!(tick(&mut state, &settings, &mut bridge).is_none(), "step {step}");
        }
        let report = tick(&mut state, &settings, &mut bridge).expect("episode should end");

        assert_eq!(report.generation, 1);
        assert!((report.max_fitness - 4.0 / 5.0).abs() < 1e-12);
        assert_eq!(report.culled, 2);
        assert_eq!(state.generation, 2);
        assert_eq!(state.tick, 0);
        assert_eq!(state.population.len(), 4);
        // The goal-reaching critter ranks highest and survives
        assert!(state.population.contains(id));
        assert!(bridge.calls.contains(&Call::Reset(id, ORIGIN)));
        assert!(state
            .population
            .iter()
            .all(|c| c.fitness == 0.0 && c.contact == ContactState::Idle));
    }

    #[test]
    fn test_gene_values_match_tick_index() {
        let settings = Settings {
            max_population: 1,
            episode_length: 4,
            ..Default::default()
        };
        let (mut state, mut bridge) = start(&settings);
        let id = first_id(&state);
        let genes: Vec<Vec2> = state.population.get(id).unwrap().genome.genes().to_vec();

        for _ in 0..3 {
            tick(&mut state, &settings, &mut bridge);
        }

        let applied: Vec<Vec2> = bridge
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Accelerate(_, gene) => Some(*gene),
                _ => None,
            })
            .collect();
        assert_eq!(applied, genes[..3].to_vec());
    }
}
