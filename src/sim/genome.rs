//! Genomes and reproduction operators
//!
//! A genome is one acceleration gene per episode tick. All operators draw from
//! the caller's RNG so a seeded run reproduces the same lineage.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::critter::Critter;
use crate::settings::{ParentSampling, Reproduction, Settings};

/// Samples whose length falls below this are rejected and redrawn
const MIN_SAMPLE_LENGTH: f32 = 1e-4;

/// Sample a random direction scaled to exactly `magnitude`
///
/// Never returns the zero vector.
pub fn random_gene<R: Rng>(rng: &mut R, magnitude: f32) -> Vec2 {
    loop {
        let sample = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        if sample.length() >= MIN_SAMPLE_LENGTH {
            return sample.normalize() * magnitude;
        }
    }
}

/// Fixed-length sequence of per-tick accelerations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<Vec2>,
}

impl Genome {
    /// Wrap an existing gene sequence
    ///
    /// Panics on an empty sequence; a genome always covers a whole episode.
    pub fn from_genes(genes: Vec<Vec2>) -> Self {
        assert!(!genes.is_empty(), "genome must contain at least one gene");
        Self { genes }
    }

    /// Independently sampled random genes
    pub fn random<R: Rng>(rng: &mut R, length: usize, magnitude: f32) -> Self {
        Self::from_genes((0..length).map(|_| random_gene(rng, magnitude)).collect())
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Gene for tick `t`, if the tick is inside the episode
    pub fn gene(&self, t: usize) -> Option<Vec2> {
        self.genes.get(t).copied()
    }

    pub fn genes(&self) -> &[Vec2] {
        &self.genes
    }

    /// Interleave two parents: even ticks from `left`, odd ticks from `right`
    pub fn crossover(left: &Genome, right: &Genome) -> Genome {
        assert_eq!(
            left.len(),
            right.len(),
            "crossover parents must have equal genome lengths"
        );
        let genes = left
            .genes
            .iter()
            .zip(&right.genes)
            .enumerate()
            .map(|(i, (&l, &r))| if i % 2 == 0 { l } else { r })
            .collect();
        Genome { genes }
    }

    /// Replace each gene with a fresh random one with probability `rate`
    pub fn mutate<R: Rng>(mut self, rng: &mut R, rate: f64, magnitude: f32) -> Genome {
        for gene in &mut self.genes {
            if rng.random::<f64>() < rate {
                *gene = random_gene(rng, magnitude);
            }
        }
        self
    }
}

/// Pick a random critter's genome to breed from
///
/// Returns `None` for an empty population, or when `Inclusive` sampling lands
/// one past the end.
pub fn select_parent<'a, R: Rng>(
    rng: &mut R,
    critters: &'a [Critter],
    sampling: ParentSampling,
) -> Option<&'a Genome> {
    if critters.is_empty() {
        return None;
    }
    let index = match sampling {
        ParentSampling::Strict => rng.random_range(0..critters.len()),
        ParentSampling::Inclusive => rng.random_range(0..=critters.len()),
    };
    critters.get(index).map(|c| &c.genome)
}

/// Parent genome or, failing that, a fresh random one
fn parent_or_random<R: Rng>(
    rng: &mut R,
    critters: &[Critter],
    settings: &Settings,
) -> Genome {
    match select_parent(rng, critters, settings.parent_sampling) {
        Some(genome) => genome.clone(),
        None => Genome::random(rng, settings.episode_length, settings.accel_magnitude),
    }
}

/// Breed a new genome from `parents` under the configured policy
pub fn reproduce<R: Rng>(rng: &mut R, parents: &[Critter], settings: &Settings) -> Genome {
    let child = match settings.reproduction {
        Reproduction::TwoParent => {
            let left = parent_or_random(rng, parents, settings);
            let right = parent_or_random(rng, parents, settings);
            Genome::crossover(&left, &right)
        }
        Reproduction::SingleParent => parent_or_random(rng, parents, settings),
    };
    let child = child.mutate(rng, settings.mutation_rate, settings.accel_magnitude);
    assert_eq!(
        child.len(),
        settings.episode_length,
        "bred genome does not cover the episode"
    );
    child
}
