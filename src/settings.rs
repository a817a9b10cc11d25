//! Evolution policy settings
//!
//! One record drives every observed variant; presets only pick values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("selection_fraction {0} must be between 0.0 and 1.0")]
    InvalidSelectionFraction(f64),
    #[error("mutation_rate {0} must be between 0.0 and 1.0")]
    InvalidMutationRate(f64),
    #[error("episode_length must be non-zero")]
    ZeroEpisodeLength,
    #[error("max_population must be non-zero")]
    ZeroPopulation,
    #[error("accel_magnitude {0} must be positive and finite")]
    InvalidMagnitude(f32),
    #[error("failed to access settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed settings json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Rounding applied to `selection_fraction * population`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Rounding {
    #[default]
    Ceil,
    Floor,
}

impl Rounding {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Rounding::Ceil => value.ceil(),
            Rounding::Floor => value.floor(),
        }
    }
}

/// How many parents contribute to a new genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Reproduction {
    /// Clone one parent, then mutate
    SingleParent,
    /// Interleave two parents gene by gene, then mutate
    #[default]
    TwoParent,
}

/// What touching a hazard does to a critter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HazardPolicy {
    /// No hazards; hazard contacts are ignored
    #[default]
    None,
    /// Lose `2 / episode_length` fitness per tick in contact
    Penalize,
    /// Die on first contact
    Lethal,
}

/// Whether replacements are bred before or after the cull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BreedOrder {
    /// Remove the culled critters, then breed from survivors only
    #[default]
    CullThenBreed,
    /// Breed from the whole pre-cull population, then remove the culled
    BreedThenCull,
}

/// Range used when drawing a parent index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ParentSampling {
    /// `[0, len)`: always hits an existing critter
    #[default]
    Strict,
    /// `[0, len]`: the extra slot means "no parent", forcing a fresh genome
    Inclusive,
}

/// Preset variants observed in the wild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Goal only
    #[default]
    Classic,
    /// Goal plus hazards that cost fitness
    Penalize,
    /// Goal plus hazards that kill
    Lethal,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Penalize => "Penalize",
            Variant::Lethal => "Lethal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "none" => Some(Variant::Classic),
            "penalize" | "penalty" => Some(Variant::Penalize),
            "lethal" | "deadly" => Some(Variant::Lethal),
            _ => None,
        }
    }
}

/// Evolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Episode ===
    /// Ticks per episode; also the genome length
    pub episode_length: usize,
    /// Population bound restored after each generation
    pub max_population: usize,
    /// Magnitude of randomly sampled genes
    pub accel_magnitude: f32,

    // === Selection ===
    /// Fraction of the population culled each generation
    pub selection_fraction: f64,
    /// Rounding of the cull count
    pub rounding: Rounding,
    /// Breed before or after removing the culled
    pub breed_order: BreedOrder,
    /// Parent index range
    pub parent_sampling: ParentSampling,

    // === Reproduction ===
    pub reproduction: Reproduction,
    /// Per-gene probability of replacement with a fresh random gene
    pub mutation_rate: f64,

    // === Environment ===
    pub hazard_policy: HazardPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            episode_length: EPISODE_LENGTH,
            max_population: MAX_POPULATION,
            accel_magnitude: ACCEL_MAGNITUDE,

            selection_fraction: SELECTION_FRACTION,
            rounding: Rounding::Ceil,
            breed_order: BreedOrder::CullThenBreed,
            parent_sampling: ParentSampling::Strict,

            reproduction: Reproduction::TwoParent,
            mutation_rate: MUTATION_RATE,

            hazard_policy: HazardPolicy::None,
        }
    }
}

impl Settings {
    /// Create settings from a variant preset
    pub fn from_preset(variant: Variant) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(variant);
        settings
    }

    /// Apply a variant preset (policy fields only; sizes are left alone)
    pub fn apply_preset(&mut self, variant: Variant) {
        match variant {
            Variant::Classic => {
                self.reproduction = Reproduction::TwoParent;
                self.rounding = Rounding::Ceil;
                self.mutation_rate = 0.01;
                self.hazard_policy = HazardPolicy::None;
            }
            Variant::Penalize => {
                self.reproduction = Reproduction::TwoParent;
                self.rounding = Rounding::Ceil;
                self.mutation_rate = 0.005;
                self.hazard_policy = HazardPolicy::Penalize;
            }
            Variant::Lethal => {
                self.reproduction = Reproduction::SingleParent;
                self.rounding = Rounding::Floor;
                self.mutation_rate = 0.005;
                self.hazard_policy = HazardPolicy::Lethal;
            }
        }
        self.selection_fraction = SELECTION_FRACTION;
    }

    /// Check every field is usable by the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.episode_length == 0 {
            return Err(SettingsError::ZeroEpisodeLength);
        }
        if self.max_population == 0 {
            return Err(SettingsError::ZeroPopulation);
        }
        if !(0.0..=1.0).contains(&self.selection_fraction) {
            return Err(SettingsError::InvalidSelectionFraction(
                self.selection_fraction,
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SettingsError::InvalidMutationRate(self.mutation_rate));
        }
        if !(self.accel_magnitude.is_finite() && self.accel_magnitude > 0.0) {
            return Err(SettingsError::InvalidMagnitude(self.accel_magnitude));
        }
        Ok(())
    }

    /// Number of critters culled from a population of `size`
    pub fn cull_count(&self, size: usize) -> usize {
        let raw = self.rounding.apply(self.selection_fraction * size as f64);
        (raw.max(0.0) as usize).min(size)
    }

    /// Fitness gained per tick spent on the goal
    pub fn goal_reward(&self) -> f64 {
        1.0 / self.episode_length as f64
    }

    /// Fitness lost per tick spent on a hazard (penalize policy)
    pub fn hazard_penalty(&self) -> f64 {
        2.0 / self.episode_length as f64
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
