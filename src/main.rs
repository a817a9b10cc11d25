//! Critter Evo headless runner
//!
//! Drives the evolutionary core against the point-mass arena and logs one
//! line per generation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use critter_evo::arena::Arena;
use critter_evo::consts::SIM_DT;
use critter_evo::settings::HazardPolicy;
use critter_evo::sim::{SimulationState, bootstrap, tick};
use critter_evo::{Settings, Telemetry, Variant};

#[derive(Parser, Debug)]
#[command(name = "critter-evo", about = "Evolve critters toward a goal")]
struct Args {
    /// Preset variant: classic, penalize or lethal
    #[arg(long, default_value = "classic", value_parser = parse_variant)]
    variant: Variant,

    /// JSON settings file (overrides --variant)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Generations to run
    #[arg(long, default_value_t = 50)]
    generations: u32,

    /// Print generation reports as JSON lines
    #[arg(long)]
    json: bool,
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    Variant::from_str(s).ok_or_else(|| format!("unknown variant '{s}'"))
}

/// Settings from `--settings` when given, otherwise the `--variant` preset
///
/// `Settings::load` validates on its own; only the preset path needs a check.
fn resolve_settings(args: &Args) -> Result<Settings> {
    match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => {
            let settings = Settings::from_preset(args.variant);
            settings
                .validate()
                .with_context(|| format!("invalid {} preset", args.variant.as_str()))?;
            Ok(settings)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = resolve_settings(&args)?;
    log::info!(
        "Critter Evo starting: seed {}, {:?} hazards, {:?} reproduction",
        args.seed,
        settings.hazard_policy,
        settings.reproduction
    );

    let mut arena = match settings.hazard_policy {
        HazardPolicy::None => Arena::new(),
        HazardPolicy::Penalize | HazardPolicy::Lethal => Arena::with_default_hazards(),
    };
    let mut state = SimulationState::new(args.seed, &settings);
    bootstrap(&mut state, &settings, &mut arena);

    for _ in 0..args.generations {
        let report = loop {
            arena.step(SIM_DT, &mut state);
            if let Some(report) = tick(&mut state, &settings, &mut arena) {
                break report;
            }
        };
        log::debug!("{:?}", report);

        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!(
                "Generation: {} | Avg Fitness: {:.2}% | Best: {:.2}% | Died: {}",
                report.generation,
                report.average_fitness * 100.0,
                report.max_fitness * 100.0,
                report.deaths
            );
        }
        log::info!("{}", Telemetry::capture(&state).status_line());
    }

    Ok(())
}
