//! bastion-headless: run a seeded session without a renderer.
//!
//! Usage:
//!   bastion-headless --seed 7 --seconds 300
//!   bastion-headless --config tuning.toml --verbose

mod autopilot;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;
use serde::Serialize;

use bastion_core::commands::PlayerCommand;
use bastion_core::constants::NOMINAL_DT;
use bastion_core::enums::GamePhase;
use bastion_core::events::GameEvent;
use bastion_sim::providers::{NullEffects, NullVisuals, SharedInput};
use bastion_sim::{SimConfig, SimulationEngine};

use crate::autopilot::Autopilot;

/// Headless BASTION runner with a scripted pilot
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// TOML file with simulation tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    seconds: f64,
    phase: Option<GamePhase>,
    sector: u32,
    sector_name: String,
    resources: u64,
    weapon_level: u32,
    station_level: u32,
    defense_level: u32,
    missiles: u32,
    enemies_destroyed: u32,
    asteroids_destroyed: u32,
    missiles_launched: u32,
    upgrades: u32,
    player_health: f32,
    station_health: f32,
}

fn load_config(args: &Args) -> SimConfig {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|err| {
                eprintln!("Failed to read {}: {err}", path.display());
                process::exit(1);
            });
            SimConfig::from_toml_str(&text).unwrap_or_else(|err| {
                eprintln!("Invalid config {}: {err}", path.display());
                process::exit(1);
            })
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = load_config(&args);
    let seed = config.seed;
    let input = SharedInput::default();
    let mut engine = SimulationEngine::with_providers(
        config,
        Box::new(NullVisuals::default()),
        Box::new(NullEffects),
        Box::new(input.clone()),
    );
    let mut pilot = Autopilot::default();
    let mut summary = Summary {
        seed,
        ..Default::default()
    };

    engine.queue_command(PlayerCommand::StartGame);
    let ticks = (args.seconds / NOMINAL_DT).ceil() as u64;
    info!("running seed {seed} for {ticks} ticks");

    let mut snap = engine.tick(NOMINAL_DT);
    for _ in 0..ticks {
        if snap.phase != GamePhase::Active {
            break;
        }
        input.set(pilot.steer(&snap));
        engine.queue_commands(pilot.orders(&snap));
        snap = engine.tick(NOMINAL_DT);

        for event in &snap.events {
            match event {
                GameEvent::EnemyDestroyed { .. } => summary.enemies_destroyed += 1,
                GameEvent::AsteroidDestroyed { .. } => summary.asteroids_destroyed += 1,
                GameEvent::MissileLaunched => summary.missiles_launched += 1,
                GameEvent::Upgraded { .. } => summary.upgrades += 1,
                _ => {}
            }
        }
    }

    summary.ticks = snap.time.tick;
    summary.seconds = snap.time.elapsed_secs;
    summary.phase = Some(snap.phase);
    summary.sector = snap.sector.index;
    summary.sector_name = snap.sector.name.clone();
    summary.resources = snap.progression.resources;
    summary.weapon_level = snap.progression.weapon_level;
    summary.station_level = snap.progression.station_level;
    summary.defense_level = snap.progression.defense_level;
    summary.missiles = snap.progression.missiles;
    summary.player_health = snap.player.health;
    summary.station_health = snap.station.health;

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("Failed to encode summary: {err}");
            process::exit(1);
        }
    }
}
