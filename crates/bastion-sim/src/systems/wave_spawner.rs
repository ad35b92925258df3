//! Wave spawning: spawns enemy squads on a countdown scaled by difficulty.

use glam::Vec3;
use hecs::World;
use log::debug;
use rand::Rng;

use bastion_campaign::wave_composer::{compose_wave, wave_interval};
use bastion_core::components::{EnemyShip, Health};
use bastion_core::constants::{ENEMY_SPAWN_RADIUS, MAX_ACTIVE_ENEMIES};
use bastion_core::enums::TargetChoice;
use bastion_core::events::GameEvent;
use bastion_core::types::yaw_to_direction;
use bastion_squad_ai::formation::{compute_offsets, slot_position};
use bastion_squad_ai::profiles::CollisionScale;
use bastion_squad_ai::steering::roll_strafe_dir;

use crate::frame::TickOutput;
use crate::squads::SquadRegistry;
use crate::world_setup;

/// Countdown to the next wave for the current sector.
#[derive(Debug, Clone)]
pub struct WaveSchedule {
    pub sector: u32,
    pub difficulty: f32,
    /// Waves spawned so far in this sector.
    pub wave_number: u32,
    pub countdown: f32,
    pub interval: f32,
}

impl WaveSchedule {
    pub fn new(sector: u32, difficulty: f32, base_interval: f32, first_delay: f32) -> Self {
        Self {
            sector,
            difficulty,
            wave_number: 0,
            countdown: first_delay,
            interval: wave_interval(base_interval, difficulty),
        }
    }
}

/// Tick the countdown and spawn the next wave when it expires. A wave that
/// would push the live roster past `MAX_ACTIVE_ENEMIES` waits half an
/// interval and tries again.
pub fn run<R: Rng>(
    world: &mut World,
    rng: &mut R,
    schedule: &mut WaveSchedule,
    squads: &mut SquadRegistry,
    scale: CollisionScale,
    dt: f32,
    out: &mut TickOutput,
) {
    schedule.countdown -= dt;
    if schedule.countdown > 0.0 {
        return;
    }

    let wave = compose_wave(schedule.sector, schedule.wave_number + 1);
    let active = world
        .query::<(&EnemyShip, &Health)>()
        .iter()
        .filter(|(_, (_, health))| health.alive)
        .count();
    if active + wave.enemy_count() > MAX_ACTIVE_ENEMIES {
        schedule.countdown = schedule.interval * 0.5;
        return;
    }

    schedule.wave_number += 1;
    schedule.countdown = schedule.interval;
    debug!(
        "sector {} wave {}: {} squads",
        schedule.sector,
        schedule.wave_number,
        wave.squads.len()
    );

    for roster in wave.squads {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let altitude: f32 = rng.gen_range(-15.0..15.0);
        let center = yaw_to_direction(angle) * ENEMY_SPAWN_RADIUS + Vec3::Y * altitude;
        let target = if rng.gen_bool(0.3) {
            TargetChoice::Station
        } else {
            TargetChoice::Player
        };
        let offsets = compute_offsets(roster.len());

        let members: Vec<_> = roster
            .iter()
            .zip(&offsets)
            .map(|(&kind, &offset)| {
                let position = slot_position(center, offset, -center);
                world_setup::spawn_enemy(world, kind, position, schedule.difficulty, None, scale)
            })
            .collect();

        let size = members.len() as u32;
        let id = squads.create(members.clone(), center, target);
        for entity in members {
            if let Ok(mut ship) = world.get::<&mut EnemyShip>(entity) {
                ship.squad = Some(id);
                ship.target = target;
                ship.strafe_dir = roll_strafe_dir(rng);
            }
        }
        out.event(GameEvent::SquadFormed { squad_id: id, size });
    }
}
