//! Player ship: flight, aim, primary weapon trigger (with burst mode) and
//! missile launches.

use glam::Vec3;
use hecs::World;
use rand::Rng;

use bastion_campaign::ProgressionLedger;
use bastion_core::components::{BurstState, Health, PlayerShip};
use bastion_core::constants::*;
use bastion_core::events::GameEvent;
use bastion_core::types::{Position, Velocity};
use bastion_core::weapons::WeaponConfig;

use crate::ballistics;
use crate::frame::{Frame, TickOutput};
use crate::providers::InputState;
use crate::world_setup;

/// Run flight and primary fire for one tick.
pub fn run<R: Rng>(
    world: &mut World,
    rng: &mut R,
    input: &InputState,
    weapon: &WeaponConfig,
    frame: &Frame,
) {
    let dt = frame.dt;
    let mut volleys: Vec<(Vec3, Vec3)> = Vec::new();

    for (_entity, (ship, pos, vel, health)) in
        world.query_mut::<(&mut PlayerShip, &mut Position, &mut Velocity, &Health)>()
    {
        if !health.alive {
            vel.0 = Vec3::ZERO;
            continue;
        }

        vel.0 = input.movement.clamp_length_max(1.0) * PLAYER_SPEED;
        pos.0 += vel.0 * dt;
        if pos.length() > PLAYER_BOUNDARY_RADIUS {
            pos.0 = pos.0.normalize() * PLAYER_BOUNDARY_RADIUS;
        }

        if let Some(aim) = input.aim.and_then(Vec3::try_normalize) {
            ship.facing = aim;
        }

        if trigger(ship, input.fire, weapon, dt) {
            volleys.push((pos.0 + ship.facing * PLAYER_MUZZLE_OFFSET, ship.facing));
        }
    }

    for (origin, aim) in volleys {
        ballistics::fire_volley(world, rng, origin, aim, weapon);
    }
}

/// Advance the trigger state by `dt`. Returns true if a volley fires.
///
/// A burst weapon fires its first volley on the trigger and the rest on the
/// burst timer, trigger held or not. The outer cooldown starts only after
/// the last volley of the burst.
pub fn trigger(ship: &mut PlayerShip, held: bool, weapon: &WeaponConfig, dt: f32) -> bool {
    if let Some(burst) = ship.burst.as_mut() {
        burst.timer -= dt;
        if burst.timer > 0.0 {
            return false;
        }
        burst.shots_remaining = burst.shots_remaining.saturating_sub(1);
        if burst.shots_remaining == 0 {
            ship.burst = None;
            ship.cooldown = weapon.fire_rate;
        } else {
            burst.timer += weapon.burst.map_or(0.0, |b| b.delay);
        }
        return true;
    }

    ship.cooldown = (ship.cooldown - dt).max(0.0);
    if !held || ship.cooldown > 0.0 {
        return false;
    }

    match weapon.burst {
        Some(b) if b.shots > 1 => {
            ship.burst = Some(BurstState {
                shots_remaining: b.shots - 1,
                timer: b.delay,
            });
        }
        _ => ship.cooldown = weapon.fire_rate,
    }
    true
}

/// Launch a missile from the player's muzzle if one is in inventory.
pub fn launch_missile(world: &mut World, ledger: &mut ProgressionLedger, out: &mut TickOutput) {
    let launch = world
        .query_mut::<(&PlayerShip, &Position, &Health)>()
        .into_iter()
        .find(|(_, (_, _, health))| health.alive)
        .map(|(_, (ship, pos, _))| (pos.0 + ship.facing * PLAYER_MUZZLE_OFFSET, ship.facing));

    let Some((origin, heading)) = launch else {
        return;
    };
    if ledger.consume_missile().is_err() {
        return;
    }
    world_setup::spawn_missile(world, origin, heading);
    out.event(GameEvent::MissileLaunched);
}

#[cfg(test)]
mod tests {
    use bastion_core::weapons::get_config;

    use super::*;

    fn idle_ship() -> PlayerShip {
        PlayerShip {
            facing: Vec3::Z,
            cooldown: 0.0,
            burst: None,
        }
    }

    /// Tick indices at which a volley fires, with the trigger held for the
    /// first `held_ticks` ticks.
    fn fire_ticks(level: u32, held_ticks: usize, total: usize, dt: f32) -> Vec<usize> {
        let weapon = get_config(level);
        let mut ship = idle_ship();
        (0..total)
            .filter(|&i| trigger(&mut ship, i < held_ticks, &weapon, dt))
            .collect()
    }

    #[test]
    fn test_burst_fires_volleys_then_cools_down() {
        let fired = fire_ticks(6, 200, 200, 0.01);
        assert_eq!(fired, vec![0, 8, 15, 66, 74, 81, 132, 140, 147, 198]);
    }

    #[test]
    fn test_burst_spacing_and_cooldown_follow_config() {
        let dt = 0.01;
        let weapon = get_config(6);
        let burst = weapon.burst.unwrap();
        let fired = fire_ticks(6, 200, 200, dt);

        for pair in fired[..burst.shots as usize].windows(2) {
            let gap = (pair[1] - pair[0]) as f32 * dt;
            assert!((gap - burst.delay).abs() <= dt * 1.5, "burst gap {gap}");
        }
        let last = fired[burst.shots as usize - 1];
        let next = fired[burst.shots as usize];
        assert!((next - last) as f32 * dt >= weapon.fire_rate);
    }

    #[test]
    fn test_burst_completes_after_release() {
        // Released after the first tick, the burst still plays out.
        let fired = fire_ticks(6, 1, 200, 0.01);
        assert_eq!(fired.len(), 3);
        assert_eq!(fired[0], 0);
    }

    #[test]
    fn test_single_shot_tier_waits_for_cooldown() {
        let dt = 0.01;
        let weapon = get_config(1);
        let fired = fire_ticks(1, 100, 100, dt);
        assert_eq!(fired[0], 0);
        assert!((fired[1] - fired[0]) as f32 * dt >= weapon.fire_rate - dt);
        assert!(fired.windows(2).all(|w| w[1] - w[0] > 1));
    }
}
