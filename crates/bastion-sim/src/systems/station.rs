//! Station upkeep and its turret ring.
//!
//! The station repairs itself and generates resources passively. Turrets
//! pick the nearest live enemy in range, slew toward it at a limited rate,
//! and fire only once their yaw is within the aim tolerance.

use glam::Vec3;
use hecs::{Entity, World};

use bastion_core::components::{EnemyShip, Health, Station, Turret};
use bastion_core::constants::*;
use bastion_core::enums::Owner;
use bastion_core::types::{wrap_angle_delta, yaw_to_direction, Position};
use bastion_squad_ai::steering::step_yaw;

use crate::ballistics::{spawn_projectile, ShotSpec};
use crate::frame::{Frame, TickOutput};
use crate::refs::to_ref;

pub fn run(world: &mut World, frame: &Frame, out: &mut TickOutput) {
    let station_alive = update_station(world, frame.dt, out);
    if station_alive {
        update_turrets(world, frame.dt);
    }
}

/// Repair and resource generation. Returns whether the station is alive.
fn update_station(world: &mut World, dt: f32, out: &mut TickOutput) -> bool {
    let mut alive = false;
    for (_entity, (station, health)) in world.query_mut::<(&mut Station, &mut Health)>() {
        if !health.alive {
            continue;
        }
        alive = true;

        let above = station.level.saturating_sub(1) as f32;
        let repair = STATION_REPAIR_PER_SEC + above * STATION_REPAIR_PER_LEVEL;
        health.current = (health.current + repair * dt).min(health.max);

        station.generation_carry += STATION_GENERATION_PER_SEC * station.level as f64 * dt as f64;
        let whole = station.generation_carry.floor();
        station.generation_carry -= whole;
        out.tally.station += whole as u64;
    }
    alive
}

/// Index of the nearest candidate within `range` of `from`.
pub fn nearest_in_range(from: Vec3, range: f32, candidates: &[(Entity, Vec3)]) -> Option<usize> {
    let range_sq = range * range;
    let mut best: Option<(usize, f32)> = None;
    for (i, (_, pos)) in candidates.iter().enumerate() {
        let d = from.distance_squared(*pos);
        if d <= range_sq && best.map_or(true, |(_, b)| d < b) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Whether a turret at `yaw` is aimed closely enough at `bearing` to fire.
pub fn aimed(yaw: f32, bearing: f32) -> bool {
    wrap_angle_delta(yaw, bearing).abs() <= TURRET_AIM_TOLERANCE
}

fn update_turrets(world: &mut World, dt: f32) {
    let enemies: Vec<(Entity, Vec3)> = world
        .query::<(&EnemyShip, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| health.alive)
        .map(|(entity, (_, pos, _))| (entity, pos.0))
        .collect();

    let mut shots: Vec<(Vec3, Vec3, f32)> = Vec::new();

    for (_entity, (turret, pos)) in world.query_mut::<(&mut Turret, &Position)>() {
        turret.cooldown = (turret.cooldown - dt).max(0.0);

        let Some(index) = nearest_in_range(pos.0, turret.range, &enemies) else {
            turret.target = None;
            continue;
        };
        let (target, target_pos) = enemies[index];
        turret.target = Some(to_ref(target));

        let offset = target_pos - pos.0;
        let bearing = offset.x.atan2(offset.z);
        turret.yaw = step_yaw(turret.yaw, bearing, turret.rotation_speed, dt);

        if turret.cooldown <= 0.0 && aimed(turret.yaw, bearing) {
            // Fire along the barrel's yaw, pitched to the target's height.
            let flat = Vec3::new(offset.x, 0.0, offset.z).length();
            let dir = yaw_to_direction(turret.yaw) * flat + Vec3::Y * offset.y;
            shots.push((pos.0, dir, turret.damage));
            turret.cooldown = turret.fire_rate;
        }
    }

    for (origin, dir, damage) in shots {
        let spec = ShotSpec {
            owner: Owner::Turret,
            speed: TURRET_PROJECTILE_SPEED,
            damage,
            radius: TURRET_PROJECTILE_SIZE,
            lifetime: TURRET_PROJECTILE_LIFETIME,
            color: TURRET_COLOR,
            splash_radius: 0.0,
            penetration: 0,
        };
        spawn_projectile(world, origin, dir, &spec);
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use bastion_core::components::Projectile;
    use bastion_core::enums::EnemyType;
    use bastion_squad_ai::profiles::CollisionScale;

    use super::*;
    use crate::world_setup;

    fn frame(tick: u64) -> Frame {
        Frame {
            dt: NOMINAL_DT,
            tick,
            now: tick as f64 * NOMINAL_DT as f64,
        }
    }

    fn turret_facing(world: &mut World, yaw: f32) -> Entity {
        world.spawn((
            Turret {
                slot: 0,
                yaw,
                rotation_speed: TURRET_ROTATION_SPEED,
                range: TURRET_RANGE,
                damage: TURRET_BASE_DAMAGE,
                fire_rate: TURRET_FIRE_RATE,
                cooldown: 0.0,
                target: None,
            },
            Position(Vec3::ZERO),
        ))
    }

    fn turret_shots(world: &World) -> usize {
        world
            .query::<&Projectile>()
            .iter()
            .filter(|(_, p)| p.owner == Owner::Turret)
            .count()
    }

    #[test]
    fn test_aim_tolerance() {
        assert!(aimed(0.0, 0.0));
        assert!(aimed(0.1, 0.0));
        assert!(!aimed(0.3, 0.0));
        assert!(aimed(PI - 0.05, -PI + 0.05));
    }

    #[test]
    fn test_turret_holds_fire_until_slewed_onto_target() {
        let mut world = World::new();
        world_setup::spawn_station(&mut world, 1);
        // Target straight down +Z (bearing 0), barrel pointing the other way.
        let turret = turret_facing(&mut world, PI);
        world_setup::spawn_enemy(
            &mut world,
            EnemyType::Fighter,
            Vec3::new(0.0, 0.0, 40.0),
            1.0,
            None,
            CollisionScale::default(),
        );

        let mut out = TickOutput::default();
        run(&mut world, &frame(0), &mut out);
        assert_eq!(turret_shots(&world), 0, "fired while facing away");

        let mut first_shot = None;
        for tick in 1..400 {
            run(&mut world, &frame(tick), &mut out);
            let yaw = world.get::<&Turret>(turret).unwrap().yaw;
            if turret_shots(&world) > 0 {
                assert!(aimed(yaw, 0.0), "fired at yaw {yaw}");
                first_shot = Some(tick);
                break;
            }
        }
        let tick = first_shot.expect("turret never fired");
        // Slewing half a turn at the base rate takes well over a second.
        assert!(tick as f32 * NOMINAL_DT > 1.5);
    }

    #[test]
    fn test_turret_idle_without_target_in_range() {
        let mut world = World::new();
        world_setup::spawn_station(&mut world, 1);
        let turret = turret_facing(&mut world, 0.0);
        world_setup::spawn_enemy(
            &mut world,
            EnemyType::Fighter,
            Vec3::new(0.0, 0.0, TURRET_RANGE + 50.0),
            1.0,
            None,
            CollisionScale::default(),
        );

        let mut out = TickOutput::default();
        for tick in 0..60 {
            run(&mut world, &frame(tick), &mut out);
        }
        assert_eq!(turret_shots(&world), 0);
        assert!(world.get::<&Turret>(turret).unwrap().target.is_none());
    }
}
