//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player ship, station, turrets, asteroids, enemies, fragments
//! and missiles with their component bundles.

use std::f32::consts::TAU;

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;

use bastion_core::components::*;
use bastion_core::constants::*;
use bastion_core::enums::*;
use bastion_core::types::{yaw_to_direction, Position, Velocity};
use bastion_squad_ai::profiles::{collision_radius, get_profile, CollisionScale};

use crate::config::SimConfig;

/// Populate a fresh world: player, station, turrets and the asteroid field.
pub fn setup_game<R: Rng>(
    world: &mut World,
    rng: &mut R,
    config: &SimConfig,
    station_level: u32,
    defense_level: u32,
) {
    spawn_player(world);
    spawn_station(world, station_level);
    sync_turrets(world, defense_level);
    for _ in 0..config.asteroid_count {
        spawn_random_asteroid(world, rng);
    }
}

pub fn spawn_player(world: &mut World) -> Entity {
    world.spawn((
        PlayerShip {
            facing: Vec3::Z,
            cooldown: 0.0,
            burst: None,
        },
        Position::new(0.0, 0.0, PLAYER_START_Z),
        Velocity::default(),
        Health {
            current: PLAYER_MAX_HEALTH,
            max: PLAYER_MAX_HEALTH,
            alive: true,
        },
        Collider {
            radius: PLAYER_COLLISION_RADIUS,
        },
        Renderable {
            kind: VisualKind::PlayerShip,
            handle: None,
            scale: 1.0,
            color: 0x44aaff,
        },
    ))
}

pub fn station_max_health(level: u32) -> f32 {
    STATION_MAX_HEALTH + level.saturating_sub(1) as f32 * STATION_HEALTH_PER_LEVEL
}

pub fn spawn_station(world: &mut World, level: u32) -> Entity {
    let max = station_max_health(level);
    world.spawn((
        Station {
            level,
            generation_carry: 0.0,
        },
        Position::default(),
        Health {
            current: max,
            max,
            alive: true,
        },
        Collider {
            radius: STATION_COLLISION_RADIUS,
        },
        Renderable {
            kind: VisualKind::Station,
            handle: None,
            scale: STATION_COLLISION_RADIUS,
            color: 0xcccccc,
        },
    ))
}

/// Turret damage and slew rate at a defense level.
pub fn turret_stats(defense_level: u32) -> (f32, f32) {
    let above = defense_level.saturating_sub(1) as f32;
    (
        TURRET_BASE_DAMAGE + above * TURRET_DAMAGE_PER_LEVEL,
        TURRET_ROTATION_SPEED + above * TURRET_ROTATION_PER_LEVEL,
    )
}

/// One turret per defense level, up to `MAX_TURRETS`.
pub fn turret_count(defense_level: u32) -> usize {
    (defense_level as usize).min(MAX_TURRETS)
}

/// Bring the turret ring in line with a defense level: spawn missing mounts
/// and refresh stats on existing ones.
pub fn sync_turrets(world: &mut World, defense_level: u32) {
    let (damage, rotation_speed) = turret_stats(defense_level);
    let mut existing = 0usize;
    for (_entity, turret) in world.query_mut::<&mut Turret>() {
        turret.damage = damage;
        turret.rotation_speed = rotation_speed;
        existing += 1;
    }

    for slot in existing..turret_count(defense_level) {
        let angle = slot as f32 * TAU / MAX_TURRETS as f32;
        let mount = yaw_to_direction(angle) * TURRET_ORBIT_RADIUS;
        world.spawn((
            Turret {
                slot: slot as u32,
                yaw: angle,
                rotation_speed,
                range: TURRET_RANGE,
                damage,
                fire_rate: TURRET_FIRE_RATE,
                cooldown: 0.0,
                target: None,
            },
            Position(mount),
            Renderable {
                kind: VisualKind::Turret,
                handle: None,
                scale: 1.0,
                color: TURRET_COLOR,
            },
        ));
    }
}

pub fn spawn_asteroid(world: &mut World, position: Vec3, velocity: Vec3, radius: f32) -> Entity {
    let health = radius * ASTEROID_HEALTH_PER_RADIUS;
    world.spawn((
        Asteroid {
            radius,
            mass: ASTEROID_DENSITY * radius * radius,
            fragment_count: (radius * ASTEROID_FRAGMENTS_PER_RADIUS).ceil() as u32,
            spin: 0.0,
            crashed: false,
        },
        Position(position),
        Velocity(velocity),
        Health {
            current: health,
            max: health,
            alive: true,
        },
        Collider { radius },
        Renderable {
            kind: VisualKind::Asteroid,
            handle: None,
            scale: radius,
            color: ASTEROID_COLOR,
        },
    ))
}

/// Spawn an asteroid somewhere in the field ring with a random drift.
pub fn spawn_random_asteroid<R: Rng>(world: &mut World, rng: &mut R) -> Entity {
    let angle = rng.gen_range(0.0..TAU);
    let distance = rng.gen_range(ASTEROID_SPAWN_MIN_RADIUS..ASTEROID_SPAWN_MAX_RADIUS);
    let height: f32 = rng.gen_range(-10.0..10.0);
    let position = yaw_to_direction(angle) * distance + Vec3::Y * height;
    let drift = Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-0.2..0.2),
        rng.gen_range(-1.0..1.0),
    ) * ASTEROID_MAX_DRIFT;
    let radius = rng.gen_range(ASTEROID_MIN_RADIUS..ASTEROID_MAX_RADIUS);
    let entity = spawn_asteroid(world, position, drift, radius);
    if let Ok(mut asteroid) = world.get::<&mut Asteroid>(entity) {
        asteroid.spin = rng.gen_range(-1.0..1.0);
    }
    entity
}

/// Spawn an enemy with its profile scaled by difficulty.
pub fn spawn_enemy(
    world: &mut World,
    kind: EnemyType,
    position: Vec3,
    difficulty: f32,
    squad: Option<u32>,
    scale: CollisionScale,
) -> Entity {
    let profile = get_profile(kind);
    let health = profile.max_health * difficulty;
    world.spawn((
        EnemyShip {
            kind,
            target: TargetChoice::default(),
            size: profile.size,
            damage: profile.damage * difficulty,
            shoot_cooldown: profile.fire_rate,
            strafe_dir: 1.0,
            strafe_timer: 0.0,
            squad,
        },
        Position(position),
        Velocity::default(),
        Health {
            current: health,
            max: health,
            alive: true,
        },
        Collider {
            radius: collision_radius(profile.size, scale),
        },
        Renderable {
            kind: VisualKind::Enemy(kind),
            handle: None,
            scale: profile.size,
            color: profile.color,
        },
    ))
}

/// Scatter `count` fragments outward from a point.
pub fn spawn_fragments<R: Rng>(world: &mut World, rng: &mut R, origin: Vec3, count: u32) {
    for _ in 0..count {
        let dir = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-1.0..1.0),
        )
        .try_normalize()
        .unwrap_or(Vec3::X);
        let speed: f32 = rng.gen_range(0.5..1.0) * FRAGMENT_BURST_SPEED;
        spawn_fragment(world, origin, dir * speed);
    }
}

pub fn spawn_fragment(world: &mut World, position: Vec3, velocity: Vec3) -> Entity {
    world.spawn((
        ResourceFragment {
            value: FRAGMENT_VALUE,
            collected: false,
            lost: false,
        },
        Position(position),
        Velocity(velocity),
        Renderable {
            kind: VisualKind::Fragment,
            handle: None,
            scale: 0.3,
            color: 0x66ffaa,
        },
    ))
}

pub fn spawn_missile(world: &mut World, position: Vec3, heading: Vec3) -> Entity {
    let dir = heading.try_normalize().unwrap_or(Vec3::Z);
    world.spawn((
        Missile {
            lock: MissileLock::Searching,
            target: None,
            turn_rate: MISSILE_TURN_RATE,
            speed: MISSILE_SPEED,
            damage: MISSILE_DAMAGE,
            blast_radius: MISSILE_BLAST_RADIUS,
            age: 0.0,
            lifetime: MISSILE_LIFETIME,
        },
        Position(position),
        Velocity(dir * MISSILE_SPEED),
        Renderable {
            kind: VisualKind::Missile,
            handle: None,
            scale: 1.0,
            color: MISSILE_COLOR,
        },
    ))
}

/// Every entity that hyperspace or a reset clears: asteroids, enemies,
/// ballistics and fragments.
pub fn hazard_entities(world: &World) -> Vec<Entity> {
    let mut out = Vec::new();
    out.extend(world.query::<&Asteroid>().iter().map(|(e, _)| e));
    out.extend(world.query::<&EnemyShip>().iter().map(|(e, _)| e));
    out.extend(world.query::<&Projectile>().iter().map(|(e, _)| e));
    out.extend(world.query::<&Missile>().iter().map(|(e, _)| e));
    out.extend(world.query::<&ResourceFragment>().iter().map(|(e, _)| e));
    out
}
