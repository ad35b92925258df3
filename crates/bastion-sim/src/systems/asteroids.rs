//! Asteroid manager: drift, physical collisions, projectile hits, breakup
//! into fragments, and keeping the field topped up.
//!
//! Physical collisions resolve before projectile hits. An asteroid that
//! crashes this tick is no longer a projectile target, so it never also
//! counts as a clean kill.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;

use bastion_core::components::{Asteroid, Collider, EnemyShip, Health, PlayerShip, Station};
use bastion_core::constants::*;
use bastion_core::enums::Owner;
use bastion_core::events::{EffectEvent, GameEvent};
use bastion_core::types::{Position, Velocity};

use crate::ballistics::{self, Target};
use crate::config::SimConfig;
use crate::frame::{Frame, TickOutput};
use crate::refs::to_ref;
use crate::systems::enemies;
use crate::world_setup;

/// Respawn bookkeeping for the asteroid field.
#[derive(Debug, Clone, Default)]
pub struct AsteroidField {
    pub respawn_timer: f32,
}

/// Fragments released by a crash: a fifth of a clean kill, at least one.
pub fn crash_yield(fragment_count: u32) -> u32 {
    (fragment_count / ASTEROID_CRASH_YIELD_DIVISOR).max(1)
}

/// Collision damage from a body of `mass` meeting another at `relative_speed`.
pub fn collision_damage(mass: f32, relative_speed: f32) -> f32 {
    mass * relative_speed * COLLISION_DAMAGE_FACTOR
}

pub fn run<R: Rng>(
    world: &mut World,
    rng: &mut R,
    field: &mut AsteroidField,
    config: &SimConfig,
    frame: &Frame,
    out: &mut TickOutput,
) {
    drift(world, frame.dt, config.world_radius);
    physical_collisions(world, rng, out);
    projectile_collisions(world, rng, out);
    maintain_field(world, rng, field, config, frame.dt);
}

fn drift(world: &mut World, dt: f32, world_radius: f32) {
    for (_entity, (_asteroid, pos, vel, health)) in
        world.query_mut::<(&Asteroid, &mut Position, &Velocity, &mut Health)>()
    {
        if !health.alive {
            continue;
        }
        pos.0 += vel.0 * dt;
        if pos.length() > world_radius {
            // Drifted out of play; no fragments.
            health.alive = false;
        }
    }
}

/// A body an asteroid can crash into.
struct Body {
    entity: Entity,
    position: Vec3,
    velocity: Vec3,
    radius: f32,
    kind: BodyKind,
}

#[derive(Clone, Copy, PartialEq)]
enum BodyKind {
    Player,
    Station,
    Enemy,
}

fn live_bodies(world: &World) -> Vec<Body> {
    let mut bodies = Vec::new();
    for (entity, (_, pos, vel, col, health)) in world
        .query::<(&PlayerShip, &Position, &Velocity, &Collider, &Health)>()
        .iter()
    {
        if health.alive {
            bodies.push(Body {
                entity,
                position: pos.0,
                velocity: vel.0,
                radius: col.radius,
                kind: BodyKind::Player,
            });
        }
    }
    for (entity, (_, pos, col, health)) in world
        .query::<(&Station, &Position, &Collider, &Health)>()
        .iter()
    {
        if health.alive {
            bodies.push(Body {
                entity,
                position: pos.0,
                velocity: Vec3::ZERO,
                radius: col.radius,
                kind: BodyKind::Station,
            });
        }
    }
    for (entity, (_, pos, vel, col, health)) in world
        .query::<(&EnemyShip, &Position, &Velocity, &Collider, &Health)>()
        .iter()
    {
        if health.alive {
            bodies.push(Body {
                entity,
                position: pos.0,
                velocity: vel.0,
                radius: col.radius,
                kind: BodyKind::Enemy,
            });
        }
    }
    bodies
}

fn physical_collisions<R: Rng>(world: &mut World, rng: &mut R, out: &mut TickOutput) {
    let bodies = live_bodies(world);
    // (body index, damage) and crashed asteroids (position, radius, yield)
    let mut hits: Vec<(usize, f32)> = Vec::new();
    let mut crashed: Vec<(Vec3, f32, u32)> = Vec::new();

    for (_entity, (asteroid, pos, vel, health)) in
        world.query_mut::<(&mut Asteroid, &Position, &Velocity, &mut Health)>()
    {
        if !health.alive || asteroid.crashed {
            continue;
        }
        let Some(index) = bodies
            .iter()
            .position(|b| pos.distance(b.position) < asteroid.radius + b.radius)
        else {
            continue;
        };
        let body = &bodies[index];
        let relative_speed = (vel.0 - body.velocity).length();
        hits.push((index, collision_damage(asteroid.mass, relative_speed)));

        asteroid.crashed = true;
        health.current = 0.0;
        health.alive = false;
        crashed.push((pos.0, asteroid.radius, crash_yield(asteroid.fragment_count)));
    }

    for (position, radius, fragments) in crashed {
        world_setup::spawn_fragments(world, rng, position, fragments);
        out.effect(EffectEvent::Explosion {
            position,
            color: ASTEROID_COLOR,
            size: radius,
        });
        out.event(GameEvent::AsteroidDestroyed {
            crashed: true,
            fragments,
        });
    }

    for (index, damage) in hits {
        let body = &bodies[index];
        let died = {
            let Ok(mut health) = world.get::<&mut Health>(body.entity) else {
                continue;
            };
            if !health.alive {
                continue;
            }
            health.current -= damage;
            if body.kind != BodyKind::Enemy && health.current <= 0.0 {
                health.current = 0.0;
                health.alive = false;
            }
            health.current <= 0.0
        };
        if body.kind == BodyKind::Player {
            out.effect(EffectEvent::DamageFlash { amount: damage });
        }
        if body.kind == BodyKind::Enemy && died {
            // Rammed by a rock: no bounty.
            enemies::finalize_death(world, rng, body.entity, None, out);
        }
    }
}

fn projectile_collisions<R: Rng>(world: &mut World, rng: &mut R, out: &mut TickOutput) {
    let (shot_entities, mut shots) = ballistics::collect_shots(world, &[Owner::Player, Owner::Turret]);
    if shots.is_empty() {
        return;
    }

    let mut entities = Vec::new();
    let mut targets = Vec::new();
    for (entity, (asteroid, pos, col, health)) in world
        .query::<(&Asteroid, &Position, &Collider, &Health)>()
        .iter()
    {
        if health.alive && !asteroid.crashed {
            entities.push(entity);
            targets.push(Target {
                id: to_ref(entity),
                position: pos.0,
                radius: col.radius,
                health: health.current,
            });
        }
    }
    if targets.is_empty() {
        return;
    }

    let resolution = ballistics::resolve(&mut shots, &mut targets);
    ballistics::write_back_shots(world, &shot_entities, shots);

    for impact in &resolution.impacts {
        out.effect(EffectEvent::HitSpark {
            position: impact.position,
            color_a: impact.color,
            color_b: HIT_SPARK_PRIMARY,
        });
    }

    for (i, &entity) in entities.iter().enumerate() {
        if resolution.damage[i] > 0.0 {
            if let Ok(mut health) = world.get::<&mut Health>(entity) {
                health.current = targets[i].health.max(0.0);
            }
        }
    }

    for kill in resolution.kills {
        let entity = entities[kill.target];
        let Ok((asteroid, health)) = world.query_one_mut::<(&Asteroid, &mut Health)>(entity) else {
            continue;
        };
        health.alive = false;
        let (radius, fragments) = (asteroid.radius, asteroid.fragment_count);
        let position = targets[kill.target].position;
        world_setup::spawn_fragments(world, rng, position, fragments);
        out.effect(EffectEvent::Explosion {
            position,
            color: ASTEROID_COLOR,
            size: radius,
        });
        out.event(GameEvent::AsteroidDestroyed {
            crashed: false,
            fragments,
        });
    }
}

fn maintain_field<R: Rng>(
    world: &mut World,
    rng: &mut R,
    field: &mut AsteroidField,
    config: &SimConfig,
    dt: f32,
) {
    let live = world
        .query::<(&Asteroid, &Health)>()
        .iter()
        .filter(|(_, (_, health))| health.alive)
        .count() as u32;
    if live >= config.asteroid_count {
        field.respawn_timer = config.asteroid_respawn_secs;
        return;
    }
    field.respawn_timer -= dt;
    if field.respawn_timer <= 0.0 {
        world_setup::spawn_random_asteroid(world, rng);
        field.respawn_timer = config.asteroid_respawn_secs;
    }
}

#[cfg(test)]
mod tests {
    use bastion_core::components::Projectile;
    use bastion_core::weapons::get_config;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::ballistics::{spawn_projectile, ShotSpec};

    #[test]
    fn test_crash_yield_floor() {
        assert_eq!(crash_yield(0), 1);
        assert_eq!(crash_yield(4), 1);
        assert_eq!(crash_yield(10), 2);
    }

    #[test]
    fn test_crash_preempts_projectile_kill_same_tick() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = SimConfig {
            asteroid_count: 0,
            ..Default::default()
        };
        let frame = Frame {
            dt: NOMINAL_DT,
            tick: 0,
            now: 0.0,
        };

        world_setup::spawn_station(&mut world, 1);
        // Overlapping the station hull, with a player round sitting on it.
        let rock_pos = Vec3::new(STATION_COLLISION_RADIUS, 0.0, 0.0);
        let rock = world_setup::spawn_asteroid(&mut world, rock_pos, Vec3::ZERO, 2.0);
        spawn_projectile(
            &mut world,
            rock_pos,
            Vec3::Z,
            &ShotSpec::from_weapon(&get_config(1)),
        );

        let mut out = TickOutput::default();
        run(
            &mut world,
            &mut rng,
            &mut AsteroidField::default(),
            &config,
            &frame,
            &mut out,
        );

        let crashes = out
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::AsteroidDestroyed { crashed: true, .. }))
            .count();
        let clean = out
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::AsteroidDestroyed { crashed: false, .. }))
            .count();
        assert_eq!(crashes, 1);
        assert_eq!(clean, 0);
        assert!(world.get::<&Asteroid>(rock).unwrap().crashed);

        let round = world
            .query::<&Projectile>()
            .iter()
            .map(|(_, p)| (p.alive, p.struck.len()))
            .next()
            .unwrap();
        assert_eq!(round, (true, 0));
    }
}
