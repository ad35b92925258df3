//! Guided missile flight and detonation.
//!
//! Two passes per tick. Guidance ages each missile, validates or re-acquires
//! its target, steers toward the predicted intercept and moves it. Collision
//! then detonates missiles that reached an enemy and applies blast damage.

use glam::Vec3;
use hecs::{Entity, World};
use log::debug;
use rand::Rng;

use bastion_core::components::{Collider, EnemyShip, Health, Missile};
use bastion_core::constants::*;
use bastion_core::enums::{MissileLock, Owner};
use bastion_core::events::{EffectEvent, GameEvent};
use bastion_core::types::{Position, Velocity};

use crate::frame::{Frame, TickOutput};
use crate::guidance::{acquire, intercept_point, steer, Candidate};
use crate::refs::{resolve_live, to_ref};
use crate::systems::enemies::finalize_death;

pub fn run<R: Rng>(
    world: &mut World,
    rng: &mut R,
    world_radius: f32,
    frame: &Frame,
    out: &mut TickOutput,
) {
    guide(world, world_radius, frame.dt, out);
    detonate(world, rng, out);
}

struct EnemyState {
    entity: Entity,
    position: Vec3,
    velocity: Vec3,
    radius: f32,
}

fn live_enemies(world: &World) -> Vec<EnemyState> {
    world
        .query::<(&EnemyShip, &Position, &Velocity, &Collider, &Health)>()
        .iter()
        .filter(|(_, (_, _, _, _, health))| health.alive)
        .map(|(entity, (_, pos, vel, col, _))| EnemyState {
            entity,
            position: pos.0,
            velocity: vel.0,
            radius: col.radius,
        })
        .collect()
}

fn guide(world: &mut World, world_radius: f32, dt: f32, out: &mut TickOutput) {
    let enemies = live_enemies(world);
    let candidates: Vec<Candidate> = enemies
        .iter()
        .map(|e| Candidate {
            id: to_ref(e.entity),
            position: e.position,
        })
        .collect();

    // Targets are checked against the world before the mutable pass.
    let mut live_targets = Vec::new();
    for (entity, missile) in world.query::<&Missile>().iter() {
        if let Some(target) = missile.target {
            if let Some(e) = resolve_live(world, target) {
                live_targets.push((entity, e));
            }
        }
    }

    let bound_sq = world_radius * world_radius;
    let mut expired = Vec::new();
    for (entity, (missile, pos, vel)) in
        world.query_mut::<(&mut Missile, &mut Position, &mut Velocity)>()
    {
        if missile.lock == MissileLock::Exploded {
            continue;
        }
        missile.age += dt;
        if missile.age >= missile.lifetime {
            missile.lock = MissileLock::Exploded;
            expired.push(pos.0);
            continue;
        }

        let tracked = live_targets
            .iter()
            .find(|(m, _)| *m == entity)
            .and_then(|(_, t)| enemies.iter().find(|e| e.entity == *t));
        if missile.target.is_some() && tracked.is_none() {
            missile.target = None;
            missile.lock = MissileLock::Reacquiring;
        }

        let heading = vel.0.try_normalize().unwrap_or(Vec3::Z);
        let mut target = tracked.map(|e| (e.position, e.velocity));
        if target.is_none() {
            let cone = match missile.lock {
                MissileLock::Reacquiring => MISSILE_REACQUIRE_CONE,
                _ => MISSILE_LOCK_CONE,
            };
            if let Some(id) = acquire(pos.0, heading, &candidates, cone, MISSILE_LOCK_RANGE) {
                missile.target = Some(id);
                missile.lock = MissileLock::Locked;
                target = enemies
                    .iter()
                    .find(|e| to_ref(e.entity) == id)
                    .map(|e| (e.position, e.velocity));
            }
        }

        let dir = match target {
            Some((tpos, tvel)) => {
                let aim = intercept_point(pos.0, missile.speed, tpos, tvel);
                let desired = (aim - pos.0).try_normalize().unwrap_or(heading);
                steer(heading, desired, missile.turn_rate, dt)
            }
            None => heading,
        };
        vel.0 = dir * missile.speed;
        pos.0 += vel.0 * dt;

        if pos.0.length_squared() > bound_sq {
            missile.lock = MissileLock::Exploded;
            expired.push(pos.0);
        }
    }

    for position in expired {
        explosion(position, false, out);
    }
}

fn detonate<R: Rng>(world: &mut World, rng: &mut R, out: &mut TickOutput) {
    let mut blasts: Vec<(Entity, Vec3, f32, f32)> = Vec::new();
    {
        let enemies = live_enemies(world);
        for (entity, (missile, pos)) in world.query::<(&Missile, &Position)>().iter() {
            if missile.lock == MissileLock::Exploded {
                continue;
            }
            let hit = enemies
                .iter()
                .any(|e| pos.0.distance(e.position) < MISSILE_HIT_RADIUS + e.radius);
            if hit {
                blasts.push((entity, pos.0, missile.damage, missile.blast_radius));
            }
        }
    }

    for (missile_entity, center, damage, blast_radius) in blasts {
        if let Ok(mut missile) = world.get::<&mut Missile>(missile_entity) {
            missile.lock = MissileLock::Exploded;
        }

        let mut killed = Vec::new();
        for e in live_enemies(world) {
            if center.distance(e.position) >= blast_radius + e.radius {
                continue;
            }
            if let Ok(mut health) = world.get::<&mut Health>(e.entity) {
                health.current -= damage;
                if health.current <= 0.0 {
                    killed.push(e.entity);
                }
            }
        }
        debug!("missile detonated at {center}, {} kills", killed.len());
        for entity in killed {
            finalize_death(world, rng, entity, Some(Owner::Player), out);
        }
        explosion(center, true, out);
    }
}

fn explosion(position: Vec3, hit: bool, out: &mut TickOutput) {
    out.effect(EffectEvent::Explosion {
        position,
        color: MISSILE_COLOR,
        size: MISSILE_BLAST_RADIUS,
    });
    out.event(GameEvent::MissileExploded { hit });
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::world_setup::{spawn_enemy, spawn_missile};
    use bastion_core::enums::EnemyType;
    use bastion_squad_ai::profiles::CollisionScale;

    fn frame() -> Frame {
        Frame {
            dt: NOMINAL_DT,
            tick: 0,
            now: 0.0,
        }
    }

    #[test]
    fn test_searching_missile_flies_straight() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = TickOutput::default();
        let m = spawn_missile(&mut world, Vec3::ZERO, Vec3::X);

        run(&mut world, &mut rng, WORLD_RADIUS, &frame(), &mut out);

        let missile = world.get::<&Missile>(m).unwrap();
        assert_eq!(missile.lock, MissileLock::Searching);
        let vel = world.get::<&Velocity>(m).unwrap();
        assert_relative_eq!(vel.0.x, MISSILE_SPEED, epsilon = 1e-3);
        assert_relative_eq!(vel.0.z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_locks_target_inside_cone() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = TickOutput::default();
        let enemy = spawn_enemy(
            &mut world,
            EnemyType::Fighter,
            Vec3::new(0.0, 0.0, 80.0),
            1.0,
            None,
            CollisionScale::default(),
        );
        let m = spawn_missile(&mut world, Vec3::ZERO, Vec3::Z);

        run(&mut world, &mut rng, WORLD_RADIUS, &frame(), &mut out);

        let missile = world.get::<&Missile>(m).unwrap();
        assert_eq!(missile.lock, MissileLock::Locked);
        assert_eq!(missile.target, Some(to_ref(enemy)));
    }

    #[test]
    fn test_ignores_target_outside_cone() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = TickOutput::default();
        spawn_enemy(
            &mut world,
            EnemyType::Fighter,
            Vec3::new(80.0, 0.0, 0.0),
            1.0,
            None,
            CollisionScale::default(),
        );
        let m = spawn_missile(&mut world, Vec3::ZERO, Vec3::Z);

        run(&mut world, &mut rng, WORLD_RADIUS, &frame(), &mut out);

        assert_eq!(world.get::<&Missile>(m).unwrap().lock, MissileLock::Searching);
    }

    #[test]
    fn test_dead_target_switches_to_reacquire() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = TickOutput::default();
        let enemy = spawn_enemy(
            &mut world,
            EnemyType::Fighter,
            Vec3::new(0.0, 0.0, 100.0),
            1.0,
            None,
            CollisionScale::default(),
        );
        let m = spawn_missile(&mut world, Vec3::ZERO, Vec3::Z);
        run(&mut world, &mut rng, WORLD_RADIUS, &frame(), &mut out);

        world.get::<&mut Health>(enemy).unwrap().alive = false;
        run(&mut world, &mut rng, WORLD_RADIUS, &frame(), &mut out);

        let missile = world.get::<&Missile>(m).unwrap();
        assert_eq!(missile.lock, MissileLock::Reacquiring);
        assert_eq!(missile.target, None);
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = TickOutput::default();
        let m = spawn_missile(&mut world, Vec3::ZERO, Vec3::X);
        world.get::<&mut Missile>(m).unwrap().age = MISSILE_LIFETIME;

        run(&mut world, &mut rng, WORLD_RADIUS, &frame(), &mut out);

        assert_eq!(world.get::<&Missile>(m).unwrap().lock, MissileLock::Exploded);
        assert!(out
            .events
            .contains(&GameEvent::MissileExploded { hit: false }));
    }

    #[test]
    fn test_blast_kills_and_pays_bounty() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = TickOutput::default();
        let scale = CollisionScale::default();
        let a = spawn_enemy(&mut world, EnemyType::Scout, Vec3::new(0.0, 0.0, 2.0), 1.0, None, scale);
        let b = spawn_enemy(&mut world, EnemyType::Scout, Vec3::new(3.0, 0.0, 2.0), 1.0, None, scale);
        spawn_missile(&mut world, Vec3::ZERO, Vec3::Z);

        run(&mut world, &mut rng, WORLD_RADIUS, &frame(), &mut out);

        assert!(!world.get::<&Health>(a).unwrap().alive);
        assert!(!world.get::<&Health>(b).unwrap().alive);
        assert!(out.tally.enemy > 0);
        assert!(out.events.contains(&GameEvent::MissileExploded { hit: true }));
    }
}
