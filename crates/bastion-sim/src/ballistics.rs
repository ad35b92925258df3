//! Projectile spawning and the hit resolver shared by every manager.
//!
//! The resolver works on plain slices so it can run against any target
//! category (asteroids, enemies, the player and station) without holding
//! ECS borrows.

use glam::{Quat, Vec3};
use hecs::{Entity, World};
use rand::Rng;

use bastion_core::components::{Projectile, Renderable};
use bastion_core::constants::SPREAD_VERTICAL_JITTER;
use bastion_core::enums::{Owner, VisualKind};
use bastion_core::types::{EntityRef, Position, Velocity};
use bastion_core::weapons::WeaponConfig;

/// Directions for an N-bullet fan around `aim`. Bullet i is rotated about
/// the up axis by `(i - (N - 1) / 2) * spread`.
pub fn fan_directions(aim: Vec3, count: u32, spread: f32) -> Vec<Vec3> {
    let count = count.max(1);
    let mid = (count - 1) as f32 / 2.0;
    (0..count)
        .map(|i| Quat::from_rotation_y((i as f32 - mid) * spread) * aim)
        .collect()
}

/// Everything needed to spawn one projectile.
#[derive(Debug, Clone, Copy)]
pub struct ShotSpec {
    pub owner: Owner,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub lifetime: f32,
    pub color: u32,
    pub splash_radius: f32,
    pub penetration: u32,
}

impl ShotSpec {
    pub fn from_weapon(config: &WeaponConfig) -> Self {
        Self {
            owner: Owner::Player,
            speed: config.bullet_speed,
            damage: config.damage,
            radius: config.bullet_size,
            lifetime: config.lifetime,
            color: config.color,
            splash_radius: config.splash_radius,
            penetration: config.penetration,
        }
    }
}

pub fn spawn_projectile(world: &mut World, origin: Vec3, direction: Vec3, spec: &ShotSpec) {
    let dir = direction.try_normalize().unwrap_or(Vec3::Z);
    world.spawn((
        Position(origin),
        Velocity(dir * spec.speed),
        Projectile {
            owner: spec.owner,
            damage: spec.damage,
            radius: spec.radius,
            color: spec.color,
            splash_radius: spec.splash_radius,
            penetration: spec.penetration,
            penetration_count: 0,
            age: 0.0,
            lifetime: spec.lifetime,
            alive: true,
            struck: Vec::new(),
        },
        Renderable {
            kind: VisualKind::Projectile,
            handle: None,
            scale: spec.radius,
            color: spec.color,
        },
    ));
}

/// Spawn one volley of `config.bullet_count` bullets fanned around `aim`.
pub fn fire_volley<R: Rng>(
    world: &mut World,
    rng: &mut R,
    origin: Vec3,
    aim: Vec3,
    config: &WeaponConfig,
) {
    let spec = ShotSpec::from_weapon(config);
    for dir in fan_directions(aim, config.bullet_count, config.spread_angle) {
        let jitter = if config.bullet_count > 1 {
            rng.gen_range(-SPREAD_VERTICAL_JITTER..=SPREAD_VERTICAL_JITTER)
        } else {
            0.0
        };
        spawn_projectile(world, origin, dir + Vec3::Y * jitter, &spec);
    }
}

/// Advance every live projectile and expire the ones past their lifetime
/// or outside the world bound.
pub fn advance_projectiles(world: &mut World, dt: f32, world_radius: f32) {
    let bound_sq = world_radius * world_radius;
    for (_entity, (pos, vel, projectile)) in
        world.query_mut::<(&mut Position, &Velocity, &mut Projectile)>()
    {
        if !projectile.alive {
            continue;
        }
        pos.0 += vel.0 * dt;
        projectile.age += dt;
        if projectile.age >= projectile.lifetime || pos.length_squared() > bound_sq {
            projectile.alive = false;
        }
    }
}

/// Live projectiles fired by any of `owners`, with their entities in the
/// same order.
pub fn collect_shots(world: &World, owners: &[Owner]) -> (Vec<Entity>, Vec<Shot>) {
    let mut entities = Vec::new();
    let mut shots = Vec::new();
    for (entity, (pos, projectile)) in world.query::<(&Position, &Projectile)>().iter() {
        if projectile.alive && owners.contains(&projectile.owner) {
            entities.push(entity);
            shots.push(Shot {
                position: pos.0,
                projectile: projectile.clone(),
            });
        }
    }
    (entities, shots)
}

/// Store resolved projectile state back on the entities.
pub fn write_back_shots(world: &mut World, entities: &[Entity], shots: Vec<Shot>) {
    for (&entity, shot) in entities.iter().zip(shots) {
        if let Ok(mut projectile) = world.get::<&mut Projectile>(entity) {
            *projectile = shot.projectile;
        }
    }
}

// ---- Hit resolution ----

/// A damageable target as seen by the resolver.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub id: EntityRef,
    pub position: Vec3,
    pub radius: f32,
    pub health: f32,
}

impl Target {
    fn live(&self) -> bool {
        self.health > 0.0
    }
}

/// A projectile as seen by the resolver.
#[derive(Debug, Clone)]
pub struct Shot {
    pub position: Vec3,
    pub projectile: Projectile,
}

/// A direct hit, for spark effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub position: Vec3,
    pub color: u32,
    pub target: usize,
}

/// A target whose health crossed zero during resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub target: usize,
    pub owner: Owner,
}

#[derive(Debug, Default)]
pub struct Resolution {
    pub impacts: Vec<Impact>,
    pub kills: Vec<Kill>,
    /// Total damage dealt to each target index, direct and splash.
    pub damage: Vec<f32>,
}

/// Resolve every live shot against every live target.
///
/// A shot hits the first live target it overlaps that it has not already
/// struck. Direct damage is followed by a splash pass over the other live
/// targets within `splash + target radius` of the impact point. Splash
/// never triggers further splash. With penetration P a shot survives P hits
/// and dies on hit P + 1.
pub fn resolve(shots: &mut [Shot], targets: &mut [Target]) -> Resolution {
    let mut out = Resolution {
        damage: vec![0.0; targets.len()],
        ..Default::default()
    };

    for shot in shots.iter_mut() {
        while shot.projectile.alive {
            let Some(hit) = first_overlap(shot, targets) else {
                break;
            };
            let projectile = &mut shot.projectile;
            let impact = shot.position;

            apply(&mut out, targets, hit, projectile.damage, projectile.owner);
            projectile.struck.push(targets[hit].id);
            out.impacts.push(Impact {
                position: impact,
                color: projectile.color,
                target: hit,
            });

            if projectile.splash_radius > 0.0 {
                for other in 0..targets.len() {
                    if other == hit || !targets[other].live() {
                        continue;
                    }
                    let reach = projectile.splash_radius + targets[other].radius;
                    if impact.distance(targets[other].position) < reach {
                        apply(&mut out, targets, other, projectile.damage, projectile.owner);
                    }
                }
            }

            if projectile.penetration == 0 {
                projectile.alive = false;
            } else {
                projectile.penetration_count += 1;
                if projectile.penetration_count > projectile.penetration {
                    projectile.alive = false;
                }
            }
        }
    }

    out
}

fn first_overlap(shot: &Shot, targets: &[Target]) -> Option<usize> {
    targets.iter().position(|t| {
        t.live()
            && !shot.projectile.struck.contains(&t.id)
            && shot.position.distance(t.position) < shot.projectile.radius + t.radius
    })
}

fn apply(out: &mut Resolution, targets: &mut [Target], index: usize, damage: f32, owner: Owner) {
    let target = &mut targets[index];
    let was_live = target.live();
    target.health -= damage;
    out.damage[index] += damage;
    if was_live && !target.live() {
        out.kills.push(Kill {
            target: index,
            owner,
        });
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn projectile(damage: f32, splash: f32, penetration: u32) -> Projectile {
        Projectile {
            owner: Owner::Player,
            damage,
            radius: 0.5,
            color: 0xffffff,
            splash_radius: splash,
            penetration,
            penetration_count: 0,
            age: 0.0,
            lifetime: 2.0,
            alive: true,
            struck: Vec::new(),
        }
    }

    fn target(id: u64, x: f32, radius: f32, health: f32) -> Target {
        Target {
            id: EntityRef(id),
            position: Vec3::new(x, 0.0, 0.0),
            radius,
            health,
        }
    }

    #[test]
    fn test_fan_is_symmetric() {
        let dirs = fan_directions(Vec3::Z, 3, 0.1);
        assert_eq!(dirs.len(), 3);
        assert_relative_eq!(dirs[1].x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(dirs[0].x, -dirs[2].x, epsilon = 1e-6);
        assert_relative_eq!(dirs[2].x.atan2(dirs[2].z), 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_single_bullet_flies_straight() {
        let dirs = fan_directions(Vec3::X, 1, 0.5);
        assert_eq!(dirs.len(), 1);
        assert_relative_eq!(dirs[0].x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(dirs[0].z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_penetration_dies_on_first_hit() {
        let mut shots = vec![Shot {
            position: Vec3::ZERO,
            projectile: projectile(5.0, 0.0, 0),
        }];
        // Two overlapping targets: only the first is struck.
        let mut targets = vec![target(1, 0.0, 1.0, 50.0), target(2, 0.2, 1.0, 50.0)];
        let res = resolve(&mut shots, &mut targets);
        assert!(!shots[0].projectile.alive);
        assert_eq!(res.impacts.len(), 1);
        assert_eq!(targets[1].health, 50.0);
    }

    #[test]
    fn test_penetration_survives_exactly_p_hits() {
        for p in 0..4u32 {
            let mut shot = Shot {
                position: Vec3::ZERO,
                projectile: projectile(1.0, 0.0, p),
            };
            let mut hits = 0;
            // Feed fresh targets one at a time, like a round flying down a line.
            for id in 0..10 {
                let mut targets = vec![target(id, 0.0, 1.0, 100.0)];
                let res = resolve(std::slice::from_mut(&mut shot), &mut targets);
                hits += res.impacts.len();
                if !shot.projectile.alive {
                    break;
                }
            }
            assert_eq!(hits as u32, p + 1, "penetration {p}");
        }
    }

    #[test]
    fn test_penetrating_round_strikes_each_target_once() {
        let mut shots = vec![Shot {
            position: Vec3::ZERO,
            projectile: projectile(1.0, 0.0, 5),
        }];
        let mut targets = vec![target(1, 0.0, 1.0, 100.0), target(2, 0.1, 1.0, 100.0)];
        let res = resolve(&mut shots, &mut targets);
        assert_eq!(res.impacts.len(), 2);
        assert!(shots[0].projectile.alive);
        assert_eq!(shots[0].projectile.penetration_count, 2);

        // Still overlapping next tick: no repeat hits.
        let res = resolve(&mut shots, &mut targets);
        assert!(res.impacts.is_empty());
    }

    #[test]
    fn test_splash_reach_includes_target_radius() {
        // Struck target at the impact point; bystander radius 3, splash 5.
        for (distance, expect_splash) in [(7.0, true), (9.0, false)] {
            let mut shots = vec![Shot {
                position: Vec3::ZERO,
                projectile: projectile(10.0, 5.0, 0),
            }];
            let mut targets = vec![
                target(1, 0.0, 1.0, 100.0),
                target(2, distance, 3.0, 100.0),
            ];
            let res = resolve(&mut shots, &mut targets);
            assert_eq!(res.damage[0], 10.0);
            let splashed = res.damage[1] > 0.0;
            assert_eq!(splashed, expect_splash, "bystander at {distance}");
            if expect_splash {
                // No falloff.
                assert_eq!(res.damage[1], 10.0);
            }
        }
    }

    #[test]
    fn test_splash_does_not_chain() {
        // A at the impact point, B inside the splash, C inside B's would-be
        // splash but outside A's.
        let mut shots = vec![Shot {
            position: Vec3::ZERO,
            projectile: projectile(10.0, 4.0, 0),
        }];
        let mut targets = vec![
            target(1, 0.0, 1.0, 100.0),
            target(2, 4.0, 1.0, 5.0),
            target(3, 8.0, 1.0, 100.0),
        ];
        let res = resolve(&mut shots, &mut targets);
        assert_eq!(res.damage[1], 10.0);
        assert_eq!(res.damage[2], 0.0);
        assert_eq!(
            res.kills,
            vec![Kill {
                target: 1,
                owner: Owner::Player
            }]
        );
    }

    #[test]
    fn test_dead_targets_are_skipped() {
        let mut shots = vec![Shot {
            position: Vec3::ZERO,
            projectile: projectile(10.0, 0.0, 0),
        }];
        let mut targets = vec![target(1, 0.0, 1.0, 0.0), target(2, 0.5, 1.0, 20.0)];
        resolve(&mut shots, &mut targets);
        assert_eq!(targets[0].health, 0.0);
        assert_eq!(targets[1].health, 10.0);
    }

    #[test]
    fn test_kill_reported_once() {
        let mut shots = vec![
            Shot {
                position: Vec3::ZERO,
                projectile: projectile(30.0, 0.0, 0),
            },
            Shot {
                position: Vec3::ZERO,
                projectile: projectile(30.0, 0.0, 0),
            },
        ];
        let mut targets = vec![target(1, 0.0, 1.0, 20.0)];
        let res = resolve(&mut shots, &mut targets);
        assert_eq!(res.kills.len(), 1);
        // The second shot found no live target and flies on.
        assert!(shots[1].projectile.alive);
    }
}
