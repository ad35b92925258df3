//! Enemy manager: squad state machines, per-ship movement and fire,
//! projectile hits on enemies, and enemy fire landing on the player and
//! station.

use std::collections::HashMap;

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;

use bastion_core::components::{Collider, EnemyShip, Health, PlayerShip, Station};
use bastion_core::constants::*;
use bastion_core::enums::{Owner, SquadState, TargetChoice};
use bastion_core::events::{EffectEvent, GameEvent};
use bastion_core::types::{Position, Velocity};
use bastion_squad_ai::formation::slot_position;
use bastion_squad_ai::fsm::{evaluate, formation_gain, should_flip_target, SquadContext};
use bastion_squad_ai::profiles::{get_profile, CollisionScale};
use bastion_squad_ai::steering::{
    perturb_aim, range_keeping_velocity, roll_strafe_dir, slot_seek_velocity, RangeContext,
};

use crate::ballistics::{self, spawn_projectile, ShotSpec, Target};
use crate::frame::{Frame, TickOutput};
use crate::refs::to_ref;
use crate::squads::SquadRegistry;
use crate::systems::wave_spawner::{self, WaveSchedule};

/// Where the two possible targets are this tick.
#[derive(Debug, Clone, Copy)]
pub struct TargetPositions {
    pub player: Option<Vec3>,
    pub station: Option<Vec3>,
}

impl TargetPositions {
    pub fn find(world: &World) -> Self {
        let player = world
            .query::<(&PlayerShip, &Position, &Health)>()
            .iter()
            .find(|(_, (_, _, health))| health.alive)
            .map(|(_, (_, pos, _))| pos.0);
        let station = world
            .query::<(&Station, &Position, &Health)>()
            .iter()
            .find(|(_, (_, _, health))| health.alive)
            .map(|(_, (_, pos, _))| pos.0);
        Self { player, station }
    }

    /// Position for a target choice, falling back to whichever target remains.
    pub fn resolve(&self, choice: TargetChoice) -> Option<Vec3> {
        match choice {
            TargetChoice::Player => self.player.or(self.station),
            TargetChoice::Station => self.station.or(self.player),
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run<R: Rng>(
    world: &mut World,
    rng: &mut R,
    squads: &mut SquadRegistry,
    schedule: &mut WaveSchedule,
    scale: CollisionScale,
    frame: &Frame,
    out: &mut TickOutput,
) {
    wave_spawner::run(world, rng, schedule, squads, scale, frame.dt, out);
    prune_squads(world, squads, out);

    let targets = TargetPositions::find(world);
    let orders = update_squads(world, rng, squads, &targets, frame.dt);
    move_and_fire(world, rng, &orders, &targets, frame.dt);
    projectile_hits(world, rng, out);
    enemy_fire_hits(world, out);

    prune_squads(world, squads, out);
}

fn prune_squads(world: &World, squads: &mut SquadRegistry, out: &mut TickOutput) {
    for squad_id in squads.prune(world) {
        out.event(GameEvent::SquadDisbanded { squad_id });
    }
}

/// Formation order for one member: slot position and seek gain.
type Orders = HashMap<Entity, (Vec3, f32)>;

/// Step every squad's state machine and hand out formation slots for the
/// states that fly in formation.
fn update_squads<R: Rng>(
    world: &mut World,
    rng: &mut R,
    squads: &mut SquadRegistry,
    targets: &TargetPositions,
    dt: f32,
) -> Orders {
    let mut orders = Orders::new();
    let mut retargets: Vec<(Entity, TargetChoice)> = Vec::new();

    for squad in squads.iter_mut() {
        let Some(target) = targets.resolve(squad.target) else {
            continue;
        };

        let positions: Vec<Vec3> = squad
            .members
            .iter()
            .filter_map(|&m| {
                let health = world.get::<&Health>(m).ok()?;
                if !health.alive {
                    return None;
                }
                world.get::<&Position>(m).ok().map(|p| p.0)
            })
            .collect();
        let centroid = (!positions.is_empty())
            .then(|| positions.iter().copied().sum::<Vec3>() / positions.len() as f32);

        let update = evaluate(&SquadContext {
            state: squad.state,
            elapsed_in_state: squad.elapsed,
            formation_center: squad.formation_center,
            rally_point: squad.rally_point,
            target,
            member_centroid: centroid,
            dt,
        });
        squad.formation_center = update.formation_center;
        squad.rally_point = update.rally_point;
        if update.state_changed {
            squad.state = update.new_state;
            squad.elapsed = 0.0;
        } else {
            squad.elapsed += dt;
        }

        if should_flip_target(squad.state, rng.gen::<f64>()) {
            squad.target = squad.target.flipped();
            retargets.extend(squad.members.iter().map(|&m| (m, squad.target)));
        }

        let Some(gain) = formation_gain(squad.state) else {
            continue;
        };
        let heading_to = match squad.state {
            SquadState::Approaching => target,
            _ => squad.rally_point,
        };
        let heading = heading_to - squad.formation_center;
        for (&member, &offset) in squad.members.iter().zip(&squad.offsets) {
            let slot = slot_position(squad.formation_center, offset, heading);
            orders.insert(member, (slot, gain));
        }
    }

    for (entity, choice) in retargets {
        if let Ok(mut ship) = world.get::<&mut EnemyShip>(entity) {
            ship.target = choice;
        }
    }
    orders
}

/// Steering and firing for every live enemy.
fn move_and_fire<R: Rng>(
    world: &mut World,
    rng: &mut R,
    orders: &Orders,
    targets: &TargetPositions,
    dt: f32,
) {
    let mut shots: Vec<(Vec3, Vec3, ShotSpec)> = Vec::new();

    for (entity, (ship, pos, vel, health)) in
        world.query_mut::<(&mut EnemyShip, &mut Position, &mut Velocity, &Health)>()
    {
        if !health.alive {
            vel.0 = Vec3::ZERO;
            continue;
        }
        let profile = get_profile(ship.kind);
        let Some(target) = targets.resolve(ship.target) else {
            vel.0 = Vec3::ZERO;
            continue;
        };

        ship.strafe_timer -= dt;
        if ship.strafe_timer <= 0.0 {
            ship.strafe_dir = roll_strafe_dir(rng);
            ship.strafe_timer = ENEMY_STRAFE_INTERVAL;
        }

        vel.0 = match orders.get(&entity) {
            Some(&(slot, gain)) => slot_seek_velocity(pos.0, slot, profile.speed, gain),
            None => range_keeping_velocity(&RangeContext {
                position: pos.0,
                target,
                optimal_range: profile.optimal_range,
                speed: profile.speed,
                strafe_dir: ship.strafe_dir,
            }),
        };
        pos.0 += vel.0 * dt;

        ship.shoot_cooldown -= dt;
        let to_target = target - pos.0;
        if ship.shoot_cooldown <= 0.0 && to_target.length() <= profile.shoot_range {
            if let Some(dir) = to_target.try_normalize() {
                let aim = perturb_aim(dir, profile.accuracy, rng);
                let spec = ShotSpec {
                    owner: Owner::Enemy,
                    speed: profile.projectile_speed,
                    damage: ship.damage,
                    radius: ENEMY_PROJECTILE_SIZE,
                    lifetime: ENEMY_PROJECTILE_LIFETIME,
                    color: ENEMY_PROJECTILE_COLOR,
                    splash_radius: 0.0,
                    penetration: 0,
                };
                let muzzle = pos.0 + aim * profile.size;
                shots.push((muzzle, aim, spec));
                ship.shoot_cooldown = profile.fire_rate;
            }
        }
    }

    for (origin, dir, spec) in shots {
        spawn_projectile(world, origin, dir, &spec);
    }
}

/// Player and turret rounds against the enemy roster.
fn projectile_hits<R: Rng>(world: &mut World, rng: &mut R, out: &mut TickOutput) {
    let (shot_entities, mut shots) =
        ballistics::collect_shots(world, &[Owner::Player, Owner::Turret]);
    if shots.is_empty() {
        return;
    }

    let (entities, mut targets) = live_enemy_targets(world);
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
                health.current = targets[i].health;
            }
        }
    }
    for kill in resolution.kills {
        finalize_death(world, rng, entities[kill.target], Some(kill.owner), out);
    }
}

/// Live enemies as resolver targets, with their entities in the same order.
pub fn live_enemy_targets(world: &World) -> (Vec<Entity>, Vec<Target>) {
    let mut entities = Vec::new();
    let mut targets = Vec::new();
    for (entity, (_, pos, col, health)) in world
        .query::<(&EnemyShip, &Position, &Collider, &Health)>()
        .iter()
    {
        if health.alive {
            entities.push(entity);
            targets.push(Target {
                id: to_ref(entity),
                position: pos.0,
                radius: col.radius,
                health: health.current,
            });
        }
    }
    (entities, targets)
}

/// Enemy rounds against the player ship and the station.
fn enemy_fire_hits(world: &mut World, out: &mut TickOutput) {
    let (shot_entities, mut shots) = ballistics::collect_shots(world, &[Owner::Enemy]);
    if shots.is_empty() {
        return;
    }

    let mut entities = Vec::new();
    let mut targets = Vec::new();
    let mut is_player = Vec::new();
    for (entity, (player, station, pos, col, health)) in world
        .query::<(
            Option<&PlayerShip>,
            Option<&Station>,
            &Position,
            &Collider,
            &Health,
        )>()
        .iter()
    {
        if (player.is_some() || station.is_some()) && health.alive {
            entities.push(entity);
            is_player.push(player.is_some());
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
            color_b: ENEMY_PROJECTILE_COLOR,
        });
    }
    for (i, &entity) in entities.iter().enumerate() {
        let damage = resolution.damage[i];
        if damage <= 0.0 {
            continue;
        }
        if let Ok(mut health) = world.get::<&mut Health>(entity) {
            health.current = targets[i].health.max(0.0);
            if health.current <= 0.0 {
                health.alive = false;
            }
        }
        if is_player[i] {
            out.effect(EffectEvent::DamageFlash { amount: damage });
        }
    }
}

/// Mark an enemy dead and emit its explosion. With a killer, the bounty is
/// credited and the kill reported. Capital hulls queue a staggered chain of
/// follow-up explosions.
pub fn finalize_death<R: Rng>(
    world: &mut World,
    rng: &mut R,
    entity: Entity,
    by: Option<Owner>,
    out: &mut TickOutput,
) {
    let Ok((ship, pos, health)) =
        world.query_one_mut::<(&EnemyShip, &Position, &mut Health)>(entity)
    else {
        return;
    };
    if !health.alive {
        return;
    }
    health.alive = false;
    health.current = health.current.max(0.0);

    let kind = ship.kind;
    let position = pos.0;
    let profile = get_profile(kind);

    if let Some(owner) = by {
        out.tally.enemy += profile.resource_value as u64;
        out.event(GameEvent::EnemyDestroyed { kind, by: owner });
    }

    out.effect(EffectEvent::Explosion {
        position,
        color: profile.color,
        size: profile.size * 2.0,
    });
    for i in 1..profile.death_explosions {
        let jitter = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-1.0..1.0),
        ) * profile.size
            * 1.5;
        out.delayed.push((
            i as f64 * CAPITAL_EXPLOSION_STAGGER,
            EffectEvent::Explosion {
                position: position + jitter,
                color: EXPLOSION_COLOR,
                size: profile.size * (1.0 + 0.25 * i as f32),
            },
        ));
    }
}
