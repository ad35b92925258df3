//! Cleanup system: despawns destroyed entities and releases their visuals.

use hecs::{Entity, World};
use log::warn;

use bastion_core::components::{
    Health, Missile, PlayerShip, Projectile, Renderable, ResourceFragment, Station,
};
use bastion_core::enums::MissileLock;

use crate::providers::VisualProvider;

/// Remove every entity in a terminal state. The player ship and station are
/// kept when dead so the game-over check and snapshot can still see them.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, visuals: &mut dyn VisualProvider, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    // Dead hulls: enemies, asteroids, turrets.
    for (entity, (health, player, station)) in
        world.query_mut::<(&Health, Option<&PlayerShip>, Option<&Station>)>()
    {
        if !health.alive && player.is_none() && station.is_none() {
            despawn_buffer.push(entity);
        }
    }

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if !projectile.alive {
            despawn_buffer.push(entity);
        }
    }

    for (entity, missile) in world.query_mut::<&Missile>() {
        if missile.lock == MissileLock::Exploded {
            despawn_buffer.push(entity);
        }
    }

    for (entity, fragment) in world.query_mut::<&ResourceFragment>() {
        if fragment.collected || fragment.lost {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        release(world, visuals, entity);
        let _ = world.despawn(entity);
    }
}

/// Despawn a specific set of entities, releasing their visuals first.
pub fn purge(world: &mut World, visuals: &mut dyn VisualProvider, entities: &[Entity]) {
    for &entity in entities {
        release(world, visuals, entity);
        let _ = world.despawn(entity);
    }
}

fn release(world: &World, visuals: &mut dyn VisualProvider, entity: Entity) {
    let handle = world
        .get::<&Renderable>(entity)
        .ok()
        .and_then(|r| r.handle);
    if let Some(handle) = handle {
        if let Err(err) = visuals.dispose(handle) {
            warn!("failed to dispose visual {handle}: {err}");
        }
    }
}
