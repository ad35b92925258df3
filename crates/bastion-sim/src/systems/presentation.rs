//! Presentation sync: keeps visual handles in step with the world and
//! hands the tick's effects to the effects provider.

use glam::Vec3;
use hecs::World;

use bastion_core::components::{PlayerShip, Renderable, Turret};
use bastion_core::events::EffectEvent;
use bastion_core::types::{yaw_to_direction, Position, Velocity};

use crate::providers::{EffectsProvider, VisualProvider};

/// Spawn a handle for every renderable that has none yet, then push the
/// current transform for the rest.
pub fn sync(world: &mut World, visuals: &mut dyn VisualProvider) {
    for (_entity, (renderable, pos, vel, player, turret)) in world.query_mut::<(
        &mut Renderable,
        &Position,
        Option<&Velocity>,
        Option<&PlayerShip>,
        Option<&Turret>,
    )>() {
        let facing = if let Some(player) = player {
            player.facing
        } else if let Some(turret) = turret {
            yaw_to_direction(turret.yaw)
        } else {
            vel.and_then(|v| v.0.try_normalize()).unwrap_or(Vec3::Z)
        };

        match renderable.handle {
            Some(handle) => visuals.update(handle, pos.0, facing),
            None => {
                let handle =
                    visuals.spawn(renderable.kind, pos.0, renderable.scale, renderable.color);
                renderable.handle = Some(handle);
            }
        }
    }
}

pub fn flush(effects: &[EffectEvent], provider: &mut dyn EffectsProvider) {
    for effect in effects {
        provider.play(effect);
    }
}
