//! Conversions between hecs entities and serializable [`EntityRef`]s.

use hecs::{Entity, World};

use bastion_core::components::Health;
use bastion_core::types::EntityRef;

pub fn to_ref(entity: Entity) -> EntityRef {
    EntityRef(entity.to_bits().get())
}

pub fn from_ref(reference: EntityRef) -> Option<Entity> {
    Entity::from_bits(reference.0)
}

/// Resolve a reference to an entity that still exists and is alive.
/// A despawned entity, or one whose slot was reused, resolves to `None`.
pub fn resolve_live(world: &World, reference: EntityRef) -> Option<Entity> {
    let entity = from_ref(reference)?;
    let alive = world.get::<&Health>(entity).ok()?.alive;
    alive.then_some(entity)
}
