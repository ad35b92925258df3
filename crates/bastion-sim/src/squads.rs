//! Squad registry: an arena of squads keyed by id.
//!
//! A squad owns its roster as a list of entity handles; each enemy only
//! carries its squad id. Membership changes recompute the formation, and a
//! squad whose roster empties is removed.

use std::collections::BTreeMap;

use glam::Vec3;
use hecs::{Entity, World};
use log::debug;

use bastion_core::components::Health;
use bastion_core::enums::{FormationShape, SquadState, TargetChoice};
use bastion_squad_ai::formation::{compute_offsets, shape_for};

#[derive(Debug, Clone)]
pub struct Squad {
    pub id: u32,
    pub state: SquadState,
    /// Seconds in the current state.
    pub elapsed: f32,
    pub formation_center: Vec3,
    pub rally_point: Vec3,
    pub target: TargetChoice,
    /// Live members in roster order. `offsets[i]` belongs to `members[i]`.
    pub members: Vec<Entity>,
    pub offsets: Vec<Vec3>,
    pub shape: FormationShape,
}

impl Squad {
    fn reform(&mut self) {
        self.offsets = compute_offsets(self.members.len());
        self.shape = shape_for(self.members.len());
    }
}

#[derive(Debug, Default)]
pub struct SquadRegistry {
    squads: BTreeMap<u32, Squad>,
    next_id: u32,
}

impl SquadRegistry {
    /// Register a new squad and return its id.
    pub fn create(&mut self, members: Vec<Entity>, center: Vec3, target: TargetChoice) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let mut squad = Squad {
            id,
            state: SquadState::Approaching,
            elapsed: 0.0,
            formation_center: center,
            rally_point: center,
            target,
            members,
            offsets: Vec::new(),
            shape: FormationShape::Vee,
        };
        squad.reform();
        debug!("squad {id} formed with {} members", squad.members.len());
        self.squads.insert(id, squad);
        id
    }

    pub fn get(&self, id: u32) -> Option<&Squad> {
        self.squads.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Squad> {
        self.squads.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Squad> {
        self.squads.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Squad> {
        self.squads.values_mut()
    }

    pub fn len(&self) -> usize {
        self.squads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }

    pub fn clear(&mut self) {
        self.squads.clear();
    }

    /// Drop one member. Returns true if the squad emptied and was removed.
    pub fn remove_member(&mut self, id: u32, entity: Entity) -> bool {
        let Some(squad) = self.squads.get_mut(&id) else {
            return false;
        };
        let before = squad.members.len();
        squad.members.retain(|&m| m != entity);
        if squad.members.len() != before {
            squad.reform();
        }
        if squad.members.is_empty() {
            self.squads.remove(&id);
            debug!("squad {id} disbanded");
            return true;
        }
        false
    }

    /// Remove dead or despawned members from every roster. Returns the ids
    /// of squads that emptied and were removed.
    pub fn prune(&mut self, world: &World) -> Vec<u32> {
        let dead: Vec<(u32, Entity)> = self
            .squads
            .values()
            .flat_map(|squad| {
                squad
                    .members
                    .iter()
                    .filter(|&&m| !is_alive(world, m))
                    .map(move |&m| (squad.id, m))
            })
            .collect();
        dead.into_iter()
            .filter(|&(id, entity)| self.remove_member(id, entity))
            .map(|(id, _)| id)
            .collect()
    }
}

fn is_alive(world: &World, entity: Entity) -> bool {
    world
        .get::<&Health>(entity)
        .map(|health| health.alive)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use bastion_core::enums::EnemyType;
    use bastion_squad_ai::profiles::CollisionScale;

    use super::*;
    use crate::world_setup;

    fn kill(world: &mut World, entity: Entity) {
        world.get::<&mut Health>(entity).unwrap().alive = false;
    }

    #[test]
    fn test_prune_reforms_then_disbands() {
        let mut world = World::new();
        let members: Vec<Entity> = (0..4)
            .map(|i| {
                world_setup::spawn_enemy(
                    &mut world,
                    EnemyType::Scout,
                    Vec3::new(i as f32 * 5.0, 0.0, 100.0),
                    1.0,
                    None,
                    CollisionScale::default(),
                )
            })
            .collect();
        let mut squads = SquadRegistry::default();
        let id = squads.create(members.clone(), Vec3::ZERO, TargetChoice::Station);
        assert_eq!(squads.get(id).unwrap().shape, FormationShape::Wedge);

        kill(&mut world, members[1]);
        assert!(squads.prune(&world).is_empty());
        let squad = squads.get(id).unwrap();
        assert_eq!(squad.members, vec![members[0], members[2], members[3]]);
        assert_eq!(squad.offsets.len(), 3);
        assert_eq!(squad.shape, FormationShape::Vee);

        for &m in &members {
            kill(&mut world, m);
        }
        assert_eq!(squads.prune(&world), vec![id]);
        assert!(squads.is_empty());
    }

    #[test]
    fn test_remove_member_of_unknown_squad() {
        let mut world = World::new();
        let e = world.spawn(());
        let mut squads = SquadRegistry::default();
        assert!(!squads.remove_member(42, e));
    }
}
