//! Resource fragments: inverse-square attraction toward the player and the
//! station, collection, and loss at the world edge.

use glam::Vec3;
use hecs::World;

use bastion_core::components::{Health, PlayerShip, ResourceFragment, Station};
use bastion_core::constants::*;
use bastion_core::types::{Position, Velocity};

use crate::frame::{Frame, TickOutput};

/// Acceleration toward an attractor at `offset` (attractor minus fragment):
/// `k / r^2` along the offset, zero beyond the attraction range. `r` is
/// floored at the minimum distance so the term stays finite.
pub fn attraction_accel(offset: Vec3) -> Vec3 {
    let distance = offset.length();
    if distance > FRAGMENT_ATTRACTION_RANGE || distance < 1e-6 {
        return Vec3::ZERO;
    }
    let r = distance.max(FRAGMENT_MIN_ATTRACTION_DISTANCE);
    offset / distance * (FRAGMENT_ATTRACTION_CONSTANT / (r * r))
}

pub fn run(world: &mut World, frame: &Frame, fragment_world_radius: f32, out: &mut TickOutput) {
    let dt = frame.dt;
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

    let lost_sq = fragment_world_radius * fragment_world_radius;
    let drag = (1.0 - FRAGMENT_DRAG * dt).max(0.0);

    for (_entity, (fragment, pos, vel)) in
        world.query_mut::<(&mut ResourceFragment, &mut Position, &mut Velocity)>()
    {
        if fragment.collected || fragment.lost {
            continue;
        }

        let mut accel = Vec3::ZERO;
        if let Some(p) = player {
            accel += attraction_accel(p - pos.0);
        }
        if let Some(s) = station {
            accel += attraction_accel(s - pos.0);
        }
        vel.0 = ((vel.0 + accel * dt) * drag).clamp_length_max(FRAGMENT_MAX_SPEED);
        pos.0 += vel.0 * dt;

        let by_player = player.is_some_and(|p| pos.distance(p) < FRAGMENT_COLLECT_RADIUS_PLAYER);
        let by_station =
            station.is_some_and(|s| pos.distance(s) < FRAGMENT_COLLECT_RADIUS_STATION);
        if by_player || by_station {
            fragment.collected = true;
            out.tally.asteroid += fragment.value as u64;
        } else if pos.length_squared() > lost_sq {
            fragment.lost = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_inverse_square() {
        let near = attraction_accel(Vec3::new(10.0, 0.0, 0.0));
        let far = attraction_accel(Vec3::new(20.0, 0.0, 0.0));
        assert_relative_eq!(near.length(), FRAGMENT_ATTRACTION_CONSTANT / 100.0, epsilon = 1e-3);
        assert_relative_eq!(far.length() * 4.0, near.length(), epsilon = 1e-3);
        assert!(near.x > 0.0, "pulls toward the attractor");
    }

    #[test]
    fn test_no_attraction_out_of_range() {
        let accel = attraction_accel(Vec3::Z * (FRAGMENT_ATTRACTION_RANGE + 0.1));
        assert_eq!(accel, Vec3::ZERO);
    }

    #[test]
    fn test_distance_floor_caps_acceleration() {
        let close = attraction_accel(Vec3::X * 0.25);
        assert_relative_eq!(close.length(), FRAGMENT_ATTRACTION_CONSTANT, epsilon = 1e-2);
        assert_eq!(attraction_accel(Vec3::ZERO), Vec3::ZERO);
    }
}
