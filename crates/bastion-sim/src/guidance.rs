//! Guidance math for player missiles.
//!
//! Target acquisition scoring, iterative intercept prediction, and
//! turn-rate-limited heading steering. Pure functions on glam vectors.

use glam::{Quat, Vec3};

use bastion_core::constants::*;
use bastion_core::types::EntityRef;

/// A candidate the seeker can see.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub id: EntityRef,
    pub position: Vec3,
}

/// Score a candidate for acquisition, or `None` if it is outside the lock
/// range or the cone. Higher is better: `0.6 * alignment + 0.4 * proximity`.
pub fn acquisition_score(
    missile_pos: Vec3,
    heading: Vec3,
    candidate: Vec3,
    cone: f32,
    range: f32,
) -> Option<f32> {
    let to_target = candidate - missile_pos;
    let distance = to_target.length();
    if distance > range {
        return None;
    }
    let alignment = match to_target.try_normalize() {
        Some(dir) => heading.dot(dir),
        None => 1.0,
    };
    if alignment < cone.cos() {
        return None;
    }
    let proximity = 1.0 - distance / range;
    Some(MISSILE_ALIGNMENT_WEIGHT * alignment + MISSILE_PROXIMITY_WEIGHT * proximity)
}

/// Pick the best-scoring candidate inside the cone. Ties keep the earlier one.
pub fn acquire(
    missile_pos: Vec3,
    heading: Vec3,
    candidates: &[Candidate],
    cone: f32,
    range: f32,
) -> Option<EntityRef> {
    let mut best: Option<(EntityRef, f32)> = None;
    for c in candidates {
        let Some(score) = acquisition_score(missile_pos, heading, c.position, cone, range) else {
            continue;
        };
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((c.id, score));
        }
    }
    best.map(|(id, _)| id)
}

/// Predicted intercept point after `INTERCEPT_ITERATIONS` fixed-point
/// refinements of time-to-impact.
pub fn intercept_point(missile_pos: Vec3, speed: f32, target_pos: Vec3, target_vel: Vec3) -> Vec3 {
    if speed <= 0.0 {
        return target_pos;
    }
    let mut tti = missile_pos.distance(target_pos) / speed;
    for _ in 0..INTERCEPT_ITERATIONS {
        let predicted = target_pos + target_vel * tti;
        tti = missile_pos.distance(predicted) / speed;
    }
    target_pos + target_vel * tti
}

/// Turn `heading` toward `desired` by at most `turn_rate * dt * fraction`,
/// where the fraction grows with heading error: small corrections use a
/// share of the turn rate, errors of 45° or more use all of it.
/// Both inputs are unit vectors; the result is a unit vector.
pub fn steer(heading: Vec3, desired: Vec3, turn_rate: f32, dt: f32) -> Vec3 {
    let error = heading.angle_between(desired);
    if !error.is_finite() || error < 1e-5 {
        return desired;
    }
    let fraction = (error / PN_FULL_TURN_ERROR).clamp(PN_MIN_TURN_FRACTION, 1.0);
    let max_turn = turn_rate * dt * fraction;
    if error <= max_turn {
        return desired;
    }
    let axis = heading
        .cross(desired)
        .try_normalize()
        .unwrap_or_else(|| heading.any_orthonormal_vector());
    (Quat::from_axis_angle(axis, max_turn) * heading).normalize()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn candidate(id: u64, position: Vec3) -> Candidate {
        Candidate {
            id: EntityRef(id),
            position,
        }
    }

    #[test]
    fn test_acquire_respects_cone() {
        // 45° off boresight: outside the 30° lock cone, inside the 75° reacquire cone.
        let off_axis = Vec3::new(50.0, 0.0, 50.0);
        let cands = [candidate(1, off_axis)];
        assert_eq!(
            acquire(Vec3::ZERO, Vec3::Z, &cands, MISSILE_LOCK_CONE, MISSILE_LOCK_RANGE),
            None
        );
        assert_eq!(
            acquire(Vec3::ZERO, Vec3::Z, &cands, MISSILE_REACQUIRE_CONE, MISSILE_LOCK_RANGE),
            Some(EntityRef(1))
        );
    }

    #[test]
    fn test_acquire_respects_range() {
        let cands = [candidate(1, Vec3::Z * (MISSILE_LOCK_RANGE + 1.0))];
        assert_eq!(
            acquire(Vec3::ZERO, Vec3::Z, &cands, MISSILE_LOCK_CONE, MISSILE_LOCK_RANGE),
            None
        );
    }

    #[test]
    fn test_acquire_prefers_aligned_and_close() {
        let cands = [
            candidate(1, Vec3::new(20.0, 0.0, 60.0)),
            candidate(2, Vec3::new(0.0, 0.0, 40.0)),
            candidate(3, Vec3::new(0.0, 0.0, 140.0)),
        ];
        assert_eq!(
            acquire(Vec3::ZERO, Vec3::Z, &cands, MISSILE_LOCK_CONE, MISSILE_LOCK_RANGE),
            Some(EntityRef(2))
        );
    }

    #[test]
    fn test_intercept_leads_crossing_target() {
        let target = Vec3::new(0.0, 0.0, 100.0);
        let target_vel = Vec3::new(10.0, 0.0, 0.0);
        let pip = intercept_point(Vec3::ZERO, MISSILE_SPEED, target, target_vel);
        assert!(pip.x > 0.0, "intercept should lead the target");
        // Time to reach the point matches the target's time to get there.
        let t_missile = pip.length() / MISSILE_SPEED;
        let t_target = (pip.x - target.x) / target_vel.x;
        assert_relative_eq!(t_missile, t_target, epsilon = 0.01);
    }

    #[test]
    fn test_intercept_of_stationary_target_is_target() {
        let target = Vec3::new(3.0, 4.0, 5.0);
        assert_eq!(intercept_point(Vec3::ZERO, 60.0, target, Vec3::ZERO), target);
    }

    #[test]
    fn test_steer_limited_by_turn_rate() {
        let next = steer(Vec3::Z, Vec3::X, MISSILE_TURN_RATE, DT);
        let turned = Vec3::Z.angle_between(next);
        // 90° error: full turn rate applies.
        assert_relative_eq!(turned, MISSILE_TURN_RATE * DT, epsilon = 1e-4);
        assert_relative_eq!(next.length(), 1.0, epsilon = 1e-5);
        assert!(next.x > 0.0);
    }

    #[test]
    fn test_steer_small_error_uses_reduced_fraction() {
        let desired = Quat::from_rotation_y(0.2) * Vec3::Z;
        let next = steer(Vec3::Z, desired, 10.0, 0.01);
        let turned = Vec3::Z.angle_between(next);
        let fraction = (0.2 / PN_FULL_TURN_ERROR).max(PN_MIN_TURN_FRACTION);
        assert_relative_eq!(turned, 10.0 * 0.01 * fraction, epsilon = 1e-4);
    }

    #[test]
    fn test_steer_snaps_when_within_limit() {
        let desired = Quat::from_rotation_y(0.001) * Vec3::Z;
        assert_eq!(steer(Vec3::Z, desired, MISSILE_TURN_RATE, DT), desired);
    }

    #[test]
    fn test_steer_converges_on_target() {
        // Fly a missile at a stationary point behind it; it must come around.
        let mut pos = Vec3::ZERO;
        let mut heading = Vec3::Z;
        let target = Vec3::new(0.0, 0.0, -80.0);
        let mut min_range = f32::MAX;
        for _ in 0..600 {
            let desired = (target - pos).normalize();
            heading = steer(heading, desired, MISSILE_TURN_RATE, DT);
            pos += heading * MISSILE_SPEED * DT;
            min_range = min_range.min(pos.distance(target));
            if min_range < 1.0 {
                break;
            }
        }
        assert!(min_range < 2.0, "missile never closed: {min_range:.1}");
    }
}
