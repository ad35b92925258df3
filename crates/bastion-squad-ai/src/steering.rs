//! Per-ship steering: the three-zone range controller, formation slot
//! seeking, turret slewing, and aim perturbation.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use bastion_core::constants::*;
use bastion_core::types::wrap_angle_delta;

/// Which band of the range controller a ship is in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeZone {
    /// Within the deadzone: slow lateral strafe.
    Strafe,
    /// Too far: close in. Carries the speed multiplier in (0, 1].
    Approach(f32),
    /// Too close: back off. Carries the speed multiplier in (0, 1].
    Retreat(f32),
}

/// Classify a range error (`current - optimal`).
///
/// The deadzone keeps a ship sitting near its optimal range from flipping
/// between approach and retreat every tick.
pub fn classify_range(distance_error: f32) -> RangeZone {
    if distance_error.abs() <= ENEMY_RANGE_DEADZONE {
        RangeZone::Strafe
    } else if distance_error > 0.0 {
        RangeZone::Approach((distance_error / ENEMY_FULL_SPEED_ERROR).min(1.0))
    } else {
        RangeZone::Retreat((-distance_error / ENEMY_FULL_SPEED_ERROR).min(1.0))
    }
}

/// Input to the range controller.
pub struct RangeContext {
    pub position: Vec3,
    pub target: Vec3,
    pub optimal_range: f32,
    pub speed: f32,
    /// +1 or -1.
    pub strafe_dir: f32,
}

/// Desired velocity from the three-zone controller.
pub fn range_keeping_velocity(ctx: &RangeContext) -> Vec3 {
    let to_target = ctx.target - ctx.position;
    let distance = to_target.length();
    let Some(dir) = to_target.try_normalize() else {
        return Vec3::ZERO;
    };

    match classify_range(distance - ctx.optimal_range) {
        RangeZone::Strafe => {
            let lateral = dir.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
            lateral * ctx.strafe_dir * ctx.speed * ENEMY_STRAFE_SPEED_FACTOR
        }
        RangeZone::Approach(factor) => dir * ctx.speed * factor,
        RangeZone::Retreat(factor) => -dir * ctx.speed * factor,
    }
}

/// Velocity toward a formation slot, slowing on arrival.
pub fn slot_seek_velocity(position: Vec3, slot: Vec3, speed: f32, gain: f32) -> Vec3 {
    let to_slot = slot - position;
    let dist = to_slot.length();
    if dist < 0.25 {
        return Vec3::ZERO;
    }
    // Arrive: ramp speed down inside one second of travel.
    let max_speed = speed * gain;
    to_slot / dist * max_speed.min(dist)
}

/// Step a yaw toward a desired yaw by at most `max_rate * dt`, taking the
/// shortest way around. Result is normalised to [0, TAU).
pub fn step_yaw(current: f32, desired: f32, max_rate: f32, dt: f32) -> f32 {
    let delta = wrap_angle_delta(current, desired);
    let max_step = max_rate * dt;
    (current + delta.clamp(-max_step, max_step)).rem_euclid(TAU)
}

/// Random aim error for a shooter with the given accuracy.
/// Spread is `1 - accuracy`; returns a unit direction.
pub fn perturb_aim<R: Rng>(dir: Vec3, accuracy: f32, rng: &mut R) -> Vec3 {
    let spread = (1.0 - accuracy).clamp(0.0, 1.0);
    if spread <= 0.0 {
        return dir;
    }
    let jitter = Vec3::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-0.5..=0.5),
        rng.gen_range(-1.0..=1.0),
    ) * spread
        * 0.5;
    (dir + jitter).try_normalize().unwrap_or(dir)
}

/// Reroll strafe direction: +1 or -1.
pub fn roll_strafe_dir<R: Rng>(rng: &mut R) -> f32 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}
