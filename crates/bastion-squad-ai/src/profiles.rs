//! Hull-type capability profiles.
//!
//! Single source of truth for per-type enemy stats. Both combat systems and
//! presentation read from here instead of branching on type.

use bastion_core::constants::{COLLISION_RADIUS_MULTIPLIER, COLLISION_SIZE_EXPONENT};
use bastion_core::enums::EnemyType;

/// Behavioral and combat profile for an enemy hull type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub max_health: f32,
    /// Cruise speed (units/s).
    pub speed: f32,
    /// Size class, 1.0 = fighter.
    pub size: f32,
    /// Damage per projectile.
    pub damage: f32,
    /// Seconds between shots.
    pub fire_rate: f32,
    /// Maximum distance at which the ship opens fire.
    pub shoot_range: f32,
    /// Preferred standoff distance from the target.
    pub optimal_range: f32,
    /// 1.0 = perfect aim.
    pub accuracy: f32,
    pub projectile_speed: f32,
    /// Resources awarded on kill.
    pub resource_value: u32,
    /// Explosions in the death sequence (1 for non-capital hulls).
    pub death_explosions: u32,
    pub color: u32,
}

/// Get the profile for a hull type.
pub fn get_profile(kind: EnemyType) -> EnemyProfile {
    match kind {
        EnemyType::Scout => EnemyProfile {
            max_health: 20.0,
            speed: 26.0,
            size: 0.6,
            damage: 3.0,
            fire_rate: 0.9,
            shoot_range: 55.0,
            optimal_range: 35.0,
            accuracy: 0.55,
            projectile_speed: 60.0,
            resource_value: 5,
            death_explosions: 1,
            color: 0x99ff99,
        },
        EnemyType::Fighter => EnemyProfile {
            max_health: 40.0,
            speed: 20.0,
            size: 1.0,
            damage: 5.0,
            fire_rate: 1.0,
            shoot_range: 65.0,
            optimal_range: 40.0,
            accuracy: 0.65,
            projectile_speed: 65.0,
            resource_value: 10,
            death_explosions: 1,
            color: 0xff6666,
        },
        EnemyType::Interceptor => EnemyProfile {
            max_health: 35.0,
            speed: 30.0,
            size: 0.9,
            damage: 6.0,
            fire_rate: 0.7,
            shoot_range: 80.0,
            optimal_range: 55.0,
            accuracy: 0.75,
            projectile_speed: 80.0,
            resource_value: 14,
            death_explosions: 1,
            color: 0xffaa66,
        },
        EnemyType::Bomber => EnemyProfile {
            max_health: 90.0,
            speed: 12.0,
            size: 1.6,
            damage: 18.0,
            fire_rate: 2.2,
            shoot_range: 50.0,
            optimal_range: 30.0,
            accuracy: 0.6,
            projectile_speed: 45.0,
            resource_value: 20,
            death_explosions: 1,
            color: 0xcc66ff,
        },
        EnemyType::Gunship => EnemyProfile {
            max_health: 150.0,
            speed: 14.0,
            size: 2.0,
            damage: 9.0,
            fire_rate: 0.5,
            shoot_range: 70.0,
            optimal_range: 45.0,
            accuracy: 0.7,
            projectile_speed: 70.0,
            resource_value: 28,
            death_explosions: 1,
            color: 0xff3399,
        },
        EnemyType::Frigate => EnemyProfile {
            max_health: 320.0,
            speed: 10.0,
            size: 3.5,
            damage: 14.0,
            fire_rate: 0.8,
            shoot_range: 95.0,
            optimal_range: 70.0,
            accuracy: 0.75,
            projectile_speed: 70.0,
            resource_value: 55,
            death_explosions: 3,
            color: 0x6699ff,
        },
        EnemyType::Destroyer => EnemyProfile {
            max_health: 600.0,
            speed: 8.0,
            size: 5.0,
            damage: 20.0,
            fire_rate: 0.7,
            shoot_range: 110.0,
            optimal_range: 80.0,
            accuracy: 0.8,
            projectile_speed: 75.0,
            resource_value: 90,
            death_explosions: 5,
            color: 0x3366cc,
        },
        EnemyType::Titan => EnemyProfile {
            max_health: 1500.0,
            speed: 5.0,
            size: 8.0,
            damage: 32.0,
            fire_rate: 0.6,
            shoot_range: 130.0,
            optimal_range: 95.0,
            accuracy: 0.85,
            projectile_speed: 80.0,
            resource_value: 200,
            death_explosions: 8,
            color: 0xeeeeee,
        },
    }
}

/// Tunable constants for the collision radius scale law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionScale {
    pub multiplier: f32,
    pub exponent: f32,
}

impl Default for CollisionScale {
    fn default() -> Self {
        Self {
            multiplier: COLLISION_RADIUS_MULTIPLIER,
            exponent: COLLISION_SIZE_EXPONENT,
        }
    }
}

/// Collision radius for a size class: `size * (1 / size^exponent) * multiplier`.
///
/// Larger hulls grow sublinearly so capital ships do not swallow the space
/// around them.
pub fn collision_radius(size: f32, scale: CollisionScale) -> f32 {
    let size = size.max(0.01);
    size * size.powf(-scale.exponent) * scale.multiplier
}
