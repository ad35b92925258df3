//! Weapon catalog: level (1-10) to a fixed weapon configuration.
//!
//! The per-level ballistic numbers are a hand-tuned table. Weapon tiers
//! deliberately trade rate of fire for hit weight, so these values do not
//! follow a formula. Cost and resource multiplier are formula-derived.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Multi-shot burst parameters for burst-mode tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstConfig {
    /// Volleys per trigger pull.
    pub shots: u32,
    /// Seconds between volleys within the burst.
    pub delay: f32,
}

/// Immutable weapon configuration derived from a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub level: u32,
    /// Seconds between trigger cycles.
    pub fire_rate: f32,
    /// Projectiles per volley, fanned symmetrically.
    pub bullet_count: u32,
    pub bullet_speed: f32,
    /// Projectile collision radius.
    pub bullet_size: f32,
    pub damage: f32,
    /// Projectile lifetime (seconds).
    pub lifetime: f32,
    pub color: u32,
    /// Yaw between adjacent fanned projectiles (radians).
    pub spread_angle: f32,
    /// 0 = no splash.
    pub splash_radius: f32,
    /// Hits survived before the projectile dies. 0 = dies on first hit.
    pub penetration: u32,
    pub burst: Option<BurstConfig>,
    pub resource_multiplier: f64,
    /// Cost to buy the next level.
    pub upgrade_cost: u64,
}

struct TierRow {
    fire_rate: f32,
    bullet_count: u32,
    bullet_speed: f32,
    bullet_size: f32,
    damage: f32,
    lifetime: f32,
    color: u32,
    spread_angle: f32,
    splash_radius: f32,
    penetration: u32,
    burst: Option<BurstConfig>,
}

#[allow(clippy::too_many_arguments)]
const fn row(
    fire_rate: f32,
    bullet_count: u32,
    bullet_speed: f32,
    bullet_size: f32,
    damage: f32,
    lifetime: f32,
    color: u32,
    spread_angle: f32,
    splash_radius: f32,
    penetration: u32,
    burst: Option<BurstConfig>,
) -> TierRow {
    TierRow {
        fire_rate,
        bullet_count,
        bullet_speed,
        bullet_size,
        damage,
        lifetime,
        color,
        spread_angle,
        splash_radius,
        penetration,
        burst,
    }
}

#[rustfmt::skip]
const TIERS: [TierRow; 10] = [
    // rate  n   speed  size  dmg    life  color     spread splash pen burst
    row(0.30, 1,  80.0, 0.30,  10.0, 2.0, 0x00ffff, 0.00,  0.0,  0,  None), // pulse
    row(0.26, 2,  85.0, 0.30,   9.0, 2.0, 0x00ff99, 0.06,  0.0,  0,  None), // twin pulse
    row(0.24, 3,  90.0, 0.32,   9.0, 2.0, 0x66ff33, 0.08,  0.0,  0,  None), // scatter
    row(0.70, 1,  65.0, 0.70,  60.0, 2.6, 0xffaa00, 0.00,  4.0,  0,  None), // mortar
    row(0.16, 1, 125.0, 0.28,  18.0, 1.8, 0xff33ff, 0.00,  0.0,  2,  None), // needle
    row(0.50, 2, 110.0, 0.34,  25.0, 2.0, 0xffff33, 0.05,  0.0,  0,
        Some(BurstConfig { shots: 3, delay: 0.07 })),                      // triple burst
    row(0.22, 5, 100.0, 0.34,  12.0, 2.0, 0x33ffcc, 0.09,  0.0,  1,  None), // fan lance
    row(0.90, 1,  75.0, 0.90, 260.0, 2.8, 0xff5500, 0.00,  6.0,  0,  None), // siege shell
    row(0.45, 3, 130.0, 0.36,  22.0, 2.2, 0xaa66ff, 0.06,  2.5,  1,
        Some(BurstConfig { shots: 4, delay: 0.06 })),                      // storm
    row(0.12, 7, 140.0, 0.40,  24.0, 2.2, 0xffffff, 0.07,  3.0,  3,  None), // nova
];

/// Clamp any requested level into the catalog range.
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(1, MAX_WEAPON_LEVEL)
}

/// Weapon configuration for a level. Out-of-range levels clamp.
pub fn get_config(level: u32) -> WeaponConfig {
    let level = clamp_level(level);
    let tier = &TIERS[(level - 1) as usize];
    WeaponConfig {
        level,
        fire_rate: tier.fire_rate,
        bullet_count: tier.bullet_count,
        bullet_speed: tier.bullet_speed,
        bullet_size: tier.bullet_size,
        damage: tier.damage,
        lifetime: tier.lifetime,
        color: tier.color,
        spread_angle: tier.spread_angle,
        splash_radius: tier.splash_radius,
        penetration: tier.penetration,
        burst: tier.burst,
        resource_multiplier: resource_multiplier(level),
        upgrade_cost: upgrade_cost(level),
    }
}

/// Cost to upgrade away from `level`. Levels 0 and 1 upgrade for free.
pub fn upgrade_cost(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let exponent = (level.min(MAX_WEAPON_LEVEL) - 1) as i32;
    (WEAPON_BASE_COST * WEAPON_COST_MULT.powi(exponent) + FLOOR_EPSILON).floor() as u64
}

/// Combat resource multiplier: `1 + level * 0.15`, with the level capped at
/// the top tier. Level 0 is the unscaled baseline.
pub fn resource_multiplier(level: u32) -> f64 {
    1.0 + level.min(MAX_WEAPON_LEVEL) as f64 * WEAPON_RESOURCE_STEP
}

impl WeaponConfig {
    /// Seconds for one full trigger cycle including burst volleys.
    pub fn cycle_time(&self) -> f32 {
        match self.burst {
            Some(b) => self.fire_rate + b.shots.saturating_sub(1) as f32 * b.delay,
            None => self.fire_rate,
        }
    }

    /// Volleys per trigger cycle.
    pub fn volleys(&self) -> u32 {
        self.burst.map_or(1, |b| b.shots)
    }

    /// Rough sustained damage figure used for balancing checks.
    ///
    /// Penetration counts half a hit per extra target; splash adds a fifth of
    /// a hit per unit of radius.
    pub fn damage_potential(&self) -> f32 {
        let per_cycle = self.damage * self.bullet_count as f32 * self.volleys() as f32;
        let pen = 1.0 + self.penetration as f32 * 0.5;
        let splash = 1.0 + self.splash_radius / 5.0;
        per_cycle * pen * splash / self.cycle_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_cost_first_is_free() {
        assert_eq!(upgrade_cost(0), 0);
        assert_eq!(upgrade_cost(1), 0);
        assert_eq!(upgrade_cost(2), 70);
        assert_eq!(upgrade_cost(3), 98);
    }

    #[test]
    fn test_upgrade_cost_non_decreasing() {
        let mut prev = 0;
        for level in 1..=MAX_WEAPON_LEVEL {
            let cost = upgrade_cost(level);
            assert!(cost >= prev, "cost dropped at level {level}: {cost} < {prev}");
            prev = cost;
        }
    }

    #[test]
    fn test_resource_multiplier_linear() {
        assert!((resource_multiplier(5) - 1.75).abs() < 1e-12);
        assert!((resource_multiplier(10) - 2.5).abs() < 1e-12);
        assert!(resource_multiplier(11) <= resource_multiplier(10));
        assert_eq!(resource_multiplier(0), 1.0);
    }

    #[test]
    fn test_damage_potential_and_multiplier_monotonic() {
        let mut prev_potential = 0.0;
        let mut prev_mult = 0.0;
        for level in 1..=MAX_WEAPON_LEVEL {
            let cfg = get_config(level);
            assert!(
                cfg.damage_potential() >= prev_potential,
                "damage potential dropped at level {level}"
            );
            assert!(cfg.resource_multiplier >= prev_mult);
            prev_potential = cfg.damage_potential();
            prev_mult = cfg.resource_multiplier;
        }
    }

    #[test]
    fn test_out_of_range_levels_clamp() {
        assert_eq!(get_config(0), get_config(1));
        assert_eq!(get_config(42), get_config(10));
    }

    #[test]
    fn test_burst_tiers_have_longer_cycle() {
        let cfg = get_config(6);
        let burst = cfg.burst.expect("tier 6 is a burst weapon");
        assert_eq!(cfg.volleys(), burst.shots);
        assert!(cfg.cycle_time() > cfg.fire_rate);
    }
}
