//! Runtime simulation configuration.
//!
//! [`SimConfig`] mirrors the tunables in `bastion_core::constants`. Every
//! field defaults to its compile-time constant, so a TOML file only needs to
//! name the values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bastion_core::constants::*;
use bastion_squad_ai::profiles::CollisionScale;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Collision radius scale law tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub radius_multiplier: f32,
    pub size_exponent: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            radius_multiplier: COLLISION_RADIUS_MULTIPLIER,
            size_exponent: COLLISION_SIZE_EXPONENT,
        }
    }
}

impl CollisionConfig {
    pub fn scale(&self) -> CollisionScale {
        CollisionScale {
            multiplier: self.radius_multiplier,
            exponent: self.size_exponent,
        }
    }
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and inputs give the same run.
    pub seed: u64,
    /// Frame deltas are clamped to this (seconds).
    pub max_dt: f32,

    // World bounds
    pub world_radius: f32,
    pub fragment_world_radius: f32,

    pub collision: CollisionConfig,

    // Asteroid field
    pub asteroid_count: u32,
    pub asteroid_respawn_secs: f32,

    // Enemy waves
    pub wave_interval_secs: f32,
    pub first_wave_delay_secs: f32,

    // Economy
    pub starting_resources: u64,
    pub starting_missiles: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_dt: MAX_DT,
            world_radius: WORLD_RADIUS,
            fragment_world_radius: FRAGMENT_LOST_RADIUS,
            collision: CollisionConfig::default(),
            asteroid_count: ASTEROID_TARGET_COUNT,
            asteroid_respawn_secs: ASTEROID_RESPAWN_INTERVAL,
            wave_interval_secs: ENEMY_WAVE_INTERVAL_SECS,
            first_wave_delay_secs: FIRST_WAVE_DELAY_SECS,
            starting_resources: STARTING_RESOURCES,
            starting_missiles: STARTING_MISSILES,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) TOML document over the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the tick contract.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_dt > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_dt must be positive, got {}",
                self.max_dt
            )));
        }
        for (name, value) in [
            ("world_radius", self.world_radius),
            ("fragment_world_radius", self.fragment_world_radius),
            ("collision.radius_multiplier", self.collision.radius_multiplier),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.wave_interval_secs <= 0.0 {
            return Err(ConfigError::Invalid(
                "wave_interval_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
