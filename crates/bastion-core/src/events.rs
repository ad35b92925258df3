//! Events emitted by the simulation for effects and UI feedback.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Fire-and-forget requests for the effects provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffectEvent {
    /// Projectile struck something.
    HitSpark {
        position: Vec3,
        color_a: u32,
        color_b: u32,
    },
    /// Something blew up.
    Explosion {
        position: Vec3,
        color: u32,
        size: f32,
    },
    /// Player hull took damage.
    DamageFlash { amount: f32 },
}

/// Gameplay notifications surfaced on the HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    EnemyDestroyed { kind: EnemyType, by: Owner },
    AsteroidDestroyed { crashed: bool, fragments: u32 },
    MissileLaunched,
    MissileExploded { hit: bool },
    Upgraded { track: UpgradeTrack, level: u32 },
    SectorAdvanced { sector: u32 },
    SquadFormed { squad_id: u32, size: u32 },
    SquadDisbanded { squad_id: u32 },
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
