//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityRef;

/// Hull points and liveness. `alive` flips false in the tick the entity dies;
/// the entity itself is despawned by the end-of-tick sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub alive: bool,
}

/// Collision sphere radius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f32,
}

/// Burst in progress for burst-mode weapons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BurstState {
    /// Volleys left to fire.
    pub shots_remaining: u32,
    /// Countdown to the next volley.
    pub timer: f32,
}

/// Marks and drives the player's ship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    /// Unit aim direction.
    pub facing: Vec3,
    /// Outer weapon cooldown (seconds).
    pub cooldown: f32,
    pub burst: Option<BurstState>,
}

/// The defensible station at the origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub level: u32,
    /// Fractional generated resources not yet handed to the ledger.
    pub generation_carry: f64,
}

/// A station-mounted turret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    /// Mount index around the station.
    pub slot: u32,
    /// Current yaw (radians, 0 = +Z).
    pub yaw: f32,
    /// Max slew rate (rad/s).
    pub rotation_speed: f32,
    pub range: f32,
    pub damage: f32,
    pub fire_rate: f32,
    pub cooldown: f32,
    /// Current target, if any.
    pub target: Option<EntityRef>,
}

/// A drifting asteroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub radius: f32,
    pub mass: f32,
    /// Fragments released on a clean kill.
    pub fragment_count: u32,
    /// Spin rate (rad/s), cosmetic.
    pub spin: f32,
    /// Set when destroyed by a physical collision this tick.
    pub crashed: bool,
}

/// An AI enemy combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyShip {
    pub kind: EnemyType,
    pub target: TargetChoice,
    /// Size class used by the collision scale law.
    pub size: f32,
    pub damage: f32,
    pub shoot_cooldown: f32,
    /// +1 or -1 lateral strafe direction inside the deadzone.
    pub strafe_dir: f32,
    pub strafe_timer: f32,
    /// Owning squad id; the squad owns the roster.
    pub squad: Option<u32>,
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: Owner,
    pub damage: f32,
    pub radius: f32,
    pub color: u32,
    pub splash_radius: f32,
    pub penetration: u32,
    pub penetration_count: u32,
    pub age: f32,
    pub lifetime: f32,
    pub alive: bool,
    /// Targets already struck, so a penetrating round hits each at most once.
    pub struck: Vec<EntityRef>,
}

/// A guided missile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub lock: MissileLock,
    /// Weak target reference; liveness is checked every tick.
    pub target: Option<EntityRef>,
    pub turn_rate: f32,
    pub speed: f32,
    pub damage: f32,
    pub blast_radius: f32,
    pub age: f32,
    pub lifetime: f32,
}

/// A collectible resource fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceFragment {
    pub value: u32,
    pub collected: bool,
    pub lost: bool,
}

/// Visual representation bookkeeping. The handle is assigned by the
/// presentation pass the first time the entity is seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Renderable {
    pub kind: VisualKind,
    pub handle: Option<u64>,
    pub scale: f32,
    pub color: u32,
}
