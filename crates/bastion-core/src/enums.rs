//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which side fired a ballistic entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
    Turret,
}

/// Enemy hull classes, smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyType {
    /// Fast, fragile picket.
    Scout,
    /// Line fighter.
    Fighter,
    /// High-speed fighter with long guns.
    Interceptor,
    /// Slow heavy-hitter, prefers the station.
    Bomber,
    /// Armoured close-support craft.
    Gunship,
    /// Light capital ship.
    Frigate,
    /// Heavy capital ship.
    Destroyer,
    /// Flagship.
    Titan,
}

impl EnemyType {
    pub const ALL: [EnemyType; 8] = [
        EnemyType::Scout,
        EnemyType::Fighter,
        EnemyType::Interceptor,
        EnemyType::Bomber,
        EnemyType::Gunship,
        EnemyType::Frigate,
        EnemyType::Destroyer,
        EnemyType::Titan,
    ];

    /// Capital ships die in a staggered multi-explosion sequence.
    pub fn is_capital(self) -> bool {
        matches!(
            self,
            EnemyType::Frigate | EnemyType::Destroyer | EnemyType::Titan
        )
    }
}

/// Squad tactical state. The cycle has no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadState {
    /// Formation center closes on the target.
    #[default]
    Approaching,
    /// Formation broken, members fight independently.
    Engaging,
    /// Formation center falls back to the rally point.
    Retreating,
    /// Members tighten into formation at the rally point.
    Regrouping,
}

/// What an enemy (or a squad) is attacking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetChoice {
    #[default]
    Player,
    Station,
}

impl TargetChoice {
    pub fn flipped(self) -> Self {
        match self {
            TargetChoice::Player => TargetChoice::Station,
            TargetChoice::Station => TargetChoice::Player,
        }
    }
}

/// Formation shape, chosen from squad size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormationShape {
    /// Up to 3 members: leader plus alternating left/right trailing rows.
    Vee,
    /// 4-6 members: rows widening behind the leader.
    Wedge,
    /// 7+ members: evenly spaced ring.
    Circle,
}

/// Missile seeker state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissileLock {
    /// No target yet; narrow forward cone.
    #[default]
    Searching,
    /// Tracking a live target.
    Locked,
    /// Previous target died; searching with a widened cone.
    Reacquiring,
    /// Terminal.
    Exploded,
}

/// Progression tracks purchasable in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeTrack {
    Weapon,
    Station,
    Defense,
}

impl UpgradeTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Station => "station",
            Self::Defense => "defense",
        }
    }
}

impl std::fmt::Display for UpgradeTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collision category a ballistic resolver runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Asteroid,
    Enemy,
}

/// Kind of visual representation requested from the mesh provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualKind {
    PlayerShip,
    Station,
    Turret,
    Asteroid,
    Enemy(EnemyType),
    Projectile,
    Missile,
    Fragment,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    /// Player ship or station destroyed.
    GameOver,
    /// Hyperspace out of the final sector.
    Victory,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
