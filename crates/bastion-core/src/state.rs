//! Game state snapshot: the read-only view handed to the HUD each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, EffectEvent, GameEvent};
use crate::types::SimTime;

/// Complete HUD-visible state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub sector: SectorView,
    pub player: PlayerView,
    pub station: StationView,
    pub progression: ProgressionView,
    pub enemies: Vec<EnemyView>,
    /// Live enemy count per hull type (types with zero omitted).
    pub enemy_counts: Vec<(EnemyType, u32)>,
    pub squads: Vec<SquadView>,
    pub asteroid_count: u32,
    pub fragment_count: u32,
    pub effects: Vec<EffectEvent>,
    pub events: Vec<GameEvent>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectorView {
    /// 0-based sector index.
    pub index: u32,
    pub name: String,
    pub difficulty: f32,
    /// Track level required to leave this sector.
    pub threshold: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub facing: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationView {
    pub health: f32,
    pub max_health: f32,
    pub level: u32,
    pub turret_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressionView {
    pub resources: u64,
    pub weapon_level: u32,
    pub station_level: u32,
    pub defense_level: u32,
    /// `None` when the track is maxed.
    pub next_weapon_cost: Option<u64>,
    pub next_station_cost: Option<u64>,
    pub next_defense_cost: Option<u64>,
    pub missiles: u32,
    pub resource_multiplier: f64,
    pub hyperspace_ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub kind: EnemyType,
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub squad: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadView {
    pub id: u32,
    pub state: SquadState,
    pub target: TargetChoice,
    pub members: u32,
    pub formation_center: Vec3,
}
