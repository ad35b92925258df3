//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use std::collections::BTreeMap;

use hecs::World;

use bastion_campaign::{sector_info, ProgressionLedger};
use bastion_core::components::*;
use bastion_core::enums::*;
use bastion_core::events::{Alert, EffectEvent, GameEvent};
use bastion_core::state::*;
use bastion_core::types::{Position, SimTime};

use crate::squads::SquadRegistry;

/// Build a complete GameStateSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    ledger: &ProgressionLedger,
    squads: &SquadRegistry,
    effects: Vec<EffectEvent>,
    events: Vec<GameEvent>,
    alerts: Vec<Alert>,
) -> GameStateSnapshot {
    let enemies = build_enemies(world);
    let enemy_counts = count_by_type(&enemies);

    GameStateSnapshot {
        time: *time,
        phase,
        sector: build_sector(ledger),
        player: build_player(world),
        station: build_station(world),
        progression: build_progression(ledger),
        enemies,
        enemy_counts,
        squads: build_squads(squads),
        asteroid_count: count_live::<Asteroid>(world),
        fragment_count: world
            .query::<&ResourceFragment>()
            .iter()
            .filter(|(_, f)| !f.collected && !f.lost)
            .count() as u32,
        effects,
        events,
        alerts,
    }
}

fn build_sector(ledger: &ProgressionLedger) -> SectorView {
    let info = sector_info(ledger.sector());
    SectorView {
        index: info.index,
        name: info.name.to_string(),
        difficulty: info.difficulty,
        threshold: info.threshold,
    }
}

fn build_player(world: &World) -> PlayerView {
    world
        .query::<(&PlayerShip, &Position, &Health)>()
        .iter()
        .next()
        .map(|(_, (ship, pos, health))| PlayerView {
            position: pos.0,
            facing: ship.facing,
            health: health.current,
            max_health: health.max,
            alive: health.alive,
        })
        .unwrap_or_default()
}

fn build_station(world: &World) -> StationView {
    let turret_count = world.query::<&Turret>().iter().count() as u32;
    world
        .query::<(&Station, &Health)>()
        .iter()
        .next()
        .map(|(_, (station, health))| StationView {
            health: health.current,
            max_health: health.max,
            level: station.level,
            turret_count,
        })
        .unwrap_or_default()
}

fn build_progression(ledger: &ProgressionLedger) -> ProgressionView {
    ProgressionView {
        resources: ledger.resources(),
        weapon_level: ledger.weapon_level(),
        station_level: ledger.station_level(),
        defense_level: ledger.defense_level(),
        next_weapon_cost: ledger.next_cost(UpgradeTrack::Weapon),
        next_station_cost: ledger.next_cost(UpgradeTrack::Station),
        next_defense_cost: ledger.next_cost(UpgradeTrack::Defense),
        missiles: ledger.missiles(),
        resource_multiplier: ledger.resource_multiplier(),
        hyperspace_ready: ledger.can_hyperspace(),
    }
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    world
        .query::<(&EnemyShip, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| health.alive)
        .map(|(_, (ship, pos, health))| EnemyView {
            kind: ship.kind,
            position: pos.0,
            health: health.current,
            max_health: health.max,
            squad: ship.squad,
        })
        .collect()
}

/// Live enemies per hull type, smallest class first.
fn count_by_type(enemies: &[EnemyView]) -> Vec<(EnemyType, u32)> {
    let mut counts: BTreeMap<EnemyType, u32> = BTreeMap::new();
    for enemy in enemies {
        *counts.entry(enemy.kind).or_default() += 1;
    }
    counts.into_iter().collect()
}

fn build_squads(squads: &SquadRegistry) -> Vec<SquadView> {
    squads
        .iter()
        .map(|squad| SquadView {
            id: squad.id,
            state: squad.state,
            target: squad.target,
            members: squad.members.len() as u32,
            formation_center: squad.formation_center,
        })
        .collect()
}

fn count_live<T: hecs::Component>(world: &World) -> u32 {
    world
        .query::<(&T, &Health)>()
        .iter()
        .filter(|(_, (_, health))| health.alive)
        .count() as u32
}
