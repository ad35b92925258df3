use serde::Serialize;

use bastion_core::constants::{DIFFICULTY_PER_SECTOR, SECTOR_NAMES, SECTOR_THRESHOLDS};
use bastion_core::enums::EnemyType;

pub const SECTOR_COUNT: u32 = SECTOR_THRESHOLDS.len() as u32;

/// Static description of a sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorInfo {
    pub index: u32,
    pub name: &'static str,
    /// Level every track must reach before jumping out.
    pub threshold: u32,
    /// Enemy health/damage/spawn scalar: `1 + index * 0.5`.
    pub difficulty: f32,
    /// Line hulls that make up ordinary squads.
    pub roster: &'static [EnemyType],
    /// Capital hulls that occasionally lead a squad.
    pub capitals: &'static [EnemyType],
}

const ROSTERS: [&[EnemyType]; 4] = [
    &[EnemyType::Scout, EnemyType::Fighter],
    &[
        EnemyType::Scout,
        EnemyType::Fighter,
        EnemyType::Interceptor,
        EnemyType::Bomber,
    ],
    &[
        EnemyType::Fighter,
        EnemyType::Interceptor,
        EnemyType::Bomber,
        EnemyType::Gunship,
    ],
    &[EnemyType::Interceptor, EnemyType::Bomber, EnemyType::Gunship],
];

const CAPITALS: [&[EnemyType]; 4] = [
    &[],
    &[EnemyType::Frigate],
    &[EnemyType::Frigate, EnemyType::Destroyer],
    &[EnemyType::Destroyer, EnemyType::Titan],
];

/// Look up a sector. Indices past the last sector clamp to it.
pub fn sector_info(index: u32) -> SectorInfo {
    let index = index.min(SECTOR_COUNT - 1);
    let i = index as usize;
    SectorInfo {
        index,
        name: SECTOR_NAMES[i],
        threshold: SECTOR_THRESHOLDS[i],
        difficulty: 1.0 + index as f32 * DIFFICULTY_PER_SECTOR,
        roster: ROSTERS[i],
        capitals: CAPITALS[i],
    }
}
