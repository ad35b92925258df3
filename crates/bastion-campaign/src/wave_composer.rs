use serde::Serialize;

use bastion_core::constants::{ENEMY_WAVE_INTERVAL_SECS, SQUAD_MAX_SIZE, SQUAD_MIN_SIZE};
use bastion_core::enums::EnemyType;

use crate::sectors::sector_info;

/// Every Nth wave in a sector with capitals is led by one.
pub const CAPITAL_WAVE_EVERY: u32 = 4;

/// Squads to spawn for one wave.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveDefinition {
    /// One roster per squad, leader first.
    pub squads: Vec<Vec<EnemyType>>,
}

impl WaveDefinition {
    pub fn enemy_count(&self) -> usize {
        self.squads.iter().map(Vec::len).sum()
    }
}

/// Compose wave `wave_number` (1-based) for a sector.
/// Later waves field more and larger squads; hulls rotate through the
/// sector roster so every type shows up.
pub fn compose_wave(sector: u32, wave_number: u32) -> WaveDefinition {
    let info = sector_info(sector);
    let wave = wave_number.max(1);
    let squad_count = (1 + (wave - 1) / 3).min(3) as usize;
    let base_size = SQUAD_MIN_SIZE + ((wave - 1) / 2 + info.index) as usize;

    let mut squads = Vec::with_capacity(squad_count);
    for s in 0..squad_count {
        let size = (base_size + s).clamp(SQUAD_MIN_SIZE, SQUAD_MAX_SIZE);
        let mut members = Vec::with_capacity(size);

        let capital_wave = !info.capitals.is_empty() && wave % CAPITAL_WAVE_EVERY == 0;
        if capital_wave && s == 0 {
            let pick = (wave / CAPITAL_WAVE_EVERY - 1) as usize % info.capitals.len();
            members.push(info.capitals[pick]);
        }

        let offset = wave as usize + s * 2;
        while members.len() < size {
            let pick = (offset + members.len()) % info.roster.len();
            members.push(info.roster[pick]);
        }
        squads.push(members);
    }

    WaveDefinition { squads }
}

/// Seconds between waves at a difficulty scalar.
pub fn wave_interval(base_secs: f32, difficulty: f32) -> f32 {
    (base_secs / difficulty.max(1.0)).max(ENEMY_WAVE_INTERVAL_SECS * 0.25)
}
