use log::debug;
use serde::{Deserialize, Serialize};

use bastion_core::constants::*;
use bastion_core::enums::UpgradeTrack;
use bastion_core::error::LedgerError;
use bastion_core::weapons;

use crate::sectors::{sector_info, SECTOR_COUNT};

/// Resources gathered by the managers since the last collection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTally {
    /// Fragments collected from asteroids.
    pub asteroid: u64,
    /// Kill bounties from enemies.
    pub enemy: u64,
    /// Passive station generation. Never multiplied.
    pub station: u64,
}

impl ResourceTally {
    pub fn is_empty(&self) -> bool {
        self.asteroid == 0 && self.enemy == 0 && self.station == 0
    }

    pub fn combat(&self) -> u64 {
        self.asteroid + self.enemy
    }
}

/// Result of a successful hyperspace jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectorOutcome {
    /// Now in the given 0-based sector.
    Advanced(u32),
    /// Jumped out of the final sector.
    Victory,
}

/// Resource accumulator and upgrade tracks.
///
/// Every purchase checks affordability before touching any field, so a
/// refused purchase leaves the ledger exactly as it was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionLedger {
    resources: u64,
    weapon_level: u32,
    station_level: u32,
    defense_level: u32,
    station_cost: u64,
    defense_cost: u64,
    missiles: u32,
    sector: u32,
    complete: bool,
    /// Fractional combat income not yet credited.
    #[serde(default)]
    combat_carry: f64,
}

impl Default for ProgressionLedger {
    fn default() -> Self {
        Self::new(STARTING_RESOURCES, STARTING_MISSILES)
    }
}

impl ProgressionLedger {
    pub fn new(resources: u64, missiles: u32) -> Self {
        Self {
            resources,
            weapon_level: 1,
            station_level: 1,
            defense_level: 1,
            station_cost: STATION_UPGRADE_BASE_COST,
            defense_cost: DEFENSE_UPGRADE_BASE_COST,
            missiles,
            sector: 0,
            complete: false,
            combat_carry: 0.0,
        }
    }

    pub fn resources(&self) -> u64 {
        self.resources
    }

    pub fn weapon_level(&self) -> u32 {
        self.weapon_level
    }

    pub fn station_level(&self) -> u32 {
        self.station_level
    }

    pub fn defense_level(&self) -> u32 {
        self.defense_level
    }

    pub fn missiles(&self) -> u32 {
        self.missiles
    }

    /// 0-based sector index.
    pub fn sector(&self) -> u32 {
        self.sector
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn level(&self, track: UpgradeTrack) -> u32 {
        match track {
            UpgradeTrack::Weapon => self.weapon_level,
            UpgradeTrack::Station => self.station_level,
            UpgradeTrack::Defense => self.defense_level,
        }
    }

    /// Price of the next purchase on a track, or `None` at max level.
    pub fn next_cost(&self, track: UpgradeTrack) -> Option<u64> {
        let (level, max) = match track {
            UpgradeTrack::Weapon => (self.weapon_level, MAX_WEAPON_LEVEL),
            UpgradeTrack::Station => (self.station_level, MAX_TRACK_LEVEL),
            UpgradeTrack::Defense => (self.defense_level, MAX_TRACK_LEVEL),
        };
        if level >= max {
            return None;
        }
        Some(match track {
            UpgradeTrack::Weapon => weapons::upgrade_cost(level),
            UpgradeTrack::Station => self.station_cost,
            UpgradeTrack::Defense => self.defense_cost,
        })
    }

    /// Combat resource multiplier from the current weapon tier.
    pub fn resource_multiplier(&self) -> f64 {
        weapons::resource_multiplier(self.weapon_level)
    }

    /// Enemy difficulty scalar for the current sector.
    pub fn difficulty(&self) -> f32 {
        sector_info(self.sector).difficulty
    }

    /// Credit one tick's worth of collected resources. Combat sources are
    /// scaled by the weapon multiplier, station generation is not.
    /// The fractional part of scaled combat income carries over between
    /// calls. Returns the amount credited.
    pub fn collect(&mut self, tally: ResourceTally) -> u64 {
        self.combat_carry += tally.combat() as f64 * self.resource_multiplier();
        let combat = (self.combat_carry + FLOOR_EPSILON).floor();
        self.combat_carry = (self.combat_carry - combat).max(0.0);
        let credited = combat as u64 + tally.station;
        self.resources += credited;
        credited
    }

    pub fn upgrade(&mut self, track: UpgradeTrack) -> Result<u32, LedgerError> {
        match track {
            UpgradeTrack::Weapon => self.upgrade_weapon(),
            UpgradeTrack::Station => self.upgrade_station(),
            UpgradeTrack::Defense => self.upgrade_defense(),
        }
    }

    /// Buy the next weapon tier. Returns the new level.
    pub fn upgrade_weapon(&mut self) -> Result<u32, LedgerError> {
        let cost = self.checked_cost(UpgradeTrack::Weapon)?;
        self.resources -= cost;
        self.weapon_level += 1;
        Ok(self.weapon_level)
    }

    /// Buy a station level. Cost escalates by 1.5x per purchase.
    pub fn upgrade_station(&mut self) -> Result<u32, LedgerError> {
        let cost = self.checked_cost(UpgradeTrack::Station)?;
        self.resources -= cost;
        self.station_level += 1;
        self.station_cost = escalate(self.station_cost);
        Ok(self.station_level)
    }

    /// Buy a defense level. Cost escalates by 1.5x per purchase.
    pub fn upgrade_defense(&mut self) -> Result<u32, LedgerError> {
        let cost = self.checked_cost(UpgradeTrack::Defense)?;
        self.resources -= cost;
        self.defense_level += 1;
        self.defense_cost = escalate(self.defense_cost);
        Ok(self.defense_level)
    }

    /// Buy one missile. Returns the new inventory count.
    pub fn buy_missile(&mut self) -> Result<u32, LedgerError> {
        self.afford(MISSILE_COST)?;
        self.resources -= MISSILE_COST;
        self.missiles += 1;
        Ok(self.missiles)
    }

    /// Take a missile out of inventory for launch.
    pub fn consume_missile(&mut self) -> Result<u32, LedgerError> {
        if self.missiles == 0 {
            debug!("missile launch refused: inventory empty");
            return Err(LedgerError::NoMissiles);
        }
        self.missiles -= 1;
        Ok(self.missiles)
    }

    /// Lowest level across the three tracks.
    pub fn lowest_track(&self) -> u32 {
        self.weapon_level
            .min(self.station_level)
            .min(self.defense_level)
    }

    pub fn can_hyperspace(&self) -> bool {
        !self.complete && self.lowest_track() >= sector_info(self.sector).threshold
    }

    /// Jump out of the current sector. Every track must be at or above the
    /// sector's threshold.
    pub fn hyperspace(&mut self) -> Result<SectorOutcome, LedgerError> {
        if self.complete {
            return Err(LedgerError::CampaignComplete);
        }
        let required = sector_info(self.sector).threshold;
        let lowest = self.lowest_track();
        if lowest < required {
            debug!("hyperspace refused: need {required}, lowest track {lowest}");
            return Err(LedgerError::HyperspaceLocked { required, lowest });
        }
        if self.sector + 1 >= SECTOR_COUNT {
            self.complete = true;
            return Ok(SectorOutcome::Victory);
        }
        self.sector += 1;
        Ok(SectorOutcome::Advanced(self.sector))
    }

    fn checked_cost(&self, track: UpgradeTrack) -> Result<u64, LedgerError> {
        let Some(cost) = self.next_cost(track) else {
            debug!("{track} upgrade refused: max level");
            return Err(LedgerError::MaxLevel { track });
        };
        self.afford(cost)?;
        Ok(cost)
    }

    fn afford(&self, cost: u64) -> Result<(), LedgerError> {
        if self.resources < cost {
            debug!("purchase refused: need {cost}, have {}", self.resources);
            return Err(LedgerError::InsufficientResources {
                needed: cost,
                available: self.resources,
            });
        }
        Ok(())
    }
}

/// `floor(amount * multiplier)` with an epsilon so exact products are not
/// floored down by float error.
pub fn scaled_floor(amount: u64, multiplier: f64) -> u64 {
    (amount as f64 * multiplier + FLOOR_EPSILON).floor() as u64
}

fn escalate(cost: u64) -> u64 {
    scaled_floor(cost, TRACK_COST_ESCALATION)
}
