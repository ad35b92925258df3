use bastion_core::constants::*;
use bastion_core::enums::{EnemyType, UpgradeTrack};
use bastion_core::error::LedgerError;

use crate::ledger::{scaled_floor, ProgressionLedger, ResourceTally, SectorOutcome};
use crate::sectors::{sector_info, SECTOR_COUNT};
use crate::wave_composer::{compose_wave, wave_interval};

fn rich_ledger() -> ProgressionLedger {
    ProgressionLedger::new(1_000_000, 0)
}

fn max_all(ledger: &mut ProgressionLedger, level: u32) {
    for track in [UpgradeTrack::Weapon, UpgradeTrack::Station, UpgradeTrack::Defense] {
        while ledger.level(track) < level {
            ledger.upgrade(track).unwrap();
        }
    }
}

// ---- Ledger ----

#[test]
fn test_fresh_ledger() {
    let ledger = ProgressionLedger::default();
    assert_eq!(ledger.resources(), STARTING_RESOURCES);
    assert_eq!(ledger.missiles(), STARTING_MISSILES);
    assert_eq!(ledger.weapon_level(), 1);
    assert_eq!(ledger.station_level(), 1);
    assert_eq!(ledger.defense_level(), 1);
    assert_eq!(ledger.sector(), 0);
    assert!(!ledger.can_hyperspace());
}

#[test]
fn test_first_weapon_upgrade_free_second_costs_70() {
    let mut ledger = ProgressionLedger::default();
    assert_eq!(ledger.next_cost(UpgradeTrack::Weapon), Some(0));
    assert_eq!(ledger.upgrade_weapon(), Ok(2));
    assert_eq!(ledger.resources(), 100);

    assert_eq!(ledger.next_cost(UpgradeTrack::Weapon), Some(70));
    assert_eq!(ledger.upgrade_weapon(), Ok(3));
    assert_eq!(ledger.resources(), 30);
}

#[test]
fn test_refused_upgrade_changes_nothing() {
    let mut ledger = ProgressionLedger::new(10, 0);
    let before = format!("{ledger:?}");
    let err = ledger.upgrade_station().unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientResources {
            needed: STATION_UPGRADE_BASE_COST,
            available: 10
        }
    );
    assert_eq!(format!("{ledger:?}"), before);
}

#[test]
fn test_track_costs_escalate_geometrically() {
    let mut ledger = rich_ledger();
    assert_eq!(ledger.next_cost(UpgradeTrack::Station), Some(100));
    ledger.upgrade_station().unwrap();
    assert_eq!(ledger.next_cost(UpgradeTrack::Station), Some(150));
    ledger.upgrade_station().unwrap();
    assert_eq!(ledger.next_cost(UpgradeTrack::Station), Some(225));

    assert_eq!(ledger.next_cost(UpgradeTrack::Defense), Some(80));
    ledger.upgrade_defense().unwrap();
    assert_eq!(ledger.next_cost(UpgradeTrack::Defense), Some(120));
    ledger.upgrade_defense().unwrap();
    assert_eq!(ledger.next_cost(UpgradeTrack::Defense), Some(180));
    ledger.upgrade_defense().unwrap();
    assert_eq!(ledger.next_cost(UpgradeTrack::Defense), Some(270));
}

#[test]
fn test_tracks_cap_at_max_level() {
    let mut ledger = rich_ledger();
    max_all(&mut ledger, MAX_TRACK_LEVEL);
    assert_eq!(ledger.next_cost(UpgradeTrack::Weapon), None);
    let resources = ledger.resources();
    assert_eq!(
        ledger.upgrade_defense(),
        Err(LedgerError::MaxLevel {
            track: UpgradeTrack::Defense
        })
    );
    assert_eq!(ledger.resources(), resources);
}

#[test]
fn test_combat_resources_multiplied_station_not() {
    let mut ledger = rich_ledger();
    while ledger.weapon_level() < 5 {
        ledger.upgrade_weapon().unwrap();
    }
    let start = ledger.resources();
    let credited = ledger.collect(ResourceTally {
        asteroid: 10,
        ..Default::default()
    });
    assert_eq!(credited, 17);

    let credited = ledger.collect(ResourceTally {
        station: 10,
        ..Default::default()
    });
    assert_eq!(credited, 10);
    assert_eq!(ledger.resources(), start + 27);
}

#[test]
fn test_fractional_combat_income_carries_across_collections() {
    let mut ledger = rich_ledger();
    while ledger.weapon_level() < 5 {
        ledger.upgrade_weapon().unwrap();
    }
    let start = ledger.resources();
    let credited: u64 = (0..5)
        .map(|_| {
            ledger.collect(ResourceTally {
                asteroid: FRAGMENT_VALUE as u64,
                ..Default::default()
            })
        })
        .sum();
    assert_eq!(credited, 17);
    assert_eq!(ledger.resources(), start + 17);
}

#[test]
fn test_single_fragment_keeps_bonus_in_carry() {
    let mut ledger = rich_ledger();
    ledger.upgrade_weapon().unwrap();
    // Level 2 multiplier is 1.3: 2.6 credits 2, the 0.6 waits.
    assert_eq!(
        ledger.collect(ResourceTally { asteroid: 2, ..Default::default() }),
        2
    );
    // 0.6 + 2.6 = 3.2 credits 3.
    assert_eq!(
        ledger.collect(ResourceTally { asteroid: 2, ..Default::default() }),
        3
    );
}

#[test]
fn test_scaled_floor_survives_float_error() {
    // 50 * 1.4 * 1.4 is 97.99999... in binary floating point.
    assert_eq!(scaled_floor(50, 1.4 * 1.4), 98);
    assert_eq!(scaled_floor(10, 1.75), 17);
    assert_eq!(scaled_floor(0, 2.5), 0);
}

#[test]
fn test_missile_inventory() {
    let mut ledger = ProgressionLedger::new(MISSILE_COST + 5, 0);
    assert_eq!(ledger.consume_missile(), Err(LedgerError::NoMissiles));
    assert_eq!(ledger.buy_missile(), Ok(1));
    assert_eq!(ledger.resources(), 5);
    assert!(matches!(
        ledger.buy_missile(),
        Err(LedgerError::InsufficientResources { .. })
    ));
    assert_eq!(ledger.consume_missile(), Ok(0));
}

#[test]
fn test_hyperspace_gated_by_lowest_track() {
    let mut ledger = rich_ledger();
    ledger.upgrade_weapon().unwrap();
    ledger.upgrade_weapon().unwrap();
    ledger.upgrade_station().unwrap();
    ledger.upgrade_station().unwrap();
    ledger.upgrade_defense().unwrap();
    assert_eq!(
        ledger.hyperspace(),
        Err(LedgerError::HyperspaceLocked {
            required: 3,
            lowest: 2
        })
    );
    ledger.upgrade_defense().unwrap();
    assert!(ledger.can_hyperspace());
    assert_eq!(ledger.hyperspace(), Ok(SectorOutcome::Advanced(1)));
    assert_eq!(ledger.difficulty(), 1.5);
    assert!(!ledger.can_hyperspace(), "sector 2 needs level 5");
}

#[test]
fn test_full_campaign_ends_in_victory() {
    let mut ledger = rich_ledger();
    for (i, &threshold) in SECTOR_THRESHOLDS.iter().enumerate() {
        max_all(&mut ledger, threshold);
        let outcome = ledger.hyperspace().unwrap();
        if i + 1 < SECTOR_THRESHOLDS.len() {
            assert_eq!(outcome, SectorOutcome::Advanced(i as u32 + 1));
        } else {
            assert_eq!(outcome, SectorOutcome::Victory);
        }
    }
    assert!(ledger.is_complete());
    assert_eq!(ledger.hyperspace(), Err(LedgerError::CampaignComplete));
}

// ---- Sectors ----

#[test]
fn test_sector_table() {
    assert_eq!(SECTOR_COUNT, 4);
    let first = sector_info(0);
    assert_eq!(first.difficulty, 1.0);
    assert_eq!(first.threshold, 3);
    assert!(first.capitals.is_empty());
    let last = sector_info(3);
    assert_eq!(last.difficulty, 2.5);
    assert!(last.capitals.contains(&EnemyType::Titan));
    assert_eq!(sector_info(99).index, 3);
}

// ---- Waves ----

#[test]
fn test_waves_grow() {
    let first = compose_wave(0, 1);
    assert_eq!(first.squads.len(), 1);
    assert_eq!(first.squads[0].len(), SQUAD_MIN_SIZE);
    let later = compose_wave(0, 9);
    assert!(later.enemy_count() > first.enemy_count());
    for squad in &later.squads {
        assert!(squad.len() <= SQUAD_MAX_SIZE);
    }
}

#[test]
fn test_waves_use_sector_roster() {
    for sector in 0..SECTOR_COUNT {
        let info = sector_info(sector);
        for wave in 1..12 {
            for squad in compose_wave(sector, wave).squads {
                for kind in squad {
                    assert!(
                        info.roster.contains(&kind) || info.capitals.contains(&kind),
                        "{kind:?} not in sector {sector}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_capital_leads_every_fourth_wave() {
    let wave = compose_wave(2, 4);
    assert!(wave.squads[0][0].is_capital());
    assert!(!compose_wave(2, 3).squads[0][0].is_capital());
    // The first sector has no capitals at all.
    assert!(compose_wave(0, 4)
        .squads
        .iter()
        .flatten()
        .all(|k| !k.is_capital()));
}

#[test]
fn test_wave_interval_shrinks_with_difficulty() {
    let easy = wave_interval(ENEMY_WAVE_INTERVAL_SECS, 1.0);
    let hard = wave_interval(ENEMY_WAVE_INTERVAL_SECS, 2.5);
    assert_eq!(easy, ENEMY_WAVE_INTERVAL_SECS);
    assert!(hard < easy);
}
