//! Scripted pilot for headless runs: fight the nearest enemy, spend
//! resources on the weakest track, and jump as soon as the gate opens.

use glam::Vec3;

use bastion_core::commands::PlayerCommand;
use bastion_core::enums::{GamePhase, UpgradeTrack};
use bastion_core::state::GameStateSnapshot;
use bastion_core::constants::MISSILE_LOCK_RANGE;
use bastion_sim::providers::InputState;

#[derive(Debug, Default)]
pub struct Autopilot {
    /// Missile trigger held last tick; released every other tick so each
    /// press is a fresh edge.
    missile_held: bool,
}

impl Autopilot {
    /// Flight and trigger state for the next tick.
    pub fn steer(&mut self, snap: &GameStateSnapshot) -> InputState {
        let player = snap.player.position;
        let nearest = snap
            .enemies
            .iter()
            .map(|e| (e.position - player, e.position.distance(player)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((offset, distance)) = nearest else {
            // Drift back toward the station while the sector is quiet.
            self.missile_held = false;
            return InputState {
                movement: (-player).clamp_length_max(1.0) * 0.5,
                ..Default::default()
            };
        };

        let launch = !self.missile_held
            && snap.progression.missiles > 0
            && distance < MISSILE_LOCK_RANGE * 0.6;
        self.missile_held = launch;

        InputState {
            movement: Vec3::ZERO,
            aim: offset.try_normalize(),
            fire: true,
            launch_missile: launch,
        }
    }

    /// Purchases and jumps to queue after a tick.
    pub fn orders(&self, snap: &GameStateSnapshot) -> Vec<PlayerCommand> {
        if snap.phase != GamePhase::Active {
            return Vec::new();
        }
        let p = &snap.progression;
        if p.hyperspace_ready {
            return vec![PlayerCommand::Hyperspace];
        }

        let mut tracks = [
            (UpgradeTrack::Weapon, p.weapon_level, p.next_weapon_cost),
            (UpgradeTrack::Station, p.station_level, p.next_station_cost),
            (UpgradeTrack::Defense, p.defense_level, p.next_defense_cost),
        ];
        tracks.sort_by_key(|(_, level, cost)| (*level, cost.unwrap_or(u64::MAX)));

        match tracks.first() {
            Some((track, _, Some(cost))) if *cost <= p.resources => vec![match track {
                UpgradeTrack::Weapon => PlayerCommand::UpgradeWeapon,
                UpgradeTrack::Station => PlayerCommand::UpgradeStation,
                UpgradeTrack::Defense => PlayerCommand::UpgradeDefense,
            }],
            _ => Vec::new(),
        }
    }
}
