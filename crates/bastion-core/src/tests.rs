use std::f32::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use glam::Vec3;

use crate::enums::*;
use crate::error::LedgerError;
use crate::events::EffectEvent;
use crate::state::GameStateSnapshot;
use crate::types::{wrap_angle_delta, yaw_to_direction, Position, SimTime, Velocity};

#[test]
fn test_bearing_zero_is_plus_z() {
    let origin = Position::default();
    assert_relative_eq!(origin.bearing_to(&Position::new(0.0, 0.0, 10.0)), 0.0);
    assert_relative_eq!(
        origin.bearing_to(&Position::new(10.0, 0.0, 0.0)),
        FRAC_PI_2,
        epsilon = 1e-6
    );
    // Vertical offset does not change the bearing.
    assert_relative_eq!(
        origin.bearing_to(&Position::new(10.0, 50.0, 0.0)),
        FRAC_PI_2,
        epsilon = 1e-6
    );
}

#[test]
fn test_yaw_round_trips_through_heading() {
    for yaw in [0.0_f32, 0.5, 2.0, 4.0, 6.0] {
        let v = Velocity(yaw_to_direction(yaw) * 7.0);
        assert_relative_eq!(v.heading(), yaw, epsilon = 1e-5);
        assert_relative_eq!(v.speed(), 7.0, epsilon = 1e-5);
    }
}

#[test]
fn test_wrap_angle_takes_shortest_path() {
    // 350° -> 10° is +20°, not -340°.
    let from = 350.0_f32.to_radians();
    let to = 10.0_f32.to_radians();
    assert_relative_eq!(wrap_angle_delta(from, to), 20.0_f32.to_radians(), epsilon = 1e-5);
    assert_relative_eq!(wrap_angle_delta(to, from), -20.0_f32.to_radians(), epsilon = 1e-5);
    let d = wrap_angle_delta(0.0, PI);
    assert!(d > 0.0 && (d - PI).abs() < 1e-5, "half-turn should resolve to +PI");
}

#[test]
fn test_sim_time_accumulates_variable_dt() {
    let mut t = SimTime::default();
    t.advance(0.016);
    t.advance(0.1);
    assert_eq!(t.tick, 2);
    assert!((t.elapsed_secs - 0.116).abs() < 1e-6);
}

#[test]
fn test_position_range_helpers() {
    let a = Position::new(1.0, 2.0, 3.0);
    let b = Position::new(4.0, 6.0, 3.0);
    assert_relative_eq!(a.range_to(&b), 5.0);
    assert_relative_eq!(a.range_sq_to(&b), 25.0);
    let mut c = a;
    *c += Vec3::X;
    assert_relative_eq!(c.x, 2.0);
}

#[test]
fn test_capital_classes() {
    let capitals: Vec<_> = EnemyType::ALL.iter().filter(|t| t.is_capital()).collect();
    assert_eq!(
        capitals,
        vec![&EnemyType::Frigate, &EnemyType::Destroyer, &EnemyType::Titan]
    );
    assert_eq!(TargetChoice::Player.flipped(), TargetChoice::Station);
    assert_eq!(TargetChoice::Station.flipped(), TargetChoice::Player);
}

#[test]
fn test_effect_events_are_tagged() {
    let json = serde_json::to_string(&EffectEvent::DamageFlash { amount: 4.0 }).unwrap();
    assert!(json.contains("\"type\":\"DamageFlash\""), "got {json}");
}

#[test]
fn test_default_snapshot_serializes() {
    let snap = GameStateSnapshot::default();
    let json = serde_json::to_string(&snap).unwrap();
    let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.phase, GamePhase::MainMenu);
    assert!(back.enemies.is_empty());
}

#[test]
fn test_ledger_error_messages() {
    let err = LedgerError::InsufficientResources {
        needed: 70,
        available: 12,
    };
    assert_eq!(err.to_string(), "insufficient resources: need 70, have 12");
    let err = LedgerError::MaxLevel {
        track: UpgradeTrack::Defense,
    };
    assert_eq!(err.to_string(), "defense track is already at max level");
}
