//! Squad tactical state machine.
//!
//! Pure functions that compute state transitions and formation-center motion
//! for a squad. The cycle is closed:
//! Approaching -> Engaging -> Retreating -> Regrouping -> Approaching.
//! No ECS dependency; operates on plain data.

use glam::Vec3;

use bastion_core::constants::*;
use bastion_core::enums::SquadState;

/// Input to the squad FSM for a single squad.
pub struct SquadContext {
    pub state: SquadState,
    /// Seconds spent in the current state.
    pub elapsed_in_state: f32,
    pub formation_center: Vec3,
    pub rally_point: Vec3,
    /// Position of the squad's current target (player or station).
    pub target: Vec3,
    /// Centroid of live members, if any.
    pub member_centroid: Option<Vec3>,
    pub dt: f32,
}

/// Output from the squad FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquadUpdate {
    pub new_state: SquadState,
    pub formation_center: Vec3,
    pub rally_point: Vec3,
    pub state_changed: bool,
}

/// Evaluate the FSM for one squad for one tick.
pub fn evaluate(ctx: &SquadContext) -> SquadUpdate {
    match ctx.state {
        SquadState::Approaching => evaluate_approaching(ctx),
        SquadState::Engaging => evaluate_engaging(ctx),
        SquadState::Retreating => evaluate_retreating(ctx),
        SquadState::Regrouping => evaluate_regrouping(ctx),
    }
}

fn evaluate_approaching(ctx: &SquadContext) -> SquadUpdate {
    let center = move_toward(
        ctx.formation_center,
        ctx.target,
        SQUAD_APPROACH_SPEED * ctx.dt,
    );

    if center.distance(ctx.target) <= SQUAD_ENGAGE_RANGE {
        return changed(SquadState::Engaging, center, ctx.rally_point);
    }

    unchanged(ctx, center, ctx.rally_point)
}

fn evaluate_engaging(ctx: &SquadContext) -> SquadUpdate {
    // Members fight independently; the center follows them so the retreat
    // starts from where the fight actually is.
    let center = ctx.member_centroid.unwrap_or(ctx.formation_center);

    if ctx.elapsed_in_state >= SQUAD_ENGAGE_DURATION {
        let rally = rally_point_for(center, ctx.target);
        return changed(SquadState::Retreating, center, rally);
    }

    unchanged(ctx, center, ctx.rally_point)
}

fn evaluate_retreating(ctx: &SquadContext) -> SquadUpdate {
    let center = move_toward(
        ctx.formation_center,
        ctx.rally_point,
        SQUAD_RETREAT_SPEED * ctx.dt,
    );

    if ctx.elapsed_in_state >= SQUAD_RETREAT_DURATION {
        return changed(SquadState::Regrouping, center, ctx.rally_point);
    }

    unchanged(ctx, center, ctx.rally_point)
}

fn evaluate_regrouping(ctx: &SquadContext) -> SquadUpdate {
    let center = move_toward(
        ctx.formation_center,
        ctx.rally_point,
        SQUAD_RETREAT_SPEED * ctx.dt,
    );

    if ctx.elapsed_in_state >= SQUAD_REGROUP_DURATION {
        return changed(SquadState::Approaching, center, ctx.rally_point);
    }

    unchanged(ctx, center, ctx.rally_point)
}

/// Rally point `SQUAD_RALLY_DISTANCE` from the target along the away vector.
pub fn rally_point_for(center: Vec3, target: Vec3) -> Vec3 {
    let away = (center - target).try_normalize().unwrap_or(Vec3::Z);
    target + away * SQUAD_RALLY_DISTANCE
}

/// Slot-seeking gain for members in a state. `None` means members
/// steer independently with the range controller.
pub fn formation_gain(state: SquadState) -> Option<f32> {
    match state {
        SquadState::Engaging => None,
        SquadState::Retreating => Some(FORMATION_LOOSE_GAIN),
        SquadState::Approaching | SquadState::Regrouping => Some(FORMATION_TIGHT_GAIN),
    }
}

/// Whether a squad should switch target this tick, given a uniform roll in [0, 1).
/// Engaging squads never switch.
pub fn should_flip_target(state: SquadState, roll: f64) -> bool {
    state != SquadState::Engaging && roll < SQUAD_TARGET_FLIP_CHANCE
}

fn move_toward(from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= max_step || dist < 1e-6 {
        to
    } else {
        from + delta / dist * max_step
    }
}

fn changed(state: SquadState, center: Vec3, rally: Vec3) -> SquadUpdate {
    SquadUpdate {
        new_state: state,
        formation_center: center,
        rally_point: rally,
        state_changed: true,
    }
}

fn unchanged(ctx: &SquadContext, center: Vec3, rally: Vec3) -> SquadUpdate {
    SquadUpdate {
        new_state: ctx.state,
        formation_center: center,
        rally_point: rally,
        state_changed: false,
    }
}
