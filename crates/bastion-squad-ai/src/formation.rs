//! Formation layouts.
//!
//! Offsets are expressed in a formation-local frame where -Z is "behind the
//! leader"; [`slot_position`] rotates them to face the squad's heading.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use bastion_core::constants::{FORMATION_CIRCLE_RADIUS, FORMATION_SPACING};
use bastion_core::enums::FormationShape;

/// Pick a formation shape for a roster size.
pub fn shape_for(size: usize) -> FormationShape {
    match size {
        0..=3 => FormationShape::Vee,
        4..=6 => FormationShape::Wedge,
        _ => FormationShape::Circle,
    }
}

/// Per-member offsets for a roster of `size`, in roster order.
pub fn compute_offsets(size: usize) -> Vec<Vec3> {
    match shape_for(size) {
        FormationShape::Vee => vee_offsets(size),
        FormationShape::Wedge => wedge_offsets(size),
        FormationShape::Circle => circle_offsets(size),
    }
}

/// Leader at the tip, then alternating left/right one row further back each pair.
fn vee_offsets(size: usize) -> Vec<Vec3> {
    (0..size)
        .map(|i| {
            if i == 0 {
                return Vec3::ZERO;
            }
            let row = i.div_ceil(2) as f32;
            let side = if i % 2 == 1 { -1.0 } else { 1.0 };
            Vec3::new(side * row * FORMATION_SPACING, 0.0, -row * FORMATION_SPACING)
        })
        .collect()
}

/// Row r holds r + 1 ships, centred, each row one spacing further back.
fn wedge_offsets(size: usize) -> Vec<Vec3> {
    let mut offsets = Vec::with_capacity(size);
    let mut row = 0usize;
    while offsets.len() < size {
        let in_row = (row + 1).min(size - offsets.len());
        let width = row as f32;
        for k in 0..in_row {
            let x = (k as f32 - width / 2.0) * FORMATION_SPACING;
            offsets.push(Vec3::new(x, 0.0, -(row as f32) * FORMATION_SPACING));
        }
        row += 1;
    }
    offsets
}

/// Evenly spaced by angle on a fixed radius.
fn circle_offsets(size: usize) -> Vec<Vec3> {
    (0..size)
        .map(|i| {
            let angle = i as f32 * TAU / size as f32;
            Vec3::new(
                angle.cos() * FORMATION_CIRCLE_RADIUS,
                0.0,
                angle.sin() * FORMATION_CIRCLE_RADIUS,
            )
        })
        .collect()
}

/// World position of a slot given the formation center and heading.
/// Heading is projected onto the horizontal plane; a degenerate heading
/// leaves offsets unrotated.
pub fn slot_position(center: Vec3, offset: Vec3, heading: Vec3) -> Vec3 {
    let flat = Vec3::new(heading.x, 0.0, heading.z);
    let rotation = match flat.try_normalize() {
        Some(dir) => Quat::from_rotation_y(dir.x.atan2(dir.z)),
        None => Quat::IDENTITY,
    };
    center + rotation * offset
}
