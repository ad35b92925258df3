//! Fundamental geometric and simulation types.
//!
//! Coordinates are right-handed with +Y up. The XZ plane is the
//! "horizontal" plane used for bearings and strafing.

use std::ops::{Deref, DerefMut};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Position in world space (units).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec3);

/// Velocity in world space (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec3);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Straight-line distance to another position.
    pub fn range_to(&self, other: &Position) -> f32 {
        self.0.distance(other.0)
    }

    /// Squared distance, for cheap comparisons.
    pub fn range_sq_to(&self, other: &Position) -> f32 {
        self.0.distance_squared(other.0)
    }

    /// Distance from the world origin.
    pub fn radius(&self) -> f32 {
        self.0.length()
    }

    /// Yaw bearing to another position in radians (0 = +Z, positive toward +X),
    /// normalised to [0, TAU).
    pub fn bearing_to(&self, other: &Position) -> f32 {
        let d = other.0 - self.0;
        d.x.atan2(d.z).rem_euclid(std::f32::consts::TAU)
    }
}

impl Velocity {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Speed magnitude.
    pub fn speed(&self) -> f32 {
        self.0.length()
    }

    /// Yaw heading in radians (0 = +Z).
    pub fn heading(&self) -> f32 {
        self.0.x.atan2(self.0.z).rem_euclid(std::f32::consts::TAU)
    }
}

impl Deref for Position {
    type Target = Vec3;

    fn deref(&self) -> &Vec3 {
        &self.0
    }
}

impl DerefMut for Position {
    fn deref_mut(&mut self) -> &mut Vec3 {
        &mut self.0
    }
}

impl Deref for Velocity {
    type Target = Vec3;

    fn deref(&self) -> &Vec3 {
        &self.0
    }
}

impl DerefMut for Velocity {
    fn deref_mut(&mut self) -> &mut Vec3 {
        &mut self.0
    }
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl From<Vec3> for Velocity {
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}

/// Unit vector for a yaw angle on the horizontal plane.
pub fn yaw_to_direction(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Signed shortest angular difference `to - from`, wrapped into (-PI, PI].
pub fn wrap_angle_delta(from: f32, to: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let d = (to - from + PI).rem_euclid(TAU) - PI;
    if d <= -PI {
        d + TAU
    } else {
        d
    }
}

/// Serializable, generation-tagged reference to an ECS entity.
///
/// Holds the raw id bits of the runtime's entity handle. A stale reference
/// never aliases a newer entity in the same slot, so holders resolve it
/// through the world each tick and treat a failed lookup as "target gone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef(pub u64);
