//! Simulation engine for BASTION.
//!
//! Owns the hecs ECS world, runs the managers in a fixed order each frame,
//! and produces GameStateSnapshots for the HUD.

pub mod ballistics;
pub mod config;
pub mod deferred;
pub mod engine;
pub mod frame;
pub mod guidance;
pub mod providers;
pub mod refs;
pub mod squads;
pub mod systems;
pub mod world_setup;

pub use bastion_core as core;
pub use config::{ConfigError, SimConfig};
pub use engine::SimulationEngine;
