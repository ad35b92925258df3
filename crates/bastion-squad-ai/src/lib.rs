//! Squad AI for BASTION.
//!
//! Implements the squad tactical state machine, formation layouts,
//! the per-enemy range controller, and hull-type capability profiles.
//! Pure functions over plain data; no ECS dependency.

pub mod formation;
pub mod fsm;
pub mod profiles;
pub mod steering;

pub use bastion_core as core;
