//! Per-tick systems over the simulation world.
//!
//! Systems are plain functions taking `&mut World` plus whatever engine
//! state they need. Anything they produce for the engine (effects, events,
//! collected resources) goes into the tick's `TickOutput`.

pub mod asteroids;
pub mod cleanup;
pub mod enemies;
pub mod fragments;
pub mod missiles;
pub mod player;
pub mod presentation;
pub mod snapshot;
pub mod station;
pub mod wave_spawner;
