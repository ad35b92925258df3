//! Collaborator interfaces the engine talks to, plus headless implementations.
//!
//! The engine never renders, plays effects, or reads devices itself. It is
//! handed boxed providers at construction and calls them from the
//! presentation and input steps of the tick.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use bastion_core::enums::VisualKind;
use bastion_core::error::DisposeError;
use bastion_core::events::EffectEvent;

/// Creates, moves and releases visual representations.
pub trait VisualProvider {
    /// Create a representation and return its handle.
    fn spawn(&mut self, kind: VisualKind, position: Vec3, scale: f32, color: u32) -> u64;

    /// Push the latest transform for a handle.
    fn update(&mut self, handle: u64, position: Vec3, facing: Vec3);

    /// Release a handle. Failures are logged by the caller and never halt a tick.
    fn dispose(&mut self, handle: u64) -> Result<(), DisposeError>;
}

/// Plays one-shot effects (sparks, explosions, damage flashes).
pub trait EffectsProvider {
    fn play(&mut self, effect: &EffectEvent);
}

/// Reports the current input state once per tick.
pub trait InputProvider {
    fn poll(&mut self) -> InputState;
}

/// Flight and trigger state for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// Desired movement direction; length above 1 is clamped.
    pub movement: Vec3,
    /// Aim direction. `None` keeps the current facing.
    pub aim: Option<Vec3>,
    /// Primary weapon trigger held.
    pub fire: bool,
    /// Missile trigger held. Launches on the rising edge.
    pub launch_missile: bool,
}

/// Handle bookkeeping without any rendering.
#[derive(Debug, Default)]
pub struct NullVisuals {
    next_handle: u64,
    live: BTreeSet<u64>,
}

impl NullVisuals {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl VisualProvider for NullVisuals {
    fn spawn(&mut self, _kind: VisualKind, _position: Vec3, _scale: f32, _color: u32) -> u64 {
        self.next_handle += 1;
        self.live.insert(self.next_handle);
        self.next_handle
    }

    fn update(&mut self, _handle: u64, _position: Vec3, _facing: Vec3) {}

    fn dispose(&mut self, handle: u64) -> Result<(), DisposeError> {
        if self.live.remove(&handle) {
            Ok(())
        } else {
            Err(DisposeError::UnknownHandle(handle))
        }
    }
}

/// Visual provider that shares its handle table so tests can inspect it
/// after the engine has taken ownership.
#[derive(Debug, Clone, Default)]
pub struct SharedVisuals {
    inner: Rc<RefCell<NullVisuals>>,
}

impl SharedVisuals {
    pub fn live_count(&self) -> usize {
        self.inner.borrow().live_count()
    }
}

impl VisualProvider for SharedVisuals {
    fn spawn(&mut self, kind: VisualKind, position: Vec3, scale: f32, color: u32) -> u64 {
        self.inner.borrow_mut().spawn(kind, position, scale, color)
    }

    fn update(&mut self, handle: u64, position: Vec3, facing: Vec3) {
        self.inner.borrow_mut().update(handle, position, facing);
    }

    fn dispose(&mut self, handle: u64) -> Result<(), DisposeError> {
        self.inner.borrow_mut().dispose(handle)
    }
}

#[derive(Debug, Default)]
pub struct NullEffects;

impl EffectsProvider for NullEffects {
    fn play(&mut self, _effect: &EffectEvent) {}
}

/// Keeps every effect it is asked to play.
#[derive(Debug, Clone, Default)]
pub struct RecordingEffects {
    played: Rc<RefCell<Vec<EffectEvent>>>,
}

impl RecordingEffects {
    pub fn played(&self) -> Vec<EffectEvent> {
        self.played.borrow().clone()
    }
}

impl EffectsProvider for RecordingEffects {
    fn play(&mut self, effect: &EffectEvent) {
        self.played.borrow_mut().push(*effect);
    }
}

/// Input whose state is set from outside (scripts, tests, the headless
/// autopilot). Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct SharedInput {
    state: Rc<RefCell<InputState>>,
}

impl SharedInput {
    pub fn set(&self, state: InputState) {
        *self.state.borrow_mut() = state;
    }

    pub fn get(&self) -> InputState {
        *self.state.borrow()
    }
}

impl InputProvider for SharedInput {
    fn poll(&mut self) -> InputState {
        self.get()
    }
}
