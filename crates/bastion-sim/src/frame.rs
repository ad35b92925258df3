//! Per-tick timing and the output buffers systems write into.

use bastion_campaign::ResourceTally;
use bastion_core::events::{EffectEvent, GameEvent};

/// Timing for the tick being simulated.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Clamped delta (seconds).
    pub dt: f32,
    pub tick: u64,
    /// Simulated seconds at the start of this tick.
    pub now: f64,
}

/// Everything systems produce for the engine during one tick.
#[derive(Debug, Default)]
pub struct TickOutput {
    /// Effects to play at the end of this tick.
    pub effects: Vec<EffectEvent>,
    /// Effects to play later: (delay in seconds, effect).
    pub delayed: Vec<(f64, EffectEvent)>,
    pub events: Vec<GameEvent>,
    /// Resources collected this tick, before the weapon multiplier.
    pub tally: ResourceTally,
}

impl TickOutput {
    pub fn effect(&mut self, effect: EffectEvent) {
        self.effects.push(effect);
    }

    pub fn event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
