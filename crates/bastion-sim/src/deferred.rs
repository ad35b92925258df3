//! Time-ordered queue of effects to play in a later tick.
//!
//! Capital ship deaths schedule staggered explosions here. The queue is
//! drained once per tick, in (fire time, insertion order).

use bastion_core::events::EffectEvent;

#[derive(Debug, Clone)]
struct Scheduled {
    fire_at: f64,
    seq: u64,
    effect: EffectEvent,
}

#[derive(Debug, Default, Clone)]
pub struct DeferredEffects {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl DeferredEffects {
    pub fn schedule(&mut self, fire_at: f64, effect: EffectEvent) {
        self.pending.push(Scheduled {
            fire_at,
            seq: self.next_seq,
            effect,
        });
        self.next_seq += 1;
    }

    /// Remove and return every effect due at or before `now`.
    pub fn drain_due(&mut self, now: f64) -> Vec<EffectEvent> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.fire_at <= now);
        self.pending = rest;
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.effect).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn boom(size: f32) -> EffectEvent {
        EffectEvent::Explosion {
            position: Vec3::ZERO,
            color: 0,
            size,
        }
    }

    #[test]
    fn test_drains_only_due_effects_in_time_order() {
        let mut queue = DeferredEffects::default();
        queue.schedule(0.5, boom(2.0));
        queue.schedule(0.25, boom(1.0));
        queue.schedule(1.0, boom(3.0));

        assert!(queue.drain_due(0.1).is_empty());
        let due = queue.drain_due(0.6);
        assert_eq!(due, vec![boom(1.0), boom(2.0)]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain_due(5.0), vec![boom(3.0)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_same_time_keeps_insertion_order() {
        let mut queue = DeferredEffects::default();
        queue.schedule(1.0, boom(1.0));
        queue.schedule(1.0, boom(2.0));
        assert_eq!(queue.drain_due(1.0), vec![boom(1.0), boom(2.0)]);
    }
}
