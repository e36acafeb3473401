//! One-shot timers on the simulation clock
//!
//! Timers fire when the tick counter reaches their due tick. Entries due on
//! the same tick fire in the order they were scheduled, so a run is fully
//! reproducible from its inputs.

use crate::consts::SIM_DT;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Remove the effect with this id
    ExpireEffect { id: u64 },
    /// Replace the dead creature with a fresh one
    Respawn,
    /// The hand's slap swing is over
    EndSwing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    due_tick: u64,
    seq: u64,
    timer: Timer,
}

/// Pending timers ordered by (due tick, insertion order)
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<Entry>,
    next_seq: u64,
}

/// Whole ticks needed for `secs` to elapse (at least one)
pub fn secs_to_ticks(secs: f32) -> u64 {
    // Small slack so 1.0 / SIM_DT does not round up to 61
    ((secs / SIM_DT) - 1e-3).ceil().max(1.0) as u64
}

impl Schedule {
    /// Schedule `timer` to fire `delay` seconds after `now_tick`
    pub fn after(&mut self, now_tick: u64, delay: f32, timer: Timer) -> u64 {
        let due_tick = now_tick + secs_to_ticks(delay);
        let seq = self.next_seq;
        self.next_seq += 1;

        let entry = Entry {
            due_tick,
            seq,
            timer,
        };
        let idx = self
            .entries
            .partition_point(|e| (e.due_tick, e.seq) <= (due_tick, seq));
        self.entries.insert(idx, entry);
        due_tick
    }

    /// Remove and return every timer due at or before `now_tick`
    pub fn drain_due(&mut self, now_tick: u64) -> Vec<Timer> {
        let split = self.entries.partition_point(|e| e.due_tick <= now_tick);
        self.entries.drain(..split).map(|e| e.timer).collect()
    }

    pub fn is_pending(&self, timer: Timer) -> bool {
        self.entries.iter().any(|e| e.timer == timer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
