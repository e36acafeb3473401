//! Game state and core simulation types
//!
//! The simulation owns exactly one creature at a time. Consumers only ever
//! see copies of it through [`CreatureSnapshot`].

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pointer::{HandPose, PointerState};
use super::schedule::Schedule;
use crate::consts::*;
use crate::tuning::Tuning;

/// Screen rectangle the creature lives in, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        // Hosts report 0 before layout; keep the fallback in that case
        Self {
            width: if width > 0.0 { width } else { DEFAULT_VIEWPORT_WIDTH },
            height: if height > 0.0 { height } else { DEFAULT_VIEWPORT_HEIGHT },
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y)
    }
}

/// The single live creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Reassigned on every respawn
    pub identity: u64,
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    /// Degrees, presentation only
    pub heading: f32,
    /// Simulated closeness; larger is nearer
    pub depth: f32,
    pub target_depth: f32,
    pub alive: bool,
}

impl Creature {
    /// Fresh creature at the centre of the screen
    pub fn new(identity: u64, viewport: &Viewport, tuning: &Tuning) -> Self {
        Self {
            identity,
            pos: viewport.center(),
            vel: tuning.initial_velocity,
            heading: 0.0,
            depth: tuning.initial_depth,
            target_depth: tuning.initial_depth,
            alive: true,
        }
    }

    pub fn hit_radius(&self, tuning: &Tuning) -> f32 {
        self.depth * tuning.hit_radius_per_depth
    }

    pub fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            identity: self.identity,
            pos: self.pos,
            heading: self.heading,
            depth: self.depth,
            alive: self.alive,
        }
    }
}

/// Immutable copy handed to render and audio sinks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatureSnapshot {
    pub identity: u64,
    pub pos: Vec2,
    pub heading: f32,
    pub depth: f32,
    pub alive: bool,
}

/// Short-lived splat left behind by a kill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Degrees in [0, 360)
    pub rotation: f32,
    pub opacity: f32,
}

/// Screen edge a respawn enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Things that happened during a tick or a slap, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A slap landed somewhere (hit or miss)
    Impact { pos: Vec2 },
    Kill { identity: u64, pos: Vec2, score: u64 },
    EffectSpawned { id: u64 },
    EffectExpired { id: u64 },
    Respawned { identity: u64, edge: Edge, pos: Vec2 },
    SwingEnded,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub creature: Creature,
    pub pointer: PointerState,
    pub hand: HandPose,
    /// Active effects in creation order
    pub effects: Vec<Effect>,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending one-shot timers
    pub schedule: Schedule,
    /// Events not yet drained by the host, oldest first
    events: VecDeque<GameEvent>,
    pub rng: Pcg32,
    next_id: u64,
}

impl GameState {
    /// Create a new state with the given seed
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let creature = Creature::new(1, &viewport, &tuning);
        Self {
            tuning,
            viewport,
            creature,
            pointer: PointerState::default(),
            hand: HandPose::default(),
            effects: Vec::new(),
            score: 0,
            time_ticks: 0,
            schedule: Schedule::default(),
            events: VecDeque::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 2,
        }
    }

    /// Allocate a new identity for creatures and effects
    pub fn next_entity_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue an event for the host
    ///
    /// Hosts are expected to drain once per frame. A host that never drains
    /// only keeps the newest [`MAX_PENDING_EVENTS`].
    pub fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Events queued since the last drain
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn effect(&self, id: u64) -> Option<&Effect> {
        self.effects.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_centres_creature() {
        let state = GameState::new(7, Viewport::new(1000.0, 800.0), Tuning::default());
        assert_eq!(state.creature.pos, Vec2::new(500.0, 400.0));
        assert_eq!(state.creature.vel, Vec2::new(2.0, 2.0));
        assert!(state.creature.alive);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_zero_viewport_uses_fallback() {
        let vp = Viewport::new(0.0, 0.0);
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn test_entity_ids_unique() {
        let mut state = GameState::new(7, Viewport::default(), Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
        assert_ne!(a, state.creature.identity);
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut state = GameState::new(7, Viewport::default(), Tuning::default());
        for id in 0..(MAX_PENDING_EVENTS as u64 + 10) {
            state.push_event(GameEvent::EffectSpawned { id });
        }
        assert_eq!(state.pending_events(), MAX_PENDING_EVENTS);

        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::EffectSpawned { id: 10 });
        assert_eq!(state.pending_events(), 0);
    }

    #[test]
    fn test_hit_radius_scales_with_depth() {
        let tuning = Tuning::default();
        let mut c = Creature::new(1, &Viewport::default(), &tuning);
        c.depth = 0.5;
        assert!((c.hit_radius(&tuning) - 30.0).abs() < 1e-4);
    }
}
