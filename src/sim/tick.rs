//! Fixed timestep simulation tick
//!
//! Advances timers, the hand pose and the creature by exactly one frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::behavior::Behavior;
use super::schedule::Timer;
use super::slap::respawn;
use super::state::{Creature, CreatureSnapshot, Effect, GameEvent, GameState, Viewport};
use crate::tuning::Tuning;
use crate::{clamp_speed, heading_degrees};

/// Input sampled for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position, if it moved since the last tick
    pub pointer: Option<Vec2>,
    /// Keep the hand upright
    pub reduced_motion: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub creature: CreatureSnapshot,
    pub effects: Vec<Effect>,
    pub pointer: Vec2,
    pub hand_tilt: f32,
    pub hand_scale: f32,
    pub score: u64,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            creature: state.creature.snapshot(),
            effects: state.effects.clone(),
            pointer: state.pointer.pos,
            hand_tilt: state.hand.tilt,
            hand_scale: state.hand.scale(&state.tuning),
            score: state.score,
        }
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Snapshot {
    if let Some(pos) = input.pointer {
        state.pointer.set(pos);
    }

    state.time_ticks += 1;
    fire_timers(state);

    state.hand.update(&state.tuning, input.reduced_motion);

    let pointer = state.pointer.pos;
    if let Some(behavior) = step_creature(
        &mut state.creature,
        pointer,
        &state.viewport,
        &state.tuning,
        &mut state.rng,
    ) {
        log::trace!(
            "tick {} {:?} pos={:?} depth={:.3}",
            state.time_ticks,
            behavior,
            state.creature.pos,
            state.creature.depth
        );
    }

    Snapshot::capture(state)
}

/// Run every timer that has come due on the current tick
pub fn fire_timers(state: &mut GameState) {
    for timer in state.schedule.drain_due(state.time_ticks) {
        match timer {
            Timer::ExpireEffect { id } => {
                state.effects.retain(|e| e.id != id);
                state.push_event(GameEvent::EffectExpired { id });
            }
            Timer::Respawn => respawn(state),
            Timer::EndSwing => {
                state.hand.swinging = false;
                state.push_event(GameEvent::SwingEnded);
            }
        }
    }
}

/// Integrate one creature for one tick
///
/// Returns the behavior chosen, or `None` when the creature is dead and
/// therefore frozen. The order of operations (and of RNG draws) is fixed so
/// seeded runs replay exactly.
pub fn step_creature<R: Rng>(
    creature: &mut Creature,
    pointer: Vec2,
    viewport: &Viewport,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<Behavior> {
    if !creature.alive {
        return None;
    }

    // 1. Vector to the pointer
    let to_pointer = pointer - creature.pos;
    let dist = to_pointer.length();

    // 2. Flee or wander
    let behavior = Behavior::classify(dist, creature.depth, tuning);
    match behavior {
        Behavior::Fleeing => {
            // Pointer exactly on top of us has no direction to flee from
            if dist > 0.0 {
                creature.vel -= to_pointer / dist * tuning.flee_impulse;
            }
            creature.target_depth = tuning.flee_target_depth;
        }
        Behavior::Wandering => {
            creature.vel.x += (rng.random::<f32>() - 0.5) * tuning.wander_noise;
            creature.vel.y += (rng.random::<f32>() - 0.5) * tuning.wander_noise;

            if (creature.depth - creature.target_depth).abs() < tuning.depth_retarget_tolerance {
                creature.target_depth = tuning.wander_depth_min
                    + rng.random::<f32>() * (tuning.wander_depth_max - tuning.wander_depth_min);
            }
        }
    }

    // 3. One-pole smoothing toward the target depth
    creature.depth += (creature.target_depth - creature.depth) * tuning.depth_smoothing;
    creature.depth = creature.depth.clamp(tuning.depth_min, tuning.depth_max);

    // 4. Speed cap
    creature.vel = clamp_speed(creature.vel, behavior.speed_cap(tuning));

    // 5. Move
    creature.pos += creature.vel;

    // 6. Turn back at the inset edges (sign only, magnitude untouched)
    let pad = tuning.screen_padding;
    if creature.pos.x < pad {
        creature.vel.x = creature.vel.x.abs();
    }
    if creature.pos.x > viewport.width - pad {
        creature.vel.x = -creature.vel.x.abs();
    }
    if creature.pos.y < pad {
        creature.vel.y = creature.vel.y.abs();
    }
    if creature.pos.y > viewport.height - pad {
        creature.vel.y = -creature.vel.y.abs();
    }

    // 7. Heading
    creature.heading = heading_degrees(creature.vel);

    Some(behavior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn creature_at(x: f32, y: f32, depth: f32) -> Creature {
        let tuning = Tuning::default();
        let mut c = Creature::new(1, &Viewport::new(1000.0, 1000.0), &tuning);
        c.pos = Vec2::new(x, y);
        c.depth = depth;
        c.target_depth = depth;
        c
    }

    #[test]
    fn test_dead_creature_is_frozen() {
        let tuning = Tuning::default();
        let vp = Viewport::new(1000.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut c = creature_at(500.0, 500.0, 1.0);
        c.alive = false;
        let before = c.clone();

        assert!(step_creature(&mut c, Vec2::new(510.0, 500.0), &vp, &tuning, &mut rng).is_none());
        assert_eq!(c, before);
    }

    #[test]
    fn test_flee_pushes_away_from_pointer() {
        let tuning = Tuning::default();
        let vp = Viewport::new(1000.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut c = creature_at(500.0, 500.0, 1.0);
        c.vel = Vec2::ZERO;
        let pointer = Vec2::new(550.0, 500.0);

        let behavior = step_creature(&mut c, pointer, &vp, &tuning, &mut rng);
        assert_eq!(behavior, Some(Behavior::Fleeing));
        // Moving left, away from the pointer on the right
        assert!(c.vel.x < 0.0);
        assert!(c.vel.dot(pointer - Vec2::new(500.0, 500.0)) < 0.0);
        assert_eq!(c.target_depth, tuning.flee_target_depth);
    }

    #[test]
    fn test_pointer_on_top_does_not_poison_velocity() {
        let tuning = Tuning::default();
        let vp = Viewport::new(1000.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut c = creature_at(500.0, 500.0, 1.0);
        let vel = c.vel;

        step_creature(&mut c, Vec2::new(500.0, 500.0), &vp, &tuning, &mut rng);
        assert!(c.vel.is_finite());
        assert_eq!(c.vel, vel);
        assert!(c.pos.is_finite());
    }

    #[test]
    fn test_depth_smooths_one_pole() {
        let tuning = Tuning::default();
        let vp = Viewport::new(1000.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut c = creature_at(500.0, 500.0, 1.0);

        // Fleeing pins the target at 0.5
        step_creature(&mut c, Vec2::new(520.0, 500.0), &vp, &tuning, &mut rng);
        let expected = 1.0 + (0.5 - 1.0) * tuning.depth_smoothing;
        assert!((c.depth - expected).abs() < 1e-6);
    }

    #[test]
    fn test_wander_retargets_when_depth_reached() {
        let tuning = Tuning::default();
        let vp = Viewport::new(1000.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut c = creature_at(500.0, 500.0, 1.0);
        c.target_depth = 1.05;

        step_creature(&mut c, Vec2::new(0.0, 0.0), &vp, &tuning, &mut rng);
        assert_ne!(c.target_depth, 1.05);
        assert!(c.target_depth >= tuning.wander_depth_min);
        assert!(c.target_depth < tuning.wander_depth_max);
    }

    #[test]
    fn test_speed_capped_when_wandering() {
        let tuning = Tuning::default();
        let vp = Viewport::new(1000.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut c = creature_at(500.0, 500.0, 1.0);
        c.vel = Vec2::new(30.0, -40.0);

        step_creature(&mut c, Vec2::new(0.0, 0.0), &vp, &tuning, &mut rng);
        assert!(c.vel.length() <= tuning.base_speed + 1e-4);
    }

    #[test]
    fn test_edge_turns_velocity_inward() {
        let tuning = Tuning::default();
        let vp = Viewport::new(1000.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut c = creature_at(45.0, 500.0, 1.0);
        c.vel = Vec2::new(-3.0, 0.0);

        step_creature(&mut c, Vec2::new(900.0, 900.0), &vp, &tuning, &mut rng);
        assert!(c.vel.x > 0.0);

        let mut c = creature_at(500.0, 960.0, 1.0);
        c.vel = Vec2::new(0.0, 3.0);
        step_creature(&mut c, Vec2::new(0.0, 0.0), &vp, &tuning, &mut rng);
        assert!(c.vel.y < 0.0);
    }

    #[test]
    fn test_heading_follows_velocity() {
        let tuning = Tuning::default();
        let vp = Viewport::new(1000.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut c = creature_at(500.0, 500.0, 1.0);
        step_creature(&mut c, Vec2::new(0.0, 0.0), &vp, &tuning, &mut rng);
        assert!((c.heading - heading_degrees(c.vel)).abs() < 1e-4);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed replay identically
        let mut a = GameState::new(99999, Viewport::default(), Tuning::default());
        let mut b = GameState::new(99999, Viewport::default(), Tuning::default());

        let inputs = [
            TickInput {
                pointer: Some(Vec2::new(100.0, 100.0)),
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                pointer: Some(Vec2::new(420.0, 310.0)),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.creature, b.creature);
    }

    #[test]
    fn test_tick_updates_pointer() {
        let mut state = GameState::new(1, Viewport::default(), Tuning::default());
        let snap = tick(
            &mut state,
            &TickInput {
                pointer: Some(Vec2::new(12.0, 34.0)),
                ..Default::default()
            },
        );
        assert_eq!(snap.pointer, Vec2::new(12.0, 34.0));
        assert_eq!(state.time_ticks, 1);
    }
}
