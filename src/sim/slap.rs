//! Hit resolution and respawn
//!
//! A slap is resolved synchronously against the committed creature state.
//! There is no buffering: a slap while the creature is dead is a miss.

use glam::Vec2;
use rand::Rng;

use super::schedule::Timer;
use super::state::{Creature, Edge, Effect, GameEvent, GameState};

/// Result of one slap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlapOutcome {
    Kill,
    Miss,
}

impl SlapOutcome {
    pub fn is_kill(self) -> bool {
        self == SlapOutcome::Kill
    }
}

/// Resolve a slap at the current pointer position
pub fn attempt_slap(state: &mut GameState) -> SlapOutcome {
    let pointer = state.pointer.pos;
    state.push_event(GameEvent::Impact { pos: pointer });

    state.hand.swinging = true;
    state
        .schedule
        .after(state.time_ticks, state.tuning.slap_duration, Timer::EndSwing);

    let creature = &state.creature;
    if !creature.alive {
        return SlapOutcome::Miss;
    }

    let hit_radius = creature.hit_radius(&state.tuning);
    let distance = pointer.distance(creature.pos);
    if distance >= hit_radius {
        return SlapOutcome::Miss;
    }

    kill(state);
    SlapOutcome::Kill
}

fn kill(state: &mut GameState) {
    state.creature.alive = false;
    state.score += 1;

    let Creature {
        identity,
        pos,
        depth,
        ..
    } = state.creature;
    log::info!("Swatted creature {} (score {})", identity, state.score);
    state.push_event(GameEvent::Kill {
        identity,
        pos,
        score: state.score,
    });

    let id = state.next_entity_id();
    let tuning = &state.tuning;
    let jitter = tuning.effect_scale_jitter_min
        + state.rng.random::<f32>()
            * (tuning.effect_scale_jitter_max - tuning.effect_scale_jitter_min);
    let rotation = state.rng.random::<f32>() * 360.0;
    state.effects.push(Effect {
        id,
        x: pos.x,
        y: pos.y,
        scale: depth * jitter,
        rotation,
        opacity: tuning.effect_opacity,
    });
    state.push_event(GameEvent::EffectSpawned { id });

    let now = state.time_ticks;
    let lifetime = state.tuning.effect_lifetime;
    let delay = state.tuning.respawn_delay;
    state.schedule.after(now, lifetime, Timer::ExpireEffect { id });
    state.schedule.after(now, delay, Timer::Respawn);
}

/// Spawn point just outside `edge`, randomized along the edge
pub fn spawn_point<R: Rng>(edge: Edge, width: f32, height: f32, offset: f32, rng: &mut R) -> Vec2 {
    match edge {
        Edge::Top => Vec2::new(rng.random::<f32>() * width, -offset),
        Edge::Right => Vec2::new(width + offset, rng.random::<f32>() * height),
        Edge::Bottom => Vec2::new(rng.random::<f32>() * width, height + offset),
        Edge::Left => Vec2::new(-offset, rng.random::<f32>() * height),
    }
}

/// Replace the dead creature with a fresh one entering from a random edge
pub fn respawn(state: &mut GameState) {
    if state.creature.alive {
        log::debug!("Respawn skipped: creature {} is alive", state.creature.identity);
        return;
    }

    let edge = Edge::ALL[state.rng.random_range(0..Edge::ALL.len())];
    let vp = state.viewport;
    let pos = spawn_point(
        edge,
        vp.width,
        vp.height,
        state.tuning.respawn_offset,
        &mut state.rng,
    );
    let spread = state.tuning.respawn_velocity_spread;
    let vel = Vec2::new(
        (state.rng.random::<f32>() - 0.5) * spread,
        (state.rng.random::<f32>() - 0.5) * spread,
    );

    let identity = state.next_entity_id();
    state.creature = Creature {
        identity,
        pos,
        vel,
        heading: 0.0,
        depth: state.tuning.respawn_depth,
        target_depth: state.tuning.respawn_target_depth,
        alive: true,
    };
    log::debug!("Respawned creature {} from {:?} at {:?}", identity, edge, pos);
    state.push_event(GameEvent::Respawned { identity, edge, pos });
}
