//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers fire on tick boundaries, in scheduling order
//! - No rendering or platform dependencies

pub mod behavior;
pub mod pointer;
pub mod schedule;
pub mod slap;
pub mod state;
pub mod tick;

pub use behavior::Behavior;
pub use pointer::{HandPose, PointerState};
pub use schedule::{Schedule, Timer, secs_to_ticks};
pub use slap::{SlapOutcome, attempt_slap, respawn, spawn_point};
pub use state::{
    Creature, CreatureSnapshot, Edge, Effect, GameEvent, GameState, Viewport,
};
pub use tick::{Snapshot, TickInput, fire_timers, step_creature, tick};
