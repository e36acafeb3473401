//! Session glue
//!
//! Owns the game state and the two output sinks, converts host frame times
//! into fixed ticks, and routes pointer/slap input. Everything runs on one
//! thread: input handlers and ticks never interleave, so a slap always sees
//! the state committed by the previous tick.

use glam::Vec2;

use crate::audio::{AudioSink, Cue, buzz_params};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{
    GameEvent, GameState, SlapOutcome, Snapshot, TickInput, Viewport, attempt_slap, tick,
};
use crate::tuning::Tuning;

/// Receives one immutable frame per tick
pub trait RenderSink {
    fn present(&mut self, snapshot: &Snapshot);

    /// A slap landed at `pos` (hit or miss), for the swing animation
    fn impact(&mut self, _pos: Vec2) {}
}

/// Renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRender;

impl RenderSink for NullRender {
    fn present(&mut self, _snapshot: &Snapshot) {}
}

/// A running (or idle) game
pub struct Session<A: AudioSink, R: RenderSink> {
    state: GameState,
    settings: Settings,
    audio: A,
    render: R,
    active: bool,
    accumulator: f32,
}

impl<A: AudioSink, R: RenderSink> Session<A, R> {
    pub fn new(
        seed: u64,
        viewport: Viewport,
        tuning: Tuning,
        settings: Settings,
        mut audio: A,
        render: R,
    ) -> Self {
        audio.apply_settings(&settings);
        Self {
            state: GameState::new(seed, viewport, tuning),
            settings,
            audio,
            render,
            active: false,
            accumulator: 0.0,
        }
    }

    pub fn start(&mut self) {
        if !self.active {
            self.active = true;
            self.accumulator = 0.0;
            log::info!("Session started");
        }
    }

    /// Stop ticking; pending timers stay queued and fire if restarted
    pub fn stop(&mut self) {
        if self.active {
            self.active = false;
            // No further ticks will drive the glide
            let params = buzz_params(self.state.creature.depth, false, &self.state.tuning);
            self.audio.fade_out(params);
            log::info!("Session stopped (score {})", self.state.score);
        }
    }

    pub fn is_session_active(&self) -> bool {
        self.active
    }

    pub fn get_score(&self) -> u64 {
        self.state.score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// Raw pointer movement; most recent position wins
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.state.pointer.set(Vec2::new(x, y));
        self.state.hand.on_move(x, &self.state.tuning);
    }

    /// Host viewport changed size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.viewport = Viewport::new(width, height);
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        self.settings = settings;
    }

    /// Advance exactly one tick; `None` while the session is stopped
    pub fn tick(&mut self) -> Option<Snapshot> {
        if !self.active {
            return None;
        }

        let input = TickInput {
            pointer: None,
            reduced_motion: self.settings.reduced_motion,
        };
        let snapshot = tick(&mut self.state, &input);

        let creature = &snapshot.creature;
        self.audio
            .set_continuous_params(buzz_params(creature.depth, creature.alive, &self.state.tuning));
        self.render.present(&snapshot);
        Some(snapshot)
    }

    /// Run as many fixed ticks as `frame_dt` seconds of wall time cover
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        if !self.active {
            return 0;
        }

        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Primary activation: resolve one slap at the pointer
    pub fn attempt_slap(&mut self) -> SlapOutcome {
        if !self.active {
            return SlapOutcome::Miss;
        }

        let outcome = attempt_slap(&mut self.state);
        self.audio.play(Cue::Impact);
        self.render.impact(self.state.pointer.pos);

        if outcome.is_kill() {
            self.audio.play(Cue::Kill);
            // Show the kill now rather than on the next tick
            self.render.present(&Snapshot::capture(&self.state));
        }
        outcome
    }

    /// Take everything that happened since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
