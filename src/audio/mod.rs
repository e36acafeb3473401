//! Buzz parameters and sound cues
//!
//! The simulation only decides *what* the audio should be doing: a
//! continuous buzz whose loudness and pitch follow the creature's depth, plus
//! two one-shot cues. Synthesis lives behind [`AudioSink`].

#[cfg(target_arch = "wasm32")]
pub mod web;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::tuning::Tuning;

/// Continuous buzz parameters for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioParams {
    /// Linear gain
    pub volume: f32,
    /// Oscillator frequency (Hz)
    pub frequency: f32,
}

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Every slap, hit or miss
    Impact,
    /// Only on a kill
    Kill,
}

/// Depth normalized to [0, 1] over the tuning's depth range
pub fn normalized_depth(depth: f32, tuning: &Tuning) -> f32 {
    ((depth - tuning.depth_min) / (tuning.depth_max - tuning.depth_min)).clamp(0.0, 1.0)
}

/// Target buzz for the creature's depth
///
/// Closer (larger) is louder and lower. A dead creature targets silence and
/// leaves the pitch where it was.
pub fn buzz_params(depth: f32, alive: bool, tuning: &Tuning) -> AudioParams {
    let norm = normalized_depth(depth, tuning);
    let frequency = tuning.audio_far_frequency - norm * tuning.audio_frequency_drop;
    let volume = if alive {
        (norm * tuning.audio_volume_gain).clamp(tuning.audio_min_volume, tuning.audio_max_volume)
    } else {
        0.0
    };
    AudioParams { volume, frequency }
}

/// Exponential approach of `current` toward `target` over `dt` seconds
///
/// Same curve as a Web Audio `setTargetAtTime` with time constant `tau`.
#[inline]
pub fn smooth_toward(current: f32, target: f32, dt: f32, tau: f32) -> f32 {
    target + (current - target) * (-dt / tau).exp()
}

/// Something that can make the noises
///
/// Implementations must tolerate being called before they are ready (e.g. an
/// audio context still waiting on a user gesture) by dropping the call.
pub trait AudioSink {
    fn set_continuous_params(&mut self, params: AudioParams);
    fn play_impact_cue(&mut self);
    fn play_kill_cue(&mut self);

    fn play(&mut self, cue: Cue) {
        match cue {
            Cue::Impact => self.play_impact_cue(),
            Cue::Kill => self.play_kill_cue(),
        }
    }

    /// Last target before parameter updates stop arriving
    ///
    /// Sinks whose glide runs on its own clock can treat this like any other
    /// update. Sinks that only advance per call must settle on `params` here.
    fn fade_out(&mut self, params: AudioParams) {
        self.set_continuous_params(params);
    }

    /// Apply changed player preferences
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn set_continuous_params(&mut self, _params: AudioParams) {}
    fn play_impact_cue(&mut self) {}
    fn play_kill_cue(&mut self) {}
}

/// Software sink for native runs: glides the buzz and counts cues
#[derive(Debug, Clone)]
pub struct HeadlessAudio {
    /// Buzz currently "playing"
    pub current: AudioParams,
    pub impacts: u32,
    pub kills: u32,
    dt: f32,
    time_constant: f32,
    gain: f32,
}

impl HeadlessAudio {
    /// `dt` is the interval between parameter updates (one tick)
    pub fn new(dt: f32, tuning: &Tuning, settings: &Settings) -> Self {
        Self {
            current: AudioParams {
                volume: 0.0,
                frequency: tuning.audio_far_frequency,
            },
            impacts: 0,
            kills: 0,
            dt,
            time_constant: tuning.audio_time_constant,
            gain: settings.effective_volume(),
        }
    }
}

impl AudioSink for HeadlessAudio {
    fn set_continuous_params(&mut self, params: AudioParams) {
        let (dt, tau) = (self.dt, self.time_constant);
        self.current.volume = smooth_toward(self.current.volume, params.volume * self.gain, dt, tau);
        self.current.frequency = smooth_toward(self.current.frequency, params.frequency, dt, tau);
    }

    fn fade_out(&mut self, params: AudioParams) {
        self.current = AudioParams {
            volume: params.volume * self.gain,
            frequency: params.frequency,
        };
    }

    fn play_impact_cue(&mut self) {
        self.impacts += 1;
        log::debug!("*slap*");
    }

    fn play_kill_cue(&mut self) {
        self.kills += 1;
        log::debug!("*splat*");
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.gain = settings.effective_volume();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_far_is_quiet_and_high() {
        let t = Tuning::default();
        let p = buzz_params(0.5, true, &t);
        assert_eq!(p.volume, 0.01);
        assert!((p.frequency - 700.0).abs() < 1e-3);
    }

    #[test]
    fn test_close_is_loud_and_low() {
        let t = Tuning::default();
        let p = buzz_params(2.5, true, &t);
        assert!((p.volume - 0.15).abs() < 1e-6);
        assert!((p.frequency - 550.0).abs() < 1e-3);
    }

    #[test]
    fn test_volume_monotonic_in_depth() {
        let t = Tuning::default();
        let mut last = 0.0;
        for i in 0..=20 {
            let depth = 0.5 + i as f32 * 0.1;
            let p = buzz_params(depth, true, &t);
            assert!(p.volume >= last);
            last = p.volume;
        }
    }

    #[test]
    fn test_dead_targets_silence() {
        let t = Tuning::default();
        assert_eq!(buzz_params(2.0, false, &t).volume, 0.0);
    }

    #[test]
    fn test_out_of_range_depth_is_clamped() {
        let t = Tuning::default();
        assert_eq!(normalized_depth(0.1, &t), 0.0);
        assert_eq!(normalized_depth(9.0, &t), 1.0);
    }

    #[test]
    fn test_smoothing_fades_without_a_click() {
        let t = Tuning::default();
        let mut sink = HeadlessAudio::new(SIM_DT, &t, &Settings::default());
        sink.gain = 1.0;
        sink.current.volume = 0.15;

        sink.set_continuous_params(buzz_params(1.0, false, &t));
        // Still audible after one tick, not cut to zero
        assert!(sink.current.volume > 0.1);

        for _ in 0..60 {
            sink.set_continuous_params(buzz_params(1.0, false, &t));
        }
        assert!(sink.current.volume < 0.001);
    }

    #[test]
    fn test_fade_out_settles_on_target() {
        let t = Tuning::default();
        let mut sink = HeadlessAudio::new(SIM_DT, &t, &Settings::default());
        sink.current.volume = 0.12;
        sink.fade_out(buzz_params(1.0, false, &t));
        assert_eq!(sink.current.volume, 0.0);
    }

    #[test]
    fn test_play_dispatches_cues() {
        let t = Tuning::default();
        let mut sink = HeadlessAudio::new(SIM_DT, &t, &Settings::default());
        sink.play(Cue::Impact);
        sink.play(Cue::Impact);
        sink.play(Cue::Kill);
        assert_eq!((sink.impacts, sink.kills), (2, 1));
    }
}
