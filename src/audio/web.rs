//! Audio sink using Web Audio API
//!
//! Procedurally generated buzz and cues - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{AudioParams, AudioSink};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Buzz oscillator with a fast LFO warble on its pitch
struct Buzz {
    osc: OscillatorNode,
    gain: GainNode,
    _lfo: OscillatorNode,
}

/// Audio manager for the game
pub struct WebAudio {
    ctx: Option<AudioContext>,
    buzz: Option<Buzz>,
    settings: Settings,
    /// Glide time constant for buzz parameters (s)
    time_constant: f64,
    base_frequency: f32,
}

impl WebAudio {
    pub fn new(tuning: &Tuning, settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            buzz: None,
            settings: settings.clone(),
            time_constant: tuning.audio_time_constant as f64,
            base_frequency: tuning.audio_far_frequency,
        }
    }

    /// Resume audio context and start the buzz (required after user gesture)
    pub fn resume(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        if self.buzz.is_none() {
            self.buzz = self.start_buzz(ctx);
            if self.buzz.is_none() {
                log::warn!("Failed to build buzz oscillator graph");
            }
        }
    }

    fn start_buzz(&self, ctx: &AudioContext) -> Option<Buzz> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        let lfo = ctx.create_oscillator().ok()?;
        let lfo_gain = ctx.create_gain().ok()?;

        osc.set_type(OscillatorType::Sawtooth);
        osc.frequency().set_value(self.base_frequency);

        // 25 Hz flutter, +-20 Hz deep
        lfo.set_type(OscillatorType::Sine);
        lfo.frequency().set_value(25.0);
        lfo_gain.gain().set_value(20.0);

        lfo.connect_with_audio_node(&lfo_gain).ok()?;
        lfo_gain.connect_with_audio_param(&osc.frequency()).ok()?;
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        gain.gain().set_value(0.0);
        osc.start().ok()?;
        lfo.start().ok()?;

        Some(Buzz {
            osc,
            gain,
            _lfo: lfo,
        })
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Slap impact - white noise burst plus a low thud
    fn play_slap(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        let rate = ctx.sample_rate();
        let len = (rate * 0.1) as u32;
        if let Ok(buffer) = ctx.create_buffer(1, len, rate) {
            let noise: Vec<f32> = (0..len)
                .map(|_| (js_sys::Math::random() * 2.0 - 1.0) as f32)
                .collect();
            let nodes = (ctx.create_buffer_source(), ctx.create_gain());
            if let (true, (Ok(src), Ok(gain))) = (buffer.copy_to_channel(&noise, 0).is_ok(), nodes) {
                src.set_buffer(Some(&buffer));
                gain.gain().set_value_at_time(vol * 0.8, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                src.connect_with_audio_node(&gain).ok();
                gain.connect_with_audio_node(&ctx.destination()).ok();
                src.start().ok();
            }
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.8, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }

    /// Kill - wet squish, falling pitch
    fn play_splat(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(100.0, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }
}

impl AudioSink for WebAudio {
    fn set_continuous_params(&mut self, params: AudioParams) {
        // Dropped until the context has been unlocked by a gesture
        let (Some(ctx), Some(buzz)) = (&self.ctx, &self.buzz) else {
            return;
        };
        let t = ctx.current_time();
        let volume = params.volume * self.settings.effective_volume();
        buzz.gain
            .gain()
            .set_target_at_time(volume, t, self.time_constant)
            .ok();
        buzz.osc
            .frequency()
            .set_target_at_time(params.frequency, t, self.time_constant)
            .ok();
    }

    fn play_impact_cue(&mut self) {
        let vol = self.settings.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(ctx) = &self.ctx {
            self.play_slap(ctx, vol);
        }
    }

    fn play_kill_cue(&mut self) {
        let vol = self.settings.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(ctx) = &self.ctx {
            self.play_splat(ctx, vol);
        }
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
    }
}
