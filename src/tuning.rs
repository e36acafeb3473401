//! Data-driven game balance
//!
//! All per-tick constants are calibrated for a 60 Hz frame. Durations are in
//! seconds of simulation time. Any field missing from a JSON override keeps
//! its default.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Errors from loading a tuning override
#[derive(Debug)]
pub enum TuningError {
    /// The JSON could not be parsed
    Parse(serde_json::Error),
    /// A field parsed but holds an unusable value
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "tuning JSON parse error: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning field `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Inset from each viewport edge where the creature turns back (px)
    pub screen_padding: f32,
    /// Speed cap while wandering (px/tick)
    pub base_speed: f32,
    /// Pointer distance that triggers fleeing (px)
    pub flee_distance: f32,
    /// Speed cap multiplier while fleeing
    pub flee_speed_multiplier: f32,
    /// Repulsion added per tick along the pointer->creature direction
    pub flee_impulse: f32,
    /// At or above this depth the creature is too bold to flee
    pub flee_depth_ceiling: f32,
    /// Depth the creature retreats toward while fleeing
    pub flee_target_depth: f32,
    /// Width of the symmetric uniform wander noise per axis
    pub wander_noise: f32,

    // === Depth ===
    /// One-pole smoothing rate per tick
    pub depth_smoothing: f32,
    /// Redraw the wander target once depth is this close to it
    pub depth_retarget_tolerance: f32,
    /// Wander target depth range, lower bound inclusive
    pub wander_depth_min: f32,
    pub wander_depth_max: f32,
    /// Hard clamp applied after smoothing
    pub depth_min: f32,
    pub depth_max: f32,

    // === Spawn ===
    pub initial_velocity: Vec2,
    pub initial_depth: f32,
    /// How far outside the chosen edge a respawn appears (px)
    pub respawn_offset: f32,
    /// Respawn velocity is uniform in [-spread/2, spread/2) per axis
    pub respawn_velocity_spread: f32,
    pub respawn_depth: f32,
    pub respawn_target_depth: f32,

    // === Slap ===
    /// Hit radius per unit of depth (px)
    pub hit_radius_per_depth: f32,
    /// Duration of the hand swing animation (s)
    pub slap_duration: f32,
    /// Delay between a kill and the respawn (s)
    pub respawn_delay: f32,

    // === Effects ===
    pub effect_lifetime: f32,
    pub effect_opacity: f32,
    pub effect_scale_jitter_min: f32,
    pub effect_scale_jitter_max: f32,

    // === Hand ===
    /// Degrees of tilt per pixel of horizontal pointer motion
    pub hand_tilt_per_px: f32,
    pub hand_tilt_limit: f32,
    pub hand_tilt_smoothing: f32,
    pub hand_tilt_decay: f32,
    pub hand_swing_scale: f32,

    // === Audio ===
    pub audio_min_volume: f32,
    pub audio_max_volume: f32,
    /// Volume per unit of normalized depth before clamping
    pub audio_volume_gain: f32,
    /// Pitch at the far end of the depth range (Hz)
    pub audio_far_frequency: f32,
    /// Pitch drop across the whole depth range (Hz)
    pub audio_frequency_drop: f32,
    /// Time constant for parameter glides (s)
    pub audio_time_constant: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_padding: 50.0,
            base_speed: 4.0,
            flee_distance: 300.0,
            flee_speed_multiplier: 3.5,
            flee_impulse: 0.5,
            flee_depth_ceiling: 2.0,
            flee_target_depth: 0.5,
            wander_noise: 0.5,

            depth_smoothing: 0.02,
            depth_retarget_tolerance: 0.1,
            wander_depth_min: 0.5,
            wander_depth_max: 2.5,
            depth_min: 0.5,
            depth_max: 2.5,

            initial_velocity: Vec2::new(2.0, 2.0),
            initial_depth: 1.0,
            respawn_offset: 50.0,
            respawn_velocity_spread: 5.0,
            respawn_depth: 0.5,
            respawn_target_depth: 1.0,

            hit_radius_per_depth: 60.0,
            slap_duration: 0.15,
            respawn_delay: 1.0,

            effect_lifetime: 3.0,
            effect_opacity: 0.9,
            effect_scale_jitter_min: 0.8,
            effect_scale_jitter_max: 1.3,

            hand_tilt_per_px: 0.8,
            hand_tilt_limit: 25.0,
            hand_tilt_smoothing: 0.15,
            hand_tilt_decay: 0.8,
            hand_swing_scale: 0.8,

            audio_min_volume: 0.01,
            audio_max_volume: 0.3,
            audio_volume_gain: 0.15,
            audio_far_frequency: 700.0,
            audio_frequency_drop: 150.0,
            audio_time_constant: 0.1,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse an override, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Ignoring tuning override: {}", e);
                Self::default()
            }
        }
    }

    /// Check the values the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.base_speed > 0.0) {
            return invalid("base_speed", "must be positive");
        }
        if !(self.flee_speed_multiplier >= 1.0) {
            return invalid("flee_speed_multiplier", "must be at least 1");
        }
        if !(self.depth_min > 0.0 && self.depth_min < self.depth_max) {
            return invalid("depth_min", "must be positive and below depth_max");
        }
        if !(self.wander_depth_min < self.wander_depth_max) {
            return invalid("wander_depth_min", "must be below wander_depth_max");
        }
        let in_range = |d: f32| d >= self.depth_min && d <= self.depth_max;
        let depths = [
            ("wander_depth_min", self.wander_depth_min),
            ("wander_depth_max", self.wander_depth_max),
            ("initial_depth", self.initial_depth),
            ("respawn_depth", self.respawn_depth),
            ("respawn_target_depth", self.respawn_target_depth),
            ("flee_target_depth", self.flee_target_depth),
        ];
        for (field, depth) in depths {
            if !in_range(depth) {
                return invalid(field, "must lie within [depth_min, depth_max]");
            }
        }
        if !(self.depth_smoothing > 0.0 && self.depth_smoothing <= 1.0) {
            return invalid("depth_smoothing", "must be in (0, 1]");
        }
        if !(self.effect_scale_jitter_min <= self.effect_scale_jitter_max) {
            return invalid("effect_scale_jitter_min", "must not exceed effect_scale_jitter_max");
        }
        if !(self.respawn_delay > 0.0 && self.respawn_delay < self.effect_lifetime) {
            return invalid("respawn_delay", "must be positive and shorter than effect_lifetime");
        }
        if !(self.audio_time_constant > 0.0) {
            return invalid("audio_time_constant", "must be positive");
        }
        Ok(())
    }

    /// Speed cap for the current mode
    pub fn speed_cap(&self, fleeing: bool) -> f32 {
        if fleeing {
            self.base_speed * self.flee_speed_multiplier
        } else {
            self.base_speed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let t = Tuning::from_json(r#"{ "hit_radius_per_depth": 55.0 }"#).unwrap();
        assert_eq!(t.hit_radius_per_depth, 55.0);
        assert_eq!(t.base_speed, 4.0);
    }

    #[test]
    fn test_rejects_respawn_after_effect_expiry() {
        let err = Tuning::from_json(r#"{ "respawn_delay": 5.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "respawn_delay",
                ..
            }
        ));
    }

    fn rejected_field(json: &str) -> &'static str {
        match Tuning::from_json(json) {
            Err(TuningError::Invalid { field, .. }) => field,
            other => panic!("expected validation error for {}, got {:?}", json, other),
        }
    }

    #[test]
    fn test_rejects_wander_range_outside_clamp() {
        assert_eq!(rejected_field(r#"{ "wander_depth_max": 4.0 }"#), "wander_depth_max");
        assert_eq!(rejected_field(r#"{ "wander_depth_min": 0.1 }"#), "wander_depth_min");
    }

    #[test]
    fn test_rejects_initial_depth_outside_clamp() {
        assert_eq!(rejected_field(r#"{ "initial_depth": 6.0 }"#), "initial_depth");
    }

    #[test]
    fn test_rejects_respawn_depths_outside_clamp() {
        assert_eq!(rejected_field(r#"{ "respawn_depth": 0.2 }"#), "respawn_depth");
        assert_eq!(
            rejected_field(r#"{ "respawn_target_depth": 3.0 }"#),
            "respawn_target_depth"
        );
    }

    #[test]
    fn test_rejects_flee_target_outside_clamp() {
        assert_eq!(rejected_field(r#"{ "flee_target_depth": 0.0 }"#), "flee_target_depth");
    }

    #[test]
    fn test_narrowed_clamp_must_cover_depths() {
        // Default initial depth 1.0 falls below a raised floor
        assert_eq!(
            rejected_field(r#"{ "depth_min": 1.2, "wander_depth_min": 1.2 }"#),
            "initial_depth"
        );
    }

    #[test]
    fn test_bad_json_falls_back() {
        let t = Tuning::from_json_or_default("{ not json");
        assert_eq!(t, Tuning::default());
    }

    #[test]
    fn test_speed_cap() {
        let t = Tuning::default();
        assert_eq!(t.speed_cap(false), 4.0);
        assert_eq!(t.speed_cap(true), 14.0);
    }
}
