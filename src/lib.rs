//! Buzz Swat - a pointer-driven arcade swatter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (creature AI, hit resolution, timers)
//! - `audio`: Continuous buzz parameters and one-shot cues
//! - `session`: Fixed-timestep glue between host input and the simulation
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{RenderSink, Session};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (tuning values are calibrated per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Undrained host events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 256;

    /// Fallback viewport when the host has not reported a size yet
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;

    /// The sprite faces left, so headings are rotated half a turn
    pub const SPRITE_HEADING_OFFSET_DEG: f32 = 180.0;
}

/// Heading in degrees for a velocity, corrected for the sprite's facing
#[inline]
pub fn heading_degrees(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x).to_degrees() + consts::SPRITE_HEADING_OFFSET_DEG
}

/// Rescale `vel` so its length does not exceed `cap` (direction preserved)
#[inline]
pub fn clamp_speed(vel: Vec2, cap: f32) -> Vec2 {
    let mag = vel.length();
    if mag > cap { vel / mag * cap } else { vel }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_faces_left_sprite() {
        // Moving right means the left-facing sprite is turned around
        assert!((heading_degrees(Vec2::new(1.0, 0.0)) - 180.0).abs() < 1e-4);
        // Moving down (screen y grows downward)
        assert!((heading_degrees(Vec2::new(0.0, 1.0)) - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamp_speed() {
        let v = clamp_speed(Vec2::new(30.0, 40.0), 5.0);
        assert!((v.length() - 5.0).abs() < 1e-4);
        assert!((v.x / v.y - 0.75).abs() < 1e-4);

        // Never increased
        let slow = Vec2::new(1.0, 1.0);
        assert_eq!(clamp_speed(slow, 5.0), slow);
    }
}
