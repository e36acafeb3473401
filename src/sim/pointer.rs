//! Pointer tracking and the swatting hand's pose
//!
//! The pointer is "most recent wins" with no history. The hand pose keeps
//! only what it needs to tilt with horizontal motion and to shrink while a
//! slap swing is in progress.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Latest known pointer coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub pos: Vec2,
}

impl PointerState {
    pub fn set(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}

/// Cursor hand animation state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandPose {
    /// Current tilt in degrees
    pub tilt: f32,
    pub target_tilt: f32,
    /// True between a slap and the end of its swing
    pub swinging: bool,
    /// Pointer x at the previous move, for the tilt delta
    last_x: f32,
}

impl Default for HandPose {
    fn default() -> Self {
        Self {
            tilt: 0.0,
            target_tilt: 0.0,
            swinging: false,
            last_x: 0.0,
        }
    }
}

impl HandPose {
    /// Record a pointer move; horizontal speed sets the tilt target
    pub fn on_move(&mut self, x: f32, tuning: &Tuning) {
        let dx = x - self.last_x;
        self.last_x = x;
        self.target_tilt =
            (dx * tuning.hand_tilt_per_px).clamp(-tuning.hand_tilt_limit, tuning.hand_tilt_limit);
    }

    /// Ease tilt toward its target, then let the target fall back to upright
    pub fn update(&mut self, tuning: &Tuning, reduced_motion: bool) {
        if reduced_motion {
            self.tilt = 0.0;
            self.target_tilt = 0.0;
            return;
        }
        self.tilt += (self.target_tilt - self.tilt) * tuning.hand_tilt_smoothing;
        self.target_tilt *= tuning.hand_tilt_decay;
    }

    pub fn scale(&self, tuning: &Tuning) -> f32 {
        if self.swinging {
            tuning.hand_swing_scale
        } else {
            1.0
        }
    }
}
