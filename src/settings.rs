//! Player preferences
//!
//! Nothing is persisted by the crate; the host hands settings in as JSON.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no hand tilt)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Gain applied on top of the buzz and cue volumes
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Parse host-supplied settings, `None` when the JSON is unusable
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Discarding settings: {}", e);
                None
            }
        }
    }
}
