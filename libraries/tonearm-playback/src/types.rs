//! Core types for playback management

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tonearm_audio::AnalyserSettings;

/// Playback rates offered to the user
pub const PLAYBACK_RATES: [f32; 4] = [0.5, 1.0, 1.5, 2.0];

/// Volume fade timing used by track transitions
///
/// Each fade (out, then in) spans `duration_ms` split into `steps` equal steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeSettings {
    /// Total length of one fade (default: 500)
    pub duration_ms: u32,

    /// Number of volume steps per fade (default: 25)
    pub steps: u32,
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            steps: 25,
        }
    }
}

impl FadeSettings {
    /// How often the host should call `tick()` while a fade runs
    pub fn step_interval(&self) -> Duration {
        Duration::from_secs_f64(f64::from(self.duration_ms) / 1000.0 / f64::from(self.steps.max(1)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(PlaybackError::InvalidConfig(
                "fade steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Transition fade timing
    pub fade: FadeSettings,

    /// Analyser tap feeding the visualizer
    pub analyser: AnalyserSettings,

    /// Whether the visualizer starts visible (default: true)
    pub visualizer_visible: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            fade: FadeSettings::default(),
            analyser: AnalyserSettings::default(),
            visualizer_visible: true,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(PlaybackError::InvalidConfig(format!(
                "volume must be between 0 and 1, got {}",
                self.volume
            )));
        }
        self.fade.validate()?;
        self.analyser.validate()?;
        Ok(())
    }
}
