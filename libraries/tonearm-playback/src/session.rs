//! Playback session state
//!
//! The single mutable aggregate every component reads from and writes to.
//! It is passed explicitly to the sequencer and the transition controller.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSession {
    catalog_len: usize,
    current_index: usize,
    is_playing: bool,
    current_time: f64,
    duration: f64,
    volume: f32,
    playback_rate: f32,
    is_looping: bool,
    is_shuffled: bool,
}

impl PlaybackSession {
    /// Session at track 0, paused, full volume, normal speed
    pub fn new(catalog_len: usize) -> Self {
        Self {
            catalog_len,
            current_index: 0,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            playback_rate: 1.0,
            is_looping: false,
            is_shuffled: false,
        }
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog_len
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Point the session at another catalog track
    pub fn set_current_index(&mut self, index: usize) -> Result<()> {
        if index >= self.catalog_len {
            return Err(PlaybackError::invalid_argument(format!(
                "track index {index} out of range (catalog has {} tracks)",
                self.catalog_len
            )));
        }
        self.current_index = index;
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Position in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Negative and non-finite values become 0
    pub fn set_current_time(&mut self, seconds: f64) {
        self.current_time = non_negative(seconds);
    }

    /// Media duration in seconds (0 until metadata loads)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = non_negative(seconds);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Clamped into [0, 1]; NaN is treated as silence
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    pub fn playback_rate(&self) -> f32 {
        self.playback_rate
    }

    /// Reject zero, negative and non-finite rates
    pub fn set_playback_rate(&mut self, rate: f32) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PlaybackError::invalid_argument(format!(
                "playback rate must be positive, got {rate}"
            )));
        }
        self.playback_rate = rate;
        Ok(())
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.is_looping = looping;
    }

    pub fn is_shuffled(&self) -> bool {
        self.is_shuffled
    }

    pub fn set_shuffled(&mut self, shuffled: bool) {
        self.is_shuffled = shuffled;
    }

    /// Back to the session start state; duration is kept for the host to refresh
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.is_playing = false;
        self.current_time = 0.0;
        self.volume = 1.0;
        self.playback_rate = 1.0;
        self.is_looping = false;
        self.is_shuffled = false;
    }
}

fn non_negative(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}
