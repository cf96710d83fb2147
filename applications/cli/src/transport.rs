//! Simulated media element

use tonearm_playback::{MediaTransport, PlaybackError, Result};
use tracing::trace;

/// Media element stand-in driven by the simulation clock
///
/// `block_autoplay` makes every `play()` fail, as a browser does before the
/// first user gesture.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    source: Option<String>,
    paused: bool,
    position: f64,
    volume: f32,
    rate: f32,
    looping: bool,
    pub block_autoplay: bool,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self {
            source: None,
            paused: true,
            position: 0.0,
            volume: 1.0,
            rate: 1.0,
            looping: false,
            block_autoplay: false,
        }
    }
}

impl SimulatedTransport {
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Move the playhead forward by `seconds` of wall time
    ///
    /// Returns true when the media reached `duration` and stopped. A looping
    /// element wraps around instead.
    pub fn advance(&mut self, seconds: f64, duration: f64) -> bool {
        if self.paused {
            return false;
        }
        self.position += seconds * f64::from(self.rate);
        if duration <= 0.0 || self.position < duration {
            return false;
        }
        if self.looping {
            self.position %= duration;
            return false;
        }
        self.position = duration;
        self.paused = true;
        true
    }
}

impl MediaTransport for SimulatedTransport {
    fn load(&mut self, url: &str) {
        trace!(url, "Loading media");
        self.source = Some(url.to_string());
        self.paused = true;
        self.position = 0.0;
    }

    fn play(&mut self) -> Result<()> {
        if self.block_autoplay {
            return Err(PlaybackError::transport("play() was blocked by autoplay policy"));
        }
        if self.source.is_none() {
            return Err(PlaybackError::transport("no media loaded"));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds.max(0.0);
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn playback_rate(&self) -> f32 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    fn is_looping(&self) -> bool {
        self.looping
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}
