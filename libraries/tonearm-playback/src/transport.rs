//! Host media transport
//!
//! Abstracts the media element that actually decodes and plays audio
//! (an `<audio>` element in a browser, a decoder + output stream natively).
//! The player drives it through this trait and is fed back through
//! [`MediaEvent`]s.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Platform media element
pub trait MediaTransport {
    /// Replace the current media source
    fn load(&mut self, url: &str);

    /// Start or resume playback
    ///
    /// # Returns
    /// * `Ok(())` - Playback started
    /// * `Err(_)` - The host refused (e.g. autoplay blocked)
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Jump to a position in seconds
    fn seek(&mut self, seconds: f64);

    /// Current position in seconds
    fn position(&self) -> f64;

    /// Output volume (0.0-1.0)
    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    fn playback_rate(&self) -> f32;

    fn set_playback_rate(&mut self, rate: f32);

    fn is_looping(&self) -> bool;

    fn set_looping(&mut self, looping: bool);
}

/// Notifications from the media element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Playback position moved
    TimeUpdated { position: f64 },

    /// Duration became known after a load
    MetadataLoaded { duration: f64 },

    /// Reached the end of the media
    Ended,

    /// Enough data buffered to play through
    CanPlayThrough,
}
