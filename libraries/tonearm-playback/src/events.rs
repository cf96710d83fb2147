//! Player Events
//!
//! Event-based communication for UI synchronization. Events queue up inside
//! the player and are drained by the host after each call:
//! - Play/pause state and track changes
//! - Transition start/completion (transport controls disabled in between)
//! - Queue length (the queue badge)
//! - Position and duration updates
//! - Lyrics lookups the host should run

use crate::lyrics::LyricsRequest;
use serde::{Deserialize, Serialize};
use tonearm_core::Theme;

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playing flag changed
    StateChanged { playing: bool },

    /// The current track changed (emitted at the swap point of a transition)
    TrackChanged {
        index: usize,
        previous: Option<usize>,
        title: String,
        artist: String,
    },

    /// A transition began; controls should be treated as disabled
    TransitionStarted { from: usize, to: usize },

    /// The transition finished; controls are live again
    TransitionCompleted { index: usize },

    /// Queue changed (tracks added/removed/reordered)
    QueueChanged { length: usize },

    /// Volume changed (0.0-1.0)
    VolumeChanged { volume: f32 },

    PlaybackRateChanged { rate: f32 },

    /// Loop or shuffle flag changed
    ModesChanged { looping: bool, shuffled: bool },

    /// Position update, in seconds
    PositionUpdate { position: f64, duration: f64 },

    /// Media duration became known
    DurationChanged { duration: f64 },

    /// The transport refused to start playback
    PlaybackStartFailed { message: String },

    /// Equalizer gains or the enabled flag changed
    EqualizerChanged { gains: Vec<f32>, enabled: bool },

    /// The host should look up lyrics
    LyricsRequested(LyricsRequest),

    /// Displayed lyrics text changed
    LyricsUpdated { text: String },

    ThemeChanged { theme: Theme },
}
