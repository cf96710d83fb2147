//! Tonearm Playback
//!
//! Headless playback engine for a single-page music player: session state,
//! the play queue, shuffle sequencing, fade transitions between tracks,
//! lyrics bookkeeping and the [`Player`] orchestrator that ties them to the
//! audio graph.
//!
//! The host owns the real media element and implements [`MediaTransport`]
//! for it. Everything runs on the host's single execution context: intents,
//! media events, the fade timer and the audio callback are all plain method
//! calls on [`Player`].
//!
//! # Example
//!
//! ```rust
//! use tonearm_core::{Catalog, Theme, ThemeStore, Track};
//! use tonearm_playback::{MediaEvent, MediaTransport, Player, PlayerConfig, PlayerEvent};
//!
//! #[derive(Default)]
//! struct Element { paused: bool, position: f64, volume: f32, rate: f32, looping: bool }
//!
//! impl MediaTransport for Element {
//!     fn load(&mut self, _url: &str) { self.paused = true; self.position = 0.0; }
//!     fn play(&mut self) -> tonearm_playback::Result<()> { self.paused = false; Ok(()) }
//!     fn pause(&mut self) { self.paused = true; }
//!     fn is_paused(&self) -> bool { self.paused }
//!     fn seek(&mut self, seconds: f64) { self.position = seconds; }
//!     fn position(&self) -> f64 { self.position }
//!     fn volume(&self) -> f32 { self.volume }
//!     fn set_volume(&mut self, volume: f32) { self.volume = volume; }
//!     fn playback_rate(&self) -> f32 { self.rate }
//!     fn set_playback_rate(&mut self, rate: f32) { self.rate = rate; }
//!     fn is_looping(&self) -> bool { self.looping }
//!     fn set_looping(&mut self, looping: bool) { self.looping = looping; }
//! }
//!
//! struct NoTheme;
//!
//! impl ThemeStore for NoTheme {
//!     fn load(&self) -> tonearm_core::Result<Option<Theme>> { Ok(None) }
//!     fn save(&mut self, _theme: Theme) -> tonearm_core::Result<()> { Ok(()) }
//! }
//!
//! let catalog = Catalog::new(vec![
//!     Track::new("Moment", "Serge Quadrado", "moment.mp3"),
//!     Track::new("Just Relax", "Lesfm", "relax.mp3"),
//! ])
//! .unwrap();
//!
//! let mut player =
//!     Player::new(catalog, PlayerConfig::default(), Element::default(), Box::new(NoTheme)).unwrap();
//!
//! player.next().unwrap();
//! player.handle_media_event(MediaEvent::CanPlayThrough).unwrap();
//! while player.is_busy() {
//!     player.tick();
//! }
//!
//! assert_eq!(player.session().current_index(), 1);
//! assert!(player
//!     .drain_events()
//!     .iter()
//!     .any(|e| matches!(e, PlayerEvent::TransitionCompleted { index: 1 })));
//! ```

#![forbid(unsafe_code)]

mod error;
pub mod events;
pub mod lyrics;
mod player;
pub mod queue;
pub mod sequencer;
pub mod session;
pub mod shuffle;
pub mod transition;
pub mod transport;
pub mod types;

pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use lyrics::{
    normalize_lyrics, LyricsOutcome, LyricsRequest, LyricsTicket, LyricsTracker, FAILED_TEXT,
    LOADING_TEXT, NOT_FOUND_TEXT,
};
pub use player::Player;
pub use queue::PlayQueue;
pub use sequencer::Sequencer;
pub use session::PlaybackSession;
pub use shuffle::ShufflePermutation;
pub use transition::{RejectReason, TransitionController, TransitionSignal, TransitionState};
pub use transport::{MediaEvent, MediaTransport};
pub use types::{FadeSettings, PlayerConfig, PLAYBACK_RATES};
