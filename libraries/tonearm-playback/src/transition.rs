//! Track transition state machine
//!
//! ```text
//! Idle ──request──▶ FadingOut ──vol ≤ 0──▶ Swapping ──media ready──▶ FadingIn ──vol ≥ target──▶ Idle
//!          │                                  ▲
//!          └── paused / at start / silent ────┘
//! ```
//!
//! Fades are driven by the host calling [`TransitionController::on_tick`] every
//! [`FadeSettings::step_interval`]. Each step derives the next volume from the
//! transport's current volume. A fade ends when it crosses its end value or has
//! run its configured step count, whichever comes first, and always pins the
//! volume exactly to that end value. A transition in flight is never cancelled.

use crate::error::{PlaybackError, Result};
use crate::session::PlaybackSession;
use crate::transport::MediaTransport;
use crate::types::FadeSettings;
use tracing::{debug, info, warn};

/// Where the controller is in the fade protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    /// Ramping the outgoing track down
    FadingOut { from: usize, to: usize, step: u32 },
    /// Current index switched, waiting for the new media to be playable
    Swapping { from: usize, to: usize },
    /// Ramping the incoming track up
    FadingIn { to: usize, step: u32 },
}

/// Why a transition request was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Another transition is in flight
    Busy,
    /// Target is already the current track
    AlreadyCurrent,
}

/// What a controller call did, for the caller to act on
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionSignal {
    Started { from: usize, to: usize },
    /// The session now points at `current`; load its media
    TrackChanged { previous: usize, current: usize },
    PlaybackStarted,
    /// The transport refused to start the new track
    StartFailed(String),
    Completed { track: usize },
    Rejected(RejectReason),
}

#[derive(Debug, Clone)]
pub struct TransitionController {
    settings: FadeSettings,
    state: TransitionState,
    /// Volume change per fade step
    volume_step: f32,
    /// Volume the fade-in ends on, captured when the transition starts
    target_volume: f32,
}

impl TransitionController {
    pub fn new(settings: FadeSettings) -> Self {
        Self {
            settings,
            state: TransitionState::Idle,
            volume_step: 0.0,
            target_volume: 1.0,
        }
    }

    pub fn settings(&self) -> &FadeSettings {
        &self.settings
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// True while a transition is in flight
    pub fn is_busy(&self) -> bool {
        self.state != TransitionState::Idle
    }

    /// Fraction of the running fade completed (0 outside fades)
    pub fn progress(&self) -> f32 {
        match self.state {
            TransitionState::FadingOut { step, .. } | TransitionState::FadingIn { step, .. } => {
                step as f32 / self.steps() as f32
            }
            TransitionState::Idle | TransitionState::Swapping { .. } => 0.0,
        }
    }

    pub fn target_volume(&self) -> f32 {
        self.target_volume
    }

    /// Start moving to catalog track `target`
    ///
    /// Rejections come back as [`TransitionSignal::Rejected`] with no state
    /// change. An index outside the catalog is an error.
    pub fn request(
        &mut self,
        target: usize,
        session: &mut PlaybackSession,
        transport: &mut dyn MediaTransport,
    ) -> Result<Vec<TransitionSignal>> {
        if target >= session.catalog_len() {
            return Err(PlaybackError::invalid_argument(format!(
                "track index {target} out of range (catalog has {} tracks)",
                session.catalog_len()
            )));
        }
        if self.is_busy() {
            debug!(target, state = ?self.state, "Transition in flight, request ignored");
            return Ok(vec![TransitionSignal::Rejected(RejectReason::Busy)]);
        }
        let from = session.current_index();
        if target == from {
            debug!(target, "Already on requested track");
            return Ok(vec![TransitionSignal::Rejected(RejectReason::AlreadyCurrent)]);
        }

        self.target_volume = session.volume();
        let mut signals = vec![TransitionSignal::Started { from, to: target }];

        if transport.is_paused() || transport.position() <= 0.0 || transport.volume() <= 0.0 {
            debug!(from, to = target, "Nothing audible, skipping fade-out");
            self.swap(from, target, session, &mut signals);
        } else {
            self.volume_step = transport.volume() / self.steps() as f32;
            self.state = TransitionState::FadingOut {
                from,
                to: target,
                step: 0,
            };
            debug!(from, to = target, step = self.volume_step, "Fading out");
        }

        Ok(signals)
    }

    /// Advance the running fade by one step
    pub fn on_tick(
        &mut self,
        session: &mut PlaybackSession,
        transport: &mut dyn MediaTransport,
    ) -> Vec<TransitionSignal> {
        let mut signals = Vec::new();
        let steps = self.steps();

        match self.state {
            TransitionState::FadingOut { from, to, step } => {
                let step = step + 1;
                let next = transport.volume() - self.volume_step;
                if next <= 0.0 || step >= steps {
                    transport.set_volume(0.0);
                    transport.pause();
                    self.swap(from, to, session, &mut signals);
                } else {
                    transport.set_volume(next);
                    self.state = TransitionState::FadingOut { from, to, step };
                }
            }
            TransitionState::FadingIn { to, step } => {
                let step = step + 1;
                let next = transport.volume() + self.volume_step;
                if next >= self.target_volume || step >= steps {
                    transport.set_volume(self.target_volume);
                    self.finish(to, &mut signals);
                } else {
                    transport.set_volume(next);
                    self.state = TransitionState::FadingIn { to, step };
                }
            }
            TransitionState::Idle | TransitionState::Swapping { .. } => {}
        }

        signals
    }

    /// The new media can play through; start it and fade in
    pub fn on_media_ready(
        &mut self,
        session: &mut PlaybackSession,
        transport: &mut dyn MediaTransport,
    ) -> Vec<TransitionSignal> {
        let TransitionState::Swapping { to, .. } = self.state else {
            return Vec::new();
        };
        let mut signals = Vec::new();

        transport.set_volume(0.0);
        match transport.play() {
            Ok(()) => {
                session.set_playing(true);
                signals.push(TransitionSignal::PlaybackStarted);

                if self.target_volume <= 0.0 {
                    transport.set_volume(self.target_volume);
                    self.finish(to, &mut signals);
                } else {
                    self.volume_step = self.target_volume / self.steps() as f32;
                    self.state = TransitionState::FadingIn { to, step: 0 };
                    debug!(to, step = self.volume_step, "Fading in");
                }
            }
            Err(err) => {
                warn!(to, error = %err, "Could not start playback after track change");
                transport.set_volume(self.target_volume);
                session.set_playing(false);
                signals.push(TransitionSignal::StartFailed(err.to_string()));
                self.finish(to, &mut signals);
            }
        }

        signals
    }

    fn swap(
        &mut self,
        from: usize,
        to: usize,
        session: &mut PlaybackSession,
        signals: &mut Vec<TransitionSignal>,
    ) {
        if let Err(err) = session.set_current_index(to) {
            warn!(to, error = %err, "Transition target rejected by session");
            self.state = TransitionState::Idle;
            return;
        }
        session.set_current_time(0.0);
        session.set_duration(0.0);
        self.state = TransitionState::Swapping { from, to };
        info!(from, to, "Track changed");
        signals.push(TransitionSignal::TrackChanged {
            previous: from,
            current: to,
        });
    }

    fn finish(&mut self, track: usize, signals: &mut Vec<TransitionSignal>) {
        self.state = TransitionState::Idle;
        debug!(track, "Transition complete");
        signals.push(TransitionSignal::Completed { track });
    }

    fn steps(&self) -> u32 {
        self.settings.steps.max(1)
    }
}
