//! Player orchestrator
//!
//! Owns every playback component and translates user intents and host
//! callbacks into calls on them. The host drives it from one execution context:
//!
//! - user intents: [`Player::play_pause`], [`Player::next`], [`Player::select`], ...
//! - media element notifications: [`Player::handle_media_event`]
//! - fade timer: [`Player::tick`] every [`Player::tick_interval`]
//! - audio callback: [`Player::process_audio`]
//! - display frame: [`Player::render_frame`]
//!
//! After each call the host drains [`PlayerEvent`]s to update its UI.

use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::lyrics::{LyricsOutcome, LyricsTicket, LyricsTracker};
use crate::queue::PlayQueue;
use crate::sequencer::Sequencer;
use crate::session::PlaybackSession;
use crate::transition::{TransitionController, TransitionSignal, TransitionState};
use crate::transport::{MediaEvent, MediaTransport};
use crate::types::PlayerConfig;
use std::time::Duration;
use tonearm_audio::{
    default_bands, EqPreset, EqualizerState, FrequencyRenderer, GraphSettings, SignalGraph,
    VisualizerSampler,
};
use tonearm_core::{format_time, Catalog, Theme, ThemeStore, Track};
use tracing::{debug, info, warn};

/// Headless player session
pub struct Player<T: MediaTransport> {
    catalog: Catalog,
    config: PlayerConfig,
    session: PlaybackSession,
    queue: PlayQueue,
    sequencer: Sequencer,
    transitions: TransitionController,
    graph: SignalGraph,
    visualizer: VisualizerSampler,
    transport: T,
    lyrics: LyricsTracker,
    theme: Theme,
    theme_store: Box<dyn ThemeStore>,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl<T: MediaTransport> Player<T> {
    /// Create a player positioned on the first catalog track, paused
    ///
    /// Loads the first track into the transport and issues its lyrics request.
    pub fn new(
        catalog: Catalog,
        config: PlayerConfig,
        transport: T,
        theme_store: Box<dyn ThemeStore>,
    ) -> Result<Self> {
        config.validate()?;

        let graph = SignalGraph::new(GraphSettings {
            bands: default_bands(),
            analyser: config.analyser,
        })?;
        let visualizer = VisualizerSampler::new(graph.frequency_bin_count(), config.visualizer_visible);

        let theme = match theme_store.load() {
            Ok(stored) => stored.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "Could not load theme, using default");
                Theme::default()
            }
        };

        let mut session = PlaybackSession::new(catalog.len());
        session.set_volume(config.volume);

        let mut player = Self {
            catalog,
            transitions: TransitionController::new(config.fade),
            config,
            session,
            queue: PlayQueue::new(),
            sequencer: Sequencer::new(),
            graph,
            visualizer,
            transport,
            lyrics: LyricsTracker::new(),
            theme,
            theme_store,
            pending_events: Vec::new(),
        };

        player.transport.set_volume(player.session.volume());
        player.transport.set_playback_rate(player.session.playback_rate());
        player.transport.set_looping(false);
        if let Some(track) = player.catalog.get(0) {
            player.transport.load(&track.media_url);
        }
        player.start_lyrics(0);

        info!(tracks = player.catalog.len(), theme = %player.theme, "Player created");
        Ok(player)
    }

    /// Use a deterministic shuffle order
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.sequencer = Sequencer::with_seed(seed);
        self
    }

    // ===== Transport Intents =====

    /// Toggle between playing and paused; ignored during a transition
    pub fn play_pause(&mut self) {
        if self.transitions.is_busy() {
            debug!("Play/pause ignored during transition");
            return;
        }
        if self.session.is_playing() {
            self.transport.pause();
            self.session.set_playing(false);
            self.emit(PlayerEvent::StateChanged { playing: false });
        } else {
            self.start_playback();
        }
    }

    /// Advance to the queue front, the next shuffled track or the next catalog track
    pub fn next(&mut self) -> Result<()> {
        if self.transitions.is_busy() {
            debug!("Next ignored during transition");
            return Ok(());
        }
        let before = self.queue.len();
        let target = self.sequencer.next(&self.session, &mut self.queue);
        if self.queue.len() != before {
            self.emit_queue_changed();
        }
        self.begin_transition(target)
    }

    /// Go back one track in shuffle or catalog order
    pub fn previous(&mut self) -> Result<()> {
        if self.transitions.is_busy() {
            debug!("Previous ignored during transition");
            return Ok(());
        }
        let target = self.sequencer.prev(&self.session);
        self.begin_transition(target)
    }

    /// Jump to a catalog track; selecting the current track toggles play/pause
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.catalog.check_index(index)?;
        if index == self.session.current_index() {
            self.play_pause();
            return Ok(());
        }
        if self.transitions.is_busy() {
            debug!(index, "Selection ignored during transition");
            return Ok(());
        }
        self.begin_transition(index)
    }

    /// Move the playback position (clamped to the known duration)
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() {
            return Err(PlaybackError::invalid_argument(format!(
                "seek position must be finite, got {seconds}"
            )));
        }
        if self.transitions.is_busy() {
            debug!(seconds, "Seek ignored during transition");
            return Ok(());
        }
        let duration = self.session.duration();
        let target = if duration > 0.0 {
            seconds.clamp(0.0, duration)
        } else {
            seconds.max(0.0)
        };
        self.transport.seek(target);
        self.session.set_current_time(target);
        self.emit_position();
        Ok(())
    }

    /// Set the output volume (clamped to [0, 1])
    ///
    /// During a transition the value is stored and applied once the fade ends.
    pub fn set_volume(&mut self, volume: f32) {
        self.session.set_volume(volume);
        if !self.transitions.is_busy() {
            self.transport.set_volume(self.session.volume());
        }
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.session.volume(),
        });
    }

    pub fn set_playback_rate(&mut self, rate: f32) -> Result<()> {
        self.session.set_playback_rate(rate)?;
        self.transport.set_playback_rate(rate);
        self.emit(PlayerEvent::PlaybackRateChanged { rate });
        Ok(())
    }

    pub fn toggle_loop(&mut self) {
        let looping = !self.session.is_looping();
        self.session.set_looping(looping);
        self.transport.set_looping(looping);
        self.emit_modes();
    }

    /// Turning shuffle on draws a fresh permutation
    pub fn toggle_shuffle(&mut self) {
        let shuffled = !self.session.is_shuffled();
        self.session.set_shuffled(shuffled);
        if shuffled {
            self.sequencer.regenerate(self.catalog.len());
        }
        self.emit_modes();
    }

    /// Whether the "skip intro" control should be offered
    pub fn skip_intro_available(&self) -> bool {
        let Some(intro) = self.current_track().and_then(|t| t.intro_duration) else {
            return false;
        };
        let time = self.session.current_time();
        self.session.is_playing() && time > 1.0 && time < intro
    }

    /// Seek past the current track's intro; returns whether a seek happened
    pub fn skip_intro(&mut self) -> bool {
        let Some(intro) = self
            .current_track()
            .and_then(|t| t.intro_duration)
            .filter(|&s| s > 0.0)
        else {
            return false;
        };
        if self.transitions.is_busy() {
            return false;
        }
        self.transport.seek(intro);
        self.session.set_current_time(intro);
        self.emit_position();
        true
    }

    /// Restore the initial session: first track, paused, empty queue, defaults
    ///
    /// Ignored while a transition is in flight.
    pub fn reset(&mut self) -> Result<()> {
        if self.transitions.is_busy() {
            debug!("Reset ignored during transition");
            return Ok(());
        }
        let previous = self.session.current_index();

        self.transport.pause();
        self.session.reset();
        self.queue.clear();
        self.transport.set_volume(self.session.volume());
        self.transport.set_playback_rate(self.session.playback_rate());
        self.transport.set_looping(false);
        self.graph.apply(EqPreset::Flat)?;
        self.graph.set_enabled(true);

        if previous != 0 {
            self.session.set_duration(0.0);
            self.on_track_changed(Some(previous), 0);
        }
        self.transport.seek(0.0);

        info!("Player reset");
        self.emit(PlayerEvent::StateChanged { playing: false });
        self.emit_queue_changed();
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.session.volume(),
        });
        self.emit(PlayerEvent::PlaybackRateChanged {
            rate: self.session.playback_rate(),
        });
        self.emit_modes();
        self.emit_equalizer();
        self.emit_position();
        Ok(())
    }

    // ===== Queue Intents =====

    /// Queue a catalog track; returns whether the queue changed
    pub fn enqueue(&mut self, index: usize) -> Result<bool> {
        self.catalog.check_index(index)?;
        let changed = self.queue.enqueue(index, self.session.current_index());
        if changed {
            self.emit_queue_changed();
        }
        Ok(changed)
    }

    pub fn remove_from_queue(&mut self, index: usize) -> Result<bool> {
        self.catalog.check_index(index)?;
        let changed = self.queue.remove(index);
        if changed {
            self.emit_queue_changed();
        }
        Ok(changed)
    }

    pub fn reorder_queue(&mut self, from: usize, to: usize) -> Result<()> {
        self.queue.reorder(from, to)?;
        if from != to {
            self.emit_queue_changed();
        }
        Ok(())
    }

    pub fn clear_queue(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        self.queue.clear();
        self.emit_queue_changed();
    }

    // ===== Equalizer Intents =====

    pub fn set_band_gain(&mut self, band: usize, gain_db: f32) -> Result<f32> {
        let stored = self.graph.set_band_gain(band, gain_db)?;
        self.emit_equalizer();
        Ok(stored)
    }

    pub fn set_eq_enabled(&mut self, enabled: bool) {
        self.graph.set_enabled(enabled);
        self.emit_equalizer();
    }

    pub fn apply_preset(&mut self, name: &str) -> Result<EqPreset> {
        let preset = self.graph.apply_preset(name)?;
        self.emit_equalizer();
        Ok(preset)
    }

    /// Every band back to 0 dB
    pub fn reset_eq(&mut self) -> Result<()> {
        self.graph.reset()?;
        self.emit_equalizer();
        Ok(())
    }

    // ===== Theme =====

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip and persist the theme; the in-memory value only changes if saving worked
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.theme_store.save(theme)?;
        self.theme = theme;
        self.emit(PlayerEvent::ThemeChanged { theme });
        Ok(theme)
    }

    // ===== Lyrics =====

    /// Displayed lyrics text for the current track
    pub fn lyrics_text(&self) -> &str {
        self.lyrics.text()
    }

    pub fn lyrics(&self) -> &LyricsTracker {
        &self.lyrics
    }

    /// Deliver a lookup result; stale tickets are ignored
    pub fn resolve_lyrics(&mut self, ticket: LyricsTicket, outcome: LyricsOutcome) -> bool {
        let accepted = self.lyrics.resolve(ticket, outcome);
        if accepted {
            let text = self.lyrics.text().to_string();
            self.emit(PlayerEvent::LyricsUpdated { text });
        }
        accepted
    }

    // ===== Host Callbacks =====

    /// Feed a media element notification
    pub fn handle_media_event(&mut self, event: MediaEvent) -> Result<()> {
        match event {
            MediaEvent::TimeUpdated { position } => {
                self.session.set_current_time(position);
                self.emit_position();
            }
            MediaEvent::MetadataLoaded { duration } => {
                self.session.set_duration(duration);
                self.emit(PlayerEvent::DurationChanged {
                    duration: self.session.duration(),
                });
            }
            MediaEvent::Ended => return self.on_ended(),
            MediaEvent::CanPlayThrough => {
                let signals = self.transitions.on_media_ready(&mut self.session, &mut self.transport);
                self.apply_signals(signals);
            }
        }
        Ok(())
    }

    /// Fade timer callback
    pub fn tick(&mut self) {
        let signals = self.transitions.on_tick(&mut self.session, &mut self.transport);
        self.apply_signals(signals);
    }

    /// How often the host should call [`Player::tick`] during a transition
    pub fn tick_interval(&self) -> Duration {
        self.config.fade.step_interval()
    }

    /// Build the signal graph on the first user gesture
    pub fn attach_audio(&mut self, sample_rate: u32) -> Result<bool> {
        self.graph.attach(sample_rate).map_err(PlaybackError::from)
    }

    /// Audio callback: run interleaved stereo samples through the equalizer chain
    pub fn process_audio(&mut self, buffer: &mut [f32]) {
        self.graph.process(buffer);
    }

    /// Display frame callback; returns whether the renderer was drawn to
    pub fn render_frame(&mut self, renderer: &mut dyn FrequencyRenderer) -> bool {
        self.visualizer.set_playing(self.session.is_playing());
        self.visualizer.on_frame(&mut self.graph, renderer)
    }

    pub fn set_visualizer_visible(&mut self, visible: bool) {
        self.visualizer.set_visible(visible);
    }

    pub fn visualizer_visible(&self) -> bool {
        self.visualizer.is_visible()
    }

    // ===== Event Handling =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== State Queries =====

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.catalog.get(self.session.current_index())
    }

    pub fn transition_state(&self) -> TransitionState {
        self.transitions.state()
    }

    /// True while a transition runs; seek and transport controls should be disabled
    pub fn is_busy(&self) -> bool {
        self.transitions.is_busy()
    }

    pub fn graph(&self) -> &SignalGraph {
        &self.graph
    }

    pub fn equalizer(&self) -> &EqualizerState {
        self.graph.equalizer()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Shuffle order currently in effect, if shuffle was ever enabled
    pub fn shuffle_order(&self) -> Option<&[usize]> {
        self.sequencer.permutation().map(|p| p.as_slice())
    }

    /// Elapsed time as "MM:SS"
    pub fn elapsed_label(&self) -> String {
        format_time(self.session.current_time())
    }

    /// Media duration as "MM:SS"
    pub fn duration_label(&self) -> String {
        format_time(self.session.duration())
    }

    /// Catalog search by title or artist
    pub fn search(&self, query: &str) -> Vec<(usize, &Track)> {
        self.catalog.search(query)
    }

    // ===== Internal =====

    fn begin_transition(&mut self, target: usize) -> Result<()> {
        let signals = self
            .transitions
            .request(target, &mut self.session, &mut self.transport)?;
        self.apply_signals(signals);
        Ok(())
    }

    fn apply_signals(&mut self, signals: Vec<TransitionSignal>) {
        for signal in signals {
            match signal {
                TransitionSignal::Started { from, to } => {
                    self.emit(PlayerEvent::TransitionStarted { from, to });
                }
                TransitionSignal::TrackChanged { previous, current } => {
                    self.on_track_changed(Some(previous), current);
                }
                TransitionSignal::PlaybackStarted => {
                    self.emit(PlayerEvent::StateChanged { playing: true });
                }
                TransitionSignal::StartFailed(message) => {
                    self.emit(PlayerEvent::PlaybackStartFailed { message });
                    self.emit(PlayerEvent::StateChanged { playing: false });
                }
                TransitionSignal::Completed { track } => {
                    self.apply_deferred_volume();
                    self.emit(PlayerEvent::TransitionCompleted { index: track });
                }
                TransitionSignal::Rejected(reason) => {
                    debug!(?reason, "Transition request rejected");
                }
            }
        }
    }

    fn on_track_changed(&mut self, previous: Option<usize>, current: usize) {
        let Some(track) = self.catalog.get(current).cloned() else {
            warn!(current, "Track change to an index outside the catalog");
            return;
        };
        self.transport.load(&track.media_url);
        self.transport.set_playback_rate(self.session.playback_rate());
        self.graph.clear_history();

        self.emit(PlayerEvent::TrackChanged {
            index: current,
            previous,
            title: track.title,
            artist: track.artist,
        });
        self.start_lyrics(current);
    }

    fn start_lyrics(&mut self, index: usize) {
        let Some(track) = self.catalog.get(index) else {
            return;
        };
        if let Some(request) = self.lyrics.begin(index, track) {
            self.pending_events.push(PlayerEvent::LyricsRequested(request));
        }
        self.pending_events.push(PlayerEvent::LyricsUpdated {
            text: self.lyrics.text().to_string(),
        });
    }

    fn on_ended(&mut self) -> Result<()> {
        if self.session.is_looping() {
            debug!("Track ended with loop on, restarting");
            self.transport.seek(0.0);
            self.session.set_current_time(0.0);
            self.emit_position();
            self.start_playback();
            return Ok(());
        }
        self.next()
    }

    fn start_playback(&mut self) -> bool {
        match self.transport.play() {
            Ok(()) => {
                self.session.set_playing(true);
                self.emit(PlayerEvent::StateChanged { playing: true });
                true
            }
            Err(err) => {
                warn!(error = %err, "Playback start refused");
                self.session.set_playing(false);
                self.emit(PlayerEvent::PlaybackStartFailed {
                    message: err.to_string(),
                });
                false
            }
        }
    }

    /// Volume changes made mid-transition take effect once it completes
    fn apply_deferred_volume(&mut self) {
        let volume = self.session.volume();
        if self.transport.volume() != volume {
            debug!(volume, "Applying volume set during transition");
            self.transport.set_volume(volume);
        }
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn emit_queue_changed(&mut self) {
        self.emit(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn emit_modes(&mut self) {
        self.emit(PlayerEvent::ModesChanged {
            looping: self.session.is_looping(),
            shuffled: self.session.is_shuffled(),
        });
    }

    fn emit_position(&mut self) {
        self.emit(PlayerEvent::PositionUpdate {
            position: self.session.current_time(),
            duration: self.session.duration(),
        });
    }

    fn emit_equalizer(&mut self) {
        self.emit(PlayerEvent::EqualizerChanged {
            gains: self.graph.equalizer().gains().to_vec(),
            enabled: self.graph.is_enabled(),
        });
    }
}
