//! Headless player session driven by a script and a simulated clock
//!
//! Stands in for the host page: it forwards intents, plays the media element's
//! part (metadata, readiness, time updates, natural end), runs the fade timer,
//! feeds the audio callback and answers lyrics lookups from the catalog.

use crate::script::ScriptCommand;
use crate::transport::SimulatedTransport;
use anyhow::{bail, Result};
use serde::Serialize;
use tonearm_audio::FrequencyRenderer;
use tonearm_core::{parse_time, Catalog, Theme, ThemeStore};
use tonearm_playback::{
    LyricsOutcome, MediaEvent, MediaTransport, Player, PlayerConfig, PlayerEvent, TransitionState,
};
use tracing::{debug, info, warn};

pub const SAMPLE_RATE: u32 = 44_100;

/// Simulation clock resolution
const STEP_SECONDS: f64 = 0.25;
const FRAMES_PER_STEP: usize = 1024;
/// Media length assumed when a track has no duration label
const DEFAULT_DURATION: f64 = 180.0;
const TONE_HZ: f32 = 440.0;
const MAX_SETTLE_STEPS: usize = 10_000;

/// Renderer that keeps the last spectrum frame
#[derive(Debug, Default)]
pub struct SpectrumRecorder {
    pub frames: usize,
    pub clears: usize,
    pub last: Vec<u8>,
}

impl SpectrumRecorder {
    /// Loudest bin of the last frame
    pub fn peak_bin(&self) -> Option<usize> {
        self.last
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0)
            .max_by_key(|(_, v)| **v)
            .map(|(i, _)| i)
    }
}

impl FrequencyRenderer for SpectrumRecorder {
    fn draw(&mut self, bins: &[u8]) {
        self.frames += 1;
        self.last.clear();
        self.last.extend_from_slice(bins);
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.last.clear();
    }
}

/// End-of-run snapshot printed by `tonearm simulate`
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub clock: f64,
    pub track: usize,
    pub title: String,
    pub elapsed: String,
    pub duration: String,
    pub playing: bool,
    pub queue: Vec<usize>,
    pub volume: f32,
    pub rate: f32,
    pub looping: bool,
    pub shuffled: bool,
    pub eq_gains: Vec<f32>,
    pub eq_enabled: bool,
    pub theme: Theme,
    pub lyrics: String,
    pub frames_drawn: usize,
    pub peak_bin: Option<usize>,
}

pub struct Simulation {
    player: Player<SimulatedTransport>,
    renderer: SpectrumRecorder,
    clock: f64,
    phase: f32,
    events: Vec<PlayerEvent>,
}

impl Simulation {
    pub fn new(catalog: Catalog, config: PlayerConfig, theme_store: Box<dyn ThemeStore>) -> Result<Self> {
        let player = Player::new(catalog, config, SimulatedTransport::default(), theme_store)?;
        let mut simulation = Self {
            player,
            renderer: SpectrumRecorder::default(),
            clock: 0.0,
            phase: 0.0,
            events: Vec::new(),
        };
        simulation.announce_metadata()?;
        simulation.collect();
        Ok(simulation)
    }

    /// Use a deterministic shuffle order
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.player = self.player.with_shuffle_seed(seed);
        self
    }

    pub fn player(&self) -> &Player<SimulatedTransport> {
        &self.player
    }

    pub fn renderer(&self) -> &SpectrumRecorder {
        &self.renderer
    }

    /// Simulated seconds elapsed
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Events emitted since the last call
    pub fn take_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run every command; failures are logged and counted
    pub fn run(&mut self, commands: &[ScriptCommand]) -> usize {
        let mut failures = 0;
        for command in commands {
            if let Err(err) = self.apply(command) {
                warn!(?command, error = %format!("{err:#}"), "Command failed");
                failures += 1;
            }
        }
        failures
    }

    /// Apply one command and let any transition it started finish
    pub fn apply(&mut self, command: &ScriptCommand) -> Result<()> {
        debug!(?command, clock = self.clock, "Script command");
        let result = self.dispatch(command);
        self.settle()?;
        self.collect();
        result
    }

    pub fn summary(&self) -> SimulationSummary {
        let session = self.player.session();
        SimulationSummary {
            clock: self.clock,
            track: session.current_index(),
            title: self
                .player
                .current_track()
                .map(|t| t.title.clone())
                .unwrap_or_default(),
            elapsed: self.player.elapsed_label(),
            duration: self.player.duration_label(),
            playing: session.is_playing(),
            queue: self.player.queue().as_slice().to_vec(),
            volume: session.volume(),
            rate: session.playback_rate(),
            looping: session.is_looping(),
            shuffled: session.is_shuffled(),
            eq_gains: self.player.equalizer().gains().to_vec(),
            eq_enabled: self.player.equalizer().is_enabled(),
            theme: self.player.theme(),
            lyrics: self.player.lyrics_text().to_string(),
            frames_drawn: self.renderer.frames,
            peak_bin: self.renderer.peak_bin(),
        }
    }

    fn dispatch(&mut self, command: &ScriptCommand) -> Result<()> {
        match command {
            ScriptCommand::Play => {
                self.gesture()?;
                self.player.play_pause();
            }
            ScriptCommand::Next => {
                self.gesture()?;
                self.player.next()?;
            }
            ScriptCommand::Prev => {
                self.gesture()?;
                self.player.previous()?;
            }
            ScriptCommand::Select(index) => {
                self.gesture()?;
                self.player.select(*index)?;
            }
            ScriptCommand::Seek(seconds) => self.player.seek(*seconds)?,
            ScriptCommand::Volume(volume) => self.player.set_volume(*volume),
            ScriptCommand::Rate(rate) => self.player.set_playback_rate(*rate)?,
            ScriptCommand::Loop => self.player.toggle_loop(),
            ScriptCommand::Shuffle => self.player.toggle_shuffle(),
            ScriptCommand::Enqueue(index) => {
                self.player.enqueue(*index)?;
            }
            ScriptCommand::Dequeue(index) => {
                self.player.remove_from_queue(*index)?;
            }
            ScriptCommand::Move { from, to } => self.player.reorder_queue(*from, *to)?,
            ScriptCommand::ClearQueue => self.player.clear_queue(),
            ScriptCommand::Preset(name) => {
                self.player.apply_preset(name)?;
            }
            ScriptCommand::Band { band, gain_db } => {
                self.player.set_band_gain(*band, *gain_db)?;
            }
            ScriptCommand::Eq(enabled) => self.player.set_eq_enabled(*enabled),
            ScriptCommand::Visualizer(visible) => self.player.set_visualizer_visible(*visible),
            ScriptCommand::SkipIntro => {
                if !self.player.skip_intro() {
                    info!("Current track has no intro to skip");
                }
            }
            ScriptCommand::Advance(seconds) => self.advance(*seconds)?,
            ScriptCommand::Autoplay(allowed) => {
                self.player.transport_mut().block_autoplay = !allowed;
            }
            ScriptCommand::Theme => {
                self.player.toggle_theme()?;
            }
            ScriptCommand::Reset => self.player.reset()?,
        }
        Ok(())
    }

    /// First user gesture builds the audio graph
    fn gesture(&mut self) -> Result<()> {
        if self.player.attach_audio(SAMPLE_RATE)? {
            info!(sample_rate = SAMPLE_RATE, "Audio graph attached");
        }
        Ok(())
    }

    fn advance(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || seconds < 0.0 {
            bail!("cannot advance by {seconds} seconds");
        }
        let mut remaining = seconds;
        while remaining > 0.0 {
            let dt = remaining.min(STEP_SECONDS);
            remaining -= dt;
            self.clock += dt;

            let duration = self.current_duration();
            let ended = self.player.transport_mut().advance(dt, duration);
            let position = self.player.transport().position();
            self.player
                .handle_media_event(MediaEvent::TimeUpdated { position })?;
            self.render_step();

            if ended {
                self.player.handle_media_event(MediaEvent::Ended)?;
                self.settle()?;
            }
            self.collect();
        }
        Ok(())
    }

    /// Play the media element's part until no transition is in flight
    fn settle(&mut self) -> Result<()> {
        for _ in 0..MAX_SETTLE_STEPS {
            match self.player.transition_state() {
                TransitionState::Idle => return Ok(()),
                TransitionState::Swapping { .. } => {
                    self.announce_metadata()?;
                    self.player.handle_media_event(MediaEvent::CanPlayThrough)?;
                }
                TransitionState::FadingOut { .. } | TransitionState::FadingIn { .. } => {
                    self.player.tick();
                    self.clock += self.player.tick_interval().as_secs_f64();
                }
            }
        }
        bail!("transition did not settle")
    }

    fn announce_metadata(&mut self) -> Result<()> {
        let duration = self.current_duration();
        self.player
            .handle_media_event(MediaEvent::MetadataLoaded { duration })?;
        Ok(())
    }

    fn current_duration(&self) -> f64 {
        self.player
            .current_track()
            .and_then(|t| parse_time(&t.duration_label))
            .unwrap_or(DEFAULT_DURATION)
    }

    fn render_step(&mut self) {
        let mut buffer = vec![0.0f32; FRAMES_PER_STEP * 2];
        let transport = self.player.transport();
        if !transport.is_paused() {
            let gain = transport.volume() * 0.5;
            let increment = std::f32::consts::TAU * TONE_HZ / SAMPLE_RATE as f32;
            for frame in buffer.chunks_exact_mut(2) {
                let sample = self.phase.sin() * gain;
                frame[0] = sample;
                frame[1] = sample;
                self.phase = (self.phase + increment) % std::f32::consts::TAU;
            }
        }
        self.player.process_audio(&mut buffer);
        self.player.render_frame(&mut self.renderer);
    }

    /// Gather player events, answering lyrics lookups from the catalog fallback
    fn collect(&mut self) {
        loop {
            let events = self.player.drain_events();
            if events.is_empty() {
                return;
            }
            for event in events {
                if let PlayerEvent::LyricsRequested(request) = &event {
                    let outcome = match &request.fallback {
                        Some(text) => LyricsOutcome::Found(text.clone()),
                        None => LyricsOutcome::NotFound,
                    };
                    self.player.resolve_lyrics(request.ticket, outcome);
                }
                self.events.push(event);
            }
        }
    }
}
