//! Shared fixtures for the playback integration tests

#![allow(dead_code)]

use tonearm_core::{Catalog, Theme, ThemeStore, Track};
use tonearm_playback::{
    MediaEvent, MediaTransport, PlaybackError, Player, PlayerConfig, TransitionState,
};

/// Media element stand-in that records every call
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    pub loaded: Vec<String>,
    pub paused: bool,
    pub position: f64,
    pub volume: f32,
    pub rate: f32,
    pub looping: bool,
    pub refuse_play: bool,
    pub volume_history: Vec<f32>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self {
            loaded: Vec::new(),
            paused: true,
            position: 0.0,
            volume: 1.0,
            rate: 1.0,
            looping: false,
            refuse_play: false,
            volume_history: Vec::new(),
        }
    }
}

impl MediaTransport for RecordingTransport {
    fn load(&mut self, url: &str) {
        self.loaded.push(url.to_string());
        self.paused = true;
        self.position = 0.0;
    }

    fn play(&mut self) -> tonearm_playback::Result<()> {
        if self.refuse_play {
            return Err(PlaybackError::transport("autoplay blocked"));
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
        self.position = seconds;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.volume_history.push(volume);
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

#[derive(Default)]
pub struct MemoryThemeStore {
    pub stored: Option<Theme>,
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> tonearm_core::Result<Option<Theme>> {
        Ok(self.stored)
    }

    fn save(&mut self, theme: Theme) -> tonearm_core::Result<()> {
        self.stored = Some(theme);
        Ok(())
    }
}

pub fn catalog(len: usize) -> Catalog {
    let tracks = (0..len)
        .map(|i| Track::new(format!("Track {i}"), format!("Artist {i}"), format!("track-{i}.mp3")))
        .collect();
    Catalog::new(tracks).unwrap()
}

pub fn player(len: usize) -> Player<RecordingTransport> {
    player_with(len, PlayerConfig::default())
}

pub fn player_with(len: usize, config: PlayerConfig) -> Player<RecordingTransport> {
    Player::new(
        catalog(len),
        config,
        RecordingTransport::default(),
        Box::new(MemoryThemeStore::default()),
    )
    .unwrap()
}

/// Put the player mid-song and audible so the next change fades out
pub fn start_playing(player: &mut Player<RecordingTransport>, position: f64) {
    player.play_pause();
    player.transport_mut().position = position;
    player
        .handle_media_event(MediaEvent::TimeUpdated { position })
        .unwrap();
}

/// Run the fade timer and media readiness until the transition settles
pub fn settle(player: &mut Player<RecordingTransport>) {
    for _ in 0..1000 {
        match player.transition_state() {
            TransitionState::Idle => return,
            TransitionState::Swapping { .. } => player
                .handle_media_event(MediaEvent::CanPlayThrough)
                .unwrap(),
            _ => player.tick(),
        }
    }
    panic!("transition did not settle");
}
