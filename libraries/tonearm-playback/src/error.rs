//! Error types for playback management

use thiserror::Error;
use tonearm_audio::AudioError;
use tonearm_core::CoreError;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// Argument outside its valid range (track index, band, queue position, rate)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Named item does not exist (e.g. an equalizer preset)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid player configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The host media transport refused an operation
    #[error("Transport error: {0}")]
    Transport(String),

    /// Audio graph error
    #[error(transparent)]
    Audio(AudioError),

    /// Core error
    #[error(transparent)]
    Core(CoreError),
}

impl PlaybackError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

impl From<AudioError> for PlaybackError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::InvalidBand { .. } => Self::InvalidArgument(err.to_string()),
            AudioError::PresetNotFound(name) => Self::NotFound(format!("preset {name}")),
            AudioError::InvalidConfig(msg) => Self::InvalidConfig(msg),
            AudioError::PresetBandMismatch { .. } => Self::Audio(err),
        }
    }
}

impl From<CoreError> for PlaybackError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TrackOutOfRange { .. } => Self::InvalidArgument(err.to_string()),
            other => Self::Core(other),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
