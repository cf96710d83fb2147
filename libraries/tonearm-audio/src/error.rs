/// Audio-specific errors
use thiserror::Error;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Band index outside the configured band list
    #[error("Invalid band index {index} (graph has {count} bands)")]
    InvalidBand { index: usize, count: usize },

    /// No preset with that name
    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    /// Preset gain list does not match the band layout
    #[error("Preset {preset} has {expected} gains but graph has {actual} bands")]
    PresetBandMismatch {
        preset: String,
        expected: usize,
        actual: usize,
    },

    /// Invalid graph or analyser configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
