/// Core error types for Tonearm
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Tonearm
#[derive(Error, Debug)]
pub enum CoreError {
    /// A catalog must contain at least one track
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Track index outside the catalog
    #[error("Track index {index} out of range (catalog has {len} tracks)")]
    TrackOutOfRange { index: usize, len: usize },

    /// Theme value could not be parsed
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Theme storage failure
    #[error("Theme storage error: {0}")]
    ThemeStorage(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create a theme storage error
    pub fn theme_storage(msg: impl Into<String>) -> Self {
        Self::ThemeStorage(msg.into())
    }
}
