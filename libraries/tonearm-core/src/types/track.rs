/// Track domain type
use serde::{Deserialize, Serialize};

/// Lyrics fallback text that marks a track as instrumental
///
/// Tracks carrying this marker never trigger a lyrics lookup.
pub const INSTRUMENTAL_MARKER: &str = "(Instrumental)";

/// Catalog track
///
/// Immutable once placed in a [`Catalog`](crate::Catalog).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Media URL handed to the transport on load
    #[serde(alias = "url")]
    pub media_url: String,

    /// Cover art URL
    #[serde(default, alias = "cover")]
    pub cover_url: String,

    /// Display duration, formatted as "mm:ss"
    #[serde(default, alias = "duration")]
    pub duration_label: String,

    /// Length of the intro in seconds (enables "skip intro")
    #[serde(default)]
    pub intro_duration: Option<f64>,

    /// Lyrics fallback text, e.g. [`INSTRUMENTAL_MARKER`]
    #[serde(default)]
    pub lyrics: Option<String>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        media_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            media_url: media_url.into(),
            cover_url: String::new(),
            duration_label: String::new(),
            intro_duration: None,
            lyrics: None,
        }
    }

    /// Set the cover art URL
    pub fn with_cover(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = cover_url.into();
        self
    }

    /// Set the display duration label
    pub fn with_duration_label(mut self, label: impl Into<String>) -> Self {
        self.duration_label = label.into();
        self
    }

    /// Set the intro length in seconds
    pub fn with_intro(mut self, seconds: f64) -> Self {
        self.intro_duration = Some(seconds);
        self
    }

    /// Set the lyrics fallback text
    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }

    /// Whether the track is marked instrumental
    pub fn is_instrumental(&self) -> bool {
        self.lyrics.as_deref() == Some(INSTRUMENTAL_MARKER)
    }

    /// Case-insensitive match on title or artist
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        query.is_empty()
            || self.title.to_lowercase().contains(&query)
            || self.artist.to_lowercase().contains(&query)
    }
}
