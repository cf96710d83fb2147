//! Lyrics relevance tracking
//!
//! The lyrics lookup itself is a host concern (a network call keyed by
//! artist and title). The player issues a [`LyricsRequest`] on every track
//! change and only accepts the answer carrying the latest [`LyricsTicket`].

use serde::{Deserialize, Serialize};
use tonearm_core::{Track, INSTRUMENTAL_MARKER};
use tracing::{debug, warn};

pub const LOADING_TEXT: &str = "Loading lyrics...";
pub const NOT_FOUND_TEXT: &str = "No lyrics found for this song.";
pub const FAILED_TEXT: &str = "Could not fetch lyrics at this time.";

/// Identity of one lookup: the track it was issued for plus a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LyricsTicket {
    pub track: usize,
    pub generation: u64,
}

/// What the host should look up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsRequest {
    pub ticket: LyricsTicket,
    pub artist: String,
    pub title: String,
    pub fallback: Option<String>,
}

/// Answer from the lookup service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LyricsOutcome {
    Found(String),
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct LyricsTracker {
    generation: u64,
    current: Option<LyricsTicket>,
    pending: bool,
    text: String,
}

impl Default for LyricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsTracker {
    pub fn new() -> Self {
        Self {
            generation: 0,
            current: None,
            pending: false,
            text: String::new(),
        }
    }

    /// Start tracking lyrics for a newly current track
    ///
    /// Returns the request the host should run. Instrumental tracks resolve
    /// immediately and return `None`.
    pub fn begin(&mut self, index: usize, track: &Track) -> Option<LyricsRequest> {
        self.generation += 1;
        let ticket = LyricsTicket {
            track: index,
            generation: self.generation,
        };
        self.current = Some(ticket);

        if track.is_instrumental() {
            self.pending = false;
            INSTRUMENTAL_MARKER.clone_into(&mut self.text);
            return None;
        }

        self.pending = true;
        LOADING_TEXT.clone_into(&mut self.text);
        Some(LyricsRequest {
            ticket,
            artist: track.artist.clone(),
            title: track.title.clone(),
            fallback: track.lyrics.clone(),
        })
    }

    /// Whether an answer for `ticket` would still be shown
    pub fn is_current(&self, ticket: LyricsTicket) -> bool {
        self.current == Some(ticket)
    }

    /// Accept an answer; stale tickets are dropped and return false
    pub fn resolve(&mut self, ticket: LyricsTicket, outcome: LyricsOutcome) -> bool {
        if !self.is_current(ticket) {
            warn!(
                track = ticket.track,
                generation = ticket.generation,
                "Discarding stale lyrics result"
            );
            return false;
        }

        self.text = match outcome {
            LyricsOutcome::Found(raw) => {
                normalize_lyrics(&raw).unwrap_or_else(|| NOT_FOUND_TEXT.to_string())
            }
            LyricsOutcome::NotFound => NOT_FOUND_TEXT.to_string(),
            LyricsOutcome::Failed(reason) => {
                debug!(%reason, "Lyrics lookup failed");
                FAILED_TEXT.to_string()
            }
        };
        self.pending = false;
        true
    }

    /// Text to display for the current track
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn current_ticket(&self) -> Option<LyricsTicket> {
        self.current
    }
}

/// Collapse runs of blank lines to a single blank line and trim
///
/// Returns `None` when nothing but whitespace remains.
pub fn normalize_lyrics(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut breaks = 0usize;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                breaks += 1;
            }
            '\n' => breaks += 1,
            other => {
                flush_breaks(&mut out, breaks);
                breaks = 0;
                out.push(other);
            }
        }
    }

    let trimmed = out.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn flush_breaks(out: &mut String, breaks: usize) {
    match breaks {
        0 => {}
        1 => out.push('\n'),
        _ => out.push_str("\n\n"),
    }
}
