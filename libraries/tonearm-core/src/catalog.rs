//! Read-only track catalog

use crate::error::{CoreError, Result};
use crate::types::Track;

/// Ordered, non-empty, immutable list of tracks
///
/// Catalog indices are the identity every other component works with
/// (queue entries, shuffle permutations, the current track).
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Create a catalog, rejecting an empty track list
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }
        Ok(Self { tracks })
    }

    /// Number of tracks (always at least 1)
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; kept for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Track at index, or `TrackOutOfRange`
    pub fn track(&self, index: usize) -> Result<&Track> {
        self.tracks.get(index).ok_or(CoreError::TrackOutOfRange {
            index,
            len: self.tracks.len(),
        })
    }

    /// Check that an index refers to a catalog track
    pub fn check_index(&self, index: usize) -> Result<()> {
        self.track(index).map(|_| ())
    }

    /// Iterate over all tracks in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Filter by title or artist (case-insensitive substring)
    ///
    /// Returns `(catalog index, track)` pairs in catalog order. An empty query
    /// matches everything.
    pub fn search(&self, query: &str) -> Vec<(usize, &Track)> {
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, track)| track.matches(query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            Track::new("Ambient Classical", "Podington Bear", "a.mp3"),
            Track::new("Moment", "Serge Quadrado", "b.mp3"),
            Track::new("Just Relax", "Lesfm", "c.mp3"),
        ])
        .unwrap()
    }

    #[test]
    fn empty_catalog_rejected() {
        assert!(matches!(Catalog::new(vec![]), Err(CoreError::EmptyCatalog)));
    }

    #[test]
    fn track_lookup_out_of_range() {
        let catalog = sample();
        assert_eq!(catalog.track(1).unwrap().title, "Moment");
        assert!(matches!(
            catalog.track(3),
            Err(CoreError::TrackOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn search_keeps_catalog_indices() {
        let catalog = sample();
        let hits = catalog.search("m");
        let indices: Vec<usize> = hits.iter().map(|(i, _)| *i).collect();
        // "Ambient Classical", "Moment", "Lesfm"
        assert_eq!(indices, vec![0, 1, 2]);

        let hits = catalog.search("quadrado");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 1);

        assert_eq!(catalog.search("").len(), 3);
    }
}
