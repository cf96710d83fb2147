//! Play queue
//!
//! User-queued catalog indices that play before normal sequencing resumes:
//!
//! ```text
//! Currently Playing: Track A
//! ─────────────────────────────
//! Queue (play next, in order):
//!   - Track C
//!   - Track B
//! ─────────────────────────────
//! Then: shuffle order or catalog order
//! ```

use crate::error::{PlaybackError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayQueue {
    entries: Vec<usize>,
}

impl PlayQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `index` unless it is the current track or already queued
    ///
    /// Returns whether the queue changed.
    pub fn enqueue(&mut self, index: usize, current: usize) -> bool {
        if index == current || self.entries.contains(&index) {
            return false;
        }
        self.entries.push(index);
        true
    }

    /// Remove and return the first entry
    pub fn dequeue_front(&mut self) -> Result<usize> {
        if self.entries.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }
        Ok(self.entries.remove(0))
    }

    /// Remove every occurrence of `index`; returns whether anything was removed
    pub fn remove(&mut self, index: usize) -> bool {
        let before = self.entries.len();
        self.entries.retain(|&entry| entry != index);
        self.entries.len() != before
    }

    /// Move the entry at `from` to `to`, shifting the others
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.entries.len();
        if from >= len || to >= len {
            return Err(PlaybackError::invalid_argument(format!(
                "queue positions {from} -> {to} out of range (queue has {len} entries)"
            )));
        }
        if from == to {
            return Ok(());
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains(&index)
    }

    pub fn front(&self) -> Option<usize> {
        self.entries.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.entries
    }
}
