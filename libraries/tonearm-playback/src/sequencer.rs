//! Next/previous resolution
//!
//! Priority for "advance":
//! 1. Front of the play queue (bypasses shuffle and loop)
//! 2. Next entry of the shuffle permutation, when shuffled
//! 3. Next catalog index, wrapping
//!
//! "Retreat" never consults the queue.

use crate::queue::PlayQueue;
use crate::session::PlaybackSession;
use crate::shuffle::ShufflePermutation;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct Sequencer {
    permutation: Option<ShufflePermutation>,
    rng: StdRng,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            permutation: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic shuffle order, for tests and replays
    pub fn with_seed(seed: u64) -> Self {
        Self {
            permutation: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the permutation with a fresh one over `catalog_len` tracks
    pub fn regenerate(&mut self, catalog_len: usize) {
        self.permutation = Some(ShufflePermutation::generate(catalog_len, &mut self.rng));
        debug!(catalog_len, "Shuffle permutation regenerated");
    }

    pub fn permutation(&self) -> Option<&ShufflePermutation> {
        self.permutation.as_ref()
    }

    /// Target of an advance, consuming queue entries
    ///
    /// Queue entries equal to the current track are dropped on the way.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self, session: &PlaybackSession, queue: &mut PlayQueue) -> usize {
        while let Ok(index) = queue.dequeue_front() {
            if index == session.current_index() {
                debug!(index, "Dropping queue entry for the current track");
                continue;
            }
            debug!(index, remaining = queue.len(), "Advancing from queue");
            return index;
        }
        self.step(session, 1)
    }

    /// Target of an advance without touching the queue
    pub fn peek_next(&mut self, session: &PlaybackSession, queue: &PlayQueue) -> usize {
        if let Some(index) = queue.iter().find(|&i| i != session.current_index()) {
            return index;
        }
        self.step(session, 1)
    }

    /// Target of a retreat
    pub fn prev(&mut self, session: &PlaybackSession) -> usize {
        self.step(session, -1)
    }

    fn step(&mut self, session: &PlaybackSession, direction: isize) -> usize {
        let current = session.current_index();
        let catalog_len = session.catalog_len().max(1);

        if !session.is_shuffled() {
            return wrap(current, direction, catalog_len);
        }

        let stale = match &self.permutation {
            Some(permutation) => permutation.len() != session.catalog_len(),
            None => true,
        };
        if stale {
            self.regenerate(session.catalog_len());
        }
        let Some(permutation) = self.permutation.as_ref() else {
            return wrap(current, direction, catalog_len);
        };

        let position = permutation.position_of(current).unwrap_or_else(|| {
            warn!(current, "Current track missing from shuffle order, starting from the top");
            0
        });
        let target = wrap(position, direction, permutation.len());
        permutation.at(target).unwrap_or(current)
    }
}

fn wrap(position: usize, direction: isize, len: usize) -> usize {
    if direction >= 0 {
        (position + 1) % len
    } else {
        (position + len - 1) % len
    }
}
