//! Shuffle permutation of catalog indices
//!
//! Uniform random order (Fisher-Yates) over every catalog index. A permutation
//! is never edited in place; enabling shuffle replaces it with a fresh one.

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShufflePermutation {
    order: Vec<usize>,
}

impl ShufflePermutation {
    /// Random permutation of `0..len`
    pub fn generate<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);
        Self { order }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of a catalog index within the permutation
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.order.iter().position(|&entry| entry == index)
    }

    /// Catalog index at a position, wrapping around
    pub fn at(&self, position: usize) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        self.order.get(position % self.order.len()).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn contains_every_index_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let permutation = ShufflePermutation::generate(50, &mut rng);

        assert_eq!(permutation.len(), 50);
        let unique: HashSet<usize> = permutation.as_slice().iter().copied().collect();
        assert_eq!(unique.len(), 50);
        assert!(unique.iter().all(|&i| i < 50));
    }

    #[test]
    fn random_shuffle_changes_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let identity: Vec<usize> = (0..20).collect();

        // With a fixed seed at least one of several draws differs from identity
        let changed = (0..5).any(|_| ShufflePermutation::generate(20, &mut rng).as_slice() != identity);
        assert!(changed);
    }

    #[test]
    fn position_lookup() {
        let mut rng = StdRng::seed_from_u64(1);
        let permutation = ShufflePermutation::generate(5, &mut rng);
        for (pos, &index) in permutation.as_slice().iter().enumerate() {
            assert_eq!(permutation.position_of(index), Some(pos));
        }
        assert_eq!(permutation.position_of(5), None);
    }

    #[test]
    fn at_wraps() {
        let mut rng = StdRng::seed_from_u64(3);
        let permutation = ShufflePermutation::generate(3, &mut rng);
        assert_eq!(permutation.at(3), permutation.at(0));
        assert_eq!(ShufflePermutation::generate(0, &mut rng).at(0), None);
    }
}
