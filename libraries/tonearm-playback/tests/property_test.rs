//! Property-based tests for sequencing, the queue and transitions
//!
//! Verifies invariants that must hold for any catalog size and input order.

mod common;

use common::{player, settle, start_playing};
use proptest::prelude::*;
use tonearm_playback::{PlayQueue, PlaybackSession, Sequencer};

// ===== Helpers =====

fn session_at(len: usize, index: usize) -> PlaybackSession {
    let mut session = PlaybackSession::new(len);
    session.set_current_index(index).unwrap();
    session
}

fn sorted(mut values: Vec<usize>) -> Vec<usize> {
    values.sort_unstable();
    values
}

// ===== Sequencer =====

proptest! {
    #[test]
    fn prop_next_cycles_catalog(len in 1usize..40) {
        let mut sequencer = Sequencer::with_seed(1);
        let mut session = session_at(len, 0);
        let mut queue = PlayQueue::new();
        let mut seen = Vec::with_capacity(len);

        for _ in 0..len {
            let next = sequencer.next(&session, &mut queue);
            seen.push(next);
            session.set_current_index(next).unwrap();
        }

        prop_assert_eq!(session.current_index(), 0);
        prop_assert_eq!(sorted(seen), (0..len).collect::<Vec<_>>());
    }

    #[test]
    fn prop_shuffle_cycles_catalog(len in 1usize..40, seed in any::<u64>()) {
        let mut sequencer = Sequencer::with_seed(seed);
        let mut session = session_at(len, 0);
        session.set_shuffled(true);
        let mut queue = PlayQueue::new();
        let mut seen = Vec::with_capacity(len);

        for _ in 0..len {
            let next = sequencer.next(&session, &mut queue);
            seen.push(next);
            session.set_current_index(next).unwrap();
        }

        prop_assert_eq!(session.current_index(), 0);
        prop_assert_eq!(sorted(seen), (0..len).collect::<Vec<_>>());
    }

    #[test]
    fn prop_prev_then_next_returns(len in 1usize..40, start in 0usize..40, shuffled in any::<bool>()) {
        let start = start % len;
        let mut sequencer = Sequencer::with_seed(7);
        let mut session = session_at(len, start);
        session.set_shuffled(shuffled);
        let mut queue = PlayQueue::new();

        let back = sequencer.prev(&session);
        session.set_current_index(back).unwrap();
        let forward = sequencer.next(&session, &mut queue);

        prop_assert_eq!(forward, start);
    }
}

// ===== Queue =====

proptest! {
    #[test]
    fn prop_enqueue_never_duplicates(current in 0usize..10, indices in prop::collection::vec(0usize..10, 0..30)) {
        let mut queue = PlayQueue::new();
        for &index in &indices {
            let before = queue.len();
            let changed = queue.enqueue(index, current);
            prop_assert_eq!(changed, queue.len() == before + 1);
        }

        prop_assert!(!queue.contains(current));
        let mut unique = queue.as_slice().to_vec();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(unique.len(), queue.len());
    }

    #[test]
    fn prop_reorder_preserves_entries(
        entries in prop::collection::btree_set(0usize..50, 1..20),
        from in 0usize..20,
        to in 0usize..20,
    ) {
        let mut queue = PlayQueue::new();
        for &index in &entries {
            queue.enqueue(index, usize::MAX);
        }
        let before = queue.as_slice().to_vec();
        let (from, to) = (from % before.len(), to % before.len());

        queue.reorder(from, to).unwrap();

        prop_assert_eq!(queue.len(), before.len());
        prop_assert_eq!(queue.as_slice()[to], before[from]);
        prop_assert_eq!(sorted(queue.as_slice().to_vec()), sorted(before));
    }

    #[test]
    fn prop_reorder_out_of_range_is_rejected(len in 0usize..8, offset in 0usize..5) {
        let mut queue = PlayQueue::new();
        for index in 0..len {
            queue.enqueue(index, usize::MAX);
        }
        let snapshot = queue.as_slice().to_vec();

        prop_assert!(queue.reorder(len + offset, 0).is_err());
        prop_assert_eq!(queue.as_slice(), snapshot.as_slice());
    }
}

// ===== Transitions =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_transition_restores_volume(volume in 0.0f32..=1.0, position in 0.0f64..300.0) {
        let mut player = player(3);
        player.set_volume(volume);
        start_playing(&mut player, position);

        player.next().unwrap();
        settle(&mut player);

        prop_assert_eq!(player.transport().volume, volume);
        prop_assert!(player.session().is_playing());
        prop_assert_eq!(player.session().current_index(), 1);
    }

    #[test]
    fn prop_mid_flight_requests_leave_index(target in 0usize..5, ticks in 0usize..10) {
        let mut player = player(5);
        start_playing(&mut player, 60.0);
        player.next().unwrap();

        for _ in 0..ticks {
            if !matches!(player.transition_state(), tonearm_playback::TransitionState::FadingOut { .. }) {
                break;
            }
            player.tick();
            player.select(target).unwrap();
            player.previous().unwrap();
        }

        settle(&mut player);
        prop_assert_eq!(player.session().current_index(), 1);
    }
}
