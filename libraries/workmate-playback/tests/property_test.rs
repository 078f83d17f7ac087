//! Property-based tests for the track queue
//!
//! Uses proptest to verify queue invariants across random operation
//! sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use workmate_core::{Track, TrackId};
use workmate_playback::TrackQueue;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Remove(usize),
    Next,
    Previous,
    Shuffle(bool),
    Unshuffle,
    Empty,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..10).prop_map(Op::Add),
        2 => (0usize..20).prop_map(Op::Remove),
        3 => Just(Op::Next),
        2 => Just(Op::Previous),
        1 => any::<bool>().prop_map(Op::Shuffle),
        1 => Just(Op::Unshuffle),
        1 => Just(Op::Empty),
    ]
}

fn locator(n: u8) -> String {
    format!("https://youtu.be/video{:06}", n)
}

fn arbitrary_queue() -> impl Strategy<Value = TrackQueue> {
    (0usize..12).prop_map(|n| {
        let tracks = (0..n)
            .map(|i| Track::new(format!("T{}", i), locator(i as u8)))
            .collect();
        let mut queue = TrackQueue::new();
        queue.load("Random", "pl1", tracks);
        queue
    })
}

fn apply(queue: &mut TrackQueue, op: &Op) {
    match op {
        Op::Add(n) => {
            queue.add_track(&locator(*n), None);
        }
        Op::Remove(index) => {
            if let Some(id) = queue.tracks().get(*index).map(|t| t.id.clone()) {
                queue.remove_track(&id);
            }
        }
        Op::Next => {
            queue.play_next(false);
        }
        Op::Previous => {
            queue.play_previous();
        }
        Op::Shuffle(preserve) => {
            let current = queue.current_track().map(|t| t.id.clone());
            let keep = if *preserve { current.as_ref() } else { None };
            queue.shuffle_tracks(keep);
        }
        Op::Unshuffle => queue.unshuffle_tracks(),
        Op::Empty => {
            queue.empty();
            queue.clear_pointers();
        }
    }
}

fn ids(queue: &TrackQueue) -> Vec<TrackId> {
    queue.tracks().iter().map(|t| t.id.clone()).collect()
}

// ===== Property Tests =====

proptest! {
    /// Property: ids stay unique whatever happens
    #[test]
    fn ids_stay_unique(mut queue in arbitrary_queue(), ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        for op in &ops {
            apply(&mut queue, op);
            let unique: HashSet<_> = queue.tracks().iter().map(|t| &t.id).collect();
            prop_assert_eq!(unique.len(), queue.len());
        }
    }

    /// Property: an empty queue exposes no current or lookahead track
    #[test]
    fn empty_queue_has_no_pointers(mut queue in arbitrary_queue(), ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        for op in &ops {
            apply(&mut queue, op);
            if queue.is_empty() {
                prop_assert!(queue.current_track().is_none());
                prop_assert!(queue.next_track().is_none());
            }
        }
    }

    /// Property: a resolved current track is always one of the queue's tracks
    #[test]
    fn current_resolves_into_tracks(mut queue in arbitrary_queue(), ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        for op in &ops {
            apply(&mut queue, op);
            if let Some(current) = queue.current_track() {
                prop_assert!(queue.tracks().contains(current));
            }
        }
    }

    /// Property: shuffle then unshuffle restores the order exactly
    #[test]
    fn shuffle_round_trip(mut queue in arbitrary_queue(), preserve in any::<prop::sample::Index>()) {
        let before = ids(&queue);
        let keep = (!before.is_empty()).then(|| before[preserve.index(before.len())].clone());

        queue.shuffle_tracks(keep.as_ref());
        if let Some(keep) = &keep {
            prop_assert_eq!(&queue.tracks()[0].id, keep);
        }
        let mut shuffled = ids(&queue);
        shuffled.sort();
        let mut sorted = before.clone();
        sorted.sort();
        prop_assert_eq!(shuffled, sorted);

        queue.unshuffle_tracks();
        prop_assert_eq!(ids(&queue), before);
    }

    /// Property: unshuffle keeps survivors in original order and appends additions
    #[test]
    fn unshuffle_reconciles_edits(
        mut queue in arbitrary_queue(),
        removals in prop::collection::vec(0usize..12, 0..5),
        additions in prop::collection::vec(0u8..10, 0..5),
    ) {
        let original = ids(&queue);
        queue.shuffle_tracks(None);

        for index in removals {
            if let Some(id) = queue.tracks().get(index).map(|t| t.id.clone()) {
                queue.remove_track(&id);
            }
        }
        let added: Vec<TrackId> = additions
            .iter()
            .map(|n| queue.add_track(&locator(*n), None).id)
            .collect();
        let survivors: HashSet<TrackId> = ids(&queue).into_iter().collect();

        queue.unshuffle_tracks();

        let mut expected: Vec<TrackId> = original
            .into_iter()
            .filter(|id| survivors.contains(id))
            .collect();
        expected.extend(added);
        prop_assert_eq!(ids(&queue), expected);
    }

    /// Property: play_next never wraps back to the head
    #[test]
    fn next_never_wraps(mut queue in arbitrary_queue(), steps in 1usize..30) {
        prop_assume!(!queue.is_empty());
        let last = queue.tracks().last().map(|t| t.id.clone());

        for _ in 0..steps {
            queue.play_next(false);
        }
        let index = queue.current_index().unwrap_or(0);
        prop_assert_eq!(index, steps.min(queue.len() - 1));
        if steps >= queue.len() {
            prop_assert_eq!(queue.current_track().map(|t| t.id.clone()), last);
        }
    }
}
