//! Shuffle and unshuffle for the track queue
//!
//! Shuffling keeps a pre-shuffle snapshot in `backup`. Unshuffling restores
//! that order, reconciled against adds and removes that happened while
//! shuffled: removed tracks stay gone, added tracks go to the end.

use crate::queue::TrackQueue;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use std::collections::HashSet;
use tracing::debug;
use workmate_core::{Track, TrackId};

impl TrackQueue {
    /// Shuffle the queue (Fisher-Yates via `SliceRandom`)
    ///
    /// With `preserve` pointing at a queued track, that track is moved to
    /// index 0 and becomes current, with `tracks[1]` as the lookahead.
    /// Without it, the whole queue is shuffled and pointers stay untouched.
    pub fn shuffle_tracks(&mut self, preserve: Option<&TrackId>) {
        self.shuffle_tracks_with(preserve, &mut thread_rng());
    }

    /// [`TrackQueue::shuffle_tracks`] with a caller-supplied RNG
    pub fn shuffle_tracks_with<R: Rng + ?Sized>(&mut self, preserve: Option<&TrackId>, rng: &mut R) {
        self.backup.clone_from(&self.tracks);

        let keep = preserve.and_then(|id| self.position(id));
        match keep {
            Some(index) => {
                let head = self.tracks.remove(index);
                self.tracks.shuffle(rng);
                self.tracks.insert(0, head);

                self.current = self.tracks.first().map(|t| t.id.clone());
                self.next = self.tracks.get(1).map(|t| t.id.clone());
            }
            None => {
                self.tracks.shuffle(rng);
            }
        }

        self.shuffled = true;
        debug!(
            tracks = self.tracks.len(),
            preserved = keep.is_some(),
            "Shuffled queue"
        );
    }

    /// Restore the pre-shuffle order
    ///
    /// Current is re-resolved by id; a current track removed while shuffled
    /// resolves to nothing. The shuffled lookahead no longer applies and is
    /// dropped.
    pub fn unshuffle_tracks(&mut self) {
        let live: HashSet<&TrackId> = self.tracks.iter().map(|t| &t.id).collect();
        let known: HashSet<&TrackId> = self.backup.iter().map(|t| &t.id).collect();

        // Backup entries can carry stale titles; take the live copy.
        let mut restored: Vec<Track> = self
            .backup
            .iter()
            .filter(|t| live.contains(&t.id))
            .filter_map(|t| self.tracks.iter().find(|live| live.id == t.id).cloned())
            .collect();
        let added = self.tracks.iter().filter(|t| !known.contains(&t.id)).cloned();
        restored.extend(added);

        let restored_len = restored.len();
        self.tracks = restored;
        self.backup.clone_from(&self.tracks);
        self.next = None;
        self.shuffled = false;

        debug!(tracks = restored_len, "Restored original order");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn queue_of(n: usize) -> TrackQueue {
        let tracks = (1..=n)
            .map(|i| Track::new(format!("T{}", i), format!("https://youtu.be/video{:06}", i)))
            .collect();
        let mut queue = TrackQueue::new();
        queue.load("Shuffle", "pl1", tracks);
        queue
    }

    fn ids(queue: &TrackQueue) -> Vec<&str> {
        queue.tracks().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn preserved_track_goes_to_head() {
        for seed in 0..20 {
            let mut queue = queue_of(3);
            let mut rng = StdRng::seed_from_u64(seed);
            queue.shuffle_tracks_with(Some(&TrackId::from("T2")), &mut rng);

            let order = ids(&queue);
            assert_eq!(order[0], "T2");
            let mut rest = order[1..].to_vec();
            rest.sort_unstable();
            assert_eq!(rest, vec!["T1", "T3"]);

            assert_eq!(queue.current_track().unwrap().id.as_str(), "T2");
            assert_eq!(queue.next_track().unwrap().id.as_str(), order[1]);
        }
    }

    #[test]
    fn shuffle_without_preserve_leaves_pointers() {
        let mut queue = queue_of(5);
        queue.select_track(&TrackId::from("T4"));
        queue.shuffle_tracks(None);

        assert!(queue.is_shuffled());
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.current_track().unwrap().id.as_str(), "T4");
        assert!(queue.next_track().is_none());
    }

    #[test]
    fn unknown_preserve_id_shuffles_everything() {
        let mut queue = queue_of(4);
        queue.shuffle_tracks(Some(&TrackId::from("missing")));
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.current_track().unwrap().id.as_str(), "T1");
    }

    #[test]
    fn round_trip_restores_order() {
        let mut queue = queue_of(6);
        let before: Vec<String> = ids(&queue).iter().map(ToString::to_string).collect();

        queue.shuffle_tracks(Some(&TrackId::from("T3")));
        assert_eq!(queue.backup().len(), 6);
        queue.unshuffle_tracks();

        assert_eq!(ids(&queue), before);
        assert_eq!(queue.backup(), queue.tracks());
        assert!(!queue.is_shuffled());
        assert_eq!(queue.current_track().unwrap().id.as_str(), "T3");
    }

    #[test]
    fn unshuffle_reconciles_adds_and_removes() {
        let mut queue = queue_of(4);
        queue.shuffle_tracks(Some(&TrackId::from("T1")));

        queue.remove_track(&TrackId::from("T2"));
        let added = queue.add_track("https://youtu.be/dQw4w9WgXcQ", None);

        queue.unshuffle_tracks();
        let order = ids(&queue);
        assert_eq!(order, vec!["T1", "T3", "T4", added.id.as_str()]);
    }

    #[test]
    fn unshuffle_follows_restored_order() {
        for seed in 0..20 {
            let mut queue = queue_of(5);
            let mut rng = StdRng::seed_from_u64(seed);
            queue.shuffle_tracks_with(Some(&TrackId::from("T2")), &mut rng);

            queue.unshuffle_tracks();
            assert!(queue.next_track().is_none());
            assert_eq!(queue.current_track().unwrap().id.as_str(), "T2");
            assert_eq!(queue.next_track_video_id(), Some("video000003"));
        }
    }

    #[test]
    fn removed_current_cannot_come_back() {
        let mut queue = queue_of(3);
        queue.shuffle_tracks(Some(&TrackId::from("T2")));
        queue.current = Some(TrackId::from("T2"));
        queue.tracks.retain(|t| t.id.as_str() != "T2");

        queue.unshuffle_tracks();
        assert!(queue.current_track().is_none());
        assert_eq!(ids(&queue), vec!["T1", "T3"]);
    }

    #[test]
    fn unshuffle_keeps_titles_learned_while_shuffled() {
        let mut queue = queue_of(3);
        queue.shuffle_tracks(None);
        queue.tracks[0].title = Some("Learned".into());
        let learned_id = queue.tracks[0].id.clone();

        queue.unshuffle_tracks();
        assert_eq!(queue.get(&learned_id).unwrap().title.as_deref(), Some("Learned"));
    }
}
