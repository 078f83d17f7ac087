//! Track queue
//!
//! Ordered, persisted tracks of one user's playlist plus the pointers used
//! for navigation:
//!
//! ```text
//! tracks:  [T1] [T2] [T3] [T4]
//!                ^current  ^next (lookahead cache, optional)
//! backup:  pre-shuffle order of `tracks` while shuffled
//! ```
//!
//! Pointers are stored as ids and resolved against `tracks` on every read,
//! so a title update is visible through `current_track()` immediately and a
//! pointer left behind by [`TrackQueue::empty`] never resolves to a track.

use tracing::debug;
use workmate_core::{locator, Track, TrackId};

/// The playlist queue
#[derive(Debug, Clone, Default)]
pub struct TrackQueue {
    /// Persistence key of the playlist
    pub(crate) object_id: Option<String>,

    /// Playlist title
    pub(crate) title: String,

    /// Tracks in play order (shuffled order while shuffled)
    pub(crate) tracks: Vec<Track>,

    /// Pre-shuffle order of `tracks`
    pub(crate) backup: Vec<Track>,

    /// Current track id
    pub(crate) current: Option<TrackId>,

    /// One-step lookahead cache
    pub(crate) next: Option<TrackId>,

    /// Whether `tracks` is in shuffled order
    pub(crate) shuffled: bool,

    /// Counter for minting track ids
    next_seq: u64,
}

impl TrackQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a persisted playlist
    ///
    /// The first track becomes current. Tracks with a duplicate id are
    /// dropped, keeping the first occurrence.
    pub fn load(
        &mut self,
        title: impl Into<String>,
        object_id: impl Into<String>,
        tracks: Vec<Track>,
    ) {
        let mut unique: Vec<Track> = Vec::with_capacity(tracks.len());
        for track in tracks {
            if unique.iter().any(|t| t.id == track.id) {
                debug!(track_id = %track.id, "Dropping duplicate track on load");
                continue;
            }
            unique.push(track);
        }

        self.title = title.into();
        self.object_id = Some(object_id.into());
        self.current = unique.first().map(|t| t.id.clone());
        self.next = None;
        self.backup.clone_from(&unique);
        self.tracks = unique;
        self.shuffled = false;

        debug!(
            title = %self.title,
            tracks = self.tracks.len(),
            "Loaded playlist"
        );
    }

    /// Reset to empty defaults (logout or invalid session)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ===== Accessors =====

    /// Persistence key of the playlist
    pub fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }

    /// Playlist title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Tracks in current play order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Pre-shuffle snapshot
    pub fn backup(&self) -> &[Track] {
        &self.backup
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the queue has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Whether the queue is in shuffled order
    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Look up a track by id
    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    /// Position of a track in the current order
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Current track, resolved against `tracks`
    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    /// Lookahead track, resolved against `tracks`
    pub fn next_track(&self) -> Option<&Track> {
        self.next.as_ref().and_then(|id| self.get(id))
    }

    /// Index of the current track
    pub fn current_index(&self) -> Option<usize> {
        self.current.as_ref().and_then(|id| self.position(id))
    }

    fn current_owned(&self) -> Option<Track> {
        self.current_track().cloned()
    }

    // ===== Mutations =====

    /// Create a track with a fresh id without inserting it
    ///
    /// Ids are `"{video_id}-{n}"` with a monotonic `n`; candidates already in
    /// the queue are skipped.
    pub fn mint_track(&mut self, url: &str, title: Option<String>) -> Track {
        let key = locator::extract_video_id(url).unwrap_or("track").to_string();
        let id = loop {
            self.next_seq += 1;
            let candidate = TrackId::new(format!("{}-{}", key, self.next_seq));
            if self.get(&candidate).is_none() {
                break candidate;
            }
        };

        let track = Track::new(id, url.trim());
        match title {
            Some(title) => track.with_title(title),
            None => track,
        }
    }

    /// Append an already minted track
    ///
    /// Returns `false` (and changes nothing) if the id is already present.
    /// If there is no current track, the appended one becomes current.
    pub fn append_track(&mut self, track: Track) -> bool {
        if self.get(&track.id).is_some() {
            debug!(track_id = %track.id, "Refusing duplicate track id");
            return false;
        }

        if self.current_track().is_none() {
            self.current = Some(track.id.clone());
        }
        debug!(track_id = %track.id, position = self.tracks.len(), "Appended track");
        self.tracks.push(track);
        true
    }

    /// Create a track and append it to the end of the queue
    pub fn add_track(&mut self, url: &str, title: Option<String>) -> Track {
        let track = self.mint_track(url, title);
        self.append_track(track.clone());
        track
    }

    /// Remove a track by id
    ///
    /// If the removed track was current, the track that slid into its index
    /// becomes current, else the one before it, else nothing. Returns the
    /// resulting current track. Unknown ids are a no-op returning `None`.
    pub fn remove_track(&mut self, id: &TrackId) -> Option<Track> {
        let index = self.position(id)?;
        let was_current = self.current_index() == Some(index);

        self.tracks.remove(index);

        if was_current {
            let replacement = self
                .tracks
                .get(index)
                .or_else(|| index.checked_sub(1).and_then(|i| self.tracks.get(i)));
            self.current = replacement.map(|t| t.id.clone());
        }

        if self.next.as_ref() == Some(id) {
            self.next = None;
        }

        debug!(track_id = %id, remaining = self.tracks.len(), "Removed track");
        self.current_owned()
    }

    /// Advance to the next track
    ///
    /// With `was_ephemeral`, the queue did not move while a one-shot track
    /// played: the current track is returned unchanged. At the last index the
    /// current track stays put (never wraps); callers detect the end of the
    /// queue by comparing before and after.
    pub fn play_next(&mut self, was_ephemeral: bool) -> Option<Track> {
        if was_ephemeral {
            return self.current_owned();
        }

        match self.current_index() {
            Some(index) if index + 1 < self.tracks.len() => {
                self.current = Some(self.tracks[index + 1].id.clone());
                self.next = None;
            }
            Some(_) => {
                self.next = None;
            }
            None => {
                self.current = self.tracks.first().map(|t| t.id.clone());
                self.next = None;
            }
        }

        self.current_owned()
    }

    /// Step back to the previous track
    ///
    /// Remembers the track we came from in the lookahead cache. Stays at
    /// index 0. Without a current track, resumes at the lookahead track or
    /// the first track.
    pub fn play_previous(&mut self) -> Option<Track> {
        match self.current_index() {
            Some(index) => {
                self.next = self.current.clone();
                if index > 0 {
                    self.current = Some(self.tracks[index - 1].id.clone());
                }
            }
            None => {
                self.current = self
                    .next_track()
                    .or_else(|| self.tracks.first())
                    .map(|t| t.id.clone());
                self.next = None;
            }
        }

        self.current_owned()
    }

    /// Video id of the track that would play next
    ///
    /// Prefers the lookahead cache, else the track right after the current
    /// one.
    pub fn next_track_video_id(&self) -> Option<&str> {
        if let Some(next) = self.next_track() {
            if self.current.as_ref() != Some(&next.id) {
                return next.video_id();
            }
        }

        let index = self.current_index()?;
        self.tracks.get(index + 1).and_then(|t| t.video_id())
    }

    /// Set the title of the first track whose url contains `fragment`
    pub fn update_track_title(&mut self, fragment: &str, title: impl Into<String>) {
        if fragment.is_empty() {
            return;
        }
        let title = title.into();

        // `backup` holds copies, keep them in step so unshuffling keeps titles.
        let Some(track) = self.tracks.iter_mut().find(|t| t.url.contains(fragment)) else {
            return;
        };
        track.title = Some(title.clone());
        let id = track.id.clone();

        if let Some(copy) = self.backup.iter_mut().find(|t| t.id == id) {
            copy.title = Some(title);
        }
    }

    /// 1-based position of the current track, e.g. `"2 of 5"`
    pub fn track_index(&self) -> String {
        let position = self.current_index().map_or(0, |i| i + 1);
        format!("{} of {}", position, self.tracks.len())
    }

    /// 1-based position of any track, e.g. `"2 of 5"`
    pub fn track_index_with_id(&self, id: &TrackId) -> String {
        let position = self.position(id).map_or(0, |i| i + 1);
        format!("{} of {}", position, self.tracks.len())
    }

    /// Clear tracks and backup
    ///
    /// Pointers are left alone: tearing down playback is the caller's
    /// explicit step (see [`TrackQueue::clear_pointers`]).
    pub fn empty(&mut self) {
        self.tracks.clear();
        self.backup.clear();
        debug!("Emptied queue");
    }

    /// Drop the current and lookahead pointers
    pub fn clear_pointers(&mut self) {
        self.current = None;
        self.next = None;
    }

    /// Make `id` the current track
    pub fn select_track(&mut self, id: &TrackId) -> Option<Track> {
        let track = self.get(id)?.clone();
        self.current = Some(track.id.clone());
        Some(track)
    }

    /// Make the head of the queue the current track
    pub fn select_first(&mut self) -> Option<Track> {
        let first = self.tracks.first()?.clone();
        self.current = Some(first.id.clone());
        Some(first)
    }
}
