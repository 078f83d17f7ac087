//! Playback controller
//!
//! Correlates the queue with whatever the backend has loaded:
//! - cues tracks and triggers play once the backend reports them cued
//! - advances on `Ended`, stopping at the end of the queue (no wraparound)
//! - on `Error`, waits a grace period, then resumes the queue (special
//!   track) or asks the caller to remove the track from the playlist
//! - keeps the one-shot special track out of the queue entirely
//!
//! The controller is synchronous. Anything that needs the persistence
//! gateway is handed back to the caller (see [`Recovery::Remove`]) and
//! completed through [`PlaybackController::apply_removal`] or
//! [`PlaybackController::removal_failed`].

use crate::backend::{BackendEvent, BackendState, PlaybackBackend};
use crate::error::Result;
use crate::queue::TrackQueue;
use crate::timer::TimerSlot;
use crate::types::{NowPlaying, PlayerConfig, Transport};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use workmate_core::{locator, Track, TrackId};

/// Title shown while an unplayable video is being dealt with
pub const UNAVAILABLE_TITLE: &str = "Video not available: removing from playlist...";

/// Result of a fired error-recovery timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// Playback moved back to the queue, nothing else to do
    Resumed,

    /// The queued track must be removed from the playlist first
    Remove(Track),
}

/// Result of a manual skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A track was cued
    Cued(Track),

    /// Already at the last track
    EndOfQueue,

    /// Skip not possible in the current state
    Ignored,
}

/// Mediates between the queue and a playback backend
#[derive(Debug)]
pub struct PlaybackController<B> {
    backend: B,
    queue: TrackQueue,
    config: PlayerConfig,

    /// Subject loaded into the backend
    now_playing: Option<NowPlaying>,

    /// Video id the backend was last cued with
    loaded: Option<String>,

    transport: Transport,
    recovery: TimerSlot<NowPlaying>,
    muted: bool,
    progress: f64,
    polling: bool,
    powered: bool,
}

impl<B: PlaybackBackend> PlaybackController<B> {
    /// Create a controller around a backend
    pub fn new(backend: B, config: PlayerConfig) -> Self {
        Self {
            backend,
            queue: TrackQueue::new(),
            config,
            now_playing: None,
            loaded: None,
            transport: Transport::Idle,
            recovery: TimerSlot::new(),
            muted: false,
            progress: 0.0,
            polling: false,
            powered: true,
        }
    }

    // ===== Accessors =====

    /// Backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Backend (mutable)
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Queue
    pub fn queue(&self) -> &TrackQueue {
        &self.queue
    }

    /// Queue (mutable)
    pub fn queue_mut(&mut self) -> &mut TrackQueue {
        &mut self.queue
    }

    /// Engine configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Subject loaded into the backend
    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    /// Whether the special track is the playback subject
    pub fn is_ephemeral(&self) -> bool {
        self.now_playing
            .as_ref()
            .is_some_and(NowPlaying::is_ephemeral)
    }

    /// Video id the backend was last cued with
    pub fn loaded_video_id(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    /// Transport state
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Whether audio is muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play position in percent of the video duration
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether play position polling is live
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// Whether the player is powered on
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// When the pending error recovery fires
    pub fn recovery_deadline(&self) -> Option<Instant> {
        self.recovery.deadline()
    }

    /// Title line for the playback subject
    pub fn display_title(&self) -> Option<String> {
        if self.transport == Transport::Unavailable {
            return Some(UNAVAILABLE_TITLE.to_string());
        }

        match self.now_playing.as_ref()? {
            NowPlaying::Ephemeral { title, .. } => title.clone(),
            NowPlaying::Queued { track_id } => self
                .queue
                .get(track_id)
                .map(|t| t.title.clone().unwrap_or_else(|| t.url.clone())),
        }
    }

    // ===== Loading =====

    /// Start playback after the queue was loaded
    ///
    /// Plays the configured special track first, if any.
    pub fn start(&mut self) {
        if let Some(url) = self.config.ephemeral_url.clone() {
            match self.cue_ephemeral(&url) {
                Ok(()) => return,
                Err(e) => warn!(error = %e, "Skipping special track"),
            }
        }
        self.resume_queue();
    }

    /// Cue the one-shot special track
    pub fn cue_ephemeral(&mut self, url: &str) -> Result<()> {
        let video_id = locator::require_video_id(url)?.to_string();
        info!(video_id = %video_id, "Cueing special track");

        self.now_playing = Some(NowPlaying::Ephemeral {
            video_id: video_id.clone(),
            title: None,
        });
        self.load(video_id);
        Ok(())
    }

    /// Cue a queue track
    pub fn cue_track(&mut self, track: &Track) {
        self.now_playing = Some(NowPlaying::Queued {
            track_id: track.id.clone(),
        });

        match track.video_id() {
            Some(video_id) => self.load(video_id.to_string()),
            None => {
                // Nothing the backend could load; go straight to recovery.
                warn!(track_id = %track.id, url = %track.url, "Track has no playable video id");
                self.backend.clear();
                self.loaded = None;
                self.polling = false;
                self.mark_unavailable();
            }
        }
    }

    fn load(&mut self, video_id: String) {
        // A new cue supersedes any recovery armed for the previous video.
        self.recovery.cancel();

        info!(video_id = %video_id, "Cueing video");
        self.backend.cue(&video_id);
        self.loaded = Some(video_id);
        self.transport = Transport::Loading;
        self.progress = 0.0;
        self.polling = true;
    }

    /// Resume the persisted queue at its current track (or its head)
    pub fn resume_queue(&mut self) -> Option<Track> {
        let track = self
            .queue
            .play_next(true)
            .or_else(|| self.queue.select_first());

        match track {
            Some(track) => {
                self.cue_track(&track);
                Some(track)
            }
            None => {
                self.teardown();
                None
            }
        }
    }

    /// Tear the backend instance down and forget the playback subject
    pub fn teardown(&mut self) {
        info!("Tearing down playback");
        self.recovery.cancel();
        self.backend.clear();
        self.now_playing = None;
        self.loaded = None;
        self.transport = Transport::Idle;
        self.progress = 0.0;
        self.polling = false;
        self.queue.clear_pointers();
    }

    // ===== Backend events =====

    /// React to a backend lifecycle event
    ///
    /// Events for any video other than the one last cued are stale and
    /// ignored.
    pub fn handle_event(&mut self, event: &BackendEvent) {
        if self.loaded.as_deref() != Some(event.video_id.as_str()) {
            debug!(video_id = %event.video_id, state = ?event.state, "Ignoring stale backend event");
            return;
        }

        match event.state {
            BackendState::Ready | BackendState::Cued => {
                self.apply_metadata();
                self.transport = Transport::Loading;
                // Cueing never autoplays.
                self.backend.play();
            }
            BackendState::Error => {
                warn!(video_id = %event.video_id, "Video unavailable");
                self.mark_unavailable();
            }
            BackendState::Ended => self.on_ended(),
            BackendState::Playing => {
                self.transport = Transport::Playing;
            }
            BackendState::Paused => {
                if self.transport != Transport::Stopped {
                    self.transport = Transport::Paused;
                }
            }
        }
    }

    fn apply_metadata(&mut self) {
        let Some(meta) = self.backend.metadata() else {
            return;
        };
        if self.loaded.as_deref() != Some(meta.video_id.as_str()) {
            return;
        }

        match self.now_playing.as_mut() {
            Some(NowPlaying::Ephemeral { title, .. }) => *title = Some(meta.title),
            _ => self.queue.update_track_title(&meta.video_id, meta.title),
        }
    }

    fn mark_unavailable(&mut self) {
        self.transport = Transport::Unavailable;
        if let Some(subject) = self.now_playing.clone() {
            let generation = self
                .recovery
                .arm(Instant::now() + self.config.error_grace, subject);
            debug!(generation, "Armed error recovery");
        }
    }

    fn on_ended(&mut self) {
        if self.is_ephemeral() {
            info!("Special track finished, returning to playlist");
            self.now_playing = None;
            match self.queue.select_first() {
                Some(first) => self.cue_track(&first),
                None => self.teardown(),
            }
            return;
        }

        if self.queue.next_track_video_id().is_none() {
            info!("End of playlist");
            self.stop();
            return;
        }

        let before = self.queue.current_track().map(|t| t.id.clone());
        match self.queue.play_next(false) {
            Some(next) if Some(&next.id) != before.as_ref() => self.cue_track(&next),
            _ => self.stop(),
        }
    }

    fn stop(&mut self) {
        self.transport = Transport::Stopped;
        self.progress = 100.0;
    }

    // ===== Error recovery =====

    /// Fire the error-recovery timer if it is due
    pub fn fire_recovery(&mut self, now: Instant) -> Option<Recovery> {
        let subject = self.recovery.take_if_due(now)?;

        match subject {
            NowPlaying::Ephemeral { video_id, .. } => {
                info!(video_id = %video_id, "Special track unavailable, resuming playlist");
                self.now_playing = None;
                self.resume_queue();
                Some(Recovery::Resumed)
            }
            NowPlaying::Queued { track_id } => match self.queue.get(&track_id) {
                Some(track) => {
                    info!(track_id = %track_id, "Removing unavailable track");
                    Some(Recovery::Remove(track.clone()))
                }
                None => {
                    self.resume_queue();
                    Some(Recovery::Resumed)
                }
            },
        }
    }

    /// Apply a removal the gateway confirmed
    ///
    /// Cues whatever became current, or tears playback down when the queue
    /// ran empty. While powered off only the queue changes; `power_on` cues.
    pub fn apply_removal(&mut self, id: &TrackId) -> Option<Track> {
        if self.queue.get(id).is_none() {
            debug!(track_id = %id, "Removed track already gone");
            return self.queue.current_track().cloned();
        }

        let was_subject = matches!(
            &self.now_playing,
            Some(NowPlaying::Queued { track_id }) if track_id == id
        );

        let current = self.queue.remove_track(id);
        match &current {
            None => self.teardown(),
            Some(track) if was_subject && self.powered => self.cue_track(track),
            Some(_) => {}
        }
        current
    }

    /// Whether `id` is the queued track currently marked unavailable
    pub fn is_unavailable(&self, id: &TrackId) -> bool {
        self.transport == Transport::Unavailable
            && matches!(&self.now_playing, Some(NowPlaying::Queued { track_id }) if track_id == id)
            && self.queue.get(id).is_some()
    }

    /// The gateway refused a removal; leave the queue as it is
    pub fn removal_failed(&mut self) {
        if self.transport == Transport::Unavailable {
            self.transport = Transport::Paused;
        }
    }

    // ===== Navigation =====

    /// Skip forward
    pub fn play_next(&mut self) -> Step {
        if matches!(self.transport, Transport::Stopped | Transport::Unavailable) {
            return Step::Ignored;
        }

        if self.is_ephemeral() {
            if self.queue.is_empty() {
                return Step::Ignored;
            }
            self.now_playing = None;
            return self.resume_queue().map_or(Step::Ignored, Step::Cued);
        }

        let before = self.queue.current_track().map(|t| t.id.clone());
        match self.queue.play_next(false) {
            Some(next) if Some(&next.id) != before.as_ref() => {
                self.cue_track(&next);
                Step::Cued(next)
            }
            Some(_) => {
                info!("End of playlist");
                Step::EndOfQueue
            }
            None => Step::Ignored,
        }
    }

    /// Skip backward
    ///
    /// The special track is never reachable backwards, and skipping is
    /// blocked while an unavailable video is being handled.
    pub fn play_previous(&mut self) -> Step {
        if self.is_ephemeral() || self.transport == Transport::Unavailable {
            return Step::Ignored;
        }

        match self.queue.play_previous() {
            Some(previous) => {
                self.cue_track(&previous);
                Step::Cued(previous)
            }
            None => Step::Ignored,
        }
    }

    // ===== Transport =====

    /// Play or pause the loaded video
    pub fn toggle_play(&mut self) -> bool {
        match self.transport {
            Transport::Playing => self.backend.pause(),
            Transport::Paused | Transport::Loading => self.backend.play(),
            Transport::Idle | Transport::Stopped | Transport::Unavailable => return false,
        }
        true
    }

    /// Mute or unmute
    pub fn toggle_mute(&mut self) -> bool {
        if self.loaded.is_none() {
            return false;
        }

        if self.muted {
            self.backend.unmute();
        } else {
            self.backend.mute();
        }
        self.muted = !self.muted;
        true
    }

    /// Sample the play position
    pub fn poll_progress(&mut self) -> Option<f64> {
        if !self.polling || self.transport == Transport::Stopped {
            return None;
        }

        let duration = self.backend.duration();
        if duration.is_zero() {
            return None;
        }
        let elapsed = self.backend.current_time();
        self.progress = (elapsed.as_secs_f64() / duration.as_secs_f64() * 100.0).min(100.0);
        Some(self.progress)
    }

    /// Turn shuffle mode on or off
    pub fn set_shuffle(&mut self, enabled: bool) {
        if !enabled {
            self.queue.unshuffle_tracks();
            return;
        }

        if self.transport == Transport::Stopped {
            // Restart the last video; the shuffled order supplies what follows.
            self.queue.shuffle_tracks(None);
            self.transport = Transport::Loading;
            self.progress = 0.0;
            self.backend.seek_to(Duration::ZERO);
            self.backend.play();
            return;
        }

        let preserve = match &self.now_playing {
            Some(NowPlaying::Queued { track_id }) => Some(track_id.clone()),
            _ => self.queue.current_track().map(|t| t.id.clone()),
        };
        self.queue.shuffle_tracks(preserve.as_ref());
    }

    /// Power off: tear the backend down but keep the queue position
    pub fn power_off(&mut self) {
        info!("Powering off");
        self.recovery.cancel();
        self.backend.clear();
        self.loaded = None;
        self.transport = Transport::Idle;
        self.progress = 0.0;
        self.polling = false;
        self.powered = false;
    }

    /// Power on: cue the queue's current track again
    ///
    /// The special track is one-shot and does not come back.
    pub fn power_on(&mut self) {
        info!("Powering on");
        self.powered = true;
        self.now_playing = None;
        self.resume_queue();
    }

    // ===== Queue-wide changes =====

    /// Append a track the gateway confirmed
    ///
    /// Cues it when nothing is playing or playback stopped at the end of the
    /// queue. While powered off it only becomes current.
    pub fn append(&mut self, track: Track) -> bool {
        let idle = self.now_playing.is_none() || self.transport == Transport::Stopped;
        if !self.queue.append_track(track.clone()) {
            return false;
        }

        if idle {
            self.queue.select_track(&track.id);
            if self.powered {
                self.cue_track(&track);
            }
        }
        true
    }

    /// Empty the queue and tear playback down
    pub fn empty_queue(&mut self) {
        self.queue.empty();
        self.teardown();
    }

    /// Drop the queue entirely (logout, invalid session)
    pub fn reset(&mut self) {
        self.queue.reset();
        self.teardown();
    }
}
