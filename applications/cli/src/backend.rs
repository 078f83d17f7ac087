//! Simulated playback backend
//!
//! Plays nothing: a wall clock stands in for the video and lifecycle events
//! are sent over an mpsc channel to the player loop.

use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};
use workmate_playback::{BackendEvent, BackendState, PlaybackBackend, VideoMetadata};

pub struct SimulatedBackend {
    events: mpsc::Sender<BackendEvent>,
    track_length: Duration,
    unavailable: HashSet<String>,
    ready: bool,
    loaded: Option<String>,
    offset: Duration,
    started_at: Option<Instant>,
    muted: bool,
    end_timer: Option<JoinHandle<()>>,
}

impl SimulatedBackend {
    pub fn new(events: mpsc::Sender<BackendEvent>, track_length: Duration) -> Self {
        Self {
            events,
            track_length,
            unavailable: HashSet::new(),
            ready: false,
            loaded: None,
            offset: Duration::ZERO,
            started_at: None,
            muted: false,
            end_timer: None,
        }
    }

    /// Video ids that report an error instead of playing
    pub fn with_unavailable(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.unavailable = ids.into_iter().collect();
        self
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn emit(&self, state: BackendState) {
        let Some(video_id) = &self.loaded else {
            return;
        };
        if let Err(e) = self.events.try_send(BackendEvent::new(video_id.clone(), state)) {
            warn!(video_id = %video_id, ?state, error = %e, "Dropped backend event");
        }
    }

    fn stop_clock(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.offset = (self.offset + started_at.elapsed()).min(self.track_length);
        }
        if let Some(timer) = self.end_timer.take() {
            timer.abort();
        }
    }

    fn start_clock(&mut self) {
        let Some(video_id) = self.loaded.clone() else {
            return;
        };
        self.started_at = Some(Instant::now());

        let remaining = self.track_length.saturating_sub(self.offset);
        let events = self.events.clone();
        self.end_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            let _ = events.send(BackendEvent::new(video_id, BackendState::Ended)).await;
        }));
    }
}

impl PlaybackBackend for SimulatedBackend {
    fn cue(&mut self, video_id: &str) {
        self.stop_clock();
        self.loaded = Some(video_id.to_string());
        self.offset = Duration::ZERO;
        debug!(video_id = %video_id, "Simulated cue");

        if !self.ready {
            self.ready = true;
            self.emit(BackendState::Ready);
        }
        if self.unavailable.contains(video_id) {
            self.emit(BackendState::Error);
        } else {
            self.emit(BackendState::Cued);
        }
    }

    fn play(&mut self) {
        let Some(video_id) = &self.loaded else {
            return;
        };
        if self.unavailable.contains(video_id) {
            self.emit(BackendState::Error);
            return;
        }
        if self.started_at.is_none() {
            self.start_clock();
            self.emit(BackendState::Playing);
        }
    }

    fn pause(&mut self) {
        if self.started_at.is_some() {
            self.stop_clock();
            self.emit(BackendState::Paused);
        }
    }

    fn seek_to(&mut self, position: Duration) {
        let playing = self.started_at.is_some();
        self.stop_clock();
        self.offset = position.min(self.track_length);
        if playing {
            self.start_clock();
        }
    }

    fn mute(&mut self) {
        self.muted = true;
    }

    fn unmute(&mut self) {
        self.muted = false;
    }

    fn current_time(&self) -> Duration {
        let running = self.started_at.map(|at| at.elapsed()).unwrap_or_default();
        (self.offset + running).min(self.track_length)
    }

    fn duration(&self) -> Duration {
        if self.loaded.is_some() {
            self.track_length
        } else {
            Duration::ZERO
        }
    }

    fn metadata(&self) -> Option<VideoMetadata> {
        let video_id = self.loaded.as_ref()?;
        if self.unavailable.contains(video_id) {
            return None;
        }
        Some(VideoMetadata {
            video_id: video_id.clone(),
            title: format!("Video {}", video_id),
        })
    }

    fn clear(&mut self) {
        self.stop_clock();
        self.loaded = None;
        self.offset = Duration::ZERO;
        self.ready = false;
    }
}

impl Drop for SimulatedBackend {
    fn drop(&mut self) {
        if let Some(timer) = self.end_timer.take() {
            timer.abort();
        }
    }
}
