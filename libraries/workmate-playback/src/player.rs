//! Player event loop
//!
//! Ties the synchronous engine (queue, controller, menu) to the async
//! persistence gateway and session service.
//!
//! At most one gateway call is in flight. Local state changes only after the
//! call resolved successfully, so the visible queue never runs ahead of the
//! server's copy. [`Player::run`] multiplexes triggers, backend events, the
//! pending call, timers and progress polling on one task.

use crate::backend::{BackendEvent, PlaybackBackend};
use crate::controller::{PlaybackController, Recovery, Step};
use crate::error::{PlaybackError, Result};
use crate::menu::{Menu, MenuAction, MenuCommand, MenuDepth};
use crate::status::{confirmation, MenuView, Notice, StatusSnapshot};
use crate::timer::TimerSlot;
use crate::trigger::Trigger;
use crate::types::{NowPlaying, PlayerConfig};
use chrono::Utc;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use workmate_core::{
    locator, CoreError, MutateRequest, PersistenceGateway, PlaylistDocument, SessionInfo,
    SessionService, Track, TrackId,
};

/// How long an inline notice stays visible
pub const NOTICE_TTL: Duration = Duration::from_secs(2);

/// Default maximum session age (two days)
pub const DEFAULT_MAX_SESSION_AGE: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Input fed into [`Player::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Abstract trigger
    Trigger(Trigger),

    /// Locator typed into the add field
    AddTrack(String),

    /// Stop the loop
    Shutdown,
}

/// Kind of gateway call in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Add a track
    Add,
    /// Remove a track
    Remove,
    /// Empty the playlist
    Empty,
    /// Log out
    Logout,
}

enum Outcome {
    Added(Track, workmate_core::Result<PlaylistDocument>),
    Removed(TrackId, workmate_core::Result<PlaylistDocument>),
    Emptied(workmate_core::Result<PlaylistDocument>),
    LoggedOut(workmate_core::Result<()>),
}

struct Pending {
    action: PendingAction,
    future: BoxFuture<'static, Outcome>,
}

/// Async player: engine plus gateway
pub struct Player<B, G> {
    controller: PlaybackController<B>,
    menu: Menu,
    gateway: Arc<G>,
    pending: Option<Pending>,
    session: Option<SessionInfo>,
    session_left: Option<f64>,
    max_session_age: Duration,
    notice: Option<Notice>,
    notice_timer: TimerSlot<()>,
    deferred_removal: Option<Track>,
}

impl<B, G> Player<B, G>
where
    B: PlaybackBackend,
    G: PersistenceGateway + SessionService + 'static,
{
    /// Create a player; call [`Player::bootstrap`] before feeding input
    pub fn new(backend: B, gateway: Arc<G>, config: PlayerConfig) -> Self {
        Self {
            controller: PlaybackController::new(backend, config),
            menu: Menu::new(),
            gateway,
            pending: None,
            session: None,
            session_left: None,
            max_session_age: DEFAULT_MAX_SESSION_AGE,
            notice: None,
            notice_timer: TimerSlot::new(),
            deferred_removal: None,
        }
    }

    /// Set the maximum session age used for the remaining-time percentage
    pub fn with_max_session_age(mut self, max_age: Duration) -> Self {
        self.max_session_age = max_age;
        self
    }

    /// Playback controller
    pub fn controller(&self) -> &PlaybackController<B> {
        &self.controller
    }

    /// Playback controller (mutable)
    pub fn controller_mut(&mut self) -> &mut PlaybackController<B> {
        &mut self.controller
    }

    /// Action menu
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Current session, if valid
    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    /// Latest inline notice
    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Gateway call in flight, if any
    pub fn pending_action(&self) -> Option<PendingAction> {
        self.pending.as_ref().map(|p| p.action)
    }

    // ===== Session =====

    /// Load the session and its playlist, then start playback
    ///
    /// An invalid or expired session resets the queue to empty defaults.
    pub async fn bootstrap(&mut self) -> Result<()> {
        let session = match self.gateway.session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Failed to load session");
                self.set_notice(Notice::Failed);
                return Err(e.into());
            }
        };

        let playlist_id = session
            .playlist()
            .filter(|_| !session.is_expired_at(Utc::now()))
            .map(str::to_string);
        let Some(playlist_id) = playlist_id else {
            info!("No valid session");
            self.session = None;
            self.session_left = None;
            self.controller.reset();
            return Ok(());
        };

        let document = match self.gateway.fetch(&playlist_id).await {
            Ok(document) => document,
            Err(e) => {
                warn!(playlist_id = %playlist_id, error = %e, "Failed to load playlist");
                self.set_notice(Notice::Failed);
                return Err(e.into());
            }
        };

        info!(
            username = session.username.as_deref().unwrap_or_default(),
            playlist_id = %playlist_id,
            tracks = document.tracks.len(),
            "Session bootstrapped"
        );
        self.controller
            .queue_mut()
            .load(document.title, playlist_id, document.tracks);
        self.session = Some(session);

        if let Err(e) = self.refresh_session_time().await {
            warn!(error = %e, "Failed to read remaining session time");
        }

        self.controller.start();
        Ok(())
    }

    /// Re-read the remaining session time
    ///
    /// An expired session resets the queue like a logout.
    pub async fn refresh_session_time(&mut self) -> Result<f64> {
        let left = self.gateway.time_left().await?;
        if left.expired {
            info!("Session expired");
            self.end_session();
            return Ok(0.0);
        }

        let percent = left.percent_of(self.max_session_age);
        self.session_left = Some(percent);
        Ok(percent)
    }

    fn end_session(&mut self) {
        self.controller.reset();
        self.session = None;
        self.session_left = None;
        self.menu.close();
    }

    // ===== Input =====

    /// Feed one trigger
    pub fn handle_trigger(&mut self, trigger: Trigger) -> Result<()> {
        if trigger == Trigger::Power {
            self.toggle_power();
            return Ok(());
        }

        if !self.controller.is_powered() {
            debug!(%trigger, "Powered off, ignoring trigger");
            return Ok(());
        }
        if self.session.is_none() {
            debug!(%trigger, "No session, ignoring trigger");
            return Ok(());
        }

        match self.menu.handle(trigger) {
            MenuCommand::None => {}
            MenuCommand::PlayPrevious => {
                self.controller.play_previous();
            }
            MenuCommand::PlayNext => {
                if self.controller.play_next() == Step::EndOfQueue {
                    self.set_notice(Notice::EndOfPlaylist);
                }
            }
            MenuCommand::TogglePlay => {
                self.controller.toggle_play();
            }
            MenuCommand::ToggleMute => {
                self.controller.toggle_mute();
            }
            MenuCommand::ToggleShuffle => self.toggle_shuffle(),
            MenuCommand::Execute(action) => return self.execute(action),
        }
        Ok(())
    }

    fn toggle_power(&mut self) {
        if self.controller.is_powered() {
            self.menu.close();
            self.notice = None;
            self.notice_timer.cancel();
            self.controller.power_off();
        } else {
            self.controller.power_on();
        }
    }

    fn toggle_shuffle(&mut self) {
        let enabled = !self.controller.queue().is_shuffled();
        info!(enabled, "Shuffle mode");
        self.controller.set_shuffle(enabled);
    }

    fn execute(&mut self, action: MenuAction) -> Result<()> {
        let (_, offered) = confirmation(
            action,
            self.controller.queue().is_empty(),
            self.controller.is_ephemeral(),
        );
        if !offered {
            debug!(action = action.label(), "Nothing to confirm");
            return Ok(());
        }

        match action {
            MenuAction::Remove => {
                let track = self
                    .controller
                    .queue()
                    .current_track()
                    .cloned()
                    .ok_or(PlaybackError::NoTrackLoaded)?;
                self.request_removal(track)
            }
            MenuAction::Shuffle => {
                self.toggle_shuffle();
                Ok(())
            }
            MenuAction::Empty => {
                if !self.ready_for(PendingAction::Empty)? {
                    return Ok(());
                }
                let request = MutateRequest::empty(self.object_id()?);
                let gateway = Arc::clone(&self.gateway);
                self.start_pending(
                    PendingAction::Empty,
                    async move { Outcome::Emptied(gateway.mutate(request).await) }.boxed(),
                );
                Ok(())
            }
            MenuAction::Logout => {
                if !self.ready_for(PendingAction::Logout)? {
                    return Ok(());
                }
                let gateway = Arc::clone(&self.gateway);
                self.start_pending(
                    PendingAction::Logout,
                    async move { Outcome::LoggedOut(gateway.logout().await) }.boxed(),
                );
                Ok(())
            }
        }
    }

    /// Add a track by locator
    ///
    /// The track reaches the queue only once the gateway stored it.
    pub fn add_track(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if let Err(e) = locator::require_video_id(url) {
            self.set_notice(Notice::InvalidUrl);
            return Err(e.into());
        }
        if !self.ready_for(PendingAction::Add)? {
            return Ok(());
        }

        let playlist_id = self.object_id()?;
        let track = self.controller.queue_mut().mint_track(url, None);
        let request = MutateRequest::add(playlist_id, track.clone());
        let gateway = Arc::clone(&self.gateway);

        debug!(track_id = %track.id, "Adding track");
        self.start_pending(
            PendingAction::Add,
            async move {
                let result = gateway.mutate(request).await;
                Outcome::Added(track, result)
            }
            .boxed(),
        );
        Ok(())
    }

    fn request_removal(&mut self, track: Track) -> Result<()> {
        if !self.ready_for(PendingAction::Remove)? {
            return Ok(());
        }

        let request = MutateRequest::remove(self.object_id()?, track.clone());
        let gateway = Arc::clone(&self.gateway);
        self.start_pending(
            PendingAction::Remove,
            async move {
                let result = gateway.mutate(request).await;
                Outcome::Removed(track.id, result)
            }
            .boxed(),
        );
        Ok(())
    }

    /// `Ok(false)` if the same action is already pending, error if another is
    fn ready_for(&self, action: PendingAction) -> Result<bool> {
        match &self.pending {
            None => Ok(true),
            Some(pending) if pending.action == action => {
                debug!(?action, "Action already pending, ignoring trigger");
                Ok(false)
            }
            Some(_) => Err(PlaybackError::ActionPending),
        }
    }

    fn start_pending(&mut self, action: PendingAction, future: BoxFuture<'static, Outcome>) {
        debug!(?action, "Gateway request sent");
        self.pending = Some(Pending { action, future });
    }

    fn object_id(&self) -> Result<String> {
        self.controller
            .queue()
            .object_id()
            .map(str::to_string)
            .ok_or(PlaybackError::Gateway(CoreError::SessionExpired))
    }

    fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.notice_timer.arm(Instant::now() + NOTICE_TTL, ());
    }

    // ===== Backend and timers =====

    /// Feed one backend lifecycle event
    pub fn handle_backend_event(&mut self, event: &BackendEvent) {
        self.controller.handle_event(event);
    }

    /// Fire every timer that is due at `now`
    pub fn fire_due_timers(&mut self, now: Instant) {
        if self.notice_timer.take_if_due(now).is_some() {
            self.notice = None;
        }

        if let Some(Recovery::Remove(track)) = self.controller.fire_recovery(now) {
            match self.request_removal(track.clone()) {
                Ok(()) => {}
                Err(PlaybackError::ActionPending) => {
                    debug!(track_id = %track.id, "Another call in flight, removal deferred");
                    self.deferred_removal = Some(track);
                }
                Err(e) => self.abandon_removal(&e),
            }
        }
    }

    /// Send a removal deferred behind an earlier call, if its track is still
    /// the unavailable one
    fn retry_deferred_removal(&mut self) {
        let Some(track) = self.deferred_removal.take() else {
            return;
        };
        if !self.controller.is_unavailable(&track.id) {
            debug!(track_id = %track.id, "Deferred removal no longer applies");
            return;
        }

        info!(track_id = %track.id, "Retrying deferred removal");
        if let Err(e) = self.request_removal(track) {
            self.abandon_removal(&e);
        }
    }

    fn abandon_removal(&mut self, e: &PlaybackError) {
        warn!(error = %e, "Cannot remove unavailable track");
        self.controller.removal_failed();
        self.set_notice(Notice::SaveFailed);
    }

    /// Sample the play position
    pub fn poll_progress(&mut self) -> Option<f64> {
        self.controller.poll_progress()
    }

    /// Wait for the pending gateway call and apply its result
    ///
    /// Returns `false` if nothing was pending.
    pub async fn resolve_pending(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let outcome = (&mut pending.future).await;
        self.pending = None;
        self.apply_outcome(outcome);
        true
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Added(track, Ok(_)) => {
                info!(track_id = %track.id, "Track added");
                self.controller.append(track);
                self.set_notice(Notice::MusicAdded);
            }
            Outcome::Added(track, Err(e)) => {
                warn!(track_id = %track.id, error = %e, "Failed to add track");
                self.set_notice(Notice::SaveFailed);
            }
            Outcome::Removed(track_id, Ok(_)) => {
                info!(track_id = %track_id, "Track removed");
                self.controller.apply_removal(&track_id);
                if self.menu.depth() == MenuDepth::Confirm(MenuAction::Remove) {
                    self.menu.close();
                }
            }
            Outcome::Removed(track_id, Err(e)) => {
                warn!(track_id = %track_id, error = %e, "Failed to remove track");
                self.controller.removal_failed();
                self.set_notice(Notice::SaveFailed);
            }
            Outcome::Emptied(Ok(_)) => {
                info!("Playlist emptied");
                self.controller.empty_queue();
                self.menu.close();
            }
            Outcome::Emptied(Err(e)) => {
                warn!(error = %e, "Failed to empty playlist");
                self.set_notice(Notice::SaveFailed);
            }
            Outcome::LoggedOut(Ok(())) => {
                info!("Logged out");
                self.end_session();
            }
            Outcome::LoggedOut(Err(e)) => {
                warn!(error = %e, "Failed to log out");
                self.set_notice(Notice::Failed);
            }
        }

        self.retry_deferred_removal();
    }

    // ===== Display =====

    /// Snapshot for rendering
    pub fn status(&self) -> StatusSnapshot {
        let queue = self.controller.queue();
        let ephemeral = self.controller.is_ephemeral();

        let (prompt, confirm) = match self.menu.depth() {
            MenuDepth::Confirm(action) => {
                let (prompt, confirm) = confirmation(action, queue.is_empty(), ephemeral);
                (Some(prompt.to_string()), confirm)
            }
            MenuDepth::Closed | MenuDepth::Actions => (None, false),
        };

        let track_index = match self.controller.now_playing() {
            Some(NowPlaying::Queued { track_id }) => queue.track_index_with_id(track_id),
            _ => queue.track_index(),
        };

        StatusSnapshot {
            powered: self.controller.is_powered(),
            username: self.session.as_ref().and_then(|s| s.username.clone()),
            playlist_title: queue.title().to_string(),
            title: self.controller.display_title(),
            transport: self.controller.transport(),
            index_label: StatusSnapshot::index_label(queue.is_shuffled(), ephemeral, &track_index),
            progress: self.controller.progress(),
            muted: self.controller.is_muted(),
            session_left: self.session_left,
            menu: MenuView {
                depth: self.menu.depth(),
                highlighted: self.menu.highlighted(),
                shuffle: queue.is_shuffled(),
                prompt,
                confirm,
            },
            notice: self.notice,
        }
    }

    // ===== Event loop =====

    /// Drive the player until [`Input::Shutdown`] or the input channel closes
    ///
    /// A fresh [`StatusSnapshot`] is published after every handled event.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<Input>,
        mut events: mpsc::Receiver<BackendEvent>,
        status: watch::Sender<StatusSnapshot>,
    ) -> Self {
        let mut ticker = tokio::time::interval(self.controller.config().progress_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        status.send_replace(self.status());

        loop {
            let recovery_at = self.controller.recovery_deadline();
            let notice_at = self.notice_timer.deadline();
            let polling = self.controller.is_polling();

            tokio::select! {
                input = inputs.recv() => match input {
                    Some(Input::Trigger(trigger)) => {
                        if let Err(e) = self.handle_trigger(trigger) {
                            debug!(%trigger, error = %e, "Trigger refused");
                        }
                    }
                    Some(Input::AddTrack(url)) => {
                        if let Err(e) = self.add_track(&url) {
                            debug!(error = %e, "Add refused");
                        }
                    }
                    Some(Input::Shutdown) | None => break,
                },
                Some(event) = events.recv() => self.handle_backend_event(&event),
                outcome = next_outcome(&mut self.pending) => self.apply_outcome(outcome),
                () = sleep_until_some(recovery_at) => self.fire_due_timers(Instant::now()),
                () = sleep_until_some(notice_at) => self.fire_due_timers(Instant::now()),
                _ = ticker.tick(), if polling => {
                    self.poll_progress();
                }
            }

            status.send_replace(self.status());
        }

        info!("Player loop stopped");
        self
    }
}

/// Resolves with the pending call's outcome, never if nothing is pending
async fn next_outcome(pending: &mut Option<Pending>) -> Outcome {
    match pending {
        Some(in_flight) => {
            let outcome = (&mut in_flight.future).await;
            *pending = None;
            outcome
        }
        None => std::future::pending().await,
    }
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
