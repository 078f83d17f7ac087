/// Service contracts consumed by the playback engine
use crate::error::Result;
use crate::types::{MutateRequest, PlaylistDocument, SessionInfo, SessionTimeLeft};
use async_trait::async_trait;

/// Persistence gateway
///
/// Durable store for playlist mutations. The engine applies a local mutation
/// only after the matching call here returned `Ok`.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Apply an add / remove / empty mutation and return the updated playlist
    async fn mutate(&self, request: MutateRequest) -> Result<PlaylistDocument>;

    /// Fetch a playlist by object id
    async fn fetch(&self, playlist_id: &str) -> Result<PlaylistDocument>;
}

/// Session / auth service
///
/// Issues and expires sessions. The engine only reads it to bootstrap or
/// reset the queue.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Current session summary
    async fn session(&self) -> Result<SessionInfo>;

    /// Remaining session time
    async fn time_left(&self) -> Result<SessionTimeLeft>;

    /// Invalidate the session
    async fn logout(&self) -> Result<()>;
}
