//! Session Store Port - interface for persisting session snapshots.
//!
//! The engine owns no durable state; this port lets a caller snapshot a
//! session for resumability and restore it later.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::session::SessionSnapshot;

/// Errors that can occur during snapshot storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("No snapshot stored for session {0}")]
    NotFound(SessionId),

    #[error("Failed to serialize snapshot: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Port for saving and loading session snapshots.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Saves a snapshot, replacing any existing one for the session.
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionStoreError>;

    /// Loads the snapshot for a session.
    async fn load(&self, session_id: SessionId) -> Result<SessionSnapshot, SessionStoreError>;

    /// Deletes a stored snapshot. Deleting a missing snapshot is not an
    /// error.
    async fn delete(&self, session_id: SessionId) -> Result<(), SessionStoreError>;
}
