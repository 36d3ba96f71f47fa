//! In-memory session store.
//!
//! Snapshots live in a map behind an async lock. Suitable for tests and
//! single-process deployments; anything durable belongs behind the same
//! port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::session::SessionSnapshot;
use crate::ports::{SessionStore, SessionStoreError};

/// Session store backed by a process-local map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    snapshots: Arc<RwLock<HashMap<SessionId, SessionSnapshot>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    /// Returns true when no snapshots are stored.
    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionStoreError> {
        self.snapshots
            .write()
            .await
            .insert(snapshot.session_id, snapshot.clone());
        Ok(())
    }

    async fn load(&self, session_id: SessionId) -> Result<SessionSnapshot, SessionStoreError> {
        self.snapshots
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(session_id))
    }

    async fn delete(&self, session_id: SessionId) -> Result<(), SessionStoreError> {
        self.snapshots.write().await.remove(&session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::FormSchema;
    use crate::domain::session::Session;

    fn snapshot() -> SessionSnapshot {
        let schema = FormSchema::from_json(
            &serde_json::json!({
                "formId": "f",
                "formTitle": "F",
                "fields": [{
                    "id": "name",
                    "label": "Full Name",
                    "type": "text",
                    "accessibility": {"tabOrder": 1}
                }]
            })
            .to_string(),
        )
        .unwrap();
        Session::new(&schema).snapshot()
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = InMemorySessionStore::new();
        let snap = snapshot();

        store.save(&snap).await.unwrap();
        let loaded = store.load(snap.session_id).await.unwrap();
        assert_eq!(loaded, snap);
    }

    #[tokio::test]
    async fn save_replaces_existing_snapshot() {
        let store = InMemorySessionStore::new();
        let mut snap = snapshot();

        store.save(&snap).await.unwrap();
        snap.cursor = None;
        store.save(&snap).await.unwrap();

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn load_missing_is_not_found() {
        let store = InMemorySessionStore::new();
        let missing = SessionId::new();
        assert!(matches!(
            store.load(missing).await,
            Err(SessionStoreError::NotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemorySessionStore::new();
        let snap = snapshot();
        store.save(&snap).await.unwrap();

        store.delete(snap.session_id).await.unwrap();
        store.delete(snap.session_id).await.unwrap();
        assert!(store.is_empty().await);
    }
}
