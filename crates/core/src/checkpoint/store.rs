//! Checkpoint store trait and the in-memory implementation.

use async_trait::async_trait;
use gk_protocol::checkpoint_models::Checkpoint;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing storage failed to read or write a session.
    #[error("Checkpoint backend failed for session '{session_id}': {reason}")]
    Backend { session_id: String, reason: String },

    /// A stored checkpoint could not be encoded or decoded.
    #[error("Checkpoint serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Type alias for Result with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Exclusive hold on one session of a store.
///
/// While a lease is alive no other caller can lease the same session, so a
/// load, run and save cycle performed under it is atomic per key. The hold
/// is released on drop.
#[derive(Debug)]
pub struct SessionLease {
    session_id: String,
    _guard: OwnedMutexGuard<()>,
}

impl SessionLease {
    pub fn new(session_id: impl Into<String>, guard: OwnedMutexGuard<()>) -> Self {
        Self {
            session_id: session_id.into(),
            _guard: guard,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Keyed storage of the latest checkpoint per session.
///
/// Missing keys are fresh sessions. Writes to one session id replace the
/// whole checkpoint. Read-modify-write cycles are serialized per key by
/// [`CheckpointStore::lease`], shared by every caller of the same store.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Wait for exclusive access to `session_id`.
    async fn lease(&self, session_id: &str) -> StoreResult<SessionLease>;

    /// The latest checkpoint for `session_id`, or a fresh empty one.
    async fn load(&self, session_id: &str) -> StoreResult<Checkpoint>;

    /// Overwrite the checkpoint for `session_id`.
    async fn save(&self, session_id: &str, checkpoint: Checkpoint) -> StoreResult<()>;

    /// Read-only inspection. `None` if the session was never saved.
    async fn get(&self, session_id: &str) -> StoreResult<Option<Checkpoint>>;

    async fn has_pending_suspension(&self, session_id: &str) -> StoreResult<bool> {
        Ok(self
            .get(session_id)
            .await?
            .is_some_and(|checkpoint| checkpoint.is_suspended()))
    }

    /// Ids of all stored sessions, sorted.
    async fn sessions(&self) -> StoreResult<Vec<String>>;

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.sessions().await?.len())
    }
}

/// In-memory checkpoint store.
///
/// Each session has its own lock so that a long write to one session never
/// blocks access to another. Clones share checkpoints and leases.
#[derive(Debug, Default, Clone)]
pub struct MemoryCheckpointStore {
    checkpoints: Arc<Mutex<HashMap<String, Arc<Mutex<Checkpoint>>>>>,
    leases: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, session_id: &str) -> Option<Arc<Mutex<Checkpoint>>> {
        self.checkpoints.lock().await.get(session_id).cloned()
    }

    /// Drop a session's checkpoint. Returns whether one existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.checkpoints.lock().await.remove(session_id).is_some()
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn lease(&self, session_id: &str) -> StoreResult<SessionLease> {
        let lock = {
            let mut leases = self.leases.lock().await;
            Arc::clone(leases.entry(session_id.to_string()).or_default())
        };
        let guard = lock.lock_owned().await;
        tracing::trace!(session = %session_id, "Session leased");
        Ok(SessionLease::new(session_id, guard))
    }

    async fn load(&self, session_id: &str) -> StoreResult<Checkpoint> {
        Ok(self
            .get(session_id)
            .await?
            .unwrap_or_else(|| Checkpoint::new(session_id)))
    }

    async fn save(&self, session_id: &str, checkpoint: Checkpoint) -> StoreResult<()> {
        let slot = {
            let mut checkpoints = self.checkpoints.lock().await;
            Arc::clone(
                checkpoints
                    .entry(session_id.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(Checkpoint::new(session_id)))),
            )
        };
        *slot.lock().await = checkpoint;

        tracing::trace!(session = %session_id, "Checkpoint saved");
        Ok(())
    }

    async fn get(&self, session_id: &str) -> StoreResult<Option<Checkpoint>> {
        match self.slot(session_id).await {
            Some(slot) => Ok(Some(slot.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn sessions(&self) -> StoreResult<Vec<String>> {
        let mut ids: Vec<String> = self.checkpoints.lock().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
