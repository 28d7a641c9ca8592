use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockMappedWriteGuard, RwLockWriteGuard};

use crate::domain::WizardState;

/// Wizard state per session, held in memory for the life of the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, WizardState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, creating a fresh wizard on first touch.
    pub async fn snapshot(&self, session_id: &str) -> WizardState {
        if let Some(state) = self.sessions.read().await.get(session_id) {
            return state.clone();
        }
        self.update(session_id, |state| state.clone()).await
    }

    /// Runs `f` against the session's state under the write lock.
    pub async fn update<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&mut WizardState) -> R,
    {
        let mut state = self.lock(session_id).await;
        f(&mut state)
    }

    /// Write guard on one session's state. Every other session waits until
    /// the guard is dropped, so keep it only for work that must not interleave.
    pub async fn lock(&self, session_id: &str) -> RwLockMappedWriteGuard<'_, WizardState> {
        let sessions = self.sessions.write().await;
        RwLockWriteGuard::map(sessions, |sessions| {
            sessions.entry(session_id.to_string()).or_insert_with(|| {
                tracing::debug!(session_id, "Wizard session created");
                WizardState::default()
            })
        })
    }

    pub async fn discard(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            tracing::debug!(session_id, "Wizard session discarded");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
