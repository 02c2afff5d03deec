//! In-memory session store

use super::{SessionHandle, SessionStore, StoreError, StoreResult};
use crate::engine::NegotiationSession;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Process-lifetime map from session id to session. Cleared on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: NegotiationSession) -> SessionHandle {
        let id = session.session_id.clone();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    async fn get(&self, id: &str) -> StoreResult<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))
    }

    async fn snapshot(&self, id: &str) -> StoreResult<NegotiationSession> {
        let handle = self.get(id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    async fn list(&self) -> Vec<NegotiationSession> {
        let handles: Vec<SessionHandle> = self.sessions.read().await.values().cloned().collect();
        let mut sessions = Vec::with_capacity(handles.len());
        for handle in handles {
            sessions.push(handle.lock().await.clone());
        }
        sessions
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn sweep_expired(&self, ttl: Duration) -> usize {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return 0;
        };
        let cutoff = Utc::now() - ttl;

        let mut expired = Vec::new();
        {
            let sessions = self.sessions.read().await;
            for (id, handle) in sessions.iter() {
                let session = handle.lock().await;
                if session.last_activity < cutoff {
                    expired.push(id.clone());
                }
            }
        }

        let mut sessions = self.sessions.write().await;
        expired
            .iter()
            .filter(|id| sessions.remove(id.as_str()).is_some())
            .count()
    }
}
