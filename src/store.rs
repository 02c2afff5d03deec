//! Session storage
//!
//! The service this replaces kept a global mutable dict keyed by session
//! id. Here the store is an explicit abstraction with an in-memory
//! implementation, swappable for a persistent backend later. Updates to a
//! single session go through a per-session lock so concurrent requests
//! against the same id are serialized.

mod memory;

pub use memory::MemorySessionStore;

use crate::engine::NegotiationSession;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle to a stored session. Hold the inner lock across the whole
/// advance-and-commit so no update is lost.
pub type SessionHandle = Arc<Mutex<NegotiationSession>>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session, returning its handle.
    async fn insert(&self, session: NegotiationSession) -> SessionHandle;

    /// Get the handle for a session.
    async fn get(&self, id: &str) -> StoreResult<SessionHandle>;

    /// Read-only copy of a session's current state.
    async fn snapshot(&self, id: &str) -> StoreResult<NegotiationSession>;

    /// Read-only copies of every stored session.
    async fn list(&self) -> Vec<NegotiationSession>;

    /// Remove a session.
    async fn remove(&self, id: &str) -> StoreResult<()>;

    /// Number of stored sessions.
    async fn count(&self) -> usize;

    /// Drop sessions idle longer than `ttl`. Returns how many were removed.
    async fn sweep_expired(&self, ttl: Duration) -> usize;
}
