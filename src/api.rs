//! HTTP API for the negotiation agent

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::store::SessionStore;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    /// Pause between characters on the streaming endpoint
    pub stream_delay: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn SessionStore>, stream_delay: Duration) -> Self {
        Self {
            store,
            stream_delay,
        }
    }
}
