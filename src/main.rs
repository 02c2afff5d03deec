//! Negotiation Agent - scripted brand/influencer negotiation over HTTP
//!
//! A Rust backend implementing a fixed-phase negotiation state machine,
//! with replies optionally streamed character-by-character for a typing
//! effect.

mod api;
mod engine;
mod store;

use api::{create_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use store::{MemorySessionStore, SessionStore};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often the expiry sweep runs
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "negotiation_agent=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = env_or("NEGOTIATOR_PORT", 3000);
    let stream_delay_ms: u64 = env_or("NEGOTIATOR_STREAM_DELAY_MS", 30);
    let session_ttl_secs: u64 = env_or("NEGOTIATOR_SESSION_TTL_SECS", 3600);

    let store = Arc::new(MemorySessionStore::new());

    // Sweep abandoned sessions; a TTL of 0 disables expiry
    if session_ttl_secs > 0 {
        let ttl = Duration::from_secs(session_ttl_secs);
        let sweeper: Arc<dyn SessionStore> = store.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                tick.tick().await;
                let removed = sweeper.sweep_expired(ttl).await;
                if removed > 0 {
                    tracing::info!(removed, "Swept expired sessions");
                }
            }
        });
    }

    let state = AppState::new(store, Duration::from_millis(stream_delay_ms));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Negotiation agent listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
