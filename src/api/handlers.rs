//! HTTP request handlers

use super::sse::typing_stream;
use super::types::{
    ErrorResponse, HealthResponse, MessageResponse, NegotiationReply, RespondRequest,
    SessionListResponse, SessionStateResponse, SessionSummary, StartNegotiationRequest,
};
use super::AppState;
use crate::engine::{advance, NegotiationSession};
use crate::store::StoreError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness probe
        .route("/", get(health))
        // Session creation
        .route("/start-negotiation", post(start_negotiation))
        // One negotiation step, plain JSON reply
        .route("/respond", post(respond))
        // One negotiation step, reply paced character-by-character
        .route("/respond-stream", post(respond_stream))
        // Session inspection and removal
        .route("/sessions", get(list_sessions))
        .route("/session/:id", get(get_session).delete(delete_session))
        .with_state(state)
}

// ============================================================
// Negotiation
// ============================================================

async fn start_negotiation(
    State(state): State<AppState>,
    Json(req): Json<StartNegotiationRequest>,
) -> Json<NegotiationReply> {
    let mut session = NegotiationSession::new(req.budget, req.campaign_type, req.duration);
    let step = advance(&session, "");
    step.apply(&mut session, "");

    tracing::info!(
        session_id = %session.session_id,
        budget = session.budget,
        "Negotiation started"
    );

    let reply = NegotiationReply::from_step(&session, &step);
    state.store.insert(session).await;
    Json(reply)
}

async fn respond(
    State(state): State<AppState>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<NegotiationReply>, AppError> {
    let handle = state.store.get(&req.session_id).await?;

    let mut session = handle.lock().await;
    let step = advance(&session, &req.message);
    step.apply(&mut session, &req.message);

    if session.phase.is_terminal() {
        tracing::info!(
            session_id = %session.session_id,
            phase = ?session.phase,
            agreed_price = session.agreed_price,
            rounds = session.rounds,
            "Negotiation ended"
        );
    }

    Ok(Json(NegotiationReply::from_step(&session, &step)))
}

async fn respond_stream(
    State(state): State<AppState>,
    Json(req): Json<RespondRequest>,
) -> Result<Response, AppError> {
    let handle = state.store.get(&req.session_id).await?;

    // Compute and commit the whole transition before any frame goes out,
    // so a client dropping mid-stream never sees partially applied state.
    let (step, snapshot) = {
        let mut session = handle.lock().await;
        let step = advance(&session, &req.message);
        step.apply(&mut session, &req.message);
        (step, session.clone())
    };

    let complete = json!({
        "type": "complete",
        "session_id": snapshot.session_id,
        "options": step.options,
        "state": serde_json::to_value(&snapshot).map_err(|e| AppError::Internal(e.to_string()))?,
        "is_complete": step.is_complete,
    });

    Ok(typing_stream(&step.bot_message, complete, state.stream_delay).into_response())
}

// ============================================================
// Session inspection
// ============================================================

async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    let active_sessions = state
        .store
        .list()
        .await
        .into_iter()
        .map(SessionSummary::from)
        .collect();

    Json(SessionListResponse { active_sessions })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionStateResponse>, AppError> {
    let session = state.store.snapshot(&id).await?;
    Ok(Json(SessionStateResponse {
        session_id: id,
        state: session,
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.remove(&id).await?;
    tracing::info!(session_id = %id, "Session deleted");
    Ok(Json(MessageResponse {
        message: "Session ended successfully",
    }))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Negotiation Agent API is running",
        active_sessions: state.store.count().await,
    })
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    NotFound(String),
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SessionNotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySessionStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_router() -> Router {
        create_router(AppState::new(
            Arc::new(MemorySessionStore::new()),
            Duration::ZERO,
        ))
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(match body {
                Some(value) => Body::from(value.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn start(router: &Router, budget: i64) -> String {
        let (status, body) = send(
            router,
            "POST",
            "/start-negotiation",
            Some(json!({ "budget": budget })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn start_negotiation_opens_with_budget_offer() {
        let router = test_router();
        let (status, body) = send(
            &router,
            "POST",
            "/start-negotiation",
            Some(json!({ "budget": 50000 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "message");
        assert!(body["content"].as_str().unwrap().contains("₹50,000"));
        assert_eq!(body["options"].as_array().unwrap().len(), 3);
        assert_eq!(body["is_complete"], false);
        assert_eq!(body["state"]["negotiation_rounds"], 1);
        assert_eq!(body["state"]["brand_offer"], 50000);
        assert_eq!(body["state"]["campaign_type"], "social_media");
    }

    #[tokio::test]
    async fn accepting_completes_the_negotiation() {
        let router = test_router();
        let id = start(&router, 50000).await;

        let (status, body) = send(
            &router,
            "POST",
            "/respond",
            Some(json!({ "session_id": id, "message": "yes please" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_complete"], true);
        assert_eq!(body["state"]["negotiation_phase"], "completed");
        assert_eq!(body["state"]["agreed_price"], 50000);
        assert_eq!(body["state"]["negotiation_rounds"], 2);
    }

    #[tokio::test]
    async fn respond_state_matches_subsequent_get() {
        let router = test_router();
        let id = start(&router, 50000).await;

        let (_, reply) = send(
            &router,
            "POST",
            "/respond",
            Some(json!({ "session_id": id, "message": "I want ₹60000" })),
        )
        .await;

        let (status, first) = send(&router, "GET", &format!("/session/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["state"], reply["state"]);

        // Reads are idempotent
        let (_, second) = send(&router, "GET", &format!("/session/{id}"), None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn respond_to_unknown_session_is_404() {
        let router = test_router();
        let (status, body) = send(
            &router,
            "POST",
            "/respond",
            Some(json!({ "session_id": "nope", "message": "hi" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn delete_removes_the_session() {
        let router = test_router();
        let id = start(&router, 10000).await;

        let (status, body) = send(&router, "DELETE", &format!("/session/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Session ended successfully");

        let (status, _) = send(&router, "GET", &format!("/session/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, "DELETE", &format!("/session/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sessions_listing_summarizes_each_session() {
        let router = test_router();
        let id = start(&router, 25000).await;
        start(&router, 30000).await;

        let (status, body) = send(&router, "GET", "/sessions", None).await;
        assert_eq!(status, StatusCode::OK);

        let sessions = body["active_sessions"].as_array().unwrap();
        assert_eq!(sessions.len(), 2);
        let row = sessions
            .iter()
            .find(|s| s["session_id"] == id.as_str())
            .unwrap();
        assert_eq!(row["budget"], 25000);
        assert_eq!(row["status"], "waiting_for_influencer_response");
        assert_eq!(row["rounds"], 1);
        assert!(row["created_at"].is_string());
        assert!(row["last_activity"].is_string());
    }

    #[tokio::test]
    async fn health_reports_active_session_count() {
        let router = test_router();
        start(&router, 1000).await;

        let (status, body) = send(&router, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Negotiation Agent API is running");
        assert_eq!(body["active_sessions"], 1);
    }

    #[tokio::test]
    async fn stream_commits_state_before_delivery() {
        let router = test_router();
        let id = start(&router, 50000).await;

        let request = Request::builder()
            .method("POST")
            .uri("/respond-stream")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "session_id": id, "message": "60000" }).to_string(),
            ))
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();

        // One frame per character of the persona reply, then the terminator
        assert!(text.contains(r#"{"content":"🎭","type":"stream"}"#));
        assert!(text.contains(r#""type":"complete""#));
        assert!(text.contains(r#""is_complete":false"#));

        // The transition was committed before streaming
        let (_, body) = send(&router, "GET", &format!("/session/{id}"), None).await;
        assert_eq!(body["state"]["negotiation_phase"], "brand_considering");
        assert_eq!(body["state"]["influencer_offer"], 60000);
    }

    #[tokio::test]
    async fn stream_for_unknown_session_is_404() {
        let router = test_router();
        let (status, body) = send(
            &router,
            "POST",
            "/respond-stream",
            Some(json!({ "session_id": "ghost", "message": "hi" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }
}
