//! API request and response types
//!
//! The wire format is snake_case JSON, compatible with the service this
//! replaces.

use crate::engine::{NegotiationSession, Phase, StepResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to start a new negotiation
#[derive(Debug, Deserialize)]
pub struct StartNegotiationRequest {
    pub budget: i64,
    #[serde(default = "default_campaign_type")]
    pub campaign_type: String,
    #[serde(default = "default_duration")]
    pub duration: String,
}

fn default_campaign_type() -> String {
    "social_media".to_string()
}

fn default_duration() -> String {
    "2_weeks".to_string()
}

/// Request to respond within an existing negotiation
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub session_id: String,
    pub message: String,
}

/// Response for the non-streaming negotiation endpoints
#[derive(Debug, Serialize)]
pub struct NegotiationReply {
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: String,
    pub options: Vec<String>,
    pub state: NegotiationSession,
    pub is_complete: bool,
}

impl NegotiationReply {
    /// Build the reply from a committed step and the session it mutated.
    pub fn from_step(session: &NegotiationSession, step: &StepResult) -> Self {
        Self {
            session_id: session.session_id.clone(),
            kind: "message",
            content: step.bot_message.clone(),
            options: step.options.clone(),
            state: session.clone(),
            is_complete: step.is_complete,
        }
    }
}

/// One row in the session listing
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub budget: i64,
    pub status: Phase,
    pub last_activity: DateTime<Utc>,
    pub rounds: u32,
}

impl From<NegotiationSession> for SessionSummary {
    fn from(session: NegotiationSession) -> Self {
        Self {
            session_id: session.session_id,
            created_at: session.created_at,
            budget: session.budget,
            status: session.phase,
            last_activity: session.last_activity,
            rounds: session.rounds,
        }
    }
}

/// Response for `GET /sessions`
#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub active_sessions: Vec<SessionSummary>,
}

/// Response for `GET /session/{id}`
#[derive(Debug, Serialize)]
pub struct SessionStateResponse {
    pub session_id: String,
    pub state: NegotiationSession,
}

/// Response for `DELETE /session/{id}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Response for the liveness probe
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub active_sessions: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
