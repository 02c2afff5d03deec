//! Negotiation session state types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stage of the fixed negotiation protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Session created, opening offer not yet emitted
    #[default]
    Initial,

    /// Brand has made its opening offer, waiting for the influencer
    WaitingForInfluencerResponse,

    /// Brand has re-stated or clarified its offer, waiting for a decision
    WaitingForDecision,

    /// Influencer countered; brand decides on the next step
    BrandConsidering,

    /// Brand made its budget-stretch final offer; accept or decline
    FinalDecision,

    /// Agreement reached (terminal)
    Completed,

    /// Final offer declined, no agreement (terminal)
    Failed,

    /// Unrecoverable state, conversation must be restarted (terminal)
    Error,
}

impl Phase {
    /// Terminal phases never transition again; advancing one degrades to `Error`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed | Phase::Error)
    }
}

/// One negotiation conversation.
///
/// Field renames keep the wire format of the service this replaces:
/// clients see `negotiation_phase`, `negotiation_rounds` and `user_input`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationSession {
    pub session_id: String,
    pub budget: i64,
    pub campaign_type: String,
    pub duration: String,
    pub brand_offer: i64,
    pub influencer_offer: i64,
    pub agreed_price: Option<i64>,
    #[serde(rename = "negotiation_phase")]
    pub phase: Phase,
    #[serde(rename = "negotiation_rounds")]
    pub rounds: u32,
    #[serde(rename = "user_input")]
    pub last_user_input: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// Neutral event summaries, one per processed step. Informational only.
    pub messages: Vec<String>,
}

impl NegotiationSession {
    /// Create a fresh session in the `Initial` phase.
    pub fn new(budget: i64, campaign_type: String, duration: String) -> Self {
        let now = Utc::now();
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            budget,
            campaign_type,
            duration,
            brand_offer: 0,
            influencer_offer: 0,
            agreed_price: None,
            phase: Phase::Initial,
            rounds: 0,
            last_user_input: String::new(),
            created_at: now,
            last_activity: now,
            messages: Vec::new(),
        }
    }

    /// Campaign type for persona messages, e.g. `social_media` -> `Social Media`.
    pub fn campaign_display(&self) -> String {
        title_case(&self.campaign_type)
    }

    /// Duration for persona messages, e.g. `2_weeks` -> `2 Weeks`.
    pub fn duration_display(&self) -> String {
        title_case(&self.duration)
    }
}

fn title_case(raw: &str) -> String {
    raw.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
