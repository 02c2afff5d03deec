//! Pure phase transition function
//!
//! `advance` maps (session, user input) to a full step result without
//! touching the session; `StepResult::apply` commits the delta. The split
//! keeps the protocol table directly testable without any store or HTTP
//! machinery.

use super::intent::{classify, Intent};
use super::session::{NegotiationSession, Phase};
use chrono::Utc;

/// Brand can stretch 15% over its initial budget, integer floor.
/// Recomputed on every entry into `BrandConsidering`, never cached.
fn max_budget(budget: i64) -> i64 {
    budget.saturating_mul(115) / 100
}

/// Result of advancing a session one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub phase: Phase,
    pub brand_offer: Option<i64>,
    pub influencer_offer: Option<i64>,
    pub agreed_price: Option<i64>,
    /// Neutral event summary appended to the session log
    pub log_entry: String,
    /// Persona-voiced reply shown (or streamed) to the client
    pub bot_message: String,
    pub options: Vec<String>,
    pub is_complete: bool,
}

impl StepResult {
    fn new(phase: Phase, log_entry: impl Into<String>, bot_message: impl Into<String>) -> Self {
        Self {
            phase,
            brand_offer: None,
            influencer_offer: None,
            agreed_price: None,
            log_entry: log_entry.into(),
            bot_message: bot_message.into(),
            options: Vec::new(),
            is_complete: matches!(phase, Phase::Completed | Phase::Failed),
        }
    }

    fn with_brand_offer(mut self, offer: i64) -> Self {
        self.brand_offer = Some(offer);
        self
    }

    fn with_influencer_offer(mut self, offer: i64) -> Self {
        self.influencer_offer = Some(offer);
        self
    }

    fn with_agreed_price(mut self, price: i64) -> Self {
        self.agreed_price = Some(price);
        self
    }

    fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    /// Commit this step to the session: phase and offer mutations, one
    /// round, one log entry, refreshed activity timestamp.
    pub fn apply(&self, session: &mut NegotiationSession, user_input: &str) {
        session.phase = self.phase;
        if let Some(offer) = self.brand_offer {
            session.brand_offer = offer;
        }
        if let Some(offer) = self.influencer_offer {
            session.influencer_offer = offer;
        }
        session.agreed_price = self.agreed_price;
        session.rounds += 1;
        session.last_user_input = user_input.to_string();
        session.last_activity = Utc::now();
        session.messages.push(self.log_entry.clone());
    }
}

/// Pure transition function: never fails for well-formed input. Missing
/// or malformed numeric fields degrade to the terminal `Error` phase.
pub fn advance(session: &NegotiationSession, user_input: &str) -> StepResult {
    match session.phase {
        Phase::Initial => opening_offer(session),
        Phase::WaitingForInfluencerResponse | Phase::WaitingForDecision => {
            influencer_turn(session, user_input)
        }
        Phase::BrandConsidering => brand_considers(session),
        Phase::FinalDecision => final_decision(session, user_input),
        Phase::Completed | Phase::Failed | Phase::Error => out_of_protocol(),
    }
}

/// Brand opens with its full budget as the first offer.
fn opening_offer(session: &NegotiationSession) -> StepResult {
    if session.budget <= 0 {
        return out_of_protocol();
    }

    let campaign = session.campaign_display();
    let duration = session.duration_display();
    let budget = inr(session.budget);

    let message = format!(
        "🏢 Brand: Hello! We're excited to work with you on our {campaign} campaign.\n\
         🏢 Brand: This is a {duration} campaign, and our budget is {budget}.\n\
         🏢 Brand: What are your thoughts on this collaboration?"
    );

    StepResult::new(
        Phase::WaitingForInfluencerResponse,
        format!("Brand offers {budget} for {campaign} campaign ({duration})"),
        message,
    )
    .with_brand_offer(session.budget)
    .with_options(vec![
        "Accept the offer".to_string(),
        "Counter with your price".to_string(),
        "Ask about campaign details".to_string(),
    ])
}

/// Influencer reacts to the standing brand offer.
fn influencer_turn(session: &NegotiationSession, user_input: &str) -> StepResult {
    let offer = inr(session.brand_offer);

    match classify(user_input) {
        Intent::Accept => StepResult::new(
            Phase::Completed,
            format!("Influencer accepts {offer}"),
            format!(
                "🎭 Influencer: I accept your offer of {offer}!\n\
                 🏢 Brand: Excellent! We have a deal!"
            ),
        )
        .with_agreed_price(session.brand_offer),

        Intent::Counter(amount) => {
            let counter = inr(amount);
            StepResult::new(
                Phase::BrandConsidering,
                format!("Influencer counters with {counter}"),
                format!(
                    "🎭 Influencer: I was thinking more along the lines of {counter}.\n\
                     🏢 Brand: Let me consider your offer..."
                ),
            )
            .with_influencer_offer(amount)
        }

        Intent::DetailsRequest => {
            let campaign = session.campaign_type.replace('_', " ");
            let duration = session.duration.replace('_', " ");
            StepResult::new(
                Phase::WaitingForDecision,
                "Brand explains campaign details",
                format!(
                    "🏢 Brand: This is a {campaign} campaign for our new product launch.\n\
                     🏢 Brand: Duration: {duration}, with authentic content in your style.\n\
                     🏢 Brand: We need 3-5 posts showcasing our product naturally.\n\
                     🏢 Brand: So, what do you think about our offer of {offer}?"
                ),
            )
            .with_options(vec![
                format!("Accept {offer}"),
                "Make counter-offer".to_string(),
                "Need more details".to_string(),
            ])
        }

        Intent::Clarify => StepResult::new(
            Phase::WaitingForDecision,
            "Brand asks for clarification",
            format!(
                "🏢 Brand: I'd like to understand your position better. Are you \
                 interested in accepting {offer}, or do you have a different rate in mind?"
            ),
        )
        .with_options(vec![
            format!("Accept {offer}"),
            "Make counter-offer".to_string(),
        ]),
    }
}

/// Brand decides on the influencer's counter against the stretch ceiling.
fn brand_considers(session: &NegotiationSession) -> StepResult {
    if session.influencer_offer <= 0 || session.budget <= 0 {
        return out_of_protocol();
    }

    let counter = inr(session.influencer_offer);
    let ceiling = max_budget(session.budget);

    if session.influencer_offer <= session.budget {
        StepResult::new(
            Phase::Completed,
            format!("Brand accepts {counter}"),
            format!("🏢 Brand: {counter} works perfectly for us! Let's proceed with the collaboration."),
        )
        .with_agreed_price(session.influencer_offer)
    } else if session.influencer_offer <= ceiling {
        StepResult::new(
            Phase::Completed,
            format!("Brand accepts {counter}"),
            format!(
                "🏢 Brand: {counter} is a bit higher than our initial budget, but we \
                 really like your content. We can agree to {counter}!"
            ),
        )
        .with_agreed_price(session.influencer_offer)
    } else {
        let final_offer = inr(ceiling);
        StepResult::new(
            Phase::FinalDecision,
            format!("Brand's final offer: {final_offer}"),
            format!(
                "🏢 Brand: {counter} is beyond our current budget. The highest we can \
                 go is {final_offer}. This is our final offer."
            ),
        )
        .with_brand_offer(ceiling)
        .with_options(vec![
            "Accept final offer".to_string(),
            "Decline offer".to_string(),
        ])
    }
}

/// Take it or leave it: anything but an accept keyword declines.
fn final_decision(session: &NegotiationSession, user_input: &str) -> StepResult {
    let offer = inr(session.brand_offer);

    if classify(user_input) == Intent::Accept {
        StepResult::new(
            Phase::Completed,
            format!("Influencer accepts final offer of {offer}"),
            format!(
                "🎭 Influencer: Yes, I'll accept {offer}!\n\
                 🏢 Brand: Excellent! We have a deal at {offer}!"
            ),
        )
        .with_agreed_price(session.brand_offer)
    } else {
        StepResult::new(
            Phase::Failed,
            "Negotiation failed - no agreement reached",
            format!(
                "🎭 Influencer: I appreciate the offer, but I can't accept {offer}.\n\
                 🏢 Brand: We understand. Unfortunately, we can't go higher. Thanks for considering!"
            ),
        )
    }
}

/// Terminal or unrecognized phase, or a numeric field missing where a
/// transition needs it. Surfaced as a normal reply, not an HTTP failure.
fn out_of_protocol() -> StepResult {
    StepResult::new(
        Phase::Error,
        "Negotiation entered error state",
        "Something went wrong. Please start over.",
    )
}

/// Amount rendering used in every persona message: `₹57,500`.
fn inr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("₹-{grouped}")
    } else {
        format!("₹{grouped}")
    }
}
