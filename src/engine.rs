//! Negotiation phase engine
//!
//! Implements the fixed brand/influencer protocol as a pure transition
//! over an enumerated phase: classify the user's message into an intent,
//! compute the full step result, then commit the delta to the session.

mod intent;
mod session;
mod transition;

#[cfg(test)]
mod proptests;

pub use session::{NegotiationSession, Phase};
pub use transition::{advance, StepResult};
