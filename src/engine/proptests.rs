//! Property-based tests for the phase engine
//!
//! These verify key invariants hold across all possible inputs.

use super::intent::{classify, extract_amount, Intent};
use super::session::{NegotiationSession, Phase};
use super::transition::advance;
use proptest::prelude::*;

fn drive(budget: i64, inputs: &[String]) -> NegotiationSession {
    let mut session = NegotiationSession::new(budget, "social_media".into(), "2_weeks".into());
    advance(&session, "").apply(&mut session, "");
    for input in inputs {
        advance(&session, input).apply(&mut session, input);
    }
    session
}

proptest! {
    /// rounds after N client turns equals N+1: the opening offer is round 1.
    #[test]
    fn rounds_count_steps(budget in 1i64..1_000_000_000, inputs in proptest::collection::vec(".{0,40}", 0..6)) {
        let session = drive(budget, &inputs);
        prop_assert_eq!(session.rounds as usize, inputs.len() + 1);
        prop_assert_eq!(session.messages.len(), inputs.len() + 1);
    }

    /// agreed_price is set exactly when the session completed.
    #[test]
    fn agreed_price_iff_completed(budget in 1i64..1_000_000_000, inputs in proptest::collection::vec(".{0,40}", 0..6)) {
        let session = drive(budget, &inputs);
        prop_assert_eq!(session.agreed_price.is_some(), session.phase == Phase::Completed);
    }

    /// A completed session always agreed within the stretch ceiling.
    #[test]
    fn agreed_price_never_exceeds_ceiling(budget in 1i64..1_000_000, inputs in proptest::collection::vec("[a-z0-9 ?]{0,20}", 0..6)) {
        let session = drive(budget, &inputs);
        if let Some(price) = session.agreed_price {
            prop_assert!(price <= budget.saturating_mul(115) / 100);
            prop_assert!(price > 0);
        }
    }

    /// Advancing never panics and never decreases rounds, whatever the text.
    #[test]
    fn advance_is_total(budget in any::<i64>(), input in ".{0,60}") {
        let mut session = NegotiationSession::new(budget, "social_media".into(), "2_weeks".into());
        let before = session.rounds;
        advance(&session, &input).apply(&mut session, &input);
        prop_assert_eq!(session.rounds, before + 1);
    }

    /// Accept keywords dominate classification regardless of surroundings.
    #[test]
    fn accept_keyword_wins(prefix in "[a-z0-9 ]{0,20}", suffix in "[a-z0-9 ]{0,20}") {
        let message = format!("{prefix} accept {suffix}");
        prop_assert_eq!(classify(&message), Intent::Accept);
    }

    /// The extracted amount is always the first digit run in the message.
    #[test]
    fn extraction_takes_first_run(amount in 1u32..10_000_000, trailing in 0u32..1000) {
        let message = format!("maybe ₹{amount} or even {trailing}");
        prop_assert_eq!(extract_amount(&message), Some(i64::from(amount)));
    }
}
