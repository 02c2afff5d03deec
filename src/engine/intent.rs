//! Intent classification for raw user text
//!
//! The service this replaces re-scanned the message inside each phase
//! handler. Here classification happens once, returning a tagged variant
//! so the transition table consumes intents instead of substrings.

use regex::Regex;
use std::sync::LazyLock;

/// First contiguous run of decimal digits. An optional currency glyph
/// immediately before the run is permitted but not required.
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("amount pattern is valid"));

const DETAIL_HINTS: [&str; 5] = ["campaign", "what", "about", "details", "?"];

/// What the influencer's message means to the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Contains an accept keyword; takes precedence over any number present
    Accept,
    /// Counter-offer with the extracted amount
    Counter(i64),
    /// Question about the campaign, no number or accept keyword
    DetailsRequest,
    /// None of the above; ask the influencer to clarify
    Clarify,
}

/// Classify a free-text message. Accept keywords win over numbers,
/// numbers win over detail keywords.
pub fn classify(input: &str) -> Intent {
    let lower = input.to_lowercase();
    if lower.contains("accept") || lower.contains("yes") {
        return Intent::Accept;
    }
    if let Some(amount) = extract_amount(input) {
        return Intent::Counter(amount);
    }
    if DETAIL_HINTS.iter().any(|hint| lower.contains(hint)) {
        return Intent::DetailsRequest;
    }
    Intent::Clarify
}

/// Scan left-to-right for the first digit run and parse it base-10.
/// Runs too large for `i64` are treated as no amount.
pub fn extract_amount(input: &str) -> Option<i64> {
    AMOUNT_RE.find(input).and_then(|m| m.as_str().parse().ok())
}
