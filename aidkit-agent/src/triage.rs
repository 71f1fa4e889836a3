//! Query triage: decide which response path handles an incoming query.
//!
//! Classification is a single bounded LLM call whose reply is matched for
//! one of two labels. When the label is missing or ambiguous, a
//! deterministic regex scan of the query decides; when the language
//! capability is unreachable entirely, triage falls back to the
//! mental-health path — the path that cannot mis-instruct a physical
//! emergency procedure.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use aidkit_model::Llm;

/// The two response paths a query can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Empathetic general guidance; no retrieval, no delegation.
    MentalHealth,
    /// Delegation to the first-aid expert, grounded in the manuals.
    FirstAid,
}

/// Instructions for the classification call.
const CLASSIFIER_INSTRUCTIONS: &str = "\
You are a triage classifier for a health assistant. Read the user's message \
and answer with exactly one label and nothing else:\n\
FIRST_AID — the message is about a physical injury or first-aid situation \
(cuts, burns, bleeding, fractures, sprains, choking, bites, poisoning, ...).\n\
MENTAL_HEALTH — the message is about feelings, stress, anxiety, mood, or \
any other emotional or mental-health concern.";

static INJURY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(bleed\w*|blood|burn\w*|scald\w*|fractur\w*|broken\s+(arm|leg|bone|wrist|ankle|finger|rib)|sprain\w*|strain\w*|cut|cuts|wound\w*|lacerat\w*|chok\w*|cpr|unconscious|faint\w*|sting\w*|bitten|bite|poison\w*|dislocat\w*|bandage\w*|splint\w*|concussion|nosebleed|blister\w*|drown\w*|seizure|injur\w*|swollen|bruise\w*)\b",
    )
    .expect("injury pattern is valid")
});

/// Interpret a classifier reply, requiring exactly one label.
fn parse_label(reply: &str) -> Option<Intent> {
    let upper = reply.to_uppercase();
    let first_aid = upper.contains("FIRST_AID") || upper.contains("FIRST AID");
    let mental_health = upper.contains("MENTAL_HEALTH") || upper.contains("MENTAL HEALTH");

    match (first_aid, mental_health) {
        (true, false) => Some(Intent::FirstAid),
        (false, true) => Some(Intent::MentalHealth),
        _ => None,
    }
}

/// Deterministic fallback: injury vocabulary biases toward first aid.
fn keyword_intent(query: &str) -> Intent {
    if INJURY_RE.is_match(query) { Intent::FirstAid } else { Intent::MentalHealth }
}

/// Classify a query into exactly one [`Intent`].
///
/// Never fails: an unreachable classifier defaults to
/// [`Intent::MentalHealth`], and an unparseable reply falls back to the
/// deterministic keyword scan.
pub async fn classify(llm: &dyn Llm, query: &str) -> Intent {
    match llm.generate(CLASSIFIER_INSTRUCTIONS, query).await {
        Ok(reply) => match parse_label(&reply) {
            Some(intent) => {
                debug!(?intent, "classifier labeled query");
                intent
            }
            None => {
                let intent = keyword_intent(query);
                debug!(?intent, reply = %reply.trim(), "classifier reply unparseable, using keyword scan");
                intent
            }
        },
        Err(e) => {
            warn!(error = %e, "classifier unreachable, defaulting to mental-health path");
            Intent::MentalHealth
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aidkit_model::MockLlm;

    #[test]
    fn parse_label_accepts_single_labels() {
        assert_eq!(parse_label("FIRST_AID"), Some(Intent::FirstAid));
        assert_eq!(parse_label("  mental_health\n"), Some(Intent::MentalHealth));
        assert_eq!(parse_label("The label is FIRST AID."), Some(Intent::FirstAid));
    }

    #[test]
    fn parse_label_rejects_ambiguous_replies() {
        assert_eq!(parse_label("FIRST_AID or MENTAL_HEALTH, hard to say"), None);
        assert_eq!(parse_label("no idea"), None);
    }

    #[test]
    fn keyword_scan_biases_injuries_toward_first_aid() {
        assert_eq!(keyword_intent("my hand is bleeding badly"), Intent::FirstAid);
        assert_eq!(keyword_intent("I think I have a sprained ankle"), Intent::FirstAid);
        assert_eq!(keyword_intent("I feel overwhelmed and stressed"), Intent::MentalHealth);
    }

    #[tokio::test]
    async fn classifier_label_wins_over_keywords() {
        let llm = MockLlm::new(["MENTAL_HEALTH"]);
        // "burn" would match the injury scan, but the classifier is trusted first.
        let intent = classify(&llm, "I feel burned out at work").await;
        assert_eq!(intent, Intent::MentalHealth);
    }

    #[tokio::test]
    async fn unreachable_classifier_defaults_to_mental_health() {
        let llm = MockLlm::fail_with("offline");
        let intent = classify(&llm, "my arm is bleeding").await;
        assert_eq!(intent, Intent::MentalHealth);
    }
}
