//! The health coordinator: triage and delegation.
//!
//! `Start → Classifying → {MentalHealthPath, FirstAidPath} → Responding → Done`
//! is realized as one [`classify`] call followed by an exhaustive match on
//! the resulting [`Intent`]. Query-time failures never escape to the
//! caller: the coordinator degrades to a polite fallback reply so an
//! interactive session keeps running.

use std::sync::Arc;

use tracing::{error, info};

use aidkit_model::Llm;

use crate::expert::Expert;
use crate::triage::{Intent, classify};

/// Instructions for the mental-health response path.
const COUNSELOR_INSTRUCTIONS: &str = "\
You are a compassionate, professional health assistant. Provide empathetic, \
non-diagnostic guidance for mental-health and emotional concerns. Keep a \
calm, non-alarmist tone, and always recommend consulting a qualified \
professional for serious or persistent issues.";

/// Reply used when a response path fails at query time.
const FALLBACK_REPLY: &str = "\
I'm sorry — I'm unable to answer that right now. If this is an urgent \
medical situation, please contact your local emergency services \
immediately.";

/// A finished coordinator response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// The final user-visible text.
    pub text: String,
    /// The response path the query was routed to.
    pub intent: Intent,
    /// True when a query-time failure forced the fallback reply.
    pub degraded: bool,
}

/// Routes each query to the right response path and produces a [`Reply`].
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use aidkit_agent::{Coordinator, FirstAidExpert};
///
/// let coordinator = Coordinator::new(llm.clone(), Arc::new(expert));
/// let reply = coordinator.handle("I cut my finger, what do I do?").await;
/// println!("{}", reply.text);
/// ```
pub struct Coordinator {
    llm: Arc<dyn Llm>,
    expert: Arc<dyn Expert>,
}

impl Coordinator {
    /// Create a coordinator over the given model and expert.
    pub fn new(llm: Arc<dyn Llm>, expert: Arc<dyn Expert>) -> Self {
        Self { llm, expert }
    }

    /// Handle one user query end to end.
    ///
    /// Classifies the query, routes it to exactly one response path, and
    /// returns the final reply. Never fails: build or generation errors at
    /// query time produce a degraded fallback reply instead.
    pub async fn handle(&self, query: &str) -> Reply {
        let intent = classify(self.llm.as_ref(), query).await;
        info!(?intent, "handling query");

        let result = match intent {
            Intent::MentalHealth => self
                .llm
                .generate(COUNSELOR_INSTRUCTIONS, query)
                .await
                .map_err(crate::error::AgentError::from),
            Intent::FirstAid => self.expert.respond(query).await,
        };

        match result {
            Ok(text) => Reply { text, intent, degraded: false },
            Err(e) => {
                error!(?intent, error = %e, "response path failed, degrading");
                Reply { text: FALLBACK_REPLY.to_string(), intent, degraded: true }
            }
        }
    }
}
