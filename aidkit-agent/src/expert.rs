//! The first-aid expert: retrieval-grounded answer synthesis.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use aidkit_model::Llm;
use aidkit_rag::Retriever;

use crate::error::Result;

/// A specialist capability the [`Coordinator`](crate::Coordinator) can
/// delegate a query to.
///
/// The coordinator depends only on this interface, not on how the reply is
/// produced.
#[async_trait]
pub trait Expert: Send + Sync {
    /// Produce a reply for the delegated query text.
    async fn respond(&self, query: &str) -> Result<String>;
}

/// Instructions for the synthesis call.
const EXPERT_INSTRUCTIONS: &str = "\
You are a professional first-aid instructor. Provide step-by-step first-aid \
instructions in a clear, numbered format. Base every procedure on the \
passages retrieved from the reference manuals that are included in the \
message. If the message says that no passages were found, state clearly \
that you could not find the procedure in the manuals and give only general, \
clearly-flagged guidance — never invent specific procedure steps. Advise \
calling emergency services whenever the situation could be serious.";

/// Marker line the synthesis prompt uses when retrieval came back empty.
const NO_PASSAGES_NOTE: &str =
    "No passages were found in the reference manuals for this question.";

/// A first-aid [`Expert`] composing the [`Retriever`] with a language model.
///
/// Every call retrieves once, then synthesizes a reply grounded in the
/// retrieved passages plus the original query.
pub struct FirstAidExpert {
    retriever: Arc<Retriever>,
    llm: Arc<dyn Llm>,
}

impl FirstAidExpert {
    /// Create an expert over the given retriever and model.
    pub fn new(retriever: Arc<Retriever>, llm: Arc<dyn Llm>) -> Self {
        Self { retriever, llm }
    }

    /// The retriever used for grounding (exposed for observability).
    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.retriever
    }
}

#[async_trait]
impl Expert for FirstAidExpert {
    async fn respond(&self, query: &str) -> Result<String> {
        let top_k = self.retriever.default_top_k();
        let results = self.retriever.search(query, top_k).await?;

        let context = if results.is_empty() {
            info!("retrieval returned no passages, replying with uncertainty");
            format!("{NO_PASSAGES_NOTE}\n\nQuestion: {query}")
        } else {
            debug!(passages = results.len(), "synthesizing grounded reply");
            let passages = results
                .iter()
                .map(|r| format!("[{}] {}", r.chunk.document_id, r.chunk.text))
                .collect::<Vec<_>>()
                .join("\n---\n");
            format!(
                "Passages retrieved from the first-aid manuals:\n{passages}\n\nQuestion: {query}"
            )
        };

        let reply = self.llm.generate(EXPERT_INSTRUCTIONS, &context).await?;
        Ok(reply)
    }
}
