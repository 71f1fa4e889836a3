//! The language model capability trait.

use async_trait::async_trait;

use crate::error::Result;

/// An opaque language-understanding and synthesis capability.
///
/// The contract is deliberately narrow: a bounded `instructions` string
/// (the role/system prompt) and a `context` string (the user-visible input,
/// possibly with retrieved passages attached) go in, text comes out.
/// Implementations must not retain state between calls.
#[async_trait]
pub trait Llm: Send + Sync {
    /// A human-readable name for the underlying model.
    fn name(&self) -> &str;

    /// Generate a text completion for the given instructions and context.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::GenerationUnavailable`](crate::ModelError::GenerationUnavailable)
    /// when the capability cannot be reached, and
    /// [`ModelError::InvalidResponse`](crate::ModelError::InvalidResponse)
    /// when it replies with something other than usable text.
    async fn generate(&self, instructions: &str, context: &str) -> Result<String>;
}
