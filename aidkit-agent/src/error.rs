//! Error types for the `aidkit-agent` crate.

use thiserror::Error;

/// Errors that can occur while producing an agent reply.
///
/// The [`Coordinator`](crate::Coordinator) converts these into degraded
/// user-visible replies; they only surface directly from the
/// [`Expert`](crate::Expert) interface.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The language capability failed.
    #[error(transparent)]
    Model(#[from] aidkit_model::ModelError),

    /// Retrieval over the first-aid index failed.
    #[error(transparent)]
    Retrieval(#[from] aidkit_rag::RagError),
}

/// A convenience result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
