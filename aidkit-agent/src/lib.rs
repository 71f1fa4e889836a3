//! # aidkit-agent
//!
//! Health-assistant agents for aidkit.
//!
//! ## Overview
//!
//! The [`Coordinator`] triages each query into exactly one of two paths:
//!
//! - mental-health guidance — an empathetic, non-diagnostic reply produced
//!   directly by the language model
//! - first aid — the query is delegated to an [`Expert`], whose
//!   [`FirstAidExpert`] implementation retrieves passages from the indexed
//!   manuals and synthesizes a grounded, step-by-step reply
//!
//! Query-time failures degrade into a polite fallback reply; the
//! interactive session never crashes.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use aidkit_agent::{Coordinator, FirstAidExpert};
//! use aidkit_rag::Retriever;
//!
//! let retriever = Arc::new(Retriever::new(manager));
//! let expert = Arc::new(FirstAidExpert::new(retriever, llm.clone()));
//! let coordinator = Coordinator::new(llm, expert);
//!
//! let reply = coordinator.handle("how do I treat a minor burn?").await;
//! ```

pub mod coordinator;
pub mod error;
pub mod expert;
pub mod triage;

pub use coordinator::{Coordinator, Reply};
pub use error::{AgentError, Result};
pub use expert::{Expert, FirstAidExpert};
pub use triage::{Intent, classify};
