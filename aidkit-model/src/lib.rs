//! # aidkit-model
//!
//! Language model integrations for aidkit.
//!
//! ## Overview
//!
//! The [`Llm`] trait is the narrow capability contract the rest of aidkit
//! depends on: `(instructions, context) -> text`. Currently supported:
//!
//! - [`GeminiModel`] — Google's Gemini models via the Generative Language API
//! - [`MockLlm`] — scripted model for tests
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use aidkit_model::{GeminiModel, Llm};
//!
//! let model = GeminiModel::from_env()?;
//! let reply = model
//!     .generate("You are a calm first-aid instructor.", "How do I treat a small burn?")
//!     .await?;
//! ```

pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod llm;
pub mod mock;

pub use error::{ModelError, Result};
#[cfg(feature = "gemini")]
pub use gemini::GeminiModel;
pub use llm::Llm;
pub use mock::MockLlm;
