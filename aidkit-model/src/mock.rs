//! Mock language model for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::llm::Llm;

/// A scripted [`Llm`] that replays canned replies and records prompts.
///
/// Replies are popped in order; once the queue is empty the last reply is
/// repeated. With no replies configured, or after [`fail_with`](MockLlm::fail_with),
/// every call returns [`ModelError::GenerationUnavailable`].
///
/// # Example
///
/// ```rust,ignore
/// use aidkit_model::{Llm, MockLlm};
///
/// let llm = MockLlm::new(["FIRST_AID", "Apply direct pressure."]);
/// assert_eq!(llm.generate("classify", "cut finger").await?, "FIRST_AID");
/// ```
pub struct MockLlm {
    replies: Mutex<VecDeque<String>>,
    last_reply: Mutex<Option<String>>,
    prompts: Mutex<Vec<(String, String)>>,
    failure: Option<String>,
}

impl MockLlm {
    /// Create a mock that replays `replies` in order.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            last_reply: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Create a mock whose every call fails with the given message.
    pub fn fail_with(message: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            last_reply: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// The `(instructions, context)` pairs seen so far.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().expect("mock lock poisoned").clone()
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().expect("mock lock poisoned").len()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, instructions: &str, context: &str) -> Result<String> {
        self.prompts
            .lock()
            .expect("mock lock poisoned")
            .push((instructions.to_string(), context.to_string()));

        if let Some(message) = &self.failure {
            return Err(ModelError::GenerationUnavailable {
                provider: "mock".into(),
                message: message.clone(),
            });
        }

        let next = self.replies.lock().expect("mock lock poisoned").pop_front();
        match next {
            Some(reply) => {
                *self.last_reply.lock().expect("mock lock poisoned") = Some(reply.clone());
                Ok(reply)
            }
            None => self.last_reply.lock().expect("mock lock poisoned").clone().ok_or_else(|| {
                ModelError::GenerationUnavailable {
                    provider: "mock".into(),
                    message: "no scripted replies".into(),
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_replies_in_order_then_repeats_last() {
        let llm = MockLlm::new(["one", "two"]);
        assert_eq!(llm.generate("i", "a").await.unwrap(), "one");
        assert_eq!(llm.generate("i", "b").await.unwrap(), "two");
        assert_eq!(llm.generate("i", "c").await.unwrap(), "two");
        assert_eq!(llm.calls(), 3);
    }

    #[tokio::test]
    async fn failure_mode_reports_generation_unavailable() {
        let llm = MockLlm::fail_with("offline");
        let err = llm.generate("i", "x").await.unwrap_err();
        assert!(matches!(err, ModelError::GenerationUnavailable { .. }));
    }

    #[tokio::test]
    async fn records_prompts() {
        let llm = MockLlm::new(["ok"]);
        llm.generate("instructions here", "context here").await.unwrap();
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, "instructions here");
        assert_eq!(prompts[0].1, "context here");
    }
}
