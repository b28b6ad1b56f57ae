//! Completion abstraction and OpenAI client.
//!
//! The webhook handler only needs "comment text in, reply text out"; [`CompletionBackend`]
//! is that seam so tests can substitute a fake provider.

mod openai;

use async_trait::async_trait;

pub use openai::{build_prompt, OpenAiClient};

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion api error: {0}")]
    Api(String),
    #[error("completion response contained no text")]
    EmptyCompletion,
    #[error("completion timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Generates a reply for a comment.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Returns the generated reply, trimmed and non-empty.
    async fn complete(&self, comment_text: &str) -> Result<String, CompletionError>;
}
