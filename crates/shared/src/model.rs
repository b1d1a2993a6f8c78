//! Seam to the external AI categorizer.

use async_trait::async_trait;
use thiserror::Error;

/// Ways a model call can fail. The pipeline treats every variant the same
/// way: the AI is unavailable, fall back to keyword analysis (or fail
/// closed in the JS gate).
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("model call timed out after {0}s")]
    Timeout(u64),

    #[error("malformed model response: {0}")]
    Malformed(String),
}

/// A client that can answer a single prompt with text.
///
/// Implementations live in the providers crate; the pipeline only sees
/// this trait, so tests substitute stubs.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Short label used in reasoning strings and logs.
    fn name(&self) -> &str;

    /// Sends one prompt and returns the raw text reply.
    async fn ask(&self, prompt: &str) -> Result<String, ModelError>;
}
