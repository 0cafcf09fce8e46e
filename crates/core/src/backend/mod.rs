//! Text-generation backends.
//! The engine talks to any number of these through the `Generator` trait;
//! with zero configured it runs entirely on mode fallbacks.

use crate::error::BackendError;
use async_trait::async_trait;

pub mod anthropic;
pub mod openai;

/// One generation call: the mode instruction plus the caption to rewrite.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    /// Natural-language style instruction from the selected mode.
    pub instruction: &'a str,
    /// The caption text to transform.
    pub input: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stop: &'a [String],
}

/// A pluggable text-generation backend.
/// Implementations may fail or time out; the engine recovers per record.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short backend label for logs.
    fn name(&self) -> &'static str;

    /// Generate a rewritten caption for `req`.
    async fn generate(&self, req: &GenerationRequest<'_>) -> Result<String, BackendError>;
}
