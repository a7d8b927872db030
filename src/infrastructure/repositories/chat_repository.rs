use crate::domain::shared::PipelineError;
use async_trait::async_trait;

/// A single chat-style completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Ask the provider for a JSON-object response format
    pub json_mode: bool,
}

/// Repository for chat completion calls.
/// Abstracts the underlying LLM provider (OpenAI or any OpenAI-compatible endpoint).
///
/// Implementations are responsible for:
/// - Rejecting calls without a configured credential before touching the network
/// - Converting provider failures into `PipelineError::Upstream`
/// - Treating an empty completion as an upstream failure
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Run one completion and return the raw content of the first choice
    async fn complete(&self, request: &ChatRequest) -> Result<String, PipelineError>;
}
