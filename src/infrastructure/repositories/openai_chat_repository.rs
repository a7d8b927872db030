use super::chat_repository::{ChatRepository, ChatRequest};
use crate::domain::shared::PipelineError;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::sync::Arc;
use std::time::Duration;

const PROVIDER: &str = "openai";

/// OpenAI chat completions implementation of the chat repository
pub struct OpenAiChatRepository {
    client: Option<Arc<Client<OpenAIConfig>>>,
    model: String,
    purpose: &'static str,
}

impl OpenAiChatRepository {
    pub fn new(client: Option<Arc<Client<OpenAIConfig>>>, model: String, purpose: &'static str) -> Self {
        Self {
            client,
            model,
            purpose,
        }
    }

    /// Build a repository from an optional credential and an optional API base.
    /// Without a credential every call fails with a configuration error.
    ///
    /// Rate-limited calls are not retried: a 429 is returned to the caller
    /// after a single request.
    pub fn from_credentials(
        api_key: Option<String>,
        api_base: Option<String>,
        model: String,
        purpose: &'static str,
    ) -> Self {
        let client = api_key.map(|key| {
            let mut config = OpenAIConfig::new().with_api_key(key);
            if let Some(base) = api_base {
                config = config.with_api_base(base);
            }
            Arc::new(Client::with_config(config).with_backoff(no_retry()))
        });

        Self::new(client, model, purpose)
    }

    fn build_messages(request: &ChatRequest) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
        Ok(vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system.as_str())
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.as_str())
                .build()?
                .into(),
        ])
    }

    fn map_error(error: OpenAIError) -> PipelineError {
        match error {
            OpenAIError::Reqwest(e) => {
                PipelineError::upstream(PROVIDER, e.status().map(|s| s.as_u16()), e.to_string())
            }
            OpenAIError::ApiError(api_error) => {
                PipelineError::upstream(PROVIDER, None, api_error.message)
            }
            other => PipelineError::upstream(PROVIDER, None, other.to_string()),
        }
    }
}

fn no_retry() -> backoff::ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

#[async_trait]
impl ChatRepository for OpenAiChatRepository {
    async fn complete(&self, request: &ChatRequest) -> Result<String, PipelineError> {
        let client = self.client.as_ref().ok_or_else(|| {
            PipelineError::Configuration(format!("no API key configured for the {} model", self.purpose))
        })?;

        let start_time = std::time::Instant::now();

        let messages = Self::build_messages(request).map_err(Self::map_error)?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(self.model.as_str())
            .messages(messages)
            .max_tokens(request.max_tokens)
            .temperature(request.temperature);
        if request.json_mode {
            builder.response_format(ResponseFormat::JsonObject);
        }
        let completion_request = builder.build().map_err(Self::map_error)?;

        tracing::info!(
            provider = PROVIDER,
            purpose = self.purpose,
            model = %self.model,
            json_mode = request.json_mode,
            prompt_length = request.prompt.len(),
            "Calling chat completion API"
        );

        let response = client
            .chat()
            .create(completion_request)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    purpose = self.purpose,
                    model = %self.model,
                    "Chat completion call failed"
                );
                Self::map_error(e)
            })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                PipelineError::upstream(PROVIDER, None, format!("{} model returned no content", self.purpose))
            })?;

        tracing::info!(
            provider = PROVIDER,
            purpose = self.purpose,
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis(),
            response_length = content.len(),
            "Chat completion received"
        );

        Ok(content)
    }
}
