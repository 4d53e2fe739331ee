//! Transport clients for the model gateway.
//!
//! The [`GenerativeClient`] trait is the only seam between the gateway and
//! the outside world: one prompt in, one block of reply text out. The
//! production implementation targets any OpenAI-compatible chat-completion
//! endpoint via a configurable base URL; tests use the scripted client from
//! [`crate::scripted`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

/// System preamble sent with every gateway request.
const SYSTEM_PREAMBLE: &str = "You are a tutoring content engine. \
    Reply with a single JSON object exactly matching the requested shape. \
    Do not add commentary outside the JSON.";

/// Error produced by a transport client.
///
/// Carries only a message; the gateway wraps it with the operation name.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// A client able to turn one prompt into one block of reply text.
///
/// Implementations must not retry internally; the orchestrator surfaces
/// failures to the user, who retries by repeating the triggering action.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Sends a single prompt and returns the raw reply text.
    ///
    /// An `Ok` with empty text is a valid transport outcome; the gateway
    /// decides whether emptiness is an error for the operation at hand.
    async fn generate(&self, prompt: &str) -> Result<String, TransportError>;
}

// ============================================================================
// Token usage accounting
// ============================================================================

/// Cumulative token usage counters for a client's lifetime.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    /// Prompt tokens consumed so far.
    prompt_tokens: Arc<AtomicU64>,
    /// Completion tokens consumed so far.
    completion_tokens: Arc<AtomicU64>,
}

impl TokenUsage {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one request's usage to the running totals.
    pub fn add(&self, prompt: u64, completion: u64) {
        self.prompt_tokens.fetch_add(prompt, Ordering::Relaxed);
        self.completion_tokens.fetch_add(completion, Ordering::Relaxed);
    }

    /// Returns `(prompt_tokens, completion_tokens, total_tokens)`.
    #[must_use]
    pub fn totals(&self) -> (u64, u64, u64) {
        let prompt = self.prompt_tokens.load(Ordering::Relaxed);
        let completion = self.completion_tokens.load(Ordering::Relaxed);
        (prompt, completion, prompt + completion)
    }
}

// ============================================================================
// OpenAI-compatible client
// ============================================================================

/// A [`GenerativeClient`] for any OpenAI-compatible chat-completion API.
///
/// The base URL is configurable so self-hosted or proxied endpoints work
/// the same way as the hosted service.
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    usage: TokenUsage,
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// The API key falls back to the `OPENAI_API_KEY` environment variable
    /// when not given explicitly.
    #[must_use]
    pub fn new(base_url: Option<&str>, model: &str, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_default();

        let config = base_url.map_or_else(
            || OpenAIConfig::new().with_api_key(api_key.clone()),
            |url| OpenAIConfig::new().with_api_base(url).with_api_key(api_key.clone()),
        );

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            usage: TokenUsage::new(),
        }
    }

    /// Returns the cumulative token usage counters.
    #[must_use]
    pub fn usage(&self) -> &TokenUsage {
        &self.usage
    }
}

#[async_trait]
impl GenerativeClient for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, TransportError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_PREAMBLE)
            .build()
            .map_err(|e| TransportError(e.to_string()))?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| TransportError(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestMessage::System(system),
                ChatCompletionRequestMessage::User(user),
            ])
            .build()
            .map_err(|e| TransportError(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        if let Some(usage) = &response.usage {
            self.usage
                .add(u64::from(usage.prompt_tokens), u64::from(usage.completion_tokens));
        }

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        tracing::debug!(
            model = %self.model,
            reply_chars = content.len(),
            "Chat completion received"
        );

        Ok(content)
    }
}
