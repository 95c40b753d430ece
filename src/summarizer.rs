//! LLM summarization client over an OpenAI-compatible chat endpoint

use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use tracing::{debug, warn};

use crate::config::SummarizerConfig;
use crate::error::{Result, SummarizeError};

/// Combined character ceiling for prompt plus body in one request.
pub const MAX_PROMPT_CHARS: usize = 32_000;

/// Enforce the context ceiling before a summarization request. Only
/// trailing characters of `body` are removed; the prompt always survives
/// intact. Returns the (possibly truncated) body and whether truncation
/// happened.
pub fn truncate_body(prompt: &str, body: &str) -> (String, bool) {
    let prompt_len = prompt.chars().count();
    let body_len = body.chars().count();

    if prompt_len + body_len <= MAX_PROMPT_CHARS {
        return (body.to_string(), false);
    }

    let keep = MAX_PROMPT_CHARS.saturating_sub(prompt_len);
    let truncated: String = body.chars().take(keep).collect();
    warn!("An email body was truncated to fit in the context window");
    (truncated, true)
}

/// Client for the summarization endpoint. Requests go out with a fixed
/// model and a fixed low sampling temperature; failures are not locally
/// recovered.
pub struct Summarizer {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl Summarizer {
    /// Build a summarizer from config, taking the API key from the
    /// `GROQ_API_KEY` environment variable.
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| SummarizeError::ConfigError("GROQ_API_KEY not set".to_string()))?;
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: &SummarizerConfig, api_key: String) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.api_base.clone())
            .with_api_key(api_key);

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// Send a single-turn chat completion and return the first generated
    /// response's text content.
    pub async fn summarize(&self, full_prompt: &str) -> Result<String> {
        debug!("Requesting summary ({} chars)", full_prompt.chars().count());

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(full_prompt)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .temperature(self.temperature)
            .messages([message.into()])
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                SummarizeError::SummarizerError("Completion response had no content".to_string())
            })
    }
}
