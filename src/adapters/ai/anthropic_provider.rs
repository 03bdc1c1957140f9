//! Anthropic Provider - Implementation of AIProvider for Anthropic's Messages API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514")
//!     .with_base_url("https://api.anthropic.com");
//!
//! let provider = AnthropicProvider::new(config)?;
//! ```
//!
//! The Messages API takes the system prompt as a separate field and expects
//! the conversation to start with a user turn and alternate roles, so history
//! is normalized before sending.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::classification::{
    parse_category, parse_sentiment, CATEGORY_SYSTEM_PROMPT, CLASSIFICATION_MAX_TOKENS,
    EMOTION_SYSTEM_PROMPT,
};
use super::openai_provider::{retry_after_header, seconds_after_try_again};
use crate::domain::assistant::{Message, MessageRole};
use crate::ports::{AIProvider, ProviderError, ProviderInfo, Sentiment};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Anthropic tends to have longer rate limit windows.
const DEFAULT_RETRY_AFTER_SECS: u32 = 60;

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Completion budget for chat replies.
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_tokens: 1024,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the completion budget for chat replies.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic API provider implementation.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the messages endpoint URL.
    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts a prompt, history and new message to Anthropic's shape.
    ///
    /// System-role history is folded into the system field. Consecutive turns
    /// with the same role are merged and leading assistant turns are dropped.
    fn build_request_parts(
        system_prompt: &str,
        history: &[Message],
        message: &str,
    ) -> (Option<String>, Vec<AnthropicMessage>) {
        let mut system_parts: Vec<&str> = Vec::new();
        if !system_prompt.trim().is_empty() {
            system_parts.push(system_prompt);
        }

        let mut messages: Vec<AnthropicMessage> = Vec::with_capacity(history.len() + 1);
        let turns = history
            .iter()
            .filter_map(|msg| match msg.role {
                MessageRole::System => {
                    system_parts.push(&msg.content);
                    None
                }
                MessageRole::User => Some(("user", msg.content.as_str())),
                MessageRole::Assistant => Some(("assistant", msg.content.as_str())),
            })
            .collect::<Vec<_>>();

        for (role, content) in turns.into_iter().chain(std::iter::once(("user", message))) {
            match messages.last_mut() {
                Some(last) if last.role == role => {
                    last.content.push_str("\n\n");
                    last.content.push_str(content);
                }
                None if role == "assistant" => {}
                _ => messages.push(AnthropicMessage {
                    role: role.to_string(),
                    content: content.to_string(),
                }),
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system, messages)
    }

    /// Sends one Messages API request and returns the joined text blocks.
    async fn send(
        &self,
        system: Option<String>,
        messages: Vec<AnthropicMessage>,
        max_tokens: u32,
        temperature: Option<f32>,
    ) -> Result<String, ProviderError> {
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            messages,
            system,
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = Self::handle_response_status(response).await?;

        let anthropic_response: AnthropicResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                ProviderError::parse(format!("Failed to parse response: {}", e))
            }
        })?;

        Self::extract_text(anthropic_response)
    }

    fn extract_text(response: AnthropicResponse) -> Result<String, ProviderError> {
        if response.stop_reason.as_deref() == Some("refusal") {
            return Err(ProviderError::content_filtered("Anthropic refusal"));
        }

        let content = response
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if content.trim().is_empty() {
            return Err(ProviderError::parse("Empty completion"));
        }
        Ok(content)
    }

    fn timeout_error(&self) -> ProviderError {
        ProviderError::timeout(self.config.timeout.as_secs() as u32)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            self.timeout_error()
        } else if e.is_connect() {
            ProviderError::network(format!("Connection failed: {}", e))
        } else {
            ProviderError::network(e.to_string())
        }
    }

    /// Passes a successful response through; maps everything else.
    async fn handle_response_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = retry_after_header(response.headers());
        let error_body = response.text().await.unwrap_or_default();

        Err(Self::status_error(status.as_u16(), retry_after, &error_body))
    }

    /// Maps a non-success status to a provider error.
    ///
    /// 529 is Anthropic's "overloaded" status.
    fn status_error(status: u16, retry_after: Option<u32>, error_body: &str) -> ProviderError {
        match status {
            401 | 403 => ProviderError::AuthenticationFailed,
            429 => ProviderError::rate_limited(
                retry_after.unwrap_or_else(|| Self::parse_retry_after(error_body)),
            ),
            400 | 404 | 413 | 422 => ProviderError::InvalidRequest(error_body.to_string()),
            500..=599 => {
                ProviderError::unavailable(format!("Server error {}: {}", status, error_body))
            }
            _ => ProviderError::network(format!("Unexpected status {}: {}", status, error_body)),
        }
    }

    /// Parses retry-after from the error message.
    fn parse_retry_after(error_body: &str) -> u32 {
        serde_json::from_str::<serde_json::Value>(error_body)
            .ok()
            .and_then(|parsed| {
                parsed
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .and_then(seconds_after_try_again)
            })
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
    }
}

#[async_trait]
impl AIProvider for AnthropicProvider {
    async fn generate_response(
        &self,
        message: &str,
        system_prompt: &str,
        history: &[Message],
    ) -> Result<String, ProviderError> {
        let (system, messages) = Self::build_request_parts(system_prompt, history, message);
        self.send(system, messages, self.config.max_tokens, None).await
    }

    async fn analyze_emotion(&self, text: &str) -> Result<Sentiment, ProviderError> {
        let (system, messages) = Self::build_request_parts(EMOTION_SYSTEM_PROMPT, &[], text);
        let output = self
            .send(system, messages, CLASSIFICATION_MAX_TOKENS, Some(0.0))
            .await?;
        parse_sentiment(&output)
    }

    async fn determine_category(&self, text: &str) -> Result<String, ProviderError> {
        let (system, messages) = Self::build_request_parts(CATEGORY_SYSTEM_PROMPT, &[], text);
        let output = self
            .send(system, messages, CLASSIFICATION_MAX_TOKENS, Some(0.0))
            .await?;
        parse_category(&output)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("anthropic", &self.config.model)
    }
}

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}
