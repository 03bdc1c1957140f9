//! OpenAI Provider - Implementation of AIProvider for OpenAI's chat completions API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```
//!
//! Requests are non-streaming and are never retried here: a failure goes
//! straight back to the fallback orchestrator so it is counted.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::classification::{
    parse_category, parse_sentiment, CATEGORY_SYSTEM_PROMPT, CLASSIFICATION_MAX_TOKENS,
    EMOTION_SYSTEM_PROMPT,
};
use crate::domain::assistant::{Message, MessageRole};
use crate::ports::{AIProvider, ProviderError, ProviderInfo, Sentiment};

/// Default retry-after when OpenAI doesn't say.
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o", "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Completion budget for chat replies.
    pub max_tokens: u32,
    /// Sampling temperature for chat replies.
    pub temperature: f32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_tokens: 1024,
            temperature: 0.7,
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

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// System prompt first, then prior turns, then the new user message.
    fn build_messages(system_prompt: &str, history: &[Message], message: &str) -> Vec<OpenAIMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);

        if !system_prompt.trim().is_empty() {
            messages.push(OpenAIMessage::new("system", system_prompt));
        }

        for msg in history {
            let role = match msg.role {
                MessageRole::System => "system",
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            };
            messages.push(OpenAIMessage::new(role, &msg.content));
        }

        messages.push(OpenAIMessage::new("user", message));
        messages
    }

    /// Sends one chat completion and returns the first choice's text.
    async fn chat(
        &self,
        messages: Vec<OpenAIMessage>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let request = OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = Self::handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                ProviderError::parse(format!("Failed to parse response: {}", e))
            }
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::parse("No choices in response"))?;

        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(ProviderError::content_filtered("OpenAI content filter"));
        }

        choice
            .message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::parse("Empty completion"))
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
    fn status_error(status: u16, retry_after: Option<u32>, error_body: &str) -> ProviderError {
        match status {
            401 | 403 => ProviderError::AuthenticationFailed,
            429 => ProviderError::rate_limited(
                retry_after.unwrap_or_else(|| Self::parse_retry_after(error_body)),
            ),
            400 if error_body.contains("content_policy_violation")
                || error_body.contains("content_filter") =>
            {
                ProviderError::content_filtered(error_body)
            }
            400 | 404 | 422 => ProviderError::InvalidRequest(error_body.to_string()),
            500..=599 => {
                ProviderError::unavailable(format!("Server error {}: {}", status, error_body))
            }
            _ => ProviderError::network(format!("Unexpected status {}: {}", status, error_body)),
        }
    }

    /// Parses retry-after from the error message ("try again in 20s").
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

/// Reads a numeric `Retry-After` header.
pub(crate) fn retry_after_header(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u32>().ok())
}

/// Extracts N from "... try again in N...".
pub(crate) fn seconds_after_try_again(message: &str) -> Option<u32> {
    let idx = message.find("try again in ")?;
    let rest = &message[idx + "try again in ".len()..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn generate_response(
        &self,
        message: &str,
        system_prompt: &str,
        history: &[Message],
    ) -> Result<String, ProviderError> {
        let messages = Self::build_messages(system_prompt, history, message);
        self.chat(messages, self.config.max_tokens, self.config.temperature)
            .await
    }

    async fn analyze_emotion(&self, text: &str) -> Result<Sentiment, ProviderError> {
        let messages = Self::build_messages(EMOTION_SYSTEM_PROMPT, &[], text);
        let output = self.chat(messages, CLASSIFICATION_MAX_TOKENS, 0.0).await?;
        parse_sentiment(&output)
    }

    async fn determine_category(&self, text: &str) -> Result<String, ProviderError> {
        let messages = Self::build_messages(CATEGORY_SYSTEM_PROMPT, &[], text);
        let output = self.chat(messages, CLASSIFICATION_MAX_TOKENS, 0.0).await?;
        parse_category(&output)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, PartialEq)]
struct OpenAIMessage {
    role: String,
    content: String,
}

impl OpenAIMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}
