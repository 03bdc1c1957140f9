//! AI Provider Port - Interface for language-model provider integrations.
//!
//! This port abstracts the three capabilities the assistant consumes from an
//! upstream model (OpenAI, Anthropic, ...). Each call either resolves or fails
//! with a [`ProviderError`]; the orchestration layer does not care which
//! variant, every failure counts against the provider's health.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn generate_response(
//!         &self,
//!         message: &str,
//!         _system_prompt: &str,
//!         _history: &[Message],
//!     ) -> Result<String, ProviderError> {
//!         Ok(message.to_string())
//!     }
//!     // ... other methods
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::assistant::Message;

/// Port for language-model provider interactions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a reply to `message` given the system prompt and prior turns.
    async fn generate_response(
        &self,
        message: &str,
        system_prompt: &str,
        history: &[Message],
    ) -> Result<String, ProviderError>;

    /// Classify the emotional tone of `text`.
    async fn analyze_emotion(&self, text: &str) -> Result<Sentiment, ProviderError>;

    /// Pick a topical category for `text`.
    async fn determine_category(&self, text: &str) -> Result<String, ProviderError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Emotional tone reported by `analyze_emotion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Parses a model's free-text answer, looking for the first sentiment word.
    pub fn from_model_output(output: &str) -> Option<Self> {
        let lower = output.to_lowercase();
        [
            ("negative", Sentiment::Negative),
            ("positive", Sentiment::Positive),
            ("neutral", Sentiment::Neutral),
        ]
        .into_iter()
        .filter_map(|(word, sentiment)| lower.find(word).map(|idx| (idx, sentiment)))
        .min_by_key(|(idx, _)| *idx)
        .map(|(_, sentiment)| sentiment)
    }
}

/// Provider identification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai", "anthropic").
    pub name: String,
    /// Model identifier (e.g., "gpt-4o", "claude-sonnet-4-20250514").
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Provider errors.
///
/// Timeouts are surfaced here like any other failure so they take part in
/// failure counting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Reason for filtering.
        reason: String,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl ProviderError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_secs: u32) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Returns true if the same call might succeed later on the same provider.
    ///
    /// Informational only: the fallback path treats every error as a failure.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. }
                | ProviderError::Unavailable { .. }
                | ProviderError::Network(_)
                | ProviderError::Timeout { .. }
        )
    }
}
