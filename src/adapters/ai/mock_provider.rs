//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order across all capabilities
//! - Simulated delays for concurrency testing
//! - Error injection for failover testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::named("primary")
//!     .with_error(MockError::Timeout { timeout_secs: 30 })
//!     .with_response("Here is a budget template.");
//!
//! assert!(provider.generate_response("hi", "", &[]).await.is_err());
//! assert_eq!(provider.generate_response("hi", "", &[]).await?, "Here is a budget template.");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::assistant::Message;
use crate::ports::{AIProvider, ProviderError, ProviderInfo, Sentiment};

/// Mock AI provider for testing.
///
/// Clones share the response queue and call log.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<MockCall>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this text (parsed as a sentiment for `analyze_emotion`).
    Success(String),
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for ProviderError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => {
                ProviderError::rate_limited(retry_after_secs)
            }
            MockError::Unavailable { message } => ProviderError::unavailable(message),
            MockError::AuthenticationFailed => ProviderError::AuthenticationFailed,
            MockError::Network { message } => ProviderError::network(message),
            MockError::Timeout { timeout_secs } => ProviderError::timeout(timeout_secs),
        }
    }
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GenerateResponse {
        message: String,
        system_prompt: String,
        history: Vec<Message>,
    },
    AnalyzeEmotion {
        text: String,
    },
    DetermineCategory {
        text: String,
    },
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Creates a mock provider that reports `name` in its provider info.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new(name, "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::Success(content.into()));
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error));
        self
    }

    /// Queues a response on an existing (possibly shared) provider.
    pub fn push(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success("Mock response".to_string()))
    }

    /// Records the call, waits out the delay, and yields the scripted outcome.
    async fn respond(&self, call: MockCall) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(call);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success(content) => Ok(content),
            MockResponse::Error(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn generate_response(
        &self,
        message: &str,
        system_prompt: &str,
        history: &[Message],
    ) -> Result<String, ProviderError> {
        self.respond(MockCall::GenerateResponse {
            message: message.to_string(),
            system_prompt: system_prompt.to_string(),
            history: history.to_vec(),
        })
        .await
    }

    async fn analyze_emotion(&self, text: &str) -> Result<Sentiment, ProviderError> {
        let output = self
            .respond(MockCall::AnalyzeEmotion {
                text: text.to_string(),
            })
            .await?;
        Sentiment::from_model_output(&output)
            .ok_or_else(|| ProviderError::parse(format!("unrecognized sentiment: {output}")))
    }

    async fn determine_category(&self, text: &str) -> Result<String, ProviderError> {
        self.respond(MockCall::DetermineCategory {
            text: text.to_string(),
        })
        .await
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_responses_in_order() {
        let provider = MockAIProvider::new()
            .with_response("First")
            .with_response("Second");

        assert_eq!(provider.generate_response("a", "", &[]).await.unwrap(), "First");
        assert_eq!(provider.generate_response("b", "", &[]).await.unwrap(), "Second");
        assert_eq!(
            provider.generate_response("c", "", &[]).await.unwrap(),
            "Mock response"
        );
    }

    #[tokio::test]
    async fn injects_errors() {
        let provider = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 30 });

        let result = provider.generate_response("a", "", &[]).await;
        assert_eq!(result, Err(ProviderError::timeout(30)));
    }

    #[tokio::test]
    async fn records_calls() {
        let provider = MockAIProvider::new();
        let history = vec![Message::user("earlier")];

        provider
            .generate_response("hello", "be brief", &history)
            .await
            .unwrap();
        provider.determine_category("taxes").await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(
            provider.get_calls()[0],
            MockCall::GenerateResponse {
                message: "hello".to_string(),
                system_prompt: "be brief".to_string(),
                history,
            }
        );

        provider.clear_calls();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn analyze_emotion_parses_scripted_output() {
        let provider = MockAIProvider::new()
            .with_response("negative")
            .with_response("no idea");

        assert_eq!(
            provider.analyze_emotion("ugh").await.unwrap(),
            Sentiment::Negative
        );
        assert!(matches!(
            provider.analyze_emotion("hm").await,
            Err(ProviderError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn clones_share_queue_and_calls() {
        let provider = MockAIProvider::named("shared");
        let clone = provider.clone();
        provider.push(MockResponse::Success("from original".to_string()));

        assert_eq!(
            clone.generate_response("x", "", &[]).await.unwrap(),
            "from original"
        );
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.provider_info().name, "shared");
    }
}
