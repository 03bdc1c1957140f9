//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error(
        "Request timeout ({request_secs}s) must exceed two provider timeouts ({provider_secs}s each)"
    )]
    RequestTimeoutTooShort { request_secs: u64, provider_secs: u64 },

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddress(String),

    #[error("No AI provider configured")]
    NoAiProviderConfigured,

    #[error("Fallback provider must differ from the primary provider")]
    FallbackSameAsPrimary,

    #[error("max_failures must be at least 1")]
    InvalidMaxFailures,

    #[error("cooldown_period_ms must be greater than zero")]
    InvalidCooldown,
}
