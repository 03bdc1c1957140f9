//! AI provider configuration

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::provider_health::FailoverPolicy;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Provider tried first on every request
    #[serde(default = "default_primary")]
    pub primary_provider: AiProvider,

    /// Provider used while the primary is failing or forced off
    #[serde(default = "default_fallback")]
    pub fallback_provider: AiProvider,

    /// Model override for the primary provider
    pub primary_model: Option<String>,

    /// Model override for the fallback provider
    pub fallback_model: Option<String>,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Consecutive primary failures before switching to the fallback
    #[serde(default = "default_max_failures")]
    pub max_failures: u32,

    /// Milliseconds after the last failure before the primary is probed
    #[serde(default = "default_cooldown_period_ms")]
    pub cooldown_period_ms: u64,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAI,
    #[default]
    Anthropic,
}

impl AiProvider {
    /// Identifier reported in status responses and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAI => "openai",
            AiProvider::Anthropic => "anthropic",
        }
    }

    fn key_name(&self) -> &'static str {
        match self {
            AiProvider::OpenAI => "OPENAI_API_KEY",
            AiProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// API key for a provider, if one is set.
    pub fn api_key(&self, provider: AiProvider) -> Option<&str> {
        let key = match provider {
            AiProvider::OpenAI => self.openai_api_key.as_deref(),
            AiProvider::Anthropic => self.anthropic_api_key.as_deref(),
        };
        key.filter(|k| !k.is_empty())
    }

    /// Circuit-breaker thresholds for the health monitor.
    pub fn failover_policy(&self) -> FailoverPolicy {
        FailoverPolicy {
            max_failures: self.max_failures,
            cooldown_period_ms: self.cooldown_period_ms,
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_openai() && !self.has_anthropic() {
            return Err(ValidationError::NoAiProviderConfigured);
        }

        // Both ends of the failover pair need credentials
        for provider in [self.primary_provider, self.fallback_provider] {
            if self.api_key(provider).is_none() {
                return Err(ValidationError::MissingRequired(provider.key_name()));
            }
        }

        if self.primary_provider == self.fallback_provider {
            return Err(ValidationError::FallbackSameAsPrimary);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_failures == 0 {
            return Err(ValidationError::InvalidMaxFailures);
        }
        if self.cooldown_period_ms == 0 {
            return Err(ValidationError::InvalidCooldown);
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: default_primary(),
            fallback_provider: default_fallback(),
            primary_model: None,
            fallback_model: None,
            timeout_secs: default_timeout(),
            max_failures: default_max_failures(),
            cooldown_period_ms: default_cooldown_period_ms(),
        }
    }
}

fn default_primary() -> AiProvider {
    AiProvider::Anthropic
}

fn default_fallback() -> AiProvider {
    AiProvider::OpenAI
}

fn default_timeout() -> u64 {
    60
}

fn default_max_failures() -> u32 {
    3
}

fn default_cooldown_period_ms() -> u64 {
    300_000
}
