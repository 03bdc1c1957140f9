//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `LIFESKILLS` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use lifeskills_assistant::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//!
//! println!("Server running on {}", config.server.socket_addr()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod ai;
mod error;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider and failover configuration
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `LIFESKILLS__*` variables:
    ///
    /// - `LIFESKILLS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `LIFESKILLS__AI__MAX_FAILURES=5` -> `ai.max_failures = 5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LIFESKILLS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;

        // A request may make one primary and one fallback call; the HTTP
        // timeout must not cut either off before it is counted.
        let provider_secs = self.ai.timeout_secs;
        if self.server.request_timeout_secs <= provider_secs.saturating_mul(2) {
            return Err(ValidationError::RequestTimeoutTooShort {
                request_secs: self.server.request_timeout_secs,
                provider_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "LIFESKILLS__AI__ANTHROPIC_API_KEY",
        "LIFESKILLS__AI__OPENAI_API_KEY",
        "LIFESKILLS__AI__MAX_FAILURES",
        "LIFESKILLS__AI__COOLDOWN_PERIOD_MS",
        "LIFESKILLS__AI__PRIMARY_PROVIDER",
        "LIFESKILLS__AI__FALLBACK_PROVIDER",
        "LIFESKILLS__SERVER__PORT",
        "LIFESKILLS__SERVER__ENVIRONMENT",
        "LIFESKILLS__SERVER__REQUEST_TIMEOUT_SECS",
        "LIFESKILLS__AI__TIMEOUT_SECS",
    ];

    fn set_minimal_env() {
        env::set_var("LIFESKILLS__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
        env::set_var("LIFESKILLS__AI__OPENAI_API_KEY", "sk-xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.ai.anthropic_api_key.as_deref(), Some("sk-ant-xxx"));
        assert_eq!(config.ai.openai_api_key.as_deref(), Some("sk-xxx"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.ai.primary_provider, AiProvider::Anthropic);
        assert_eq!(config.ai.fallback_provider, AiProvider::OpenAI);
        assert_eq!(config.ai.max_failures, 3);
        assert_eq!(config.ai.cooldown_period_ms, 300_000);
    }

    #[test]
    fn test_failover_overrides() {
        let config = load_with(&[
            ("LIFESKILLS__AI__MAX_FAILURES", "5"),
            ("LIFESKILLS__AI__COOLDOWN_PERIOD_MS", "1000"),
            ("LIFESKILLS__AI__PRIMARY_PROVIDER", "openai"),
            ("LIFESKILLS__AI__FALLBACK_PROVIDER", "anthropic"),
        ])
        .unwrap();
        assert_eq!(config.ai.max_failures, 5);
        assert_eq!(config.ai.cooldown_period_ms, 1_000);
        assert_eq!(config.ai.primary_provider, AiProvider::OpenAI);
        assert_eq!(config.ai.fallback_provider, AiProvider::Anthropic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let config = load_with(&[("LIFESKILLS__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let config = load_with(&[("LIFESKILLS__SERVER__PORT", "3000")]).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_request_timeout_must_cover_both_provider_calls() {
        let config = load_with(&[
            ("LIFESKILLS__SERVER__REQUEST_TIMEOUT_SECS", "120"),
            ("LIFESKILLS__AI__TIMEOUT_SECS", "60"),
        ])
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::RequestTimeoutTooShort {
                request_secs: 120,
                provider_secs: 60
            })
        ));

        let config = load_with(&[
            ("LIFESKILLS__SERVER__REQUEST_TIMEOUT_SECS", "30"),
            ("LIFESKILLS__AI__TIMEOUT_SECS", "10"),
        ])
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_timeouts_are_consistent() {
        let config = load_with(&[]).unwrap();
        assert!(config.server.request_timeout_secs > 2 * config.ai.timeout_secs);
    }

    #[test]
    fn test_default_config_fails_validation() {
        assert!(matches!(
            AppConfig::default().validate(),
            Err(ValidationError::NoAiProviderConfigured)
        ));
    }
}
