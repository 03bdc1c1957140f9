//! Life-Skills Assistant server binary.

use std::sync::Arc;

use lifeskills_assistant::adapters::ai::{
    AnthropicConfig, AnthropicProvider, FallbackOrchestrator, OpenAIConfig, OpenAIProvider,
};
use lifeskills_assistant::adapters::health::InMemoryProviderHealthMonitor;
use lifeskills_assistant::adapters::http::{api_router, with_middleware, AdminAppState, ChatAppState};
use lifeskills_assistant::config::{AiConfig, AiProvider, AppConfig, ValidationError};
use lifeskills_assistant::ports::{AIProvider, ProviderError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let ai = &config.ai;
    let primary = build_provider(ai, ai.primary_provider, ai.primary_model.as_deref())?;
    let fallback = build_provider(ai, ai.fallback_provider, ai.fallback_model.as_deref())?;

    let monitor = Arc::new(InMemoryProviderHealthMonitor::new(
        ai.primary_provider.as_str(),
        ai.fallback_provider.as_str(),
        ai.failover_policy(),
    ));
    let orchestrator = Arc::new(FallbackOrchestrator::new(primary, fallback, monitor.clone()));

    let app = with_middleware(
        api_router(ChatAppState::new(orchestrator), AdminAppState::new(monitor)),
        &config.server,
    );

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        primary = %ai.primary_provider,
        fallback = %ai.fallback_provider,
        max_failures = ai.max_failures,
        cooldown_period_ms = ai.cooldown_period_ms,
        "Starting life-skills assistant"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over `server.log_level`; production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_provider(
    ai: &AiConfig,
    kind: AiProvider,
    model: Option<&str>,
) -> Result<Arc<dyn AIProvider>, Box<dyn std::error::Error>> {
    let key = ai
        .api_key(kind)
        .ok_or(ValidationError::NoAiProviderConfigured)?;

    let provider: Result<Arc<dyn AIProvider>, ProviderError> = match kind {
        AiProvider::OpenAI => {
            let mut settings = OpenAIConfig::new(key).with_timeout(ai.timeout());
            if let Some(model) = model {
                settings = settings.with_model(model);
            }
            OpenAIProvider::new(settings).map(|p| Arc::new(p) as Arc<dyn AIProvider>)
        }
        AiProvider::Anthropic => {
            let mut settings = AnthropicConfig::new(key).with_timeout(ai.timeout());
            if let Some(model) = model {
                settings = settings.with_model(model);
            }
            AnthropicProvider::new(settings).map(|p| Arc::new(p) as Arc<dyn AIProvider>)
        }
    };

    Ok(provider?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
