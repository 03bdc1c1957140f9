//! End-to-end failover scenario through the response assembler.
//!
//! Drives `OrchestrateResponseHandler` with scripted providers and a manual
//! clock: three primary failures open the circuit, requests inside the
//! cooldown skip the primary, and a successful probe closes it again.

use std::sync::Arc;

use lifeskills_assistant::adapters::ai::{
    FallbackOrchestrator, MockAIProvider, MockError, MockResponse,
};
use lifeskills_assistant::adapters::health::{InMemoryProviderHealthMonitor, ManualClock};
use lifeskills_assistant::application::{OrchestrateResponseCommand, OrchestrateResponseHandler};
use lifeskills_assistant::domain::assistant::{
    AIProcessingResult, ConversationContext, FALLBACK_CONFIDENCE, PRIMARY_CONFIDENCE,
};
use lifeskills_assistant::domain::provider_health::{FailoverPolicy, HealthPhase};
use lifeskills_assistant::ports::ProviderHealthMonitor;

const COOLDOWN_MS: u64 = 60_000;

struct Scenario {
    primary: MockAIProvider,
    fallback: MockAIProvider,
    clock: Arc<ManualClock>,
    monitor: Arc<InMemoryProviderHealthMonitor>,
    handler: OrchestrateResponseHandler,
}

impl Scenario {
    fn new() -> Self {
        let primary = MockAIProvider::named("anthropic");
        let fallback = MockAIProvider::named("openai");
        let clock = Arc::new(ManualClock::at_unix_millis(0));
        let monitor = Arc::new(InMemoryProviderHealthMonitor::with_clock(
            "anthropic",
            "openai",
            FailoverPolicy {
                max_failures: 3,
                cooldown_period_ms: COOLDOWN_MS,
            },
            clock.clone(),
        ));
        let orchestrator = Arc::new(FallbackOrchestrator::new(
            Arc::new(primary.clone()),
            Arc::new(fallback.clone()),
            monitor.clone(),
        ));

        Self {
            primary,
            fallback,
            clock,
            monitor,
            handler: OrchestrateResponseHandler::new(orchestrator),
        }
    }

    async fn ask(&self, message: &str) -> AIProcessingResult {
        self.handler
            .handle(OrchestrateResponseCommand::new(message))
            .await
    }

    fn fail_primary(&self) {
        self.primary.push(MockResponse::Error(MockError::Unavailable {
            message: "overloaded".to_string(),
        }));
    }
}

#[tokio::test]
async fn circuit_opens_waits_and_recovers_through_probe() {
    let s = Scenario::new();

    // Three consecutive primary failures; each request is rescued by the fallback
    for n in 1..=3 {
        s.fail_primary();
        let result = s.ask("Hello there").await;
        assert_eq!(result.confidence(), FALLBACK_CONFIDENCE);
        assert_eq!(s.monitor.snapshot().failure_count, n);
        s.clock.advance_millis(1_000);
    }
    assert_eq!(s.primary.call_count(), 3);
    assert!(s.monitor.snapshot().use_fallback);
    assert_eq!(s.monitor.phase(), HealthPhase::FallbackActive);

    // Next request goes straight to the fallback
    let result = s.ask("What time is it?").await;
    assert_eq!(result.confidence(), FALLBACK_CONFIDENCE);
    assert_eq!(s.primary.call_count(), 3);

    // Still inside the cooldown (last failure was 1s ago)
    s.clock.advance_millis(COOLDOWN_MS - 2_000);
    s.ask("Show me jobs near me").await;
    assert_eq!(s.primary.call_count(), 3);
    assert_eq!(s.fallback.call_count(), 5);

    // Cooldown elapsed: the primary is probed and its success closes the circuit
    s.clock.advance_millis(1_000);
    assert_eq!(s.monitor.phase(), HealthPhase::Probe);
    let result = s.ask("Hello again").await;
    assert_eq!(result.confidence(), PRIMARY_CONFIDENCE);
    assert_eq!(s.primary.call_count(), 4);

    let snapshot = s.monitor.snapshot();
    assert_eq!(snapshot.failure_count, 0);
    assert!(!snapshot.use_fallback);
    assert_eq!(snapshot.phase, HealthPhase::PrimaryActive);
}

#[tokio::test]
async fn failed_probe_keeps_fallback_for_another_cooldown() {
    let s = Scenario::new();
    for _ in 0..3 {
        s.fail_primary();
        s.ask("hi").await;
    }

    s.clock.advance_millis(COOLDOWN_MS);
    s.fail_primary();
    let result = s.ask("hi").await;

    assert_eq!(result.confidence(), FALLBACK_CONFIDENCE);
    assert_eq!(s.primary.call_count(), 4);
    assert_eq!(s.monitor.snapshot().failure_count, 4);
    assert_eq!(s.monitor.phase(), HealthPhase::FallbackActive);

    s.clock.advance_millis(COOLDOWN_MS - 1);
    s.ask("hi").await;
    assert_eq!(s.primary.call_count(), 4);
}

#[tokio::test]
async fn empty_context_and_history_still_resolve() {
    let s = Scenario::new();

    let result = s
        .handler
        .handle(
            OrchestrateResponseCommand::new("Hello")
                .with_context(ConversationContext::new())
                .with_previous_messages(Vec::new()),
        )
        .await;

    assert!(!result.is_degraded());
    assert_eq!(result.response(), "Mock response");
    assert_eq!(result.category(), "general");
    assert!(result.suggestions().is_none());
}

#[tokio::test]
async fn total_outage_degrades_every_request() {
    let s = Scenario::new();
    for _ in 0..5 {
        s.fail_primary();
        s.fallback.push(MockResponse::Error(MockError::Network {
            message: "connection refused".to_string(),
        }));
    }

    for _ in 0..5 {
        let result = s.ask("hi").await;
        assert!(result.is_degraded());
        assert_eq!(result.category(), "error");
    }

    // Primary was skipped once the circuit opened
    assert_eq!(s.primary.call_count(), 3);
}
