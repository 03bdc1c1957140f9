//! OrchestrateResponseHandler - Turns one chat message into an `AIProcessingResult`.
//!
//! Pipeline:
//! 1. Fill `user_intent` from the message when the caller didn't send one.
//! 2. Fill interests from the previous messages when the profile has none.
//! 3. Infer the preferred style and build the system prompt.
//! 4. Generate the reply through the fallback orchestrator.
//! 5. Attach category, confidence and suggestions.
//!
//! `handle` never fails. Errors and panics anywhere in the pipeline are
//! logged and collapse to `AIProcessingResult::degraded()`. A panicking
//! provider is handled one level down, as an ordinary provider failure.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info_span, Instrument};
use uuid::Uuid;

use super::errors::OrchestrationError;
use crate::adapters::ai::{panic_message, FallbackOrchestrator};
use crate::domain::assistant::{
    analyze_user_intent, build_system_prompt, get_interests, get_preferred_style,
    resolve_category, suggestions_for, AIProcessingResult, ConversationContext, Message,
    FALLBACK_CONFIDENCE, PRIMARY_CONFIDENCE,
};
use crate::domain::provider_health::ProviderSlot;

/// Command to answer one chat message.
#[derive(Debug, Clone, Default)]
pub struct OrchestrateResponseCommand {
    pub message: String,
    pub context: ConversationContext,
    /// Caller-chosen category; blank counts as absent.
    pub category: Option<String>,
    pub previous_messages: Vec<Message>,
}

impl OrchestrateResponseCommand {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: ConversationContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_previous_messages(mut self, messages: Vec<Message>) -> Self {
        self.previous_messages = messages;
        self
    }
}

/// Handler for orchestrated chat responses.
pub struct OrchestrateResponseHandler {
    orchestrator: Arc<FallbackOrchestrator>,
}

impl OrchestrateResponseHandler {
    pub fn new(orchestrator: Arc<FallbackOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn handle(&self, cmd: OrchestrateResponseCommand) -> AIProcessingResult {
        let request_id = Uuid::new_v4();
        let span = info_span!("orchestrate_response", %request_id);

        async move {
            match AssertUnwindSafe(self.try_handle(cmd)).catch_unwind().await {
                Ok(Ok(result)) => result,
                Ok(Err(err)) => {
                    error!(error = %err, "Orchestration failed, returning degraded response");
                    AIProcessingResult::degraded()
                }
                Err(panic) => {
                    let err = OrchestrationError::Panicked(panic_message(panic.as_ref()));
                    error!(error = %err, "Orchestration panicked, returning degraded response");
                    AIProcessingResult::degraded()
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn try_handle(
        &self,
        cmd: OrchestrateResponseCommand,
    ) -> Result<AIProcessingResult, OrchestrationError> {
        let OrchestrateResponseCommand {
            message,
            mut context,
            category,
            previous_messages,
        } = cmd;

        if message.trim().is_empty() {
            return Err(OrchestrationError::InvalidContext(
                "message is empty".to_string(),
            ));
        }

        if context.user_intent.is_none() {
            context.user_intent = Some(analyze_user_intent(&message));
        }
        if context.user_profile.interests.is_empty() {
            context.user_profile.interests = get_interests(&previous_messages);
        }

        let style = get_preferred_style(&previous_messages);
        let category = resolve_category(category.as_deref(), &context);
        let system_prompt = build_system_prompt(&context, Some(&category), style);

        let outcome = self
            .orchestrator
            .generate_response(&message, &system_prompt, &previous_messages)
            .await?;

        let confidence = match outcome.provider {
            ProviderSlot::Primary => PRIMARY_CONFIDENCE,
            ProviderSlot::Fallback => FALLBACK_CONFIDENCE,
        };

        debug!(
            provider = %outcome.provider_name,
            slot = %outcome.provider,
            intent = ?context.user_intent,
            %category,
            %style,
            "Response generated"
        );

        Ok(AIProcessingResult::new(
            outcome.value,
            category,
            confidence,
            suggestions_for(&context),
        ))
    }
}
