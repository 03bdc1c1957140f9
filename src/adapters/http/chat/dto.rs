//! HTTP DTOs for the chat endpoint.
//!
//! The wire format is camelCase. Every field except `message` may be omitted.

use serde::{Deserialize, Deserializer, Serialize};

use crate::application::OrchestrateResponseCommand;
use crate::domain::assistant::{
    AIProcessingResult, ConversationContext, InterestDomain, Message, MessageRole, UserIntent,
    UserProfile,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to orchestrate one assistant response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrateRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub context: Option<ContextDto>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_history")]
    pub previous_messages: Vec<Message>,
}

/// Where the user is in the app.
///
/// `userIntent` and `userProfile.interests` are optional overrides; unknown
/// names are ignored and re-derived.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextDto {
    #[serde(default)]
    pub current_page: Option<String>,
    #[serde(default)]
    pub current_section: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub available_actions: Vec<String>,
    #[serde(default)]
    pub user_intent: Option<String>,
    #[serde(default)]
    pub user_profile: Option<UserProfileDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfileDto {
    #[serde(default, deserialize_with = "null_as_default")]
    pub interests: Vec<String>,
}

/// One history entry as sent by the client; either field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
struct HistoryEntryDto {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl HistoryEntryDto {
    fn into_message(self) -> Option<Message> {
        let role = MessageRole::from_name(self.role.as_deref()?)?;
        Some(Message::new(role, self.content?))
    }
}

/// `null` reads as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// History with `null` read as empty; entries that are not
/// `{role, content}` with a known role are skipped.
fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<serde_json::Value> = null_as_default(deserializer)?;
    let total = entries.len();

    let messages: Vec<Message> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<HistoryEntryDto>(entry).ok())
        .filter_map(HistoryEntryDto::into_message)
        .collect();

    if messages.len() < total {
        tracing::debug!(
            skipped = total - messages.len(),
            "Ignoring unusable previousMessages entries"
        );
    }
    Ok(messages)
}

impl From<ContextDto> for ConversationContext {
    fn from(dto: ContextDto) -> Self {
        let interests = dto
            .user_profile
            .map(|profile| {
                profile
                    .interests
                    .iter()
                    .filter_map(|name| InterestDomain::from_name(name))
                    .collect()
            })
            .unwrap_or_default();

        ConversationContext {
            current_page: dto.current_page,
            current_section: dto.current_section,
            available_actions: dto.available_actions,
            user_intent: dto.user_intent.as_deref().and_then(UserIntent::from_name),
            user_profile: UserProfile { interests },
        }
    }
}

impl OrchestrateRequest {
    /// The message, if present and not blank.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
    }

    /// Converts into a command; `None` when the message is missing.
    pub fn into_command(self) -> Option<OrchestrateResponseCommand> {
        self.message()?;
        let OrchestrateRequest {
            message,
            context,
            category,
            previous_messages,
        } = self;

        Some(OrchestrateResponseCommand {
            message: message.unwrap_or_default(),
            context: context.map(ConversationContext::from).unwrap_or_default(),
            category,
            previous_messages,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Successful chat response.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestrateResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: AIProcessingResult,
}

impl From<AIProcessingResult> for OrchestrateResponse {
    fn from(result: AIProcessingResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}
