//! Per-request conversation context.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::intent::UserIntent;
use super::interests::InterestDomain;

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions.
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

impl MessageRole {
    /// Parses a wire role name; case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "system" => Some(MessageRole::System),
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

/// A message in the caller-supplied conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn is_from_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

/// What the assistant knows about the user for this request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub interests: BTreeSet<InterestDomain>,
}

/// Where the user is in the app and what they appear to want.
///
/// Built fresh for every request and owned by it; `user_intent` and
/// `user_profile.interests` are filled in by the assembler when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    pub current_page: Option<String>,
    pub current_section: Option<String>,
    pub available_actions: Vec<String>,
    pub user_intent: Option<UserIntent>,
    pub user_profile: UserProfile,
}

impl ConversationContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current page.
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.current_page = Some(page.into());
        self
    }

    /// Sets the current section.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.current_section = Some(section.into());
        self
    }

    /// Adds an action the user can take on the current page.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.available_actions.push(action.into());
        self
    }

    /// Sets the intent, skipping classification.
    pub fn with_intent(mut self, intent: UserIntent) -> Self {
        self.user_intent = Some(intent);
        self
    }

    /// Adds a known interest, skipping history extraction.
    pub fn with_interest(mut self, interest: InterestDomain) -> Self {
        self.user_profile.interests.insert(interest);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_work() {
        assert_eq!(Message::system("s").role, MessageRole::System);
        assert_eq!(Message::user("u").role, MessageRole::User);
        assert_eq!(Message::assistant("a").role, MessageRole::Assistant);
        assert!(Message::user("u").is_from_user());
        assert!(!Message::assistant("a").is_from_user());
    }

    #[test]
    fn message_role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");

        let role: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, MessageRole::User);
    }

    #[test]
    fn message_role_from_name_rejects_unknown_roles() {
        assert_eq!(MessageRole::from_name(" Assistant "), Some(MessageRole::Assistant));
        assert_eq!(MessageRole::from_name("tool"), None);
        assert_eq!(MessageRole::from_name(""), None);
    }

    #[test]
    fn context_builder_works() {
        let context = ConversationContext::new()
            .with_page("finance")
            .with_section("budget")
            .with_action("Create budget")
            .with_intent(UserIntent::Question)
            .with_interest(InterestDomain::Finance);

        assert_eq!(context.current_page.as_deref(), Some("finance"));
        assert_eq!(context.current_section.as_deref(), Some("budget"));
        assert_eq!(context.available_actions, vec!["Create budget".to_string()]);
        assert_eq!(context.user_intent, Some(UserIntent::Question));
        assert!(context.user_profile.interests.contains(&InterestDomain::Finance));
    }

    #[test]
    fn default_context_has_nothing_filled() {
        let context = ConversationContext::default();
        assert!(context.current_page.is_none());
        assert!(context.available_actions.is_empty());
        assert!(context.user_intent.is_none());
        assert!(context.user_profile.interests.is_empty());
    }
}
