//! System prompt assembly from extracted conversation context.

use super::context::ConversationContext;
use super::style::CommunicationStyle;

const BASE_PROMPT: &str = "You are the Life Skills assistant. You help people with personal \
finance, careers, health and fitness, learning, technology, and cooking. Give practical, \
concrete guidance and suggest next steps the user can take inside the app.";

/// Builds the system prompt passed to the provider's `generate_response`.
pub fn build_system_prompt(
    context: &ConversationContext,
    category: Option<&str>,
    style: CommunicationStyle,
) -> String {
    let mut sections = vec![BASE_PROMPT.to_string()];

    match (&context.current_page, &context.current_section) {
        (Some(page), Some(section)) => sections.push(format!(
            "The user is on the \"{page}\" page, in the \"{section}\" section."
        )),
        (Some(page), None) => sections.push(format!("The user is on the \"{page}\" page.")),
        (None, Some(section)) => {
            sections.push(format!("The user is in the \"{section}\" section."))
        }
        (None, None) => {}
    }

    if !context.available_actions.is_empty() {
        sections.push(format!(
            "Actions available on this page: {}.",
            context.available_actions.join(", ")
        ));
    }

    if let Some(intent) = context.user_intent {
        sections.push(format!("The user's message looks like: {intent}."));
    }

    if !context.user_profile.interests.is_empty() {
        let interests: Vec<&str> = context
            .user_profile
            .interests
            .iter()
            .map(|interest| interest.as_str())
            .collect();
        sections.push(format!("Known interests: {}.", interests.join(", ")));
    }

    if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
        sections.push(format!("Conversation topic: {category}."));
    }

    sections.push(style.tone_hint().to_string());

    sections.join("\n")
}
