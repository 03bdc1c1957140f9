//! Communication style inference from the user's own messages.

use serde::{Deserialize, Serialize};

use super::context::Message;

/// Minimum user messages before a style is inferred.
const MIN_MESSAGES_FOR_STYLE: usize = 3;

/// How the user tends to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStyle {
    Neutral,
    Formal,
    Casual,
    Balanced,
}

impl CommunicationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationStyle::Neutral => "neutral",
            CommunicationStyle::Formal => "formal",
            CommunicationStyle::Casual => "casual",
            CommunicationStyle::Balanced => "balanced",
        }
    }

    /// Tone instruction for the system prompt.
    pub fn tone_hint(&self) -> &'static str {
        match self {
            CommunicationStyle::Neutral => "Use a friendly, clear tone.",
            CommunicationStyle::Formal => {
                "The user writes formally; answer in complete, well-structured sentences."
            }
            CommunicationStyle::Casual => {
                "The user writes casually; keep answers short and conversational."
            }
            CommunicationStyle::Balanced => {
                "Match the user's tone: approachable but precise."
            }
        }
    }
}

impl std::fmt::Display for CommunicationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn looks_formal(content: &str) -> bool {
    content.contains('.')
        && !content.contains("!!")
        && !content.contains("...")
        && content.chars().next().is_some_and(char::is_uppercase)
}

/// Infers the user's writing style from message length and punctuation.
///
/// * fewer than 3 user messages: `neutral`
/// * average length > 100 and formality > 0.7: `formal`
/// * average length < 20 or formality < 0.3: `casual`
/// * otherwise: `balanced`
pub fn get_preferred_style(messages: &[Message]) -> CommunicationStyle {
    let user_messages: Vec<&str> = messages
        .iter()
        .filter(|message| message.is_from_user())
        .map(|message| message.content.as_str())
        .collect();

    if user_messages.len() < MIN_MESSAGES_FOR_STYLE {
        return CommunicationStyle::Neutral;
    }

    let count = user_messages.len() as f64;
    let total_length: usize = user_messages.iter().map(|m| m.chars().count()).sum();
    let avg_length = total_length as f64 / count;
    let formal_count = user_messages.iter().filter(|m| looks_formal(m)).count();
    let formality_ratio = formal_count as f64 / count;

    if avg_length > 100.0 && formality_ratio > 0.7 {
        CommunicationStyle::Formal
    } else if avg_length < 20.0 || formality_ratio < 0.3 {
        CommunicationStyle::Casual
    } else {
        CommunicationStyle::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(contents: &[&str]) -> Vec<Message> {
        contents.iter().map(|c| Message::user(*c)).collect()
    }

    #[test]
    fn test_fewer_than_three_user_messages_is_neutral() {
        let messages = vec![
            Message::user("lol!!"),
            Message::assistant("Hi."),
            Message::assistant("How can I help."),
            Message::user("k"),
        ];
        assert_eq!(get_preferred_style(&messages), CommunicationStyle::Neutral);
        assert_eq!(get_preferred_style(&[]), CommunicationStyle::Neutral);
    }

    #[test]
    fn test_long_punctuated_messages_are_formal() {
        let sentence = "I would like to understand how to allocate my monthly income across savings, \
                        rent, groceries, and a small emergency fund.";
        assert!(sentence.chars().count() > 100);

        let messages = users(&[sentence, sentence, sentence]);
        assert_eq!(get_preferred_style(&messages), CommunicationStyle::Formal);
    }

    #[test]
    fn test_short_messages_are_casual() {
        let messages = users(&["Ok.", "Sure.", "Thanks."]);
        assert_eq!(get_preferred_style(&messages), CommunicationStyle::Casual);
    }

    #[test]
    fn test_unpunctuated_messages_are_casual() {
        let messages = users(&[
            "hey so i was wondering about my budget for next month",
            "yeah that makes sense but what about groceries and rent",
            "cool what else should i think about for savings",
        ]);
        assert_eq!(get_preferred_style(&messages), CommunicationStyle::Casual);
    }

    #[test]
    fn test_mixed_messages_are_balanced() {
        let messages = users(&[
            "Can you help me plan meals for the week.",
            "I mostly cook on weekends and want leftovers.",
            "sounds good, what about snacks",
        ]);
        assert_eq!(get_preferred_style(&messages), CommunicationStyle::Balanced);
    }

    #[test]
    fn test_ellipsis_and_double_bang_are_not_formal() {
        assert!(!looks_formal("Well... maybe."));
        assert!(!looks_formal("Great!! Thanks."));
        assert!(!looks_formal("lowercase start."));
        assert!(!looks_formal("No period"));
        assert!(looks_formal("Proper sentence."));
    }
}
