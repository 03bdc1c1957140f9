//! Rule-based intent classification.
//!
//! The pattern table is evaluated top to bottom and the first matching pattern
//! wins. Patterns overlap ("Hello, can you help?" is both a greeting and a
//! question), so the row order is part of the contract:
//!
//! 1. `question`
//! 2. `action_request`
//! 3. `navigation`
//! 4. `form_filling`
//! 5. `feedback`
//! 6. `greeting`
//!
//! Messages that match nothing classify as `other`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What the user is trying to do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserIntent {
    Question,
    ActionRequest,
    Navigation,
    FormFilling,
    Feedback,
    Greeting,
    Other,
}

impl UserIntent {
    pub const ALL: [UserIntent; 7] = [
        UserIntent::Question,
        UserIntent::ActionRequest,
        UserIntent::Navigation,
        UserIntent::FormFilling,
        UserIntent::Feedback,
        UserIntent::Greeting,
        UserIntent::Other,
    ];

    /// Looks up an intent by its wire name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserIntent::Question => "question",
            UserIntent::ActionRequest => "action_request",
            UserIntent::Navigation => "navigation",
            UserIntent::FormFilling => "form_filling",
            UserIntent::Feedback => "feedback",
            UserIntent::Greeting => "greeting",
            UserIntent::Other => "other",
        }
    }
}

impl std::fmt::Display for UserIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|source| Regex::new(source).expect("intent pattern must compile"))
        .collect()
}

/// Ordered `(intent, patterns)` table. Do not reorder.
static INTENT_PATTERNS: Lazy<Vec<(UserIntent, Vec<Regex>)>> = Lazy::new(|| {
    vec![
        (
            UserIntent::Question,
            patterns(&[
                r"^(what|how|why|when|where|who|which|can|could|would|should|is|are|do|does)\b",
                r"\?$",
            ]),
        ),
        (
            UserIntent::ActionRequest,
            patterns(&[
                r"^(show|find|get|create|make|help|give|list|search|open|calculate)\b",
                r"^(please|i want|i need|i'd like)\b",
            ]),
        ),
        (
            UserIntent::Navigation,
            patterns(&[
                r"^(go to|take me|navigate|back to|return to)\b",
                r"\b(page|section|tab)$",
            ]),
        ),
        (
            UserIntent::FormFilling,
            patterns(&[r"^(fill|submit|enter|update|add|save|change)\b"]),
        ),
        (
            UserIntent::Feedback,
            patterns(&[
                r"^(thanks|thank you|great|awesome|perfect|not helpful|that was|this is)\b",
                r"\b(thanks|thank you)[.!]*$",
            ]),
        ),
        (
            UserIntent::Greeting,
            patterns(&[r"^(hi|hello|hey|good morning|good afternoon|good evening|greetings)\b"]),
        ),
    ]
});

/// Classifies a message by first-match over the ordered pattern table.
pub fn analyze_user_intent(message: &str) -> UserIntent {
    let normalized = message.trim().to_lowercase();

    for (intent, patterns) in INTENT_PATTERNS.iter() {
        if patterns.iter().any(|pattern| pattern.is_match(&normalized)) {
            return *intent;
        }
    }

    UserIntent::Other
}
