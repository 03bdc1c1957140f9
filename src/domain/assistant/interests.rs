//! Interest extraction from conversation history.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::context::Message;

/// Life-skill areas the assistant recognizes.
///
/// Declaration order is the lexicon order; the derived `Ord` makes a
/// `BTreeSet<InterestDomain>` iterate in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestDomain {
    Finance,
    Career,
    Health,
    Learning,
    Technology,
    Cooking,
}

impl InterestDomain {
    /// All domains in lexicon order.
    pub const ALL: [InterestDomain; 6] = [
        InterestDomain::Finance,
        InterestDomain::Career,
        InterestDomain::Health,
        InterestDomain::Learning,
        InterestDomain::Technology,
        InterestDomain::Cooking,
    ];

    /// Looks up a domain by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|domain| domain.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterestDomain::Finance => "finance",
            InterestDomain::Career => "career",
            InterestDomain::Health => "health",
            InterestDomain::Learning => "learning",
            InterestDomain::Technology => "technology",
            InterestDomain::Cooking => "cooking",
        }
    }

    /// Lowercase keywords; any substring hit marks the domain.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            InterestDomain::Finance => &[
                "money", "budget", "saving", "invest", "debt", "loan", "tax",
            ],
            InterestDomain::Career => &[
                "job", "career", "resume", "interview", "salary", "promotion",
            ],
            InterestDomain::Health => &[
                "health", "fitness", "exercise", "diet", "sleep", "workout", "nutrition",
            ],
            InterestDomain::Learning => &["learn", "study", "course", "book", "skill", "education"],
            InterestDomain::Technology => &[
                "computer", "software", "app", "code", "programming", "tech",
            ],
            InterestDomain::Cooking => &["cook", "recipe", "food", "meal", "kitchen", "bake"],
        }
    }
}

impl std::fmt::Display for InterestDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collects the interest domains mentioned in the user's messages.
///
/// Only `user` messages are considered. The result has set semantics, so the
/// order of `messages` does not affect it.
pub fn get_interests(messages: &[Message]) -> BTreeSet<InterestDomain> {
    let text = messages
        .iter()
        .filter(|message| message.is_from_user())
        .map(|message| message.content.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    InterestDomain::ALL
        .iter()
        .copied()
        .filter(|domain| domain.keywords().iter().any(|keyword| text.contains(keyword)))
        .collect()
}
