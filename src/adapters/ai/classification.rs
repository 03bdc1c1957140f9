//! Instructions and output parsing shared by the HTTP providers for the two
//! classification capabilities.

use crate::ports::{ProviderError, Sentiment};

/// System prompt for `analyze_emotion`.
pub(crate) const EMOTION_SYSTEM_PROMPT: &str = "Classify the emotional tone of the user's \
message. Answer with exactly one word: positive, neutral, or negative.";

/// System prompt for `determine_category`.
pub(crate) const CATEGORY_SYSTEM_PROMPT: &str = "Classify the user's message into one \
life-skills category: finance, career, health, learning, technology, cooking, or general. \
Answer with exactly one lowercase word.";

/// Small completions are enough for a one-word answer.
pub(crate) const CLASSIFICATION_MAX_TOKENS: u32 = 16;

/// Parses a model answer to the emotion prompt.
pub(crate) fn parse_sentiment(output: &str) -> Result<Sentiment, ProviderError> {
    Sentiment::from_model_output(output)
        .ok_or_else(|| ProviderError::parse(format!("unrecognized sentiment: {}", output.trim())))
}

/// Reduces a model answer to the category prompt to a single lowercase word.
pub(crate) fn parse_category(output: &str) -> Result<String, ProviderError> {
    output
        .split_whitespace()
        .next()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric() && c != '_' && c != '-')
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .ok_or_else(|| ProviderError::parse("empty category"))
}
