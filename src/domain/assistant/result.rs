//! The structured outcome of one orchestrated chat turn.

use serde::{Deserialize, Serialize};

use super::context::ConversationContext;
use super::interests::InterestDomain;

/// Text returned to the user when no provider could answer.
pub const DEGRADED_RESPONSE: &str = "I'm sorry, I encountered an error while processing your \
request. Please try again or contact support if the issue persists.";

/// Category attached to the degraded result.
pub const ERROR_CATEGORY: &str = "error";

/// Category used when neither the caller nor the history suggests one.
pub const GENERAL_CATEGORY: &str = "general";

/// Confidence reported when the primary provider answered.
pub const PRIMARY_CONFIDENCE: f32 = 0.9;

/// Confidence reported when the fallback provider answered.
pub const FALLBACK_CONFIDENCE: f32 = 0.7;

/// Maximum number of follow-up suggestions attached to a response.
pub const MAX_SUGGESTIONS: usize = 3;

/// A follow-up the UI can offer as a quick reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
}

/// Immutable result of `orchestrate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIProcessingResult {
    response: String,
    category: String,
    confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestions: Option<Vec<Suggestion>>,
}

impl AIProcessingResult {
    /// Creates a result; confidence is clamped into `[0, 1]`.
    pub fn new(
        response: impl Into<String>,
        category: impl Into<String>,
        confidence: f32,
        suggestions: Option<Vec<Suggestion>>,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            response: response.into(),
            category: category.into(),
            confidence,
            suggestions,
        }
    }

    /// The fixed result returned on any orchestration failure.
    pub fn degraded() -> Self {
        Self::new(DEGRADED_RESPONSE, ERROR_CATEGORY, 0.0, None)
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn suggestions(&self) -> Option<&[Suggestion]> {
        self.suggestions.as_deref()
    }

    pub fn is_degraded(&self) -> bool {
        self.category == ERROR_CATEGORY && self.response == DEGRADED_RESPONSE
    }
}

/// Picks the category: explicit caller value, else first interest, else `general`.
pub fn resolve_category(requested: Option<&str>, context: &ConversationContext) -> String {
    requested
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| {
            context
                .user_profile
                .interests
                .iter()
                .next()
                .map(InterestDomain::to_string)
        })
        .unwrap_or_else(|| GENERAL_CATEGORY.to_string())
}

/// Turns the page's available actions into quick-reply suggestions.
pub fn suggestions_for(context: &ConversationContext) -> Option<Vec<Suggestion>> {
    let suggestions: Vec<Suggestion> = context
        .available_actions
        .iter()
        .map(|action| action.trim())
        .filter(|action| !action.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(|action| Suggestion {
            text: action.to_string(),
        })
        .collect();

    (!suggestions.is_empty()).then_some(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_result_matches_contract() {
        let result = AIProcessingResult::degraded();
        assert_eq!(
            result.response(),
            "I'm sorry, I encountered an error while processing your request. Please try again or contact support if the issue persists."
        );
        assert_eq!(result.category(), "error");
        assert_eq!(result.confidence(), 0.0);
        assert!(result.suggestions().is_none());
        assert!(result.is_degraded());
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(AIProcessingResult::new("r", "c", 1.7, None).confidence(), 1.0);
        assert_eq!(AIProcessingResult::new("r", "c", -0.2, None).confidence(), 0.0);
        assert_eq!(AIProcessingResult::new("r", "c", f32::NAN, None).confidence(), 0.0);
    }

    #[test]
    fn category_prefers_explicit_value() {
        let context = ConversationContext::new().with_interest(InterestDomain::Health);
        assert_eq!(resolve_category(Some(" fitness "), &context), "fitness");
    }

    #[test]
    fn category_falls_back_to_first_interest_then_general() {
        let context = ConversationContext::new()
            .with_interest(InterestDomain::Cooking)
            .with_interest(InterestDomain::Career);
        assert_eq!(resolve_category(None, &context), "career");
        assert_eq!(resolve_category(Some(""), &ConversationContext::new()), "general");
    }

    #[test]
    fn suggestions_take_first_three_non_blank_actions() {
        let context = ConversationContext::new()
            .with_action("Track expense")
            .with_action(" ")
            .with_action("Set goal")
            .with_action("View report")
            .with_action("Export");

        let texts: Vec<String> = suggestions_for(&context)
            .unwrap()
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(texts, vec!["Track expense", "Set goal", "View report"]);
    }

    #[test]
    fn no_actions_means_no_suggestions() {
        assert!(suggestions_for(&ConversationContext::new()).is_none());
    }

    #[test]
    fn suggestions_are_omitted_from_json_when_absent() {
        let json = serde_json::to_value(AIProcessingResult::degraded()).unwrap();
        assert!(json.get("suggestions").is_none());
        assert_eq!(json["category"], "error");
    }
}
