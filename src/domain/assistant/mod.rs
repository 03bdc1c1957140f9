//! Assistant Domain Module
//!
//! Rule-based understanding of a chat message before it reaches a language
//! model, and the shape of the answer that goes back to the caller.
//!
//! # Architecture
//!
//! - **Intent**: ordered first-match pattern table (`analyze_user_intent`)
//! - **Interests**: keyword lexicon over the user's history (`get_interests`)
//! - **Style**: length/punctuation heuristics (`get_preferred_style`)
//! - **Prompt**: system prompt built from the enriched context
//! - **Result**: `AIProcessingResult` and its degraded form

pub mod context;
pub mod intent;
pub mod interests;
pub mod prompt;
pub mod result;
pub mod style;

pub use context::*;
pub use intent::*;
pub use interests::*;
pub use prompt::*;
pub use result::*;
pub use style::*;
