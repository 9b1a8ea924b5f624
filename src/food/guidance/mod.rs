pub mod generator;
pub mod knowledge;

pub use generator::{GuidanceGenerator, GuidanceResult, InputAnalysis, InputIssue, InputType};
pub use knowledge::{GuidanceKnowledge, BUILTIN_KNOWLEDGE};

use crate::food::types::SearchIntent;

/// Guidance from the built-in tables.
pub fn guide(
    category: Option<&str>,
    intent: Option<&SearchIntent>,
    user_input: Option<&str>,
) -> GuidanceResult {
    GuidanceGenerator::default().guide(category, intent, user_input)
}
