use std::collections::HashSet;

use super::query::QueryAnalysis;
use super::quality::ResultQuality;
use crate::food::types::Language;

pub const MORE_SPECIFIC: &str =
    "Use more specific search terms (e.g. cooking method, cut, or brand name)";
pub const ADD_COOKING_METHOD: &str = "Specify a cooking state (e.g. raw, cooked, grilled)";
pub const TRY_ENGLISH: &str = "Try searching in English as well (e.g. 鶏肉 → chicken)";
pub const MORE_GENERIC: &str = "Result quality is low; try a more common food name";
pub const NARROW_DOWN: &str = "Too many results; add more specific conditions";
pub const BROADEN: &str = "Too few results; try more general search terms";
pub const USE_CANONICAL: &str = "Use a basic food name to get results that include Foundation data";
pub const VARY_TERMS: &str = "Adjust the search terms to get more varied results";

const MANY_RESULTS: usize = 50;
const FEW_RESULTS: usize = 5;

/// Keeps the first occurrence of each entry.
pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

pub fn improvement_suggestions(
    analysis: &QueryAnalysis,
    quality: &ResultQuality,
    diversity: f64,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if analysis.specificity_score < 0.5 {
        suggestions.push(MORE_SPECIFIC);
    }
    if analysis.modifiers.cooking_method.is_empty() {
        suggestions.push(ADD_COOKING_METHOD);
    }
    if analysis.language == Language::Japanese {
        suggestions.push(TRY_ENGLISH);
    }
    if quality.quality_score < 0.6 {
        suggestions.push(MORE_GENERIC);
    }
    if quality.result_count > MANY_RESULTS {
        suggestions.push(NARROW_DOWN);
    } else if quality.result_count < FEW_RESULTS {
        suggestions.push(BROADEN);
    }
    if !quality.data_type_quality.has_foundation {
        suggestions.push(USE_CANONICAL);
    }
    if diversity < 0.3 {
        suggestions.push(VARY_TERMS);
    }

    dedup_preserving_order(suggestions.into_iter().map(String::from).collect())
}

/// Strategy-level advice followed by the individual suggestions.
pub fn recommendations(
    overall: f64,
    diversity: f64,
    completeness: f64,
    suggestions: &[String],
) -> Vec<String> {
    let mut recommendations = Vec::new();
    if overall < 0.6 {
        recommendations.push("The search strategy needs a fundamental rethink".to_string());
        recommendations.push("Start again from a basic food name".to_string());
    }
    if diversity < 0.3 {
        recommendations.push("Add variations of the search terms".to_string());
    }
    if completeness < 0.5 {
        recommendations.push("Prefer Foundation or SR Legacy data".to_string());
    }
    recommendations.extend(suggestions.iter().cloned());
    dedup_preserving_order(recommendations)
}

pub fn next_steps(overall: f64, language: Language) -> Vec<String> {
    let mut steps: Vec<&str> = if overall < 0.5 {
        vec![
            "Simplify the query to the basic food name and search again",
            "Try the search in English",
            "Consider searching for a similar food",
        ]
    } else if overall < 0.7 {
        vec![
            "Add modifiers (cooking method, cut)",
            "Set more specific search conditions",
        ]
    } else {
        vec![
            "Keep the current search strategy",
            "Narrow the results further if needed",
        ]
    };

    if language == Language::Japanese {
        steps.push("Also run the search with the English translation");
    }

    steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect()
}
