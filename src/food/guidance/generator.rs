use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::knowledge::{
    CategoryGuidance, ComprehensiveExamples, FallbackStrategies, GeneralTips, GuidanceKnowledge,
    IntentGuidance, TranslationPatterns, BUILTIN_KNOWLEDGE,
};
use crate::food::analysis::query::{contains_cjk, detect_language};
use crate::food::types::{Complexity, DataType, Language, SearchIntent};

const COMPOSITE_DISH_WORDS: &[&str] = &[
    "salad", "サラダ", "curry", "カレー", "soup", "スープ", "sandwich", "サンドイッチ",
];
const PROCESSED_FOOD_WORDS: &[&str] = &["juice", "ジュース", "cola", "コーラ", "chips"];
const BRAND_WORDS: &[&str] = &["コカコーラ", "coca-cola", "マクドナルド", "mcdonald"];
const VAGUE_WORDS: &[&str] = &["野菜", "vegetable", "肉", "meat", "魚", "fish"];
const BARE_CATEGORY_WORDS: &[&str] = &["meat", "vegetable", "fruit", "肉", "野菜", "果物"];
const MODIFIER_WORDS: &[&str] = &[
    "raw", "cooked", "fresh", "skinless", "boneless", "生", "茹でた", "焼いた",
];

pub const DECOMPOSE_DISH: &str =
    "Split composite dishes into their main ingredients and search for each one separately";
pub const BE_MORE_SPECIFIC: &str = "Name a more specific food";
const DECOMPOSE_EXAMPLE: &str = "e.g. チキンサラダ → search chicken breast, lettuce, tomato separately";
const SPECIFIC_EXAMPLE: &str = "e.g. 'meat' → 'chicken breast', 'beef ground', 'pork chop'";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    CompositeDish,
    ProcessedFood,
    SimpleIngredient,
    ComplexIngredient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputIssue {
    JapaneseInputNeedsTranslation,
    BrandSpecificInput,
    TooVague,
    CompositeDish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAnalysis {
    pub detected_language: Language,
    pub input_type: InputType,
    pub complexity: Complexity,
    pub potential_issues: Vec<InputIssue>,
    pub word_count: usize,
    pub detected_food: Vec<String>,
    pub has_modifiers: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceResult {
    pub general_tips: GeneralTips,
    pub data_type_guidance: BTreeMap<DataType, String>,
    pub recommended_data_types: Vec<DataType>,
    pub translation_patterns: TranslationPatterns,
    pub fallback_strategies: FallbackStrategies,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_analysis: Option<InputAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_specific: Option<CategoryGuidance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_specific: Option<IntentGuidance>,
    pub comprehensive_examples: ComprehensiveExamples,
    pub usage_tips: Vec<String>,
    pub knowledge_version: String,
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

fn input_complexity(word_count: usize) -> Complexity {
    match word_count {
        0 | 1 => Complexity::Simple,
        2 | 3 => Complexity::Moderate,
        _ => Complexity::Complex,
    }
}

fn classify_input(lowered: &str, word_count: usize) -> InputType {
    if contains_any(lowered, COMPOSITE_DISH_WORDS) {
        InputType::CompositeDish
    } else if contains_any(lowered, PROCESSED_FOOD_WORDS) {
        InputType::ProcessedFood
    } else if word_count <= 1 {
        InputType::SimpleIngredient
    } else {
        InputType::ComplexIngredient
    }
}

fn input_issues(input: &str, lowered: &str) -> Vec<InputIssue> {
    let mut issues = Vec::new();
    if contains_cjk(input) {
        issues.push(InputIssue::JapaneseInputNeedsTranslation);
    }
    if contains_any(lowered, BRAND_WORDS) {
        issues.push(InputIssue::BrandSpecificInput);
    }
    if contains_any(lowered, VAGUE_WORDS) {
        issues.push(InputIssue::TooVague);
    }
    if contains_any(lowered, COMPOSITE_DISH_WORDS) {
        issues.push(InputIssue::CompositeDish);
    }
    issues
}

/// Builds search guidance from a fixed set of knowledge tables.
#[derive(Debug, Clone)]
pub struct GuidanceGenerator {
    knowledge: Arc<GuidanceKnowledge>,
}

impl Default for GuidanceGenerator {
    fn default() -> Self {
        Self::new(BUILTIN_KNOWLEDGE.clone())
    }
}

impl GuidanceGenerator {
    pub fn new(knowledge: Arc<GuidanceKnowledge>) -> Self {
        Self { knowledge }
    }

    pub fn knowledge(&self) -> &GuidanceKnowledge {
        &self.knowledge
    }

    pub fn guide(
        &self,
        category: Option<&str>,
        intent: Option<&SearchIntent>,
        user_input: Option<&str>,
    ) -> GuidanceResult {
        let knowledge = &*self.knowledge;
        let user_input = user_input.filter(|input| !input.trim().is_empty());

        tracing::debug!(
            category = category.unwrap_or("-"),
            intent = intent.map(|i| i.as_str()).unwrap_or("-"),
            has_input = user_input.is_some(),
            "building search guidance"
        );

        GuidanceResult {
            general_tips: knowledge.general_tips.clone(),
            data_type_guidance: knowledge.data_type_guidance.clone(),
            recommended_data_types: knowledge.recommended_data_types.clone(),
            translation_patterns: knowledge.translations.clone(),
            fallback_strategies: knowledge.fallback_strategies.clone(),
            input_analysis: user_input.map(|input| self.analyze_input(input)),
            specific_suggestions: user_input.map(|input| self.specific_suggestions(input)),
            category_specific: category.map(|name| self.category_guidance(name)),
            intent_specific: intent.map(|intent| self.intent_guidance(intent)),
            comprehensive_examples: knowledge.examples.clone(),
            usage_tips: knowledge.usage_tips.clone(),
            knowledge_version: knowledge.version.clone(),
        }
    }

    pub fn analyze_input(&self, input: &str) -> InputAnalysis {
        let lowered = input.to_lowercase();
        let word_count = input.split_whitespace().count();
        InputAnalysis {
            detected_language: detect_language(input),
            input_type: classify_input(&lowered, word_count),
            complexity: input_complexity(word_count),
            potential_issues: input_issues(input, &lowered),
            word_count,
            detected_food: self.detect_foods(input, &lowered),
            has_modifiers: contains_any(&lowered, MODIFIER_WORDS),
        }
    }

    /// Known foods named in the input, reported by their English name.
    fn detect_foods(&self, input: &str, lowered: &str) -> Vec<String> {
        let english_words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        self.knowledge
            .translations
            .basic_foods
            .iter()
            .filter(|(jp, en)| {
                input.contains(jp.as_str())
                    || if en.contains(' ') {
                        lowered.contains(en.as_str())
                    } else {
                        english_words.contains(&en.as_str())
                    }
            })
            .map(|(_, en)| en.clone())
            .collect()
    }

    pub fn specific_suggestions(&self, input: &str) -> Vec<String> {
        let lowered = input.trim().to_lowercase();
        let mut suggestions = Vec::new();

        if contains_cjk(input) {
            for (jp, en) in &self.knowledge.translations.basic_foods {
                if input.contains(jp.as_str()) {
                    suggestions.push(format!("Search for '{}' as '{}'", jp, en));
                }
            }
        }

        if contains_any(&lowered, COMPOSITE_DISH_WORDS) {
            suggestions.push(DECOMPOSE_DISH.to_string());
            let known_dish = self
                .knowledge
                .dish_components
                .iter()
                .find(|(dish, _)| lowered.contains(dish.as_str()));
            match known_dish {
                Some((dish, parts)) => suggestions.push(format!(
                    "e.g. {} → search {} separately",
                    dish,
                    parts.join(", ")
                )),
                None => suggestions.push(DECOMPOSE_EXAMPLE.to_string()),
            }
        } else if let Some((dish, parts)) = self
            .knowledge
            .dish_components
            .iter()
            .find(|(dish, _)| lowered.contains(dish.as_str()))
        {
            suggestions.push(format!("Break '{}' down into: {}", dish, parts.join(", ")));
        }

        if BARE_CATEGORY_WORDS.contains(&lowered.as_str()) {
            suggestions.push(BE_MORE_SPECIFIC.to_string());
            suggestions.push(SPECIFIC_EXAMPLE.to_string());
        }

        suggestions
    }

    /// Unknown categories get generic advice with `known` unset.
    pub fn category_guidance(&self, name: &str) -> CategoryGuidance {
        match self.knowledge.category(name) {
            Some(guidance) => guidance.clone(),
            None => CategoryGuidance {
                category: name.trim().to_lowercase(),
                known: false,
                tips: vec![
                    "Use a common food name".to_string(),
                    "Searching in English is recommended".to_string(),
                ],
                fallback_strategy: Some(
                    "Search with the basic food name, then add modifiers as needed".to_string(),
                ),
                ..Default::default()
            },
        }
    }

    pub fn intent_guidance(&self, intent: &SearchIntent) -> IntentGuidance {
        match self.knowledge.intent(intent.as_str()) {
            Some(guidance) => guidance.clone(),
            None => IntentGuidance {
                intent: intent.as_str().to_string(),
                known: false,
                tips: vec!["Make the purpose of the search explicit".to_string()],
                ..Default::default()
            },
        }
    }
}
