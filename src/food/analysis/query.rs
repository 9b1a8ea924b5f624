//! Free-text query analysis: language, food categories, modifiers,
//! specificity and the issues a search is likely to run into.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::food::types::{Complexity, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Meat,
    Seafood,
    Fruit,
    Vegetable,
    Dairy,
    Grain,
}

impl FoodCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FoodCategory::Meat => "meat",
            FoodCategory::Seafood => "seafood",
            FoodCategory::Fruit => "fruit",
            FoodCategory::Vegetable => "vegetable",
            FoodCategory::Dairy => "dairy",
            FoodCategory::Grain => "grain",
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const CATEGORY_KEYWORDS: &[(FoodCategory, &[&str])] = &[
    (
        FoodCategory::Meat,
        &[
            "chicken", "beef", "pork", "lamb", "turkey", "duck", "veal",
            "鶏肉", "牛肉", "豚肉", "羊肉", "七面鳥", "鴨肉",
        ],
    ),
    (
        FoodCategory::Seafood,
        &[
            "fish", "salmon", "tuna", "cod", "shrimp", "crab", "lobster",
            "魚", "サーモン", "マグロ", "タラ", "エビ", "カニ", "ロブスター",
        ],
    ),
    (
        FoodCategory::Fruit,
        &[
            "apple", "banana", "orange", "grape", "strawberry", "peach",
            "りんご", "バナナ", "オレンジ", "ぶどう", "いちご", "桃",
        ],
    ),
    (
        FoodCategory::Vegetable,
        &[
            "carrot", "broccoli", "spinach", "tomato", "potato", "onion",
            "にんじん", "ブロッコリー", "ほうれん草", "トマト", "じゃがいも", "玉ねぎ",
        ],
    ),
    (
        FoodCategory::Dairy,
        &[
            "milk", "cheese", "yogurt", "butter", "cream",
            "牛乳", "チーズ", "ヨーグルト", "バター", "クリーム",
        ],
    ),
    (
        FoodCategory::Grain,
        &[
            "rice", "bread", "pasta", "wheat", "oats", "quinoa",
            "米", "パン", "パスタ", "小麦", "オーツ", "キヌア",
        ],
    ),
];

const COOKING_METHODS: &[&str] = &[
    "raw", "cooked", "baked", "grilled", "fried", "boiled", "steamed", "roasted",
];
const PREPARATIONS: &[&str] = &[
    "skinless", "boneless", "peeled", "trimmed", "whole", "ground", "chopped",
];
const PARTS: &[&str] = &["breast", "thigh", "leg", "wing", "fillet", "loin", "shoulder"];
const QUALITIES: &[&str] = &["fresh", "frozen", "organic", "lean", "fat-free", "low-fat"];
const SIZES: &[&str] = &["large", "medium", "small", "jumbo", "mini"];

/// Modifiers that earn the small specificity bonus.
const GENERIC_MODIFIERS: &[&str] = &[
    "raw", "cooked", "fresh", "skinless", "boneless", "whole", "lean", "baked", "grilled",
    "fried", "boiled", "steamed", "roasted", "organic", "frozen", "large", "medium", "small",
];

/// Category words that say nothing about which food is meant.
pub const VAGUE_TERMS: &[&str] = &["meat", "fish", "vegetable", "fruit", "肉", "魚", "野菜", "果物"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    CookingMethod,
    Preparation,
    Part,
    Quality,
    Size,
}

impl ModifierKind {
    fn vocabulary(self) -> &'static [&'static str] {
        match self {
            ModifierKind::CookingMethod => COOKING_METHODS,
            ModifierKind::Preparation => PREPARATIONS,
            ModifierKind::Part => PARTS,
            ModifierKind::Quality => QUALITIES,
            ModifierKind::Size => SIZES,
        }
    }

    const ALL: [ModifierKind; 5] = [
        ModifierKind::CookingMethod,
        ModifierKind::Preparation,
        ModifierKind::Part,
        ModifierKind::Quality,
        ModifierKind::Size,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryModifiers {
    pub cooking_method: Vec<String>,
    pub preparation: Vec<String>,
    pub part: Vec<String>,
    pub quality: Vec<String>,
    pub size: Vec<String>,
}

impl QueryModifiers {
    fn slot_mut(&mut self, kind: ModifierKind) -> &mut Vec<String> {
        match kind {
            ModifierKind::CookingMethod => &mut self.cooking_method,
            ModifierKind::Preparation => &mut self.preparation,
            ModifierKind::Part => &mut self.part,
            ModifierKind::Quality => &mut self.quality,
            ModifierKind::Size => &mut self.size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cooking_method.is_empty()
            && self.preparation.is_empty()
            && self.part.is_empty()
            && self.quality.is_empty()
            && self.size.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIssue {
    TooShort,
    NoCategory,
    MixedLanguages,
    TooVague,
}

impl QueryIssue {
    pub fn description(self) -> &'static str {
        match self {
            QueryIssue::TooShort => "The query may be too short",
            QueryIssue::NoCategory => "No clear food category was detected",
            QueryIssue::MixedLanguages => "Japanese and English are mixed in one query",
            QueryIssue::TooVague => "The query may be too vague",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub word_count: usize,
    pub detected_categories: Vec<FoodCategory>,
    pub language: Language,
    pub modifiers: QueryModifiers,
    pub specificity_score: f64,
    pub complexity_level: Complexity,
    pub potential_issues: Vec<QueryIssue>,
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}' // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{4E00}'..='\u{9FFF}') // CJK Unified Ideographs
}

pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

pub fn detect_language(text: &str) -> Language {
    if contains_cjk(text) {
        Language::Japanese
    } else {
        Language::English
    }
}

pub fn detect_categories(query: &str) -> Vec<FoodCategory> {
    let lowered = query.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .collect()
}

/// Sorts each token into the first vocabulary that knows it; unknown tokens are dropped.
pub fn extract_modifiers<'a>(words: impl IntoIterator<Item = &'a str>) -> QueryModifiers {
    let mut modifiers = QueryModifiers::default();
    for word in words {
        if let Some(kind) = ModifierKind::ALL
            .into_iter()
            .find(|kind| kind.vocabulary().contains(&word))
        {
            modifiers.slot_mut(kind).push(word.to_string());
        }
    }
    modifiers
}

pub fn specificity_score(words: &[&str], categories: &[FoodCategory]) -> f64 {
    let base = (words.len() as f64 * 0.15).min(0.6);
    let category_bonus = categories.len() as f64 * 0.1;
    let modifier_bonus = words.iter().filter(|w| GENERIC_MODIFIERS.contains(w)).count() as f64 * 0.05;
    let part_bonus = words.iter().filter(|w| PARTS.contains(w)).count() as f64 * 0.1;
    (base + category_bonus + modifier_bonus + part_bonus).clamp(0.0, 1.0)
}

pub fn complexity(word_count: usize) -> Complexity {
    match word_count {
        0..=2 => Complexity::Simple,
        3..=4 => Complexity::Moderate,
        _ => Complexity::Complex,
    }
}

fn identify_issues(query: &str, word_count: usize, categories: &[FoodCategory]) -> Vec<QueryIssue> {
    let mut issues = Vec::new();
    let lowered = query.to_lowercase();

    if word_count == 1 {
        issues.push(QueryIssue::TooShort);
    }
    if categories.is_empty() {
        issues.push(QueryIssue::NoCategory);
    }
    if contains_cjk(query) && query.chars().any(|c| c.is_ascii_alphabetic()) {
        issues.push(QueryIssue::MixedLanguages);
    }
    if word_count <= 2 && VAGUE_TERMS.iter().any(|t| lowered.contains(t)) {
        issues.push(QueryIssue::TooVague);
    }
    issues
}

pub fn analyze_query(query: &str) -> QueryAnalysis {
    let lowered = query.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let categories = detect_categories(query);

    let analysis = QueryAnalysis {
        word_count: words.len(),
        language: detect_language(query),
        modifiers: extract_modifiers(words.iter().copied()),
        specificity_score: specificity_score(&words, &categories),
        complexity_level: complexity(words.len()),
        potential_issues: identify_issues(query, words.len(), &categories),
        detected_categories: categories,
    };
    tracing::trace!(query, specificity = analysis.specificity_score, "analyzed query");
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_detection() {
        assert_eq!(detect_language("鶏肉"), Language::Japanese);
        assert_eq!(detect_language("りんご"), Language::Japanese);
        assert_eq!(detect_language("サーモン"), Language::Japanese);
        assert_eq!(detect_language("chicken breast"), Language::English);
        assert_eq!(detect_language(""), Language::English);
        assert_eq!(detect_language("chicken 胸肉"), Language::Japanese);
    }

    #[test]
    fn test_multiple_categories_detected() {
        let categories = detect_categories("Chicken and rice with broccoli");
        assert_eq!(
            categories,
            vec![FoodCategory::Meat, FoodCategory::Vegetable, FoodCategory::Grain]
        );
        assert_eq!(detect_categories("牛乳"), vec![FoodCategory::Dairy]);
        assert!(detect_categories("kombucha").is_empty());
    }

    #[test]
    fn test_modifier_extraction() {
        let modifiers = extract_modifiers("chicken breast skinless grilled fresh large".split(' '));
        assert_eq!(modifiers.cooking_method, vec!["grilled"]);
        assert_eq!(modifiers.preparation, vec!["skinless"]);
        assert_eq!(modifiers.part, vec!["breast"]);
        assert_eq!(modifiers.quality, vec!["fresh"]);
        assert_eq!(modifiers.size, vec!["large"]);
        assert!(extract_modifiers("chicken".split(' ')).is_empty());
    }

    #[test]
    fn test_specificity_rewards_qualified_queries() {
        let single = analyze_query("chicken");
        assert!((single.specificity_score - 0.25).abs() < 1e-9);

        let detailed = analyze_query("chicken breast skinless boneless raw");
        // 0.6 base + 0.1 category + 3 * 0.05 modifiers + 0.1 part
        assert!((detailed.specificity_score - 0.95).abs() < 1e-9);
        assert!(detailed.specificity_score > single.specificity_score);

        let long = analyze_query("raw grilled fried boiled steamed roasted chicken breast thigh wing");
        assert_eq!(long.specificity_score, 1.0);
    }

    #[test]
    fn test_complexity_tiers() {
        assert_eq!(analyze_query("chicken breast").complexity_level, Complexity::Simple);
        assert_eq!(analyze_query("chicken breast raw skinless").complexity_level, Complexity::Moderate);
        assert_eq!(
            analyze_query("chicken breast raw skinless boneless").complexity_level,
            Complexity::Complex
        );
    }

    #[test]
    fn test_issues_fire_independently() {
        let vague = analyze_query("meat");
        assert!(vague.potential_issues.contains(&QueryIssue::TooShort));
        assert!(vague.potential_issues.contains(&QueryIssue::NoCategory));
        assert!(vague.potential_issues.contains(&QueryIssue::TooVague));

        let mixed = analyze_query("鶏肉 breast");
        assert!(mixed.potential_issues.contains(&QueryIssue::MixedLanguages));
        assert!(!mixed.potential_issues.contains(&QueryIssue::TooShort));

        let clean = analyze_query("salmon atlantic farmed raw");
        assert!(clean.potential_issues.is_empty());
    }

    #[test]
    fn test_empty_query_only_lacks_category() {
        for query in ["", "   "] {
            assert_eq!(analyze_query(query).potential_issues, vec![QueryIssue::NoCategory]);
        }
    }

    #[test]
    fn test_degenerate_input_does_not_panic() {
        for query in ["", " ", "a", "鶏"] {
            let analysis = analyze_query(query);
            assert!((0.0..=1.0).contains(&analysis.specificity_score));
            assert!(!analysis.potential_issues.is_empty());
        }
    }
}
