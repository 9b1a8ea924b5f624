//! Scoring a batch of candidate records against the query that produced it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::similarity::{mean, sequence_ratio, token_overlap, tokens};
use crate::food::types::{DataType, FoodRecord};

pub const RELEVANCE_SAMPLE: usize = 10;
pub const DESCRIPTION_SAMPLE: usize = 5;
pub const COMPLETENESS_SAMPLE: usize = 5;
pub const DIVERSITY_SAMPLE: usize = 10;
pub const TOP_RESULTS: usize = 3;

/// Distinct data types a batch is expected to span at most.
const EXPECTED_DATA_TYPES: f64 = 4.0;

pub const ESSENTIAL_NUTRIENTS: [&str; 10] = [
    "Energy",
    "Protein",
    "Total lipid (fat)",
    "Carbohydrate, by difference",
    "Fiber, total dietary",
    "Sugars, total including NLEA",
    "Calcium, Ca",
    "Iron, Fe",
    "Sodium, Na",
    "Vitamin C, total ascorbic acid",
];

pub const EXTENDED_NUTRIENT_PANEL: [&str; 24] = [
    "Energy",
    "Protein",
    "Total lipid (fat)",
    "Carbohydrate, by difference",
    "Fiber, total dietary",
    "Sugars, total including NLEA",
    "Calcium, Ca",
    "Iron, Fe",
    "Magnesium, Mg",
    "Phosphorus, P",
    "Potassium, K",
    "Sodium, Na",
    "Zinc, Zn",
    "Vitamin C, total ascorbic acid",
    "Thiamin",
    "Riboflavin",
    "Niacin",
    "Vitamin B-6",
    "Folate, total",
    "Vitamin B-12",
    "Vitamin A, RAE",
    "Vitamin E (alpha-tocopherol)",
    "Vitamin D (D2 + D3)",
    "Vitamin K (phylloquinone)",
];

pub const NO_RESULTS_ISSUE: &str = "No search results were found";

/// Multipliers applied to each relevance signal before taking the maximum.
/// An exact substring match always scores 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelevanceWeights {
    pub similarity: f64,
    pub keyword: f64,
    pub target: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            similarity: 0.7,
            keyword: 0.8,
            target: 0.9,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierQuality {
    pub distribution: BTreeMap<DataType, usize>,
    pub score: f64,
    pub has_foundation: bool,
    pub has_sr_legacy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionMatch {
    pub rank: usize,
    pub description: String,
    pub relevance_score: f64,
    pub query_similarity: f64,
    pub keyword_match: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionAnalysis {
    pub relevance_score: f64,
    pub analysis: Vec<DescriptionMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientCoverage {
    pub description: String,
    pub total_nutrients: usize,
    pub essential_found: usize,
    pub completeness_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionCompleteness {
    pub score: f64,
    pub analysis: Vec<NutrientCoverage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceIndicator {
    ExactMatch,
    PartialMatch,
    HighQualityData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopResult {
    pub rank: usize,
    pub description: String,
    pub data_type: DataType,
    pub nutrient_count: usize,
    pub relevance_indicators: Vec<RelevanceIndicator>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultQuality {
    pub result_count: usize,
    pub quality_score: f64,
    pub data_type_quality: TierQuality,
    pub description_analysis: DescriptionAnalysis,
    pub nutrition_completeness: NutritionCompleteness,
    pub top_results_analysis: Vec<TopResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTypeReport {
    pub distribution: BTreeMap<DataType, usize>,
    pub foundation_percentage: f64,
    pub sr_legacy_percentage: f64,
    pub branded_percentage: f64,
    pub quality_score: f64,
    pub recommendations: Vec<String>,
}

pub fn data_type_distribution(foods: &[FoodRecord]) -> BTreeMap<DataType, usize> {
    let mut distribution = BTreeMap::new();
    for food in foods {
        *distribution.entry(food.data_type).or_insert(0) += 1;
    }
    distribution
}

fn tier_score(distribution: &BTreeMap<DataType, usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    distribution
        .iter()
        .map(|(data_type, count)| *count as f64 / total as f64 * data_type.quality_weight())
        .sum()
}

pub fn tier_quality(foods: &[FoodRecord]) -> TierQuality {
    let distribution = data_type_distribution(foods);
    TierQuality {
        score: tier_score(&distribution, foods.len()),
        has_foundation: distribution.contains_key(&DataType::Foundation),
        has_sr_legacy: distribution.contains_key(&DataType::SrLegacy),
        distribution,
    }
}

pub fn analyze_data_types(foods: &[FoodRecord]) -> DataTypeReport {
    let distribution = data_type_distribution(foods);
    let total = foods.len();
    let percentage = |data_type: DataType| {
        if total == 0 {
            0.0
        } else {
            *distribution.get(&data_type).unwrap_or(&0) as f64 / total as f64 * 100.0
        }
    };

    let foundation_percentage = percentage(DataType::Foundation);
    let sr_legacy_percentage = percentage(DataType::SrLegacy);
    let branded_percentage = percentage(DataType::Branded);
    let quality_score = tier_score(&distribution, total);

    let mut recommendations = Vec::new();
    if foundation_percentage < 20.0 {
        recommendations.push(
            "Use more specific search terms to raise the share of Foundation data".to_string(),
        );
    }
    if branded_percentage > 50.0 {
        recommendations.push(
            "Too many branded products; try searching with a generic food name".to_string(),
        );
    }
    if quality_score < 0.6 {
        recommendations.push("Result data quality is low; review the search terms".to_string());
    }

    DataTypeReport {
        distribution,
        foundation_percentage,
        sr_legacy_percentage,
        branded_percentage,
        quality_score,
        recommendations,
    }
}

/// Similarity and keyword match of each of the first few descriptions, unweighted.
pub fn analyze_descriptions(
    foods: &[FoodRecord],
    query: &str,
    target_food: Option<&str>,
) -> DescriptionAnalysis {
    let query_lower = query.to_lowercase();
    let target_lower = target_food.map(str::to_lowercase).unwrap_or_default();
    let query_tokens = tokens(&query_lower);
    let target_tokens = tokens(&target_lower);

    let analysis: Vec<DescriptionMatch> = foods
        .iter()
        .take(DESCRIPTION_SAMPLE)
        .enumerate()
        .map(|(i, food)| {
            let description = food.description.to_lowercase();
            let desc_tokens = tokens(&description);
            let query_similarity = sequence_ratio(&query_lower, &description);
            let keyword_match = token_overlap(&query_tokens, &desc_tokens);
            let target_match = token_overlap(&target_tokens, &desc_tokens);
            DescriptionMatch {
                rank: i + 1,
                description: food.description.clone(),
                relevance_score: query_similarity.max(keyword_match).max(target_match),
                query_similarity,
                keyword_match,
            }
        })
        .collect();

    let scores: Vec<f64> = analysis.iter().map(|m| m.relevance_score).collect();
    DescriptionAnalysis {
        relevance_score: mean(&scores),
        analysis,
    }
}

fn essential_found(food: &FoodRecord, panel: &[&str]) -> usize {
    panel
        .iter()
        .filter(|essential| {
            food.food_nutrients
                .iter()
                .any(|n| n.name.contains(**essential))
        })
        .count()
}

pub fn analyze_nutrition_completeness(foods: &[FoodRecord]) -> NutritionCompleteness {
    let analysis: Vec<NutrientCoverage> = foods
        .iter()
        .take(COMPLETENESS_SAMPLE)
        .map(|food| {
            let found = essential_found(food, &ESSENTIAL_NUTRIENTS);
            NutrientCoverage {
                description: food.description.clone(),
                total_nutrients: food.food_nutrients.len(),
                essential_found: found,
                completeness_score: found as f64 / ESSENTIAL_NUTRIENTS.len() as f64,
            }
        })
        .collect();

    let scores: Vec<f64> = analysis.iter().map(|c| c.completeness_score).collect();
    NutritionCompleteness {
        score: mean(&scores),
        analysis,
    }
}

pub fn relevance_indicators(food: &FoodRecord, query: &str) -> Vec<RelevanceIndicator> {
    let description = food.description.to_lowercase();
    let query_lower = query.to_lowercase();
    let mut indicators = Vec::new();

    if !query_lower.trim().is_empty() && description.contains(query_lower.trim()) {
        indicators.push(RelevanceIndicator::ExactMatch);
    }
    if query_lower
        .split_whitespace()
        .any(|word| description.contains(word))
    {
        indicators.push(RelevanceIndicator::PartialMatch);
    }
    if food.data_type.is_high_quality() {
        indicators.push(RelevanceIndicator::HighQualityData);
    }
    indicators
}

pub fn analyze_top_results(foods: &[FoodRecord], query: &str) -> Vec<TopResult> {
    foods
        .iter()
        .take(TOP_RESULTS)
        .enumerate()
        .map(|(i, food)| TopResult {
            rank: i + 1,
            description: food.description.clone(),
            data_type: food.data_type,
            nutrient_count: food.food_nutrients.len(),
            relevance_indicators: relevance_indicators(food, query),
        })
        .collect()
}

/// Composite data-quality score: tier quality, description relevance and
/// nutrient completeness weighted 0.3 / 0.4 / 0.3.
pub fn evaluate_result_quality(
    foods: &[FoodRecord],
    query: &str,
    target_food: Option<&str>,
) -> ResultQuality {
    if foods.is_empty() {
        return ResultQuality {
            issues: vec![NO_RESULTS_ISSUE.to_string()],
            ..Default::default()
        };
    }

    let data_type_quality = tier_quality(foods);
    let description_analysis = analyze_descriptions(foods, query, target_food);
    let nutrition_completeness = analyze_nutrition_completeness(foods);

    let quality_score = (data_type_quality.score * 0.3
        + description_analysis.relevance_score * 0.4
        + nutrition_completeness.score * 0.3)
        .clamp(0.0, 1.0);

    ResultQuality {
        result_count: foods.len(),
        quality_score,
        data_type_quality,
        description_analysis,
        nutrition_completeness,
        top_results_analysis: analyze_top_results(foods, query),
        issues: Vec::new(),
    }
}

/// Mean per-record relevance over the first ten records. Each record scores
/// the strongest of: exact substring match, weighted edit-distance
/// similarity, weighted query keyword overlap, weighted target overlap.
pub fn relevance_score(
    foods: &[FoodRecord],
    query: &str,
    target_food: Option<&str>,
    weights: &RelevanceWeights,
) -> f64 {
    let query_lower = query.to_lowercase();
    let target_lower = target_food.map(str::to_lowercase).unwrap_or_default();
    let query_tokens = tokens(&query_lower);
    let target_tokens = tokens(&target_lower);
    let needle = query_lower.trim();

    let scores: Vec<f64> = foods
        .iter()
        .take(RELEVANCE_SAMPLE)
        .map(|food| {
            let description = food.description.to_lowercase();
            let desc_tokens = tokens(&description);

            let exact: f64 = if !needle.is_empty() && description.contains(needle) {
                1.0
            } else {
                0.0
            };
            let similarity = sequence_ratio(&query_lower, &description);
            let keyword = token_overlap(&query_tokens, &desc_tokens);
            let target = token_overlap(&target_tokens, &desc_tokens);

            exact
                .max(similarity * weights.similarity)
                .max(keyword * weights.keyword)
                .max(target * weights.target)
                .clamp(0.0, 1.0)
        })
        .collect();

    mean(&scores)
}

pub fn completeness_score(foods: &[FoodRecord]) -> f64 {
    analyze_nutrition_completeness(foods).score
}

/// Share of the extended vitamin and mineral panel present, averaged over the top records.
pub fn micronutrient_coverage(foods: &[FoodRecord]) -> f64 {
    let scores: Vec<f64> = foods
        .iter()
        .take(COMPLETENESS_SAMPLE)
        .map(|food| {
            essential_found(food, &EXTENDED_NUTRIENT_PANEL) as f64
                / EXTENDED_NUTRIENT_PANEL.len() as f64
        })
        .collect();
    mean(&scores)
}

/// One minus the mean pairwise similarity of the descriptions.
pub fn description_diversity(descriptions: &[String]) -> f64 {
    if descriptions.len() < 2 {
        return 1.0;
    }
    let lowered: Vec<String> = descriptions.iter().map(|d| d.to_lowercase()).collect();
    let mut similarities = Vec::new();
    for i in 0..lowered.len() {
        for j in (i + 1)..lowered.len() {
            similarities.push(sequence_ratio(&lowered[i], &lowered[j]));
        }
    }
    (1.0 - mean(&similarities)).clamp(0.0, 1.0)
}

/// Average of data-type variety and textual distinctness. A lone record has
/// nothing to be compared with and scores 1.0.
pub fn diversity_score(foods: &[FoodRecord]) -> f64 {
    match foods.len() {
        0 => 0.0,
        1 => 1.0,
        _ => {
            let distinct: HashSet<DataType> = foods.iter().map(|f| f.data_type).collect();
            let type_diversity = (distinct.len() as f64 / EXPECTED_DATA_TYPES).min(1.0);
            let descriptions: Vec<String> = foods
                .iter()
                .take(DIVERSITY_SAMPLE)
                .map(|f| f.description.clone())
                .collect();
            (type_diversity + description_diversity(&descriptions)) / 2.0
        }
    }
}
