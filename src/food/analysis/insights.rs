use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::query::QueryAnalysis;
use super::quality::{ResultQuality, TopResult};
use super::scoring::SubScores;
use crate::food::types::{Complexity, DataType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryInsights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub optimization_potential: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultInsights {
    pub data_quality_assessment: String,
    pub top_result_analysis: Vec<TopResult>,
    pub data_source_distribution: BTreeMap<DataType, usize>,
    pub nutrition_coverage: f64,
    pub micronutrient_coverage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub relevance_score: f64,
    pub completeness_score: f64,
    pub diversity_score: f64,
    pub overall_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub above_average: bool,
    pub meets_good_practice: bool,
    pub improvement_needed: bool,
}

impl BaselineComparison {
    pub fn for_score(score: f64) -> Self {
        Self {
            above_average: score > 0.6,
            meets_good_practice: score > 0.7,
            improvement_needed: score < 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub query_insights: QueryInsights,
    pub result_insights: ResultInsights,
    pub performance_metrics: PerformanceMetrics,
    pub comparison_baseline: BaselineComparison,
}

pub fn query_insights(analysis: &QueryAnalysis) -> QueryInsights {
    let mut insights = QueryInsights::default();

    if analysis.specificity_score > 0.7 {
        insights.strengths.push("High specificity".to_string());
    }
    if !analysis.detected_categories.is_empty() {
        let names: Vec<&str> = analysis.detected_categories.iter().map(|c| c.as_str()).collect();
        insights
            .strengths
            .push(format!("Clear food category: {}", names.join(", ")));
    }

    if analysis.complexity_level == Complexity::Simple && analysis.specificity_score < 0.5 {
        insights.weaknesses.push("Query is too simple".to_string());
    }
    insights.weaknesses.extend(
        analysis
            .potential_issues
            .iter()
            .map(|issue| issue.description().to_string()),
    );

    if analysis.modifiers.cooking_method.is_empty() {
        insights
            .optimization_potential
            .push("Add a cooking method".to_string());
    }
    if analysis.modifiers.part.is_empty() {
        insights
            .optimization_potential
            .push("Specify the cut or part".to_string());
    }
    insights
}

pub fn detailed_analysis(
    analysis: &QueryAnalysis,
    quality: &ResultQuality,
    scores: &SubScores,
    overall: f64,
    micronutrient_coverage: f64,
) -> DetailedAnalysis {
    let data_quality_assessment = if quality.quality_score > 0.7 {
        "high quality"
    } else {
        "room for improvement"
    };

    DetailedAnalysis {
        query_insights: query_insights(analysis),
        result_insights: ResultInsights {
            data_quality_assessment: data_quality_assessment.to_string(),
            top_result_analysis: quality.top_results_analysis.clone(),
            data_source_distribution: quality.data_type_quality.distribution.clone(),
            nutrition_coverage: quality.nutrition_completeness.score,
            micronutrient_coverage,
        },
        performance_metrics: PerformanceMetrics {
            relevance_score: scores.relevance,
            completeness_score: scores.completeness,
            diversity_score: scores.diversity,
            overall_score: overall,
        },
        comparison_baseline: BaselineComparison::for_score(overall),
    }
}
