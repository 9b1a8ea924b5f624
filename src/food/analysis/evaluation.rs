//! The `evaluate` entry point: one call turns a query and the batch it
//! produced into a graded, explained assessment.

use serde::{Deserialize, Serialize};

use super::insights::{detailed_analysis, DetailedAnalysis};
use super::quality::{
    analyze_data_types, completeness_score, diversity_score, evaluate_result_quality,
    micronutrient_coverage, relevance_score, DataTypeReport, RelevanceWeights, ResultQuality,
};
use super::query::{analyze_query, QueryAnalysis};
use super::scoring::{assess, OverallAssessment, SubScores};
use super::suggestions::{improvement_suggestions, next_steps, recommendations};
use crate::food::types::{EvaluationFocus, SearchOutcome};

pub const UPSTREAM_ERROR_MESSAGE: &str = "The search results contain an error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub query_analysis: QueryAnalysis,
    pub result_quality: ResultQuality,
    pub data_type_distribution: DataTypeReport,
    pub relevance_score: f64,
    pub completeness_score: f64,
    pub diversity_score: f64,
    pub improvement_suggestions: Vec<String>,
    pub overall_assessment: OverallAssessment,
    pub detailed_analysis: DetailedAnalysis,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

impl EvaluationResult {
    pub fn sub_scores(&self) -> SubScores {
        SubScores {
            relevance: self.relevance_score,
            completeness: self.completeness_score,
            diversity: self.diversity_score,
            data_quality: self.result_quality.quality_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EvaluationResponse {
    Success(Box<EvaluationResult>),
    Error { message: String, error: String },
}

impl EvaluationResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, EvaluationResponse::Error { .. })
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        match self {
            EvaluationResponse::Success(result) => Some(result.as_ref()),
            EvaluationResponse::Error { .. } => None,
        }
    }
}

/// Scores `outcome` against `query`. An upstream failure short-circuits to an
/// error response; an empty batch is scored normally and comes out at zero.
pub fn evaluate(
    query: &str,
    outcome: &SearchOutcome,
    target_food: Option<&str>,
    focus: Option<EvaluationFocus>,
) -> EvaluationResponse {
    evaluate_with_weights(query, outcome, target_food, focus, &RelevanceWeights::default())
}

pub fn evaluate_with_weights(
    query: &str,
    outcome: &SearchOutcome,
    target_food: Option<&str>,
    focus: Option<EvaluationFocus>,
    relevance_weights: &RelevanceWeights,
) -> EvaluationResponse {
    let batch = match outcome {
        SearchOutcome::Failed { error } => {
            tracing::debug!(query, error = %error, "skipping evaluation of failed search");
            return EvaluationResponse::Error {
                message: UPSTREAM_ERROR_MESSAGE.to_string(),
                error: error.clone(),
            };
        }
        SearchOutcome::Found(batch) => batch,
    };
    let foods = batch.foods.as_slice();
    let focus = focus.unwrap_or_default();

    let query_analysis = analyze_query(query);
    let result_quality = evaluate_result_quality(foods, query, target_food);
    let scores = SubScores {
        relevance: relevance_score(foods, query, target_food, relevance_weights),
        completeness: completeness_score(foods),
        diversity: diversity_score(foods),
        data_quality: result_quality.quality_score,
    };

    let overall_assessment = assess(&scores, focus, foods.len(), batch.total_hits);
    let overall = overall_assessment.score;

    let improvement_suggestions =
        improvement_suggestions(&query_analysis, &result_quality, scores.diversity);
    let recommendations = recommendations(
        overall,
        scores.diversity,
        scores.completeness,
        &improvement_suggestions,
    );
    let next_steps = next_steps(overall, query_analysis.language);
    let detailed_analysis = detailed_analysis(
        &query_analysis,
        &result_quality,
        &scores,
        overall,
        micronutrient_coverage(foods),
    );

    tracing::debug!(
        query,
        results = foods.len(),
        score = overall,
        grade = %overall_assessment.grade,
        "evaluated search results"
    );

    EvaluationResponse::Success(Box::new(EvaluationResult {
        query_analysis,
        result_quality,
        data_type_distribution: analyze_data_types(foods),
        relevance_score: scores.relevance,
        completeness_score: scores.completeness,
        diversity_score: scores.diversity,
        improvement_suggestions,
        overall_assessment,
        detailed_analysis,
        recommendations,
        next_steps,
    }))
}
