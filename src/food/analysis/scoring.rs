use serde::{Deserialize, Serialize};
use std::fmt;

use crate::food::types::EvaluationFocus;

/// Weights for relevance, completeness, diversity and data quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationWeights {
    pub relevance: f64,
    pub completeness: f64,
    pub diversity: f64,
    pub data_quality: f64,
}

impl EvaluationWeights {
    pub fn for_focus(focus: EvaluationFocus) -> Self {
        let (relevance, completeness, diversity, data_quality) = match focus {
            EvaluationFocus::Accuracy => (0.5, 0.2, 0.1, 0.2),
            EvaluationFocus::Completeness => (0.2, 0.5, 0.1, 0.2),
            EvaluationFocus::Relevance => (0.6, 0.1, 0.1, 0.2),
            EvaluationFocus::Balanced => (0.3, 0.3, 0.2, 0.2),
        };
        Self {
            relevance,
            completeness,
            diversity,
            data_quality,
        }
    }
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self::for_focus(EvaluationFocus::Balanced)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub relevance: f64,
    pub completeness: f64,
    pub diversity: f64,
    pub data_quality: f64,
}

pub fn overall_score(scores: &SubScores, weights: &EvaluationWeights) -> f64 {
    let weighted = scores.relevance * weights.relevance
        + scores.completeness * weights.completeness
        + scores.diversity * weights.diversity
        + scores.data_quality * weights.data_quality;
    weighted.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.9 => Grade::APlus,
            s if s >= 0.8 => Grade::A,
            s if s >= 0.7 => Grade::BPlus,
            s if s >= 0.6 => Grade::B,
            s if s >= 0.5 => Grade::CPlus,
            s if s >= 0.4 => Grade::C,
            _ => Grade::D,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn quality_label(score: f64) -> &'static str {
    if score >= 0.8 {
        "excellent"
    } else if score >= 0.6 {
        "good"
    } else if score >= 0.4 {
        "fair"
    } else {
        "needs improvement"
    }
}

pub fn assessment_summary(score: f64, result_count: usize, total_hits: u64) -> String {
    format!(
        "Search quality: {} (grade: {}, score: {:.2}), results: {}/{}",
        quality_label(score),
        Grade::from_score(score),
        score,
        result_count,
        total_hits
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallAssessment {
    pub score: f64,
    pub grade: Grade,
    pub summary: String,
    pub focus: EvaluationFocus,
    pub weights: EvaluationWeights,
}

pub fn assess(
    scores: &SubScores,
    focus: EvaluationFocus,
    result_count: usize,
    total_hits: u64,
) -> OverallAssessment {
    let weights = EvaluationWeights::for_focus(focus);
    let score = overall_score(scores, &weights);
    OverallAssessment {
        score,
        grade: Grade::from_score(score),
        summary: assessment_summary(score, result_count, total_hits),
        focus,
        weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_presets_sum_to_one() {
        for focus in [
            EvaluationFocus::Accuracy,
            EvaluationFocus::Completeness,
            EvaluationFocus::Relevance,
            EvaluationFocus::Balanced,
        ] {
            let w = EvaluationWeights::for_focus(focus);
            let total = w.relevance + w.completeness + w.diversity + w.data_quality;
            assert!((total - 1.0).abs() < 1e-9, "{:?} sums to {}", focus, total);
        }
        assert_eq!(EvaluationWeights::default().relevance, 0.3);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(Grade::from_score(1.0), Grade::APlus);
        assert_eq!(Grade::from_score(0.9), Grade::APlus);
        assert_eq!(Grade::from_score(0.85), Grade::A);
        assert_eq!(Grade::from_score(0.7), Grade::BPlus);
        assert_eq!(Grade::from_score(0.65), Grade::B);
        assert_eq!(Grade::from_score(0.5), Grade::CPlus);
        assert_eq!(Grade::from_score(0.4), Grade::C);
        assert_eq!(Grade::from_score(0.39), Grade::D);
        assert_eq!(Grade::from_score(0.0), Grade::D);
    }

    #[test]
    fn test_grade_is_monotonic() {
        let mut previous = Grade::D;
        for step in 0..=100 {
            let grade = Grade::from_score(step as f64 / 100.0);
            assert!(grade >= previous);
            previous = grade;
        }
    }

    #[test]
    fn test_overall_score_is_clamped() {
        let scores = SubScores {
            relevance: 1.0,
            completeness: 1.0,
            diversity: 1.0,
            data_quality: 1.0,
        };
        let heavy = EvaluationWeights {
            relevance: 1.0,
            completeness: 1.0,
            diversity: 0.0,
            data_quality: 0.0,
        };
        assert_eq!(overall_score(&scores, &heavy), 1.0);
        assert_eq!(overall_score(&SubScores::default(), &heavy), 0.0);
    }

    #[test]
    fn test_focus_changes_overall() {
        let scores = SubScores {
            relevance: 1.0,
            completeness: 0.0,
            diversity: 0.0,
            data_quality: 0.0,
        };
        let relevance = assess(&scores, EvaluationFocus::Relevance, 1, 1);
        let completeness = assess(&scores, EvaluationFocus::Completeness, 1, 1);
        assert!(relevance.score > completeness.score);
    }

    #[test]
    fn test_summary_mentions_grade_and_counts() {
        let summary = assessment_summary(0.82, 2, 25);
        assert_eq!(summary, "Search quality: excellent (grade: A, score: 0.82), results: 2/25");
    }
}
