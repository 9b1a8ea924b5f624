use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;

use crate::food::analysis::{EvaluationResponse, Grade};
use crate::food::guidance::GuidanceResult;
use crate::food::api::FoodApiError;
use crate::food::types::SearchBatch;

/// Hooks called by the advisor after each operation. All methods default to
/// doing nothing.
pub trait EvaluationObserver: Send + Sync {
    fn on_evaluation(&self, _query: &str, _response: &EvaluationResponse) {}

    fn on_guidance(&self, _category: Option<&str>, _user_input: Option<&str>, _result: &GuidanceResult) {}

    fn on_search(&self, _query: &str, _result: &Result<SearchBatch, FoodApiError>) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EvaluationObserver for NoopObserver {}

/// Emits one tracing event per operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EvaluationObserver for TracingObserver {
    fn on_evaluation(&self, query: &str, response: &EvaluationResponse) {
        match response {
            EvaluationResponse::Success(result) => tracing::info!(
                query,
                score = result.overall_assessment.score,
                grade = %result.overall_assessment.grade,
                "search evaluated"
            ),
            EvaluationResponse::Error { error, .. } => {
                tracing::warn!(query, error = %error, "evaluation skipped upstream error")
            }
        }
    }

    fn on_guidance(&self, category: Option<&str>, user_input: Option<&str>, result: &GuidanceResult) {
        tracing::info!(
            category = category.unwrap_or("-"),
            has_input = user_input.is_some(),
            suggestions = result.specific_suggestions.as_ref().map_or(0, Vec::len),
            "guidance generated"
        );
    }

    fn on_search(&self, query: &str, result: &Result<SearchBatch, FoodApiError>) {
        match result {
            Ok(batch) => {
                tracing::info!(query, results = batch.foods.len(), total = batch.total_hits, "search completed")
            }
            Err(error) => tracing::warn!(query, error = %error, "search failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvisorEvent {
    Evaluation {
        query: String,
        grade: Option<Grade>,
        score: Option<f64>,
    },
    Guidance {
        category: Option<String>,
        has_input: bool,
    },
    Search {
        query: String,
        result_count: Option<usize>,
        error: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedEvent {
    pub at: DateTime<Utc>,
    pub event: AdvisorEvent,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub evaluations: usize,
    pub guidance: usize,
    pub searches: usize,
    pub failures: usize,
}

#[derive(Debug, Default)]
struct Recording {
    counts: EventCounts,
    log: VecDeque<RecordedEvent>,
}

/// Counts events and keeps the most recent ones.
#[derive(Debug)]
pub struct RecordingObserver {
    capacity: usize,
    inner: Mutex<Recording>,
}

impl Default for RecordingObserver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RecordingObserver {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Recording::default()),
        }
    }

    pub fn counts(&self) -> EventCounts {
        self.inner.lock().counts
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.inner.lock().log.iter().cloned().collect()
    }

    fn record(&self, event: AdvisorEvent) {
        let mut inner = self.inner.lock();
        match &event {
            AdvisorEvent::Evaluation { grade, .. } => {
                inner.counts.evaluations += 1;
                if grade.is_none() {
                    inner.counts.failures += 1;
                }
            }
            AdvisorEvent::Guidance { .. } => inner.counts.guidance += 1,
            AdvisorEvent::Search { error, .. } => {
                inner.counts.searches += 1;
                if error.is_some() {
                    inner.counts.failures += 1;
                }
            }
        }
        if inner.log.len() == self.capacity {
            inner.log.pop_front();
        }
        inner.log.push_back(RecordedEvent {
            at: Utc::now(),
            event,
        });
    }
}

impl EvaluationObserver for RecordingObserver {
    fn on_evaluation(&self, query: &str, response: &EvaluationResponse) {
        let assessment = response.result().map(|r| &r.overall_assessment);
        self.record(AdvisorEvent::Evaluation {
            query: query.to_string(),
            grade: assessment.map(|a| a.grade),
            score: assessment.map(|a| a.score),
        });
    }

    fn on_guidance(&self, category: Option<&str>, user_input: Option<&str>, _result: &GuidanceResult) {
        self.record(AdvisorEvent::Guidance {
            category: category.map(str::to_string),
            has_input: user_input.is_some(),
        });
    }

    fn on_search(&self, query: &str, result: &Result<SearchBatch, FoodApiError>) {
        let (result_count, error) = match result {
            Ok(batch) => (Some(batch.foods.len()), None),
            Err(error) => (None, Some(error.to_string())),
        };
        self.record(AdvisorEvent::Search {
            query: query.to_string(),
            result_count,
            error,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::analysis::evaluate;
    use crate::food::types::SearchOutcome;

    #[test]
    fn test_recording_observer_counts_and_bounds_log() {
        let observer = RecordingObserver::new(2);
        observer.on_search("apple", &Ok(SearchBatch::default()));
        observer.on_search("apple", &Err(FoodApiError::NotFound("apple".to_string())));
        let response = evaluate("apple", &SearchOutcome::failed("timeout"), None, None);
        observer.on_evaluation("apple", &response);

        let counts = observer.counts();
        assert_eq!(counts.searches, 2);
        assert_eq!(counts.evaluations, 1);
        assert_eq!(counts.failures, 2);

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].event, AdvisorEvent::Search { ref error, .. } if error.is_some()));
        assert!(matches!(events[1].event, AdvisorEvent::Evaluation { grade: None, .. }));
    }

    #[test]
    fn test_noop_and_tracing_observers_accept_events() {
        let response = evaluate("apple", &SearchOutcome::Found(SearchBatch::default()), None, None);
        NoopObserver.on_evaluation("apple", &response);
        TracingObserver.on_evaluation("apple", &response);
        TracingObserver.on_search("apple", &Err(FoodApiError::MissingApiKey));
    }
}
