use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::food::analysis::{evaluate, summarize, EvaluationResponse, NutritionSummary};
use crate::food::api::traits::DEFAULT_PAGE_SIZE;
use crate::food::api::{FoodApiError, NutritionSearch, SearchQuery};
use crate::food::guidance::{GuidanceGenerator, GuidanceResult};
use crate::food::observer::{EvaluationObserver, TracingObserver};
use crate::food::types::{DataType, EvaluationFocus, SearchBatch, SearchIntent, SearchOutcome};

pub const LOOKUP_PAGE_SIZE: u32 = 5;
pub const DATA_SOURCE: &str = "USDA FoodData Central";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionLookup {
    pub query: String,
    pub fdc_id: u64,
    pub source: String,
    pub nutrition_info: NutritionSummary,
}

/// Ties the search client, the evaluation engine and guidance together and
/// reports every operation to the observer.
#[derive(Clone)]
pub struct NutritionAdvisor {
    client: Arc<dyn NutritionSearch>,
    guidance: GuidanceGenerator,
    observer: Arc<dyn EvaluationObserver>,
    page_size: u32,
}

impl NutritionAdvisor {
    pub fn new(client: Arc<dyn NutritionSearch>) -> Self {
        Self {
            client,
            guidance: GuidanceGenerator::default(),
            observer: Arc::new(TracingObserver),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn EvaluationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_guidance(mut self, guidance: GuidanceGenerator) -> Self {
        self.guidance = guidance;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// A search request using the configured page size.
    pub fn search_query(&self, query: &str) -> SearchQuery {
        SearchQuery::new(query).with_page_size(self.page_size)
    }

    pub fn evaluate(
        &self,
        query: &str,
        outcome: &SearchOutcome,
        target_food: Option<&str>,
        focus: Option<EvaluationFocus>,
    ) -> EvaluationResponse {
        let response = evaluate(query, outcome, target_food, focus);
        self.observer.on_evaluation(query, &response);
        response
    }

    pub fn guide(
        &self,
        category: Option<&str>,
        intent: Option<&SearchIntent>,
        user_input: Option<&str>,
    ) -> GuidanceResult {
        let result = self.guidance.guide(category, intent, user_input);
        self.observer.on_guidance(category, user_input, &result);
        result
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchBatch, FoodApiError> {
        let result = self.client.search(query).await;
        self.observer.on_search(&query.query, &result);
        result
    }

    /// Searches and scores the batch in one step. A failed search is scored
    /// as an upstream error rather than returned as `Err`.
    pub async fn search_and_evaluate(
        &self,
        query: &str,
        target_food: Option<&str>,
        focus: Option<EvaluationFocus>,
    ) -> EvaluationResponse {
        let outcome = match self.search(&self.search_query(query)).await {
            Ok(batch) => SearchOutcome::Found(batch),
            Err(e) => SearchOutcome::failed(e.to_string()),
        };
        self.evaluate(query, &outcome, target_food, focus)
    }

    /// Resolves a food (by `fdc_id` or by the best search hit) and
    /// summarizes its key nutrients.
    pub async fn lookup(
        &self,
        query: &str,
        fdc_id: Option<u64>,
        data_types: &[DataType],
    ) -> Result<NutritionLookup, FoodApiError> {
        let fdc_id = match fdc_id {
            Some(id) => id,
            None => {
                let request = SearchQuery::new(query)
                    .with_page_size(LOOKUP_PAGE_SIZE)
                    .with_data_types(data_types.iter().copied());
                let batch = self.search(&request).await?;
                let top = batch
                    .foods
                    .first()
                    .ok_or_else(|| FoodApiError::NotFound(query.to_string()))?;
                tracing::debug!(fdc_id = top.fdc_id, description = %top.description, "lookup picked top hit");
                top.fdc_id
            }
        };

        let record = self.client.get_details(fdc_id).await?;
        Ok(NutritionLookup {
            query: query.to_string(),
            fdc_id,
            source: DATA_SOURCE.to_string(),
            nutrition_info: summarize(&record),
        })
    }
}
