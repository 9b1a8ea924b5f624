use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::food::types::{DataType, FoodRecord, SearchBatch};

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Error)]
pub enum FoodApiError {
    #[error("USDA_API_KEY is not set")]
    MissingApiKey,
    #[error("request to FoodData Central failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("FoodData Central returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode FoodData Central response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no foods found for '{0}'")]
    NotFound(String),
}

/// Body of a FoodData Central search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: String,
    #[serde(rename = "dataType", skip_serializing_if = "Vec::is_empty")]
    pub data_types: Vec<DataType>,
    pub page_size: u32,
    pub page_number: u32,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            data_types: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_page_number(mut self, page_number: u32) -> Self {
        self.page_number = page_number.max(1);
        self
    }

    /// `Unknown` is not a filter FoodData Central understands and is dropped.
    pub fn with_data_types(mut self, data_types: impl IntoIterator<Item = DataType>) -> Self {
        self.data_types = data_types
            .into_iter()
            .filter(|t| *t != DataType::Unknown)
            .collect();
        self
    }
}

/// The nutrition database the advisor searches.
#[async_trait]
pub trait NutritionSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchBatch, FoodApiError>;

    async fn get_details(&self, fdc_id: u64) -> Result<FoodRecord, FoodApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_query_body() {
        let query = SearchQuery::new("apple")
            .with_page_size(500)
            .with_data_types([DataType::Foundation, DataType::Unknown, DataType::SrLegacy]);
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "query": "apple",
                "dataType": ["Foundation", "SR Legacy"],
                "pageSize": 200,
                "pageNumber": 1
            })
        );
    }

    #[test]
    fn test_empty_filter_is_omitted() {
        let value = serde_json::to_value(SearchQuery::new("rice").with_page_size(0)).unwrap();
        assert!(value.get("dataType").is_none());
        assert_eq!(value["pageSize"], 1);
    }
}
