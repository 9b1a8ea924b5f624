use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::traits::{FoodApiError, NutritionSearch, SearchQuery};
use crate::food::config::FoodConfig;
use crate::food::types::{FoodRecord, SearchBatch};

/// FoodData Central client.
#[derive(Debug, Clone)]
pub struct UsdaClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    page_size: u32,
}

impl UsdaClient {
    pub fn new(config: FoodConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.usda_api_key,
            base_url: config.base_url,
            page_size: config.page_size,
        }
    }

    pub fn default_page_size(&self) -> u32 {
        self.page_size
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, FoodApiError> {
        self.api_key.as_deref().ok_or(FoodApiError::MissingApiKey)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FoodApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "FoodData Central request rejected");
            return Err(FoodApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl NutritionSearch for UsdaClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchBatch, FoodApiError> {
        let api_key = self.api_key()?;
        tracing::info!(
            query = %query.query,
            page_size = query.page_size,
            page = query.page_number,
            "searching FoodData Central"
        );

        let response = self
            .http
            .post(self.url("foods/search"))
            .query(&[("api_key", api_key)])
            .json(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "search request failed");
                FoodApiError::from(e)
            })?;

        let batch: SearchBatch = Self::decode(response).await?;
        tracing::info!(
            results = batch.foods.len(),
            total = batch.total_hits,
            "FoodData Central search completed"
        );
        Ok(batch)
    }

    async fn get_details(&self, fdc_id: u64) -> Result<FoodRecord, FoodApiError> {
        let api_key = self.api_key()?;
        tracing::info!(fdc_id, "fetching food details");

        let response = self
            .http
            .get(self.url(&format!("food/{}", fdc_id)))
            .query(&[("api_key", api_key)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(fdc_id, error = %e, "details request failed");
                FoodApiError::from(e)
            })?;

        let record: FoodRecord = Self::decode(response).await?;
        tracing::info!(fdc_id, description = %record.description, "food details fetched");
        Ok(record)
    }
}
