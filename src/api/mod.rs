use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use validator::Validate;

use crate::food::api::FoodApiError;
use crate::food::types::{DataType, EvaluationFocus, SearchBatch, SearchIntent, SearchOutcome};
use crate::food::NutritionAdvisor;

pub const MAX_IN_FLIGHT: usize = 64;

#[derive(Clone)]
pub struct AppState {
    advisor: NutritionAdvisor,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EvaluateRequest {
    #[validate(length(min = 1, max = 200))]
    query: String,
    /// A search body or the search tool's `{"error": ...}` payload.
    #[serde(default)]
    search_results: Option<SearchOutcome>,
    /// Top-level form of the upstream error.
    #[serde(default)]
    error: Option<String>,
    #[validate(length(max = 200))]
    target_food: Option<String>,
    evaluation_focus: Option<String>,
}

impl EvaluateRequest {
    fn outcome(&self) -> SearchOutcome {
        match (&self.error, &self.search_results) {
            (Some(error), _) => SearchOutcome::failed(error.clone()),
            (None, Some(outcome)) => outcome.clone(),
            (None, None) => SearchOutcome::Found(SearchBatch::default()),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GuidanceRequest {
    #[validate(length(max = 100))]
    food_category: Option<String>,
    #[validate(length(max = 100))]
    search_intent: Option<String>,
    #[validate(length(max = 200))]
    user_input: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, max = 200))]
    query: String,
    #[serde(default)]
    data_types: Vec<String>,
    #[validate(range(min = 1, max = 200))]
    page_size: Option<u32>,
    #[validate(range(min = 1))]
    page_number: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LookupRequest {
    #[validate(length(min = 1, max = 200))]
    query: String,
    fdc_id: Option<u64>,
    #[serde(default)]
    data_types: Vec<String>,
}

#[derive(Serialize)]
struct ApiResponse {
    status: String,
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Upstream(#[from] FoodApiError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(FoodApiError::MissingApiKey) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(FoodApiError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                status: "error",
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

fn data_types(names: &[String]) -> Vec<DataType> {
    names.iter().map(|name| DataType::from_name(name)).collect()
}

/// Create and configure the API router
pub fn create_api(advisor: NutritionAdvisor) -> Router {
    let state = AppState { advisor };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_check))
        .route("/evaluate", post(evaluate_handler))
        .route("/guidance", post(guidance_handler))
        .route("/search", post(search_handler))
        .route("/lookup", post(lookup_handler))
        .layer(cors)
        .layer(GlobalConcurrencyLimitLayer::new(MAX_IN_FLIGHT))
        .with_state(state)
}

async fn health_check() -> Response {
    tracing::debug!("health check requested");
    Json(ApiResponse {
        status: "Server is running and healthy".to_string(),
    })
    .into_response()
}

async fn evaluate_handler(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let focus = request
        .evaluation_focus
        .as_deref()
        .map(EvaluationFocus::from_name);
    let response = state.advisor.evaluate(
        &request.query,
        &request.outcome(),
        request.target_food.as_deref(),
        focus,
    );
    Ok(Json(response).into_response())
}

async fn guidance_handler(
    State(state): State<AppState>,
    Json(request): Json<GuidanceRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let intent = request.search_intent.as_deref().map(SearchIntent::from_name);
    let result = state.advisor.guide(
        request.food_category.as_deref(),
        intent.as_ref(),
        request.user_input.as_deref(),
    );
    Ok(Json(result).into_response())
}

async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let mut query = state
        .advisor
        .search_query(&request.query)
        .with_data_types(data_types(&request.data_types));
    if let Some(page_size) = request.page_size {
        query = query.with_page_size(page_size);
    }
    if let Some(page_number) = request.page_number {
        query = query.with_page_number(page_number);
    }
    let batch = state.advisor.search(&query).await?;
    Ok(Json(batch).into_response())
}

async fn lookup_handler(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let lookup = state
        .advisor
        .lookup(&request.query, request.fdc_id, &data_types(&request.data_types))
        .await?;
    Ok(Json(lookup).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::api::{NutritionSearch, SearchQuery};
    use crate::food::types::FoodRecord;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct OfflineSearch;

    #[async_trait]
    impl NutritionSearch for OfflineSearch {
        async fn search(&self, _query: &SearchQuery) -> Result<SearchBatch, FoodApiError> {
            Err(FoodApiError::MissingApiKey)
        }

        async fn get_details(&self, _fdc_id: u64) -> Result<FoodRecord, FoodApiError> {
            Err(FoodApiError::MissingApiKey)
        }
    }

    fn app() -> Router {
        create_api(NutritionAdvisor::new(Arc::new(OfflineSearch)))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_evaluate_success() {
        let (status, body) = post_json(
            "/evaluate",
            json!({
                "query": "chicken",
                "search_results": {
                    "foods": [{
                        "fdcId": 171077,
                        "description": "Chicken, broilers or fryers, breast, meat only, cooked, roasted",
                        "dataType": "Foundation"
                    }],
                    "totalHits": 1
                },
                "evaluation_focus": "accuracy"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["overall_assessment"]["focus"], "accuracy");
        assert_eq!(body["diversity_score"], 1.0);
    }

    #[tokio::test]
    async fn test_evaluate_upstream_error() {
        let (status, body) = post_json("/evaluate", json!({"query": "chicken", "error": "rate limited"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "rate limited");
    }

    #[tokio::test]
    async fn test_evaluate_error_inside_search_results() {
        let (status, body) = post_json(
            "/evaluate",
            json!({"query": "chicken", "search_results": {"error": "timeout"}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "timeout");
        assert!(body.get("relevance_score").is_none());

        let (_, body) = post_json(
            "/evaluate",
            json!({"query": "chicken", "search_results": {"error": {"code": 429}}}),
        )
        .await;
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_evaluate_rejects_empty_query() {
        let (status, body) = post_json("/evaluate", json!({"query": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_guidance_for_meat() {
        let (status, body) = post_json(
            "/guidance",
            json!({"food_category": "meat", "search_intent": "high_protein", "user_input": "チキンサラダ"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category_specific"]["known"], true);
        assert_eq!(body["intent_specific"]["intent"], "high_protein");
        assert_eq!(body["input_analysis"]["input_type"], "composite_dish");
    }

    #[tokio::test]
    async fn test_search_without_key_is_unavailable() {
        let (status, body) = post_json("/search", json!({"query": "apple", "page_size": 10})).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "USDA_API_KEY is not set");
    }

    #[tokio::test]
    async fn test_search_validates_page_size() {
        let (status, _) = post_json("/search", json!({"query": "apple", "page_size": 500})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lookup_without_key_is_unavailable() {
        let (status, _) = post_json("/lookup", json!({"query": "apple", "fdc_id": 1})).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
