use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{Algorithm, RecommendationRequest, Recommendations, SimilarityMetric};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub algorithm: String,
    pub similarity: String,
    pub input: u32,
    pub recommendations: usize,
    /// Overrides the configured number of scoring chunks
    pub concurrency: Option<usize>,
    /// Overrides the configured neighbour bound
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RecommendedMovie {
    #[serde(rename = "movieID")]
    pub movie_id: u32,
    #[serde(rename = "movieTitle")]
    pub movie_title: String,
    /// Forecast rating (2 decimals) or similarity (5 decimals), truncated
    pub result: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub status: String,
    pub status_code: u16,
    pub data: Vec<RecommendedMovie>,
    pub message: String,
    /// Title of the query movie for movie-keyed algorithms
    pub meta_info: String,
}

fn truncate(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).trunc() / scale
}

impl RecommendationResponse {
    fn build(state: &AppState, request: &RecommendationRequest, recommendations: Recommendations) -> Self {
        let dataset = state.dataset();
        let title_of = |id: u32| dataset.title(id).unwrap_or_default().to_string();

        let data: Vec<RecommendedMovie> = match recommendations {
            Recommendations::Forecasts(forecasts) => forecasts
                .into_iter()
                .map(|f| RecommendedMovie {
                    movie_id: f.movie_id,
                    movie_title: title_of(f.movie_id),
                    result: truncate(f.rating, 2),
                })
                .collect(),
            Recommendations::Similar(similar) => similar
                .into_iter()
                .map(|s| RecommendedMovie {
                    movie_id: s.id,
                    movie_title: title_of(s.id),
                    result: truncate(s.score, 5),
                })
                .collect(),
        };

        let (kind, meta_info) = if request.algorithm.queries_user() {
            ("user", String::new())
        } else {
            ("movie", title_of(request.input))
        };
        let message = if data.is_empty() {
            format!(
                "No relevant movies found for {} {}. Try using another algorithm.",
                kind, request.input
            )
        } else {
            String::new()
        };

        Self {
            status: "success".to_string(),
            status_code: StatusCode::OK.as_u16(),
            data,
            message,
            meta_info,
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Runs one recommendation request against the loaded dataset
pub async fn recommend(
    State(state): State<AppState>,
    query: Result<Query<RecommendQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(params) = query.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let algorithm: Algorithm = params.algorithm.parse()?;
    let similarity: SimilarityMetric = params.similarity.parse()?;

    let mut request =
        state
            .recommender
            .request(params.input, algorithm, similarity, params.recommendations);
    if let Some(concurrency) = params.concurrency {
        request.concurrency = concurrency;
    }
    if let Some(top_k) = params.top_k {
        request.top_k = top_k;
    }

    tracing::info!(
        algorithm = %request.algorithm,
        similarity = %request.similarity,
        input = request.input,
        recommendations = request.recommendations,
        concurrency = request.concurrency,
        "Received recommendation request"
    );

    // scoring is CPU-bound; keep it off the async workers
    let recommender = Arc::clone(&state.recommender);
    let span = tracing::Span::current();
    let engine_request = request.clone();
    let recommendations = tokio::task::spawn_blocking(move || {
        span.in_scope(|| recommender.recommend(&engine_request))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Recommendation task failed: {}", e)))??;

    Ok(Json(RecommendationResponse::build(&state, &request, recommendations)))
}
