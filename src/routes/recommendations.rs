use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MovieId, Recommendation},
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationItem {
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: String,
    pub rating: String,
    pub overview: String,
    pub detail_url: String,
    pub similarity: f32,
    pub rank: usize,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub recommendations: Vec<RecommendationItem>,
}

impl RecommendationItem {
    pub fn new(recommendation: Recommendation, state: &AppState) -> Self {
        Self {
            detail_url: state.detail_url(recommendation.movie_id),
            movie_id: recommendation.movie_id,
            title: recommendation.title,
            poster_url: recommendation.poster_url,
            rating: recommendation.rating,
            overview: recommendation.overview,
            similarity: recommendation.similarity,
            rank: recommendation.rank,
        }
    }
}

/// Applies the configured ceiling to a requested result count.
pub fn resolve_limit(requested: Option<usize>, max_results: usize) -> AppResult<usize> {
    match requested {
        Some(0) => Err(AppError::InvalidInput(
            "limit must be at least 1".to_string(),
        )),
        Some(limit) => Ok(limit.min(max_results)),
        None => Ok(max_results),
    }
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let limit = resolve_limit(params.limit, state.max_results)?;

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        limit,
        "Processing recommendation request"
    );

    let recommendations = recommendations::recommend(
        &state.store,
        state.metadata.as_ref(),
        &params.title,
        limit,
    )
    .await
    .inspect_err(|e| {
        if e.is_request_scoped() {
            tracing::warn!(request_id = %request_id, error = %e, "Recommendation request failed");
        } else {
            tracing::error!(request_id = %request_id, error = %e, "Recommendation request errored");
        }
    })?;

    let recommendations = recommendations
        .into_iter()
        .map(|recommendation| RecommendationItem::new(recommendation, &state))
        .collect();

    Ok(Json(RecommendationResponse {
        query: params.title,
        recommendations,
    }))
}
