use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    routes::AppState,
    services::featured::{featured_posters, FEATURED_LIMIT},
};

#[derive(Debug, Serialize)]
pub struct FeaturedResponse {
    pub posters: Vec<String>,
}

/// Poster URLs for the featured strip
pub async fn featured(State(state): State<AppState>) -> Json<FeaturedResponse> {
    let posters = featured_posters(
        state.metadata.as_ref(),
        &state.featured_movie_ids,
        FEATURED_LIMIT,
    )
    .await;

    Json(FeaturedResponse { posters })
}
