use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    /// Case-insensitive substring filter
    #[serde(default)]
    q: Option<String>,
}

/// Lists catalog titles in catalog order, the values a client can ask recommendations for.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TitleQuery>,
) -> Json<Vec<String>> {
    let needle = params
        .q
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let titles = state
        .store
        .titles()
        .filter(|title| match &needle {
            Some(needle) => title.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .map(str::to_string)
        .collect();

    Json(titles)
}
