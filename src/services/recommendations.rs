use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{MovieDetails, Recommendation},
    services::providers::MetadataClient,
    store::SimilarityStore,
};

/// Recommendations shown per query unless configured otherwise
pub const DEFAULT_MAX_RESULTS: usize = 12;

pub const NO_RATING: &str = "N/A";
pub const NO_OVERVIEW: &str = "No overview available.";

/// Pairs every movie with its score and orders them by descending similarity.
///
/// The sort is stable, so equal scores (including `0.0` and `-0.0`) keep
/// catalog order. Scores are finite, checked when the matrix is loaded.
pub fn rank_by_similarity(row: &[f32]) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = row.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
}

/// Formats a vote average for display.
///
/// Missing, zero or negative ratings mean "unrated". Others are rounded half
/// away from zero to one decimal, so 7.25 shows as 7.3.
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(value) if value.is_finite() && value > 0.0 => {
            format!("{:.1}", (value * 10.0).round() / 10.0)
        }
        _ => NO_RATING.to_string(),
    }
}

fn display_overview(details: Option<&MovieDetails>) -> String {
    details
        .and_then(|d| d.overview.as_deref())
        .map(str::trim)
        .filter(|overview| !overview.is_empty())
        .unwrap_or(NO_OVERVIEW)
        .to_string()
}

/// Selects up to `max_results` movies most similar to `query_title`.
///
/// Candidates are visited in similarity order, skipping the top-ranked entry
/// (the query itself), anything sharing the query's title or id, ids already
/// accepted, and every movie without a poster. Lookups run one candidate at a
/// time and a failed lookup only drops its own candidate.
#[instrument(skip(store, metadata), fields(provider = metadata.name()))]
pub async fn recommend(
    store: &SimilarityStore,
    metadata: &dyn MetadataClient,
    query_title: &str,
    max_results: usize,
) -> AppResult<Vec<Recommendation>> {
    let query_index = store
        .index_of(query_title)
        .ok_or_else(|| AppError::NotFound(format!("Movie '{}' not found", query_title)))?;

    let row = store
        .similarity_row(query_index)
        .ok_or(AppError::IndexOutOfRange(query_index))?;

    let query_id = store
        .entry(query_index)
        .map(|entry| entry.movie_id)
        .ok_or(AppError::IndexOutOfRange(query_index))?;

    let ranked = rank_by_similarity(row);
    let mut recommendations = Vec::with_capacity(max_results.min(ranked.len()));
    let mut accepted_ids = HashSet::new();
    let mut skipped_without_poster = 0usize;

    for (rank, (index, similarity)) in ranked.into_iter().enumerate().skip(1) {
        if recommendations.len() >= max_results {
            break;
        }

        let candidate = store.entry(index).ok_or_else(|| {
            AppError::Internal(format!("Ranked index {} has no catalog entry", index))
        })?;

        if candidate.title == query_title || candidate.movie_id == query_id {
            tracing::debug!(index, "Skipping duplicate of the query movie");
            continue;
        }
        if accepted_ids.contains(&candidate.movie_id) {
            continue;
        }

        let Some(poster_url) = metadata.fetch_poster(candidate.movie_id).await else {
            skipped_without_poster += 1;
            continue;
        };

        let details = metadata.fetch_details(candidate.movie_id).await;

        accepted_ids.insert(candidate.movie_id);
        recommendations.push(Recommendation {
            movie_id: candidate.movie_id,
            title: candidate.title.clone(),
            poster_url,
            rating: format_rating(details.as_ref().and_then(|d| d.rating)),
            overview: display_overview(details.as_ref()),
            similarity,
            rank,
        });
    }

    tracing::info!(
        results = recommendations.len(),
        skipped_without_poster,
        "Recommendations selected"
    );

    Ok(recommendations)
}
