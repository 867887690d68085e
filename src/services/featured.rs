use crate::{models::MovieId, services::providers::MetadataClient};

/// Posters shown in the featured strip
pub const FEATURED_LIMIT: usize = 10;

/// Resolves featured movie ids to poster URLs.
///
/// Lookups run in order and stop once `limit` posters are found; movies
/// without a poster are left out.
pub async fn featured_posters(
    metadata: &dyn MetadataClient,
    movie_ids: &[MovieId],
    limit: usize,
) -> Vec<String> {
    let mut posters = Vec::with_capacity(limit.min(movie_ids.len()));

    for &movie_id in movie_ids {
        if posters.len() >= limit {
            break;
        }
        if let Some(url) = metadata.fetch_poster(movie_id).await {
            posters.push(url);
        }
    }

    if posters.is_empty() && !movie_ids.is_empty() {
        tracing::info!(
            requested = movie_ids.len(),
            provider = metadata.name(),
            "No featured posters could be fetched"
        );
    }

    posters
}
