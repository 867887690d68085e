use std::sync::Arc;

use crate::{
    config::Config,
    models::MovieId,
    services::{providers::MetadataClient, recommendations::DEFAULT_MAX_RESULTS},
    store::SimilarityStore,
};

const DEFAULT_SITE_URL: &str = "https://www.themoviedb.org";

/// Shared application state
///
/// Everything here is read-only after startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SimilarityStore>,
    pub metadata: Arc<dyn MetadataClient>,
    /// Upper bound on recommendations per request
    pub max_results: usize,
    /// Public metadata site used for per-movie links
    pub site_url: Arc<str>,
    pub featured_movie_ids: Arc<[MovieId]>,
}

impl AppState {
    /// Creates state with default limits and no featured movies
    pub fn new(store: SimilarityStore, metadata: Arc<dyn MetadataClient>) -> Self {
        Self {
            store: Arc::new(store),
            metadata,
            max_results: DEFAULT_MAX_RESULTS,
            site_url: Arc::from(DEFAULT_SITE_URL),
            featured_movie_ids: Arc::from(Vec::new()),
        }
    }

    pub fn from_config(
        config: &Config,
        store: SimilarityStore,
        metadata: Arc<dyn MetadataClient>,
    ) -> Self {
        Self::new(store, metadata)
            .with_max_results(config.max_results)
            .with_site_url(&config.tmdb_site_url)
            .with_featured_movies(config.featured_movie_ids.clone())
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_site_url(mut self, site_url: &str) -> Self {
        self.site_url = Arc::from(site_url.trim_end_matches('/'));
        self
    }

    pub fn with_featured_movies(mut self, movie_ids: Vec<MovieId>) -> Self {
        self.featured_movie_ids = Arc::from(movie_ids);
        self
    }

    /// Link to the movie's page on the metadata site
    pub fn detail_url(&self, movie_id: MovieId) -> String {
        format!("{}/movie/{}", self.site_url, movie_id)
    }
}
