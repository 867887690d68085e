/// TMDB metadata provider
///
/// Both lookups read the same `/movie/{id}` document, so with a cache
/// configured a candidate costs at most one API call.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    config::Config,
    error::{AppError, AppResult},
    models::{MovieDetails, MovieId, TmdbMovie},
    services::providers::MetadataClient,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    language: String,
    timeout: Duration,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl TmdbProvider {
    /// Creates a provider whose requests give up after `timeout`.
    pub fn new(
        api_key: String,
        api_url: String,
        image_url: String,
        language: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url,
            language,
            timeout,
            cache: None,
            cache_ttl: 0,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_url.clone(),
            config.tmdb_language.clone(),
            config.metadata_timeout(),
        )
    }

    /// Caches successful movie lookups for `ttl` seconds.
    ///
    /// Cache reads share the request timeout, so a stalled Redis falls back to
    /// the API instead of holding up the lookup.
    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache.with_read_timeout(self.timeout));
        self.cache_ttl = ttl;
        self
    }

    async fn get_movie(&self, movie_id: MovieId) -> AppResult<TmdbMovie> {
        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::Movie {
                    id: movie_id,
                    language: self.language.clone(),
                },
                self.cache_ttl,
                self.request_movie(movie_id)
            ),
            None => self.request_movie(movie_id).await,
        }
    }

    async fn request_movie(&self, movie_id: MovieId) -> AppResult<TmdbMovie> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for movie {}",
                response.status(),
                movie_id
            )));
        }

        let document: Value = response.json().await?;
        TmdbMovie::from_value(&document).ok_or_else(|| {
            AppError::ExternalApi(format!(
                "TMDB returned a non-object document for movie {}",
                movie_id
            ))
        })
    }
}

#[async_trait::async_trait]
impl MetadataClient for TmdbProvider {
    async fn fetch_poster(&self, movie_id: MovieId) -> Option<String> {
        match self.get_movie(movie_id).await {
            Ok(movie) => {
                let poster_url = movie.poster_url(&self.image_url);
                if poster_url.is_none() {
                    tracing::debug!(movie_id, provider = "tmdb", "Movie has no poster");
                }
                poster_url
            }
            Err(e) => {
                tracing::warn!(movie_id, error = %e, provider = "tmdb", "Poster lookup failed");
                None
            }
        }
    }

    async fn fetch_details(&self, movie_id: MovieId) -> Option<MovieDetails> {
        match self.get_movie(movie_id).await {
            Ok(movie) => Some(movie.details()),
            Err(e) => {
                tracing::warn!(movie_id, error = %e, provider = "tmdb", "Details lookup failed");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
