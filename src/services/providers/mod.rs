/// Movie metadata providers
///
/// The recommendation walk only needs two lookups per candidate: whether a
/// poster exists, and the rating/overview shown next to it. Providers hide
/// every transport failure behind `None` so that one bad lookup can only ever
/// drop the candidate it belongs to.
use crate::models::{MovieDetails, MovieId};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataClient: Send + Sync {
    /// Full poster image URL, or `None` if the movie has none or the lookup failed
    async fn fetch_poster(&self, movie_id: MovieId) -> Option<String>;

    /// Rating and overview, or `None` if the lookup failed
    async fn fetch_details(&self, movie_id: MovieId) -> Option<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
