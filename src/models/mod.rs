use serde::{Deserialize, Serialize};

pub mod tmdb;

pub use tmdb::TmdbMovie;

/// TMDB identifier of a movie
pub type MovieId = u64;

/// One row of the movie catalog
///
/// The position of an entry in the catalog is its row in the similarity matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    #[serde(rename = "id", alias = "movie_id")]
    pub movie_id: MovieId,
    pub title: String,
}

impl CatalogEntry {
    pub fn new(movie_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
        }
    }
}

/// Descriptive detail for a movie, as far as the metadata service knows it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    /// Average vote, absent when the service has none or returned a non-number
    pub rating: Option<f64>,
    pub overview: Option<String>,
}

/// A movie selected for display, enriched with its metadata
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: String,
    /// Rating to one decimal place, or "N/A"
    pub rating: String,
    pub overview: String,
    /// Similarity score relative to the query movie
    pub similarity: f32,
    /// 1-based position in the full similarity ranking (the query itself is rank 0)
    pub rank: usize,
}
