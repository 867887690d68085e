use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MovieDetails;

/// The subset of TMDB's `/movie/{id}` document the service uses
///
/// Built leniently from raw JSON: a field with an unexpected type is treated
/// as missing rather than failing the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TmdbMovie {
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
}

impl TmdbMovie {
    /// Extracts the known fields from a TMDB movie document.
    ///
    /// Returns `None` when the document is not a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        Some(Self {
            poster_path: object
                .get("poster_path")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(str::to_string),
            vote_average: object.get("vote_average").and_then(Value::as_f64),
            overview: object
                .get("overview")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// Full image URL for the poster, if the movie has one
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path.as_deref().map(|path| {
            format!(
                "{}/{}",
                image_base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        })
    }

    pub fn details(&self) -> MovieDetails {
        MovieDetails {
            rating: self.vote_average,
            overview: self.overview.clone(),
        }
    }
}
