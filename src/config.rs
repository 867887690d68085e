use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Public TMDB site, used for per-movie detail links
    #[serde(default = "default_tmdb_site_url")]
    pub tmdb_site_url: String,

    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Per-request timeout for metadata lookups, in seconds
    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,

    /// Optional Redis connection URL; metadata lookups are cached when set
    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_metadata_cache_ttl_secs")]
    pub metadata_cache_ttl_secs: u64,

    /// Local path of the catalog artifact
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Local path of the similarity matrix artifact
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Remote location of the catalog artifact, fetched when the local file is absent
    #[serde(default)]
    pub catalog_url: Option<String>,

    /// Remote location of the similarity artifact, fetched when the local file is absent
    #[serde(default)]
    pub similarity_url: Option<String>,

    #[serde(default = "default_artifact_timeout_secs")]
    pub artifact_timeout_secs: u64,

    /// Upper bound on recommendations per request
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// TMDB ids shown as featured posters
    #[serde(default = "default_featured_movie_ids")]
    pub featured_movie_ids: Vec<u64>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_site_url() -> String {
    "https://www.themoviedb.org".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_metadata_timeout_secs() -> u64 {
    5
}

fn default_metadata_cache_ttl_secs() -> u64 {
    86400 // 1 day
}

fn default_catalog_path() -> String {
    "movies_list.json".to_string()
}

fn default_similarity_path() -> String {
    "similarity.bin".to_string()
}

fn default_artifact_timeout_secs() -> u64 {
    300
}

fn default_max_results() -> usize {
    12
}

fn default_featured_movie_ids() -> Vec<u64> {
    vec![
        155, 572154, 299536, 1632, 17455, 2830, 429422, 9722, 13972, 240, 598, 914, 255709,
    ]
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    pub fn artifact_timeout(&self) -> Duration {
        Duration::from_secs(self.artifact_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_env() {
        let vars = vec![("TMDB_API_KEY".to_string(), "secret".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.max_results, 12);
        assert_eq!(config.metadata_timeout(), Duration::from_secs(5));
        assert_eq!(config.featured_movie_ids.len(), 13);
        assert!(config.redis_url.is_none());
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_featured_ids_parse_comma_separated() {
        let vars = vec![
            ("TMDB_API_KEY".to_string(), "secret".to_string()),
            ("FEATURED_MOVIE_IDS".to_string(), "155,240,598".to_string()),
            ("MAX_RESULTS".to_string(), "6".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.featured_movie_ids, vec![155, 240, 598]);
        assert_eq!(config.max_results, 6);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let vars: Vec<(String, String)> = vec![];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }
}
