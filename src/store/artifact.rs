use std::path::{Path, PathBuf};

use reqwest::Client as HttpClient;
use tokio::io::AsyncWriteExt;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::CatalogEntry,
};

use super::{SimilarityMatrix, SimilarityStore};

/// Loads the similarity store described by the configuration.
///
/// Artifacts missing locally are downloaded first. Any failure here is fatal
/// for the service: without a catalog there is nothing to recommend from.
pub async fn load(config: &Config, http_client: &HttpClient) -> AppResult<SimilarityStore> {
    let catalog_path = PathBuf::from(&config.catalog_path);
    let similarity_path = PathBuf::from(&config.similarity_path);

    ensure_local(http_client, &catalog_path, config.catalog_url.as_deref()).await?;
    ensure_local(http_client, &similarity_path, config.similarity_url.as_deref()).await?;

    let store = load_from_paths(&catalog_path, &similarity_path).await?;

    tracing::info!(
        movies = store.len(),
        catalog = %catalog_path.display(),
        similarity = %similarity_path.display(),
        "Similarity store loaded"
    );

    Ok(store)
}

/// Parses and validates both artifacts from local files.
pub async fn load_from_paths(
    catalog_path: &Path,
    similarity_path: &Path,
) -> AppResult<SimilarityStore> {
    let catalog = read_catalog(catalog_path).await?;
    let matrix = read_matrix(similarity_path, catalog.len()).await?;
    SimilarityStore::new(catalog, matrix)
}

async fn read_catalog(path: &Path) -> AppResult<Vec<CatalogEntry>> {
    let bytes = read_artifact(path).await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        AppError::Artifact(format!("Invalid catalog '{}': {}", path.display(), e))
    })
}

/// Reads the matrix as JSON rows for `.json` files, raw little-endian `f32` otherwise.
async fn read_matrix(path: &Path, dimension: usize) -> AppResult<SimilarityMatrix> {
    let bytes = read_artifact(path).await?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let rows: Vec<Vec<f32>> = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Artifact(format!(
                "Invalid similarity matrix '{}': {}",
                path.display(),
                e
            ))
        })?;
        SimilarityMatrix::from_rows(rows)
    } else {
        SimilarityMatrix::from_le_bytes(dimension, &bytes)
    }
}

async fn read_artifact(path: &Path) -> AppResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        AppError::Artifact(format!("Failed to read '{}': {}", path.display(), e))
    })
}

/// Downloads `url` to `path` unless the file already exists.
///
/// The body is written to a sibling temp file and renamed into place, so an
/// interrupted download never leaves a truncated artifact behind.
async fn ensure_local(http_client: &HttpClient, path: &Path, url: Option<&str>) -> AppResult<()> {
    if tokio::fs::try_exists(path).await? {
        return Ok(());
    }

    let url = url.ok_or_else(|| {
        AppError::Artifact(format!(
            "'{}' does not exist and no download URL is configured",
            path.display()
        ))
    })?;

    tracing::info!(url = %url, path = %path.display(), "Downloading artifact");

    let response = http_client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(AppError::Artifact(format!(
            "Download of '{}' returned status {}",
            url,
            response.status()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let partial = path.with_extension("partial");
    let written = match write_body(response, &partial).await {
        Ok(written) => written,
        Err(e) => {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
    };
    tokio::fs::rename(&partial, path).await?;

    tracing::info!(bytes = written, path = %path.display(), "Artifact downloaded");
    Ok(())
}

/// Streams the response body to `target` chunk by chunk.
async fn write_body(mut response: reqwest::Response, target: &Path) -> AppResult<u64> {
    let mut file = tokio::fs::File::create(target).await?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;
    use wiremock::matchers::{method, path as url_path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CATALOG: &str = r#"[
        {"id": 1, "title": "A"},
        {"id": 2, "title": "B"},
        {"id": 3, "title": "C"}
    ]"#;

    fn matrix_bytes() -> Vec<u8> {
        [1.0f32, 0.9, 0.2, 0.9, 1.0, 0.4, 0.2, 0.4, 1.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect()
    }

    #[tokio::test]
    async fn test_load_json_catalog_and_binary_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("movies.json");
        let similarity = dir.path().join("similarity.bin");
        std::fs::write(&catalog, CATALOG).unwrap();
        std::fs::write(&similarity, matrix_bytes()).unwrap();

        let store = load_from_paths(&catalog, &similarity).await.unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.similarity_row(0), Some(&[1.0, 0.9, 0.2][..]));
    }

    #[tokio::test]
    async fn test_load_json_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("movies.json");
        let similarity = dir.path().join("similarity.json");
        std::fs::write(&catalog, CATALOG).unwrap();
        std::fs::write(&similarity, "[[1,0.9,0.2],[0.9,1,0.4],[0.2,0.4,1]]").unwrap();

        let store = load_from_paths(&catalog, &similarity).await.unwrap();
        assert_eq!(store.index_of("C"), Some(2));
    }

    #[tokio::test]
    async fn test_catalog_without_title_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("movies.json");
        let similarity = dir.path().join("similarity.bin");
        std::fs::write(&catalog, r#"[{"id": 1, "name": "A"}]"#).unwrap();
        std::fs::write(&similarity, 1.0f32.to_le_bytes()).unwrap();

        let err = load_from_paths(&catalog, &similarity).await.unwrap_err();
        assert!(matches!(err, AppError::Artifact(_)));
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("movies.json");
        let similarity = dir.path().join("similarity.json");
        std::fs::write(&catalog, CATALOG).unwrap();
        std::fs::write(&similarity, "[[1,0.5],[0.5,1]]").unwrap();

        assert_err!(load_from_paths(&catalog, &similarity).await);
    }

    #[tokio::test]
    async fn test_missing_artifact_without_url_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nowhere.json");

        let err = ensure_local(&HttpClient::new(), &missing, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no download URL"));
    }

    #[tokio::test]
    async fn test_missing_artifact_is_downloaded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(url_path("/movies.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CATALOG))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data").join("movies.json");
        let url = format!("{}/movies.json", server.uri());

        ensure_local(&HttpClient::new(), &target, Some(&url))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), CATALOG);

        // Present now, so no second request is made
        ensure_local(&HttpClient::new(), &target, Some(&url))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_large_artifact_is_streamed_to_disk() {
        let body: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(url_path("/similarity.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("similarity.bin");
        let url = format!("{}/similarity.bin", server.uri());

        ensure_local(&HttpClient::new(), &target, Some(&url))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), body);
        assert!(!target.with_extension("partial").exists());
    }

    #[tokio::test]
    async fn test_failed_download_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("similarity.bin");
        let url = format!("{}/similarity.bin", server.uri());

        let err = ensure_local(&HttpClient::new(), &target, Some(&url))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Artifact(_)));
        assert!(!target.exists());
    }
}
