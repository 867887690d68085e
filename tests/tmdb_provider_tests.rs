use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use watchlist::cache::{create_redis_client, Cache};
use watchlist::services::{MetadataClient, TmdbProvider};

fn provider(server: &MockServer, timeout: Duration) -> TmdbProvider {
    TmdbProvider::new(
        "test-key".to_string(),
        server.uri(),
        "https://image.tmdb.org/t/p/w500".to_string(),
        "en-US".to_string(),
        timeout,
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetch_poster_builds_image_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/155"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 155,
            "poster_path": "/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
            "vote_average": 8.5,
            "overview": "Batman raises the stakes in his war on crime."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let poster = provider(&server, Duration::from_secs(5)).fetch_poster(155).await;
    assert_eq!(
        poster.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/qJ2tW6WMUDux911r6m7haRef0WH.jpg")
    );
}

#[tokio::test]
async fn test_fetch_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/598"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "poster_path": null,
            "vote_average": 8.4,
            "overview": "In the slums of Rio..."
        })))
        .mount(&server)
        .await;

    let details = provider(&server, Duration::from_secs(5))
        .fetch_details(598)
        .await
        .unwrap();
    assert_eq!(details.rating, Some(8.4));
    assert_eq!(details.overview.as_deref(), Some("In the slums of Rio..."));
}

#[tokio::test]
async fn test_missing_poster_path_is_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "poster_path": null })))
        .mount(&server)
        .await;

    assert_eq!(provider(&server, Duration::from_secs(5)).fetch_poster(1).await, None);
}

#[tokio::test]
async fn test_non_success_status_is_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let client = provider(&server, Duration::from_secs(5));
    assert_eq!(client.fetch_poster(2).await, None);
    assert_eq!(client.fetch_details(2).await, None);
}

#[tokio::test]
async fn test_malformed_json_is_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = provider(&server, Duration::from_secs(5));
    assert_eq!(client.fetch_poster(3).await, None);
    assert_eq!(client.fetch_details(3).await, None);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "poster_path": "/late.jpg" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let poster = provider(&server, Duration::from_millis(200)).fetch_poster(4).await;
    assert_eq!(poster, None);
}

#[tokio::test]
async fn test_unreachable_cache_falls_back_within_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "poster_path": "/five.jpg" })))
        .mount(&server)
        .await;

    let redis = create_redis_client("redis://10.255.255.1:6379").unwrap();
    let (cache, _writer) = Cache::new(redis);
    let client = provider(&server, Duration::from_millis(300)).with_cache(cache, 60);

    let poster = tokio::time::timeout(Duration::from_secs(3), client.fetch_poster(5))
        .await
        .expect("lookup should not wait on the unreachable cache");
    assert_eq!(
        poster.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/five.jpg")
    );
}
