use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tubeshelf_api::{KeyPool, RetryingFetcher, VideoClient};
use tubeshelf_storage::{HistoryBackend, HistoryStore, KeyValueStore, MemoryStore, StorageError};

use crate::{AppState, create_router};

/// Reads nothing and fails every write.
struct BrokenDisk;

impl KeyValueStore for BrokenDisk {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io { key: key.to_owned(), source: std::io::Error::other("/var/lib/secret disk full") })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.set(key, "")
    }
}

fn test_router(api_base: &str, keys: &[&str], static_dir: &Path) -> Router {
    test_router_with_store(api_base, keys, static_dir, Arc::new(MemoryStore::new()))
}

fn test_router_with_store(
    api_base: &str,
    keys: &[&str],
    static_dir: &Path,
    kv: Arc<dyn KeyValueStore>,
) -> Router {
    let pool = Arc::new(KeyPool::from_keys(keys));
    let fetcher = RetryingFetcher::new(pool, api_base, Duration::from_secs(5)).unwrap();
    let history = HistoryStore::load(HistoryBackend::Local(kv)).unwrap();
    let state = AppState::new(VideoClient::new(fetcher), history, "GB".to_owned());
    create_router(Arc::new(state), static_dir)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let router = test_router("http://127.0.0.1:9", &["A"], dir.path());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_trending_uses_default_region() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("regionCode", "GB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "v1", "snippet": {"title": "Hello", "channelTitle": "C"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let router = test_router(&server.uri(), &["A"], dir.path());

    let (status, body) = get_json(&router, "/api/trending").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "v1");
    assert_eq!(body[0]["title"], "Hello");
}

#[tokio::test]
async fn test_quota_exhaustion_is_retryable_503() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(403)).expect(2).mount(&server).await;
    let dir = TempDir::new().unwrap();
    let router = test_router(&server.uri(), &["A", "B"], dir.path());

    let (status, body) = get_json(&router, "/api/trending?region=US").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn test_no_keys_is_non_retryable_503() {
    let dir = TempDir::new().unwrap();
    let router = test_router("http://127.0.0.1:9", &[], dir.path());

    let (status, body) = get_json(&router, "/api/trending").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn test_upstream_failure_is_502() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(500)).mount(&server).await;
    let dir = TempDir::new().unwrap();
    let router = test_router(&server.uri(), &["A"], dir.path());

    let (status, body) = get_json(&router, "/api/channels/UC1").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_blank_search_is_400() {
    let dir = TempDir::new().unwrap();
    let router = test_router("http://127.0.0.1:9", &["A"], dir.path());

    let (status, _) = get_json(&router, "/api/search?q=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_video_statistics_is_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let router = test_router(&server.uri(), &["A"], dir.path());

    let (status, _) = get_json(&router, "/api/videos/missing/statistics").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_record_list_clear() {
    let dir = TempDir::new().unwrap();
    let router = test_router("http://127.0.0.1:9", &["A"], dir.path());

    let watch = |id: &str| json!({"itemId": id, "title": format!("T {id}"), "ownerLabel": "Chan"});
    let (status, _) = post_json(&router, "/api/history", &watch("a")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = post_json(&router, "/api/history", &watch("b")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    let (_, body) = post_json(&router, "/api/history", &watch("a")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["itemId"], "a");

    let (status, body) = get_json(&router, "/api/history?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let request = Request::builder().method(Method::DELETE).uri("/api/history").body(Body::empty()).unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get_json(&router, "/api/history").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_history_rejects_blank_item_id() {
    let dir = TempDir::new().unwrap();
    let router = test_router("http://127.0.0.1:9", &["A"], dir.path());

    let (status, _) =
        post_json(&router, "/api/history", &json!({"itemId": "  ", "title": "t", "ownerLabel": "o"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_static_files_with_spa_fallback() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>tubeshelf</h1>").unwrap();
    std::fs::write(dir.path().join("script.js"), "console.log(1);").unwrap();
    let router = test_router("http://127.0.0.1:9", &["A"], dir.path());

    let request = Request::builder().uri("/script.js").body(Body::empty()).unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log(1);");

    let request = Request::builder().uri("/watch/some-video").body(Body::empty()).unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>tubeshelf</h1>");
}

#[tokio::test]
async fn test_storage_failure_is_500_and_list_unchanged() {
    let dir = TempDir::new().unwrap();
    let router = test_router_with_store("http://127.0.0.1:9", &["A"], dir.path(), Arc::new(BrokenDisk));

    let (status, body) =
        post_json(&router, "/api/history", &json!({"itemId": "a", "title": "t", "ownerLabel": "o"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");
    assert!(!body.to_string().contains("disk full"));

    let (status, body) = get_json(&router, "/api/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let request = Request::builder().method(Method::DELETE).uri("/api/history").body(Body::empty()).unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_malformed_history_body_is_json_400() {
    let dir = TempDir::new().unwrap();
    let router = test_router("http://127.0.0.1:9", &["A"], dir.path());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/history")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&router, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(body["retryable"], false);

    let (status, body) = post_json(&router, "/api/history", &json!({"title": "no id"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>tubeshelf</h1>").unwrap();
    let router = test_router("http://127.0.0.1:9", &["A"], dir.path());

    let (status, body) = get_json(&router, "/api/trendin").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_security_headers_on_static_and_api_responses() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>tubeshelf</h1>").unwrap();
    let router = test_router("http://127.0.0.1:9", &["A"], dir.path());

    for uri in ["/index.html", "/api/history"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let headers = response.headers();
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff", "{uri}");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY", "{uri}");
        assert_eq!(headers[header::X_XSS_PROTECTION], "1; mode=block", "{uri}");
    }
}
