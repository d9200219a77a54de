use super::*;
use crate::downloader::test_helpers::{MockBehavior, MockExtractor, create_test_downloader_with};
use crate::extractors::ExtractorRegistry;
use crate::Config;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

mod files;

/// Router over a mock-backed downloader
///
/// The tempdir must be kept alive; the download root is `<tempdir>/downloads`.
fn create_test_app(
    configure: impl FnOnce(&mut Config),
) -> (Router, Arc<SocialDownloader>, tempfile::TempDir, Arc<MockExtractor>) {
    let (downloader, temp_dir, youtube, _fallback) = create_test_downloader_with(configure);
    let downloader = Arc::new(downloader);
    (create_router(Arc::clone(&downloader)), downloader, temp_dir, youtube)
}

/// Router whose every platform goes to a collaborator that takes `delay`
fn create_slow_app(delay: Duration) -> (Router, Arc<SocialDownloader>, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.download.download_dir = temp_dir.path().join("downloads");

    let slow = MockExtractor::new("slow", "Slow", MockBehavior::SlowVideo(delay));
    let registry = ExtractorRegistry::new(slow);
    let downloader = Arc::new(SocialDownloader::with_registry(config, registry).unwrap());
    (create_router(Arc::clone(&downloader)), downloader, temp_dir)
}

/// Poll the index until `folders` session folders each hold one video
async fn wait_for_finished_folders(downloader: &SocialDownloader, folders: usize) -> bool {
    for _ in 0..100 {
        let entries = downloader.index().list().await.unwrap();
        if entries.len() == folders && entries.iter().all(|e| e.file_count == Some(1)) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

fn empty_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_api_server_stops_on_shutdown_signal() {
    let (downloader, _temp_dir, _youtube, _fallback) = create_test_downloader_with(|config| {
        // Port 0 = OS assigns a free port
        config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    });
    let downloader = Arc::new(downloader);

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(start_api_server_with_shutdown(downloader, async move {
        rx.await.ok();
    }));

    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_headers_present_when_enabled() {
    let (app, _downloader, _temp_dir, _youtube) = create_test_app(|_| {});

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_cors_headers_absent_when_disabled() {
    let (app, _downloader, _temp_dir, _youtube) =
        create_test_app(|config| config.server.api.cors_enabled = false);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_api_key_guards_every_route() {
    let (app, _downloader, _temp_dir, youtube) =
        create_test_app(|config| config.server.api.api_key = Some("test-secret-key".into()));

    let response = app.clone().oneshot(empty_request("/downloads")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "unauthorized");

    let response = app
        .clone()
        .oneshot(json_request(
            "/download",
            r#"{"url": "https://youtu.be/abc"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(youtube.calls().is_empty());

    let request = Request::builder()
        .uri("/health")
        .header("X-Api-Key", "test-secret-key")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_swagger_ui_toggle() {
    let (app, _downloader, _temp_dir, _youtube) = create_test_app(|_| {});
    let response = app.oneshot(empty_request("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (app, _downloader, _temp_dir, _youtube) =
        create_test_app(|config| config.server.api.swagger_ui = false);
    let response = app.oneshot(empty_request("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _downloader, _temp_dir, _youtube) = create_test_app(|_| {});
    let response = app.oneshot(empty_request("/queue/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
