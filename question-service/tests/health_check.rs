mod common;

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use common::{TestApp, TEST_ORIGIN};

#[tokio::test]
async fn root_returns_plain_text_confirmation() {
    let app = TestApp::spawn();

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text(), "✅ Quiz API is up and running!");
}

#[tokio::test]
async fn health_check_reports_store_status() {
    let app = TestApp::spawn();

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "question-service");
}

#[tokio::test]
async fn metrics_endpoint_returns_text() {
    let app = TestApp::spawn();

    let response = app.get("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = TestApp::spawn();

    let response = app
        .send(
            Request::builder()
                .uri("/")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.headers["x-request-id"], "req-123");
    assert_eq!(response.headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers[header::X_FRAME_OPTIONS], "DENY");

    let generated = app.get("/").await;
    assert!(generated.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = TestApp::spawn();

    let response = app
        .send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/questions")
                .header(header::ORIGIN, TEST_ORIGIN)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert!(response.status.is_success());
    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        TEST_ORIGIN
    );
    let methods = response.headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_string();
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "missing {} in {}", method, methods);
    }
}

#[tokio::test]
async fn cors_rejects_unlisted_origin() {
    let app = TestApp::spawn();

    let response = app
        .send(
            Request::builder()
                .uri("/questions")
                .header(header::ORIGIN, "http://elsewhere.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert!(!response
        .headers
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
