#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use question_service::services::InMemoryQuestionStore;
use question_service::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Router wired to an in-memory store the test can inspect directly.
pub struct TestApp {
    pub router: Router,
    pub store: InMemoryQuestionStore,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not UTF-8")
    }
}

impl TestApp {
    pub fn spawn() -> Self {
        let store = InMemoryQuestionStore::new();
        let state = AppState::new(Arc::new(store.clone()));
        let router = build_router(state, &[TEST_ORIGIN.to_string()]);
        TestApp { router, store }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a question and return its id.
    pub async fn create(&self, body: Value) -> String {
        let response = self.post_json("/questions", body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()["_id"]
            .as_str()
            .expect("Missing _id")
            .to_string()
    }
}

pub fn question_body(subject: &str, text: &str) -> Value {
    json!({
        "subject": subject,
        "text": text,
        "choices": ["A", "B", "C", "D"],
        "answerIndex": 1
    })
}
