mod common;

use axum::http::StatusCode;
use common::{question_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn bulk_create_persists_all_valid_records_in_order() {
    let app = TestApp::spawn();

    let response = app
        .post_json(
            "/questions/bulk",
            json!([
                question_body("Governance", "first"),
                question_body("Operations", "second"),
                question_body("Communications", "third"),
            ]),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let created = response.json();
    let created = created.as_array().unwrap();
    assert_eq!(created.len(), 3);
    let texts: Vec<&str> = created.iter().map(|q| q["text"].as_str().unwrap()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
    assert!(created.iter().all(|q| q["_id"].is_string()));

    let listed = app.get("/questions").await.json();
    assert_eq!(listed.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn bulk_create_rejects_empty_array() {
    let app = TestApp::spawn();

    let response = app.post_json("/questions/bulk", json!([])).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["error"],
        "Request body must be a non-empty array of questions"
    );
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn bulk_create_rejects_non_array_bodies() {
    let app = TestApp::spawn();

    for body in [
        question_body("Governance", "single object"),
        json!("questions"),
        json!(42),
        json!(null),
    ] {
        let response = app.post_json("/questions/bulk", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.json()["error"].is_string());
    }

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn bulk_create_stops_at_first_invalid_without_rollback() {
    let app = TestApp::spawn();

    let mut invalid = question_body("Governance", "bad");
    invalid["choices"] = json!(["A", "B", "C"]);

    let response = app
        .post_json(
            "/questions/bulk",
            json!([
                question_body("Governance", "one"),
                question_body("Operations", "two"),
                invalid,
                question_body("Operations", "never inserted"),
            ]),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let error = response.json()["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Question at index 2 is invalid"), "{}", error);
    assert!(error.contains("exactly 4 answer options"), "{}", error);

    let listed = app.get("/questions").await.json();
    let texts: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, ["one", "two"]);
}

#[tokio::test]
async fn bulk_create_reports_undecodable_entries() {
    let app = TestApp::spawn();

    let response = app
        .post_json(
            "/questions/bulk",
            json!([question_body("Governance", "ok"), "not an object"]),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"]
        .as_str()
        .unwrap()
        .starts_with("Question at index 1 is invalid"));
    assert_eq!(app.store.len().await, 1);
}
