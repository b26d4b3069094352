use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

pub const ROOT_MESSAGE: &str = "✅ Quiz API is up and running!";

/// Plain-text liveness message on `/`.
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Store-aware health check for load balancers and orchestrators.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "question-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "question-service",
                "error": e.to_string()
            })),
        ),
    }
}
