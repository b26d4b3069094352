use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

/// Methods the API accepts cross-origin.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build a CORS layer restricted to `allowed_origins`.
///
/// Wildcards and origins that are not valid header values are logged and
/// skipped; the policy never widens to `*`.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(_) if o.trim() == "*" => {
                tracing::error!("Wildcard CORS origin is not allowed. Skipping.");
                None
            }
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
