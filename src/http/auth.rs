//! API key authentication for the webhook endpoints.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use subtle::ConstantTimeEq;

use crate::http::response::error_response;
use crate::http::server::AppState;

pub const X_API_KEY: &str = "x-api-key";

pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(X_API_KEY)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if provided.is_empty() {
        tracing::warn!(
            path = %request.uri().path(),
            method = %request.method(),
            "Missing API key"
        );
        return error_response(StatusCode::UNAUTHORIZED, "Missing API key");
    }

    let matches: bool = provided.as_bytes().ct_eq(state.api_key.as_bytes()).into();
    if !matches {
        tracing::warn!(
            path = %request.uri().path(),
            method = %request.method(),
            "Invalid API key"
        );
        return error_response(StatusCode::UNAUTHORIZED, "Invalid API key");
    }

    next.run(request).await
}
