//! Webhook endpoint handlers.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::blocklist::{CacheSnapshot, LookupError};
use crate::http::response::{error_response, WebhookResponse};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Body sent by the identity provider.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    #[serde(flatten)]
    pub cache: CacheSnapshot,
}

/// `GET /health`: pass once a domain list has been loaded.
pub async fn health(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let (code, status) = if state.cache.is_ready() {
        (StatusCode::OK, "pass")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "fail")
    };

    metrics::record_request("health", code.as_u16(), start);
    (
        code,
        [(header::CONTENT_TYPE, "application/health+json")],
        Json(HealthResponse { status }),
    )
        .into_response()
}

/// `POST /v1/validate/email`: interrupt the flow for disposable addresses.
pub async fn validate_email(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let response = check_email(&state, body);
    metrics::record_request("validate", response.status().as_u16(), start);
    response
}

fn check_email(state: &AppState, body: Result<Bytes, BytesRejection>) -> Response {
    let request: ValidateRequest = match body
        .map_err(|e| e.to_string())
        .and_then(|bytes| serde_json::from_slice(&bytes).map_err(|e| e.to_string()))
    {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, "Failed to decode request");
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    // Missing, null and "" all count as no email.
    let email = request.email.unwrap_or_default();
    if email.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Email is required");
    }

    let verdict = match state.cache.is_disposable(&email) {
        Ok(verdict) => verdict,
        Err(LookupError::InvalidEmail) => {
            tracing::error!(email = %email, "Failed to check email: invalid format");
            return error_response(StatusCode::BAD_REQUEST, "Invalid email format");
        }
    };

    if verdict.disposable {
        tracing::info!(
            email = %email,
            domain = %verdict.domain,
            "Disposable email detected"
        );
        return (
            StatusCode::BAD_REQUEST,
            Json(WebhookResponse::disposable(&email, &verdict.domain)),
        )
            .into_response();
    }

    tracing::info!(email = %email, "Email validated successfully");
    StatusCode::OK.into_response()
}

/// `GET /v1/status`: cache state for operators.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        cache: state.cache.snapshot(),
    })
}

/// Any method other than POST on the validation route.
pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
