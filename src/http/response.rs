//! Webhook response bodies.
//!
//! Errors use the identity provider's web-hook message format so that a
//! rejected registration shows the message next to the offending field.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::Any;

/// Message id shown for disposable addresses.
pub const DISPOSABLE_MESSAGE_ID: u32 = 4_000_001;

/// Top-level web-hook response.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<MessageGroup>,
}

/// Messages attached to one field of the submitted identity.
#[derive(Debug, Clone, Serialize)]
pub struct MessageGroup {
    pub instance_ptr: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: u32,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

impl WebhookResponse {
    /// Generic error attached to the document root; the id mirrors the status.
    pub fn error(status: StatusCode, text: &str) -> Self {
        Self {
            messages: vec![MessageGroup {
                instance_ptr: "#/".to_string(),
                messages: vec![Message {
                    id: u32::from(status.as_u16()),
                    text: text.to_string(),
                    kind: "error".to_string(),
                    context: None,
                }],
            }],
        }
    }

    /// Rejection of a disposable address, attached to the email trait.
    pub fn disposable(email: &str, domain: &str) -> Self {
        let mut context = Map::new();
        context.insert("email".to_string(), Value::from(email));
        context.insert("domain".to_string(), Value::from(domain));

        Self {
            messages: vec![MessageGroup {
                instance_ptr: "#/traits/email".to_string(),
                messages: vec![Message {
                    id: DISPOSABLE_MESSAGE_ID,
                    text: "Disposable email addresses are not allowed".to_string(),
                    kind: "error".to_string(),
                    context: Some(context),
                }],
            }],
        }
    }
}

/// JSON error response in the web-hook format.
pub fn error_response(status: StatusCode, text: &str) -> Response {
    (status, Json(WebhookResponse::error(status, text))).into_response()
}

/// Response for a handler that panicked, used by `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
