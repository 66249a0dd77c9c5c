//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, per-request span)
//!     → auth.rs (X-API-Key, webhook routes only)
//!     → handlers.rs (decode body, ask the domain cache)
//!     → response.rs (web-hook message format)
//!     → Send to client
//! ```

pub mod auth;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
