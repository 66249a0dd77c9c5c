//! Disposable email webhook library.
//!
//! Keeps a refreshed list of disposable email domains in memory and answers
//! registration web-hooks with it.

pub mod blocklist;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use blocklist::{DomainCache, RefreshScheduler};
pub use config::schema::WebhookConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
