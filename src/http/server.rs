//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, body limit, API key)
//! - Bind server to listener
//! - Stop accepting on the shared shutdown signal, then drain in-flight
//!   requests for at most `server.shutdown_timeout_secs`

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::blocklist::DomainCache;
use crate::config::WebhookConfig;
use crate::http::auth::require_api_key;
use crate::http::handlers::{health, method_not_allowed, status, validate_email};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::response::panic_response;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DomainCache>,
    pub api_key: Arc<str>,
}

/// HTTP server for the webhook.
pub struct HttpServer {
    router: Router,
    shutdown_timeout: Duration,
}

impl HttpServer {
    /// Create a new HTTP server answering from `cache`.
    pub fn new(config: WebhookConfig, cache: Arc<DomainCache>) -> Self {
        let state = AppState {
            cache,
            api_key: Arc::from(config.webhook.api_key.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            shutdown_timeout: Duration::from_secs(config.server.shutdown_timeout_secs),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &WebhookConfig, state: AppState) -> Router {
        let protected = Router::new()
            .route(
                "/v1/validate/email",
                post(validate_email).fallback(method_not_allowed),
            )
            .route("/v1/status", get(status))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

        Router::new()
            .route("/health", get(health))
            .merge(protected)
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(DefaultBodyLimit::max(config.server.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(set_request_id_layer())
    }

    /// Router with all layers applied, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    ///
    /// Once the signal arrives, open requests get `shutdown_timeout` to
    /// finish; connections still busy after that are dropped.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let (draining_tx, draining_rx) = oneshot::channel::<()>();
        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
                let _ = draining_tx.send(());
            })
            .into_future();

        let grace = self.shutdown_timeout;
        let deadline = async move {
            match draining_rx.await {
                Ok(()) => tokio::time::sleep(grace).await,
                Err(_) => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            res = serve => res?,
            _ = deadline => {
                tracing::warn!(
                    timeout_secs = grace.as_secs(),
                    "Shutdown timeout reached, dropping open connections"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
