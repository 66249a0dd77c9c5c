//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the domain cache and run its first refresh
//! - Start background tasks (list refresher, metrics exporter)
//! - Bind the listener and serve until a stop signal
//!
//! # Design Decisions
//! - A failed first refresh is not a startup error (fail-open mode)
//! - Bind and client construction errors are fatal
//! - Listener starts after the first refresh attempt

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::blocklist::{DomainCache, RefreshScheduler};
use crate::config::WebhookConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Errors that stop the service from starting or keep it from running.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Run the webhook service until SIGINT/SIGTERM.
pub async fn run(config: WebhookConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.server.bind_address,
        refresh_interval_secs = config.sources.refresh_interval_secs,
        list_urls_count = config.sources.urls.len(),
        "Starting disposable email webhook"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
    metrics::record_cache_ready(false);

    let cache = Arc::new(DomainCache::from_config(&config.sources)?);
    let shutdown = Shutdown::new();

    let refresher = RefreshScheduler::new(
        cache.clone(),
        Duration::from_secs(config.sources.refresh_interval_secs),
    )
    .start(shutdown.subscribe())
    .await;

    let address = config.server.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let server = HttpServer::new(config, cache);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let finished_early = tokio::select! {
        res = &mut server_task => Some(res),
        _ = signals::trigger_on_signal(&shutdown) => None,
    };
    let served = match finished_early {
        Some(res) => res,
        None => server_task.await,
    };

    // Stop the refresher even if the server exited on its own.
    shutdown.trigger();
    refresher.await?;

    served??;
    tracing::info!("Shutdown complete");
    Ok(())
}
