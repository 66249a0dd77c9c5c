//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use disposable_webhook::blocklist::{DomainCache, HttpTransport, SourceFetcher};
use disposable_webhook::config::WebhookConfig;
use disposable_webhook::http::HttpServer;
use disposable_webhook::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";

/// Start a list server answering `GET {route}` with `body`.
pub async fn start_list_server(route: &str, body: &str, etag: Option<&str>) -> MockServer {
    let server = MockServer::start().await;
    let mut response = ResponseTemplate::new(200).set_body_string(body);
    if let Some(tag) = etag {
        response = response.insert_header("ETag", tag);
    }
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

/// Start a list server that always answers with `status`.
pub async fn start_failing_server(route: &str, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

/// HTTP-backed cache over `sources` with a short fetch timeout.
pub fn http_cache(sources: Vec<String>) -> Arc<DomainCache> {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    let fetcher = SourceFetcher::new(
        Arc::new(HttpTransport::with_client(client)),
        Duration::from_secs(2),
    );
    Arc::new(DomainCache::new(sources, fetcher))
}

pub fn test_config(sources: Vec<String>) -> WebhookConfig {
    let mut config = WebhookConfig::default();
    config.webhook.api_key = API_KEY.to_string();
    config.sources.urls = sources;
    config
}

/// Bind an ephemeral port and serve the webhook until `shutdown` fires.
pub async fn spawn_server(cache: Arc<DomainCache>, shutdown: &Shutdown) -> SocketAddr {
    let config = test_config(cache.sources().to_vec());
    spawn_server_with(config, cache, shutdown).await.0
}

/// Like `spawn_server`, with an explicit config and the server task handle.
pub async fn spawn_server_with(
    config: WebhookConfig,
    cache: Arc<DomainCache>,
    shutdown: &Shutdown,
) -> (SocketAddr, JoinHandle<std::io::Result<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config, cache);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    (addr, handle)
}

/// Raw validation request that promises `declared_len` body bytes but only
/// sends `partial`, leaving the handler waiting for the rest.
pub fn stalled_validate_request(partial: &str, declared_len: usize) -> String {
    format!(
        "POST /v1/validate/email HTTP/1.1\r\n\
         Host: localhost\r\n\
         x-api-key: {}\r\n\
         content-type: application/json\r\n\
         content-length: {}\r\n\r\n{}",
        API_KEY, declared_len, partial
    )
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
