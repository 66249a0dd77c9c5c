//! Fetching a single domain list source.
//!
//! # Responsibilities
//! - Issue a time-bounded GET for one source URL
//! - Send the stored validator token as `If-None-Match`
//! - Turn the response into "not modified", a parsed `DomainSet`, or an error
//!
//! # Design Decisions
//! - The network call sits behind `SourceTransport` so the cache can be driven
//!   by an in-memory transport in tests
//! - The deadline wraps headers and body together
//! - Fetching never touches cache state

use async_trait::async_trait;
use reqwest::header::{ETAG, IF_NONE_MATCH, USER_AGENT};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blocklist::domains::DomainSet;
use crate::blocklist::error::{FetchError, FetchResult};

/// Raw answer from a source, before any interpretation.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    /// Validator token supplied by the source, if any.
    pub etag: Option<String>,
    /// Body text. Only read for 200 responses.
    pub body: String,
}

/// Performs the actual network GET for a source.
#[async_trait]
pub trait SourceTransport: Send + Sync {
    async fn get(&self, url: &str, etag: Option<&str>) -> FetchResult<TransportResponse>;
}

/// `SourceTransport` backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceTransport for HttpTransport {
    async fn get(&self, url: &str, etag: Option<&str>) -> FetchResult<TransportResponse> {
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, concat!("disposable-webhook/", env!("CARGO_PKG_VERSION")));
        if let Some(tag) = etag {
            request = request.header(IF_NONE_MATCH, tag);
        }

        let response = request.send().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = if status == StatusCode::OK {
            response.text().await.map_err(|e| FetchError::Body {
                url: url.to_string(),
                reason: e.to_string(),
            })?
        } else {
            String::new()
        };

        Ok(TransportResponse { status, etag, body })
    }
}

/// Interpreted result of a successful round trip to a source.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The source has not changed since the token we sent.
    NotModified,
    /// Fresh list, plus the token to send next time.
    Fetched { domains: DomainSet, etag: Option<String> },
}

/// Fetches and parses one source at a time.
#[derive(Clone)]
pub struct SourceFetcher {
    transport: Arc<dyn SourceTransport>,
    timeout_duration: Duration,
}

impl SourceFetcher {
    pub fn new(transport: Arc<dyn SourceTransport>, timeout_duration: Duration) -> Self {
        Self {
            transport,
            timeout_duration,
        }
    }

    /// Fetch `url`, sending `etag` as a precondition when present.
    pub async fn fetch(&self, url: &str, etag: Option<&str>) -> FetchResult<FetchOutcome> {
        let response = match timeout(self.timeout_duration, self.transport.get(url, etag)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                    secs: self.timeout_duration.as_secs(),
                })
            }
        };

        match response.status {
            StatusCode::NOT_MODIFIED => Ok(FetchOutcome::NotModified),
            StatusCode::OK => {
                let domains = DomainSet::parse(&response.body);
                if domains.is_empty() {
                    return Err(FetchError::EmptyResult { url: url.to_string() });
                }
                Ok(FetchOutcome::Fetched {
                    domains,
                    etag: response.etag.filter(|t| !t.is_empty()),
                })
            }
            other => Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status: other.as_u16(),
            }),
        }
    }
}

impl std::fmt::Debug for SourceFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFetcher")
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
