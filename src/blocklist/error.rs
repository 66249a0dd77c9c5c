//! Error taxonomy for the blocklist subsystem.

use thiserror::Error;

/// Failure to obtain a usable domain list from a single source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be built or the connection failed.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The source did not answer within the per-source deadline.
    #[error("request to {url} timed out after {secs} seconds")]
    Timeout { url: String, secs: u64 },

    /// Any status other than 200 or 304.
    #[error("unexpected status code {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The response body could not be read or decoded.
    #[error("failed to read body from {url}: {reason}")]
    Body { url: String, reason: String },

    /// The body parsed to zero usable domains.
    #[error("no domains found in the list from {url}")]
    EmptyResult { url: String },
}

impl FetchError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Request { .. } => "request",
            FetchError::Timeout { .. } => "timeout",
            FetchError::UnexpectedStatus { .. } => "status",
            FetchError::Body { .. } => "body",
            FetchError::EmptyResult { .. } => "empty",
        }
    }
}

/// Failure of a whole refresh cycle.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// Every configured source failed or could not help.
    #[error("all {attempted} sources failed, last error: {}", describe_last(.last))]
    AllSourcesFailed {
        attempted: usize,
        #[source]
        last: Option<FetchError>,
    },

    /// The synchronous refresh at startup did not load any data.
    #[error("initial load failed: {0}")]
    InitialLoadFailed(#[source] Box<RefreshError>),
}

fn describe_last(last: &Option<FetchError>) -> String {
    match last {
        Some(e) => e.to_string(),
        None => "none".to_string(),
    }
}

/// Malformed lookup input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("invalid email format")]
    InvalidEmail,
}

pub type FetchResult<T> = Result<T, FetchError>;
