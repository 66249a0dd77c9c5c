//! In-memory transport for exercising the cache without a network.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::blocklist::error::{FetchError, FetchResult};
use crate::blocklist::source::{SourceTransport, TransportResponse};

#[derive(Debug, Clone)]
enum Scripted {
    Respond(TransportResponse),
    Refuse,
    Delay(Duration),
}

type TokenLog = Arc<Mutex<Vec<(String, Option<String>)>>>;

/// Replays scripted responses per URL.
///
/// Responses are consumed in order; the last one for a URL keeps repeating.
/// URLs with nothing scripted behave like a refused connection.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
    seen: TokenLog,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, url: &str, scripted: Scripted) {
        self.scripts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(scripted);
    }

    pub fn push_ok(&self, url: &str, body: &str, etag: Option<&str>) {
        self.push(
            url,
            Scripted::Respond(TransportResponse {
                status: StatusCode::OK,
                etag: etag.map(str::to_string),
                body: body.to_string(),
            }),
        );
    }

    pub fn push_not_modified(&self, url: &str) {
        self.push_status(url, StatusCode::NOT_MODIFIED);
    }

    pub fn push_status(&self, url: &str, status: StatusCode) {
        self.push(
            url,
            Scripted::Respond(TransportResponse {
                status,
                etag: None,
                body: String::new(),
            }),
        );
    }

    pub fn push_refused(&self, url: &str) {
        self.push(url, Scripted::Refuse);
    }

    pub fn push_delayed(&self, url: &str, delay: Duration) {
        self.push(url, Scripted::Delay(delay));
    }

    /// Every `(url, token)` pair the transport was called with, in order.
    pub fn seen_tokens(&self) -> TokenLog {
        self.seen.clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.seen.lock().unwrap().iter().filter(|(u, _)| u == url).count()
    }

    fn next(&self, url: &str) -> Option<Scripted> {
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl SourceTransport for ScriptedTransport {
    async fn get(&self, url: &str, etag: Option<&str>) -> FetchResult<TransportResponse> {
        self.seen
            .lock()
            .unwrap()
            .push((url.to_string(), etag.map(str::to_string)));

        match self.next(url) {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Delay(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(TransportResponse {
                    status: StatusCode::OK,
                    etag: None,
                    body: "slow.example\n".to_string(),
                })
            }
            Some(Scripted::Refuse) | None => Err(FetchError::Request {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}
