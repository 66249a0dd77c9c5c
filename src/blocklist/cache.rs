//! Disposable domain cache: state, refresh orchestration and lookups.
//!
//! # Lock Discipline
//! ```text
//! lookup / is_ready      → read lock, answer, release
//! refresh                → read lock (copy token) → fetch, no lock held
//!                        → write lock only to swap the new state in
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::blocklist::domains::DomainSet;
use crate::blocklist::email::extract_domain;
use crate::blocklist::error::{FetchError, LookupError, RefreshError};
use crate::blocklist::source::{FetchOutcome, HttpTransport, SourceFetcher};
use crate::config::SourcesConfig;
use crate::observability::metrics;

/// Answer to "is this email's domain disposable?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub disposable: bool,
    /// Extracted, normalized domain.
    pub domain: String,
}

/// How a refresh cycle that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A source delivered a new list which is now being served.
    Updated { source: String, domains: usize },
    /// A source reported no change and the current list stays.
    NotModified { source: String },
}

/// Point-in-time view of the cache for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    pub ready: bool,
    pub domains: usize,
    pub last_refresh_age_secs: Option<u64>,
    pub sources: Vec<String>,
    pub sources_with_token: usize,
}

#[derive(Debug, Default)]
struct CacheState {
    domains: Arc<DomainSet>,
    last_refresh: Option<Instant>,
    ready: bool,
    /// Validator token per source URL.
    etags: HashMap<String, String>,
}

/// Concurrently readable set of disposable domains refreshed from remote lists.
#[derive(Debug)]
pub struct DomainCache {
    sources: Vec<String>,
    fetcher: SourceFetcher,
    state: RwLock<CacheState>,
}

impl DomainCache {
    /// Create an empty, not-ready cache. `sources` are tried in order.
    pub fn new(sources: Vec<String>, fetcher: SourceFetcher) -> Self {
        Self {
            sources,
            fetcher,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Build a cache that fetches over HTTP using the configured sources.
    pub fn from_config(config: &SourcesConfig) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::new()?;
        let fetcher = SourceFetcher::new(
            Arc::new(transport),
            Duration::from_secs(config.fetch_timeout_secs),
        );
        Ok(Self::new(config.urls.clone(), fetcher))
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check whether the domain of `email` is a known disposable domain.
    ///
    /// Until the first successful load the answer is always "not disposable".
    pub fn is_disposable(&self, email: &str) -> Result<Verdict, LookupError> {
        let domain = extract_domain(email)?;

        let state = self.read();
        if !state.ready {
            drop(state);
            tracing::warn!(
                domain = %domain,
                "Domain list not loaded yet, allowing request (fail open)"
            );
            metrics::record_lookup("fail_open");
            return Ok(Verdict {
                disposable: false,
                domain,
            });
        }

        let disposable = state.domains.contains(&domain);
        drop(state);

        metrics::record_lookup(if disposable { "disposable" } else { "allowed" });
        Ok(Verdict { disposable, domain })
    }

    /// Whether at least one list has ever been loaded.
    pub fn is_ready(&self) -> bool {
        self.read().ready
    }

    /// Instant of the last successful (or not-modified) refresh.
    pub fn last_refresh(&self) -> Option<Instant> {
        self.read().last_refresh
    }

    /// Number of domains currently served.
    pub fn domain_count(&self) -> usize {
        self.read().domains.len()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let state = self.read();
        CacheSnapshot {
            ready: state.ready,
            domains: state.domains.len(),
            last_refresh_age_secs: state.last_refresh.map(|t| t.elapsed().as_secs()),
            sources: self.sources.clone(),
            sources_with_token: state.etags.len(),
        }
    }

    /// Run one refresh cycle.
    ///
    /// Sources are tried in order until one yields a list (or reports "not
    /// modified" while data is already loaded). When every source fails the
    /// current list, if any, keeps being served.
    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        let total = self.sources.len();
        tracing::info!(sources = total, "Refreshing disposable domain list");

        let mut last_err: Option<FetchError> = None;

        for (i, url) in self.sources.iter().enumerate() {
            tracing::info!(url = %url, attempt = i + 1, total, "Fetching disposable domains");

            let etag = self.read().etags.get(url).cloned();

            match self.fetcher.fetch(url, etag.as_deref()).await {
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Failed to fetch source, trying next");
                    metrics::record_source_fetch(e.kind());
                    last_err = Some(e);
                }
                Ok(FetchOutcome::NotModified) => {
                    metrics::record_source_fetch("not_modified");
                    let ready = {
                        let mut state = self.write();
                        if state.ready {
                            state.last_refresh = Some(Instant::now());
                        }
                        state.ready
                    };
                    if ready {
                        tracing::info!(source_url = %url, "Disposable domain list not modified");
                        metrics::record_refresh("not_modified");
                        return Ok(RefreshOutcome::NotModified { source: url.clone() });
                    }
                    tracing::warn!(
                        url = %url,
                        "Source reported not modified but no list is loaded yet, trying next"
                    );
                }
                Ok(FetchOutcome::Fetched { domains, etag }) => {
                    metrics::record_source_fetch("ok");
                    let count = domains.len();
                    {
                        let mut state = self.write();
                        state.domains = Arc::new(domains);
                        state.last_refresh = Some(Instant::now());
                        state.ready = true;
                        if let Some(tag) = etag {
                            state.etags.insert(url.clone(), tag);
                        }
                    }

                    tracing::info!(
                        source_url = %url,
                        domains_count = count,
                        "Disposable domain list refreshed"
                    );
                    metrics::record_refresh("updated");
                    metrics::record_domains_loaded(count);
                    metrics::record_cache_ready(true);
                    return Ok(RefreshOutcome::Updated {
                        source: url.clone(),
                        domains: count,
                    });
                }
            }
        }

        self.report_all_failed(last_err.as_ref());
        metrics::record_refresh("failed");
        Err(RefreshError::AllSourcesFailed {
            attempted: total,
            last: last_err,
        })
    }

    fn report_all_failed(&self, last_err: Option<&FetchError>) {
        let (ready, count, last_refresh) = {
            let state = self.read();
            (state.ready, state.domains.len(), state.last_refresh)
        };
        let error = last_err.map(ToString::to_string).unwrap_or_default();

        if ready {
            tracing::error!(
                error = %error,
                urls_tried = self.sources.len(),
                old_domains_count = count,
                data_age_secs = last_refresh.map(|t| t.elapsed().as_secs()).unwrap_or_default(),
                "All disposable list sources failed, continuing with old data"
            );
        } else {
            tracing::error!(
                error = %error,
                urls_tried = self.sources.len(),
                "All disposable list sources failed, running in degraded mode (allowing all)"
            );
        }
    }

    #[cfg(test)]
    fn domains_handle(&self) -> Arc<DomainSet> {
        self.read().domains.clone()
    }

    #[cfg(test)]
    fn etag_for(&self, url: &str) -> Option<String> {
        self.read().etags.get(url).cloned()
    }
}
