//! Periodic refresh of the domain cache.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::blocklist::cache::DomainCache;
use crate::blocklist::error::RefreshError;

/// Drives `DomainCache::refresh` on a fixed interval.
pub struct RefreshScheduler {
    cache: Arc<DomainCache>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(cache: Arc<DomainCache>, interval: Duration) -> Self {
        Self { cache, interval }
    }

    /// Run one refresh now, then spawn the background loop.
    ///
    /// Never fails: if the first load does not succeed the service keeps
    /// running in fail-open mode and the loop retries on the next tick.
    pub async fn start(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        if let Err(e) = self.cache.refresh().await {
            let e = RefreshError::InitialLoadFailed(Box::new(e));
            tracing::warn!(
                error = %e,
                urls_tried = self.cache.sources().len(),
                "Starting without a domain list, all emails are allowed until a load succeeds"
            );
        }

        tokio::spawn(self.run(shutdown))
    }

    async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Domain list refresher starting");

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.cache.refresh().await {
                        tracing::error!(error = %e, "Failed to refresh disposable domain list");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Domain list refresher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
