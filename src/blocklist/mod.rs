//! Disposable domain blocklist subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     scheduler.rs runs one refresh synchronously
//!     → spawns the periodic loop (success or not)
//!
//! Every refresh (cache.rs):
//!     for each source, in configured order:
//!         source.rs GET (If-None-Match: stored ETag, per-source timeout)
//!         → 304: done if a list is loaded, else next source
//!         → 200: domains.rs parse → swap list under write lock → done
//!         → error: log, next source
//!     all failed → keep old list (or stay in fail-open mode)
//!
//! Request path:
//!     email.rs extract domain → cache.rs read-locked lookup
//! ```
//!
//! # Design Decisions
//! - Readiness is monotonic; a loaded list is never discarded
//! - Lookups fail open until the first successful load
//! - Network I/O never happens while the state lock is held
//! - Sources are tried sequentially, never fanned out

pub mod cache;
pub mod domains;
pub mod email;
pub mod error;
pub mod scheduler;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheSnapshot, DomainCache, RefreshOutcome, Verdict};
pub use domains::DomainSet;
pub use error::{FetchError, LookupError, RefreshError};
pub use scheduler::RefreshScheduler;
pub use source::{FetchOutcome, HttpTransport, SourceFetcher, SourceTransport, TransportResponse};
