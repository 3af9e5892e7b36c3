//! Resilience primitives for fetching.

use std::sync::Arc;
use std::time::Duration;

use backon::ExponentialBuilder;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Default number of requests allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Caps the number of concurrent outbound requests.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl ConcurrencyLimiter {
    /// A limiter allowing `limit` requests at once (at least one).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Waits for a free slot. The slot is released when the permit drops.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        // `acquire_owned` only returns `Err` when the semaphore is closed,
        // which we never do, so `expect` is safe here.
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("concurrency-limiter semaphore unexpectedly closed")
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}

/// Backoff for transient fetch failures: up to three retries, starting at
/// half a second.
pub fn retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(8))
        .with_max_times(3)
}
