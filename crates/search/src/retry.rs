//! Bounded retry for rate-limited searches

use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::backend::SearchBackend;
use crate::error::{Result, SearchError};
use crate::query::SearchQuery;
use crate::types::SearchResponse;

/// Linear backoff: the n-th retry waits `n * base_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Never retry.
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Run `query`, retrying only on 429 responses.
pub(crate) async fn fetch_with_retry(
    backend: &dyn SearchBackend,
    query: &SearchQuery,
    policy: RetryPolicy,
) -> Result<SearchResponse> {
    let mut retries = 0;
    loop {
        match backend.fetch(query).await {
            Err(SearchError::RateLimited { retry_after, .. }) => {
                if retries >= policy.max_retries {
                    return Err(SearchError::RateLimited {
                        attempts: retries + 1,
                        retry_after,
                    });
                }
                retries += 1;
                let delay = policy.delay_for(retries);
                warn!(
                    attempt = retries,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "search rate limited, backing off"
                );
                sleep(delay).await;
            }
            other => return other,
        }
    }
}
