use std::time::Duration;

use crate::retry::RetryPolicy;

/// Tuning knobs for a [`SearchController`](crate::SearchController)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Results requested per page
    pub page_size: u32,
    /// How long a cached page is served without a request
    pub cache_ttl: Duration,
    /// How old a cached page may be when used as a fallback after rate limiting
    pub stale_window: Duration,
    /// Pause required before a debounced search fires
    pub debounce_delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        let cache_ttl = Duration::from_secs(60);
        Self {
            page_size: 50,
            cache_ttl,
            stale_window: cache_ttl * 5,
            debounce_delay: Duration::from_millis(500),
            retry: RetryPolicy::default(),
        }
    }
}

impl SearchOptions {
    pub fn with_page_size(mut self, value: u32) -> Self {
        self.page_size = value.max(1);
        self
    }

    pub fn with_cache_ttl(mut self, value: Duration) -> Self {
        self.cache_ttl = value;
        self
    }

    pub fn with_stale_window(mut self, value: Duration) -> Self {
        self.stale_window = value;
        self
    }

    pub fn with_debounce_delay(mut self, value: Duration) -> Self {
        self.debounce_delay = value;
        self
    }

    pub fn with_retry(mut self, value: RetryPolicy) -> Self {
        self.retry = value;
        self
    }
}
