//! Configuration options for the Vitrina client

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};
use vitrina_catalog::CatalogOptions;
use vitrina_search::{RetryPolicy, SearchOptions};

/// Configuration options for the Vitrina client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// `User-Agent` sent with every request
    pub user_agent: String,

    /// Search results per page
    pub page_size: u32,

    /// Lifetime of a cached search page
    pub search_cache_ttl: Duration,

    /// Maximum age of a cached search page served while rate limited
    pub stale_window: Duration,

    /// Quiet period before a debounced search fires
    pub debounce_delay: Duration,

    /// Retries after a 429 response
    pub max_retries: u32,

    /// Retry `n` waits `n * retry_base_delay`
    pub retry_base_delay: Duration,

    /// Lifetime of cached catalog details
    pub catalog_cache_ttl: Duration,

    /// Maximum number of cached catalog entries
    pub catalog_cache_capacity: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        let search = SearchOptions::default();
        let catalog = CatalogOptions::default();
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            user_agent: concat!("vitrina-rust/", env!("CARGO_PKG_VERSION")).to_string(),
            page_size: search.page_size,
            search_cache_ttl: search.cache_ttl,
            stale_window: search.stale_window,
            debounce_delay: search.debounce_delay,
            max_retries: search.retry.max_retries,
            retry_base_delay: search.retry.base_delay,
            catalog_cache_ttl: catalog.cache_ttl,
            catalog_cache_capacity: catalog.cache_capacity,
        }
    }
}

impl ClientOptions {
    /// Defaults overlaid with `VITRINA_*` environment variables.
    ///
    /// | variable | field |
    /// |---|---|
    /// | `VITRINA_REQUEST_TIMEOUT_MS` | `request_timeout` (`0` disables it) |
    /// | `VITRINA_USER_AGENT` | `user_agent` |
    /// | `VITRINA_PAGE_SIZE` | `page_size` |
    /// | `VITRINA_SEARCH_CACHE_TTL_SECS` | `search_cache_ttl` |
    /// | `VITRINA_STALE_WINDOW_SECS` | `stale_window` |
    /// | `VITRINA_DEBOUNCE_MS` | `debounce_delay` |
    /// | `VITRINA_MAX_RETRIES` | `max_retries` |
    /// | `VITRINA_RETRY_BASE_MS` | `retry_base_delay` |
    /// | `VITRINA_CATALOG_CACHE_TTL_SECS` | `catalog_cache_ttl` |
    /// | `VITRINA_CATALOG_CACHE_CAPACITY` | `catalog_cache_capacity` |
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(ms) = try_load::<u64, _>(&lookup, "VITRINA_REQUEST_TIMEOUT_MS") {
            options.request_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(agent) = lookup("VITRINA_USER_AGENT").filter(|v| !v.trim().is_empty()) {
            options.user_agent = agent;
        }
        if let Some(size) = try_load(&lookup, "VITRINA_PAGE_SIZE") {
            options.page_size = size;
        }
        if let Some(secs) = try_load(&lookup, "VITRINA_SEARCH_CACHE_TTL_SECS") {
            options.search_cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = try_load(&lookup, "VITRINA_STALE_WINDOW_SECS") {
            options.stale_window = Duration::from_secs(secs);
        }
        if let Some(ms) = try_load(&lookup, "VITRINA_DEBOUNCE_MS") {
            options.debounce_delay = Duration::from_millis(ms);
        }
        if let Some(retries) = try_load(&lookup, "VITRINA_MAX_RETRIES") {
            options.max_retries = retries;
        }
        if let Some(ms) = try_load(&lookup, "VITRINA_RETRY_BASE_MS") {
            options.retry_base_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = try_load(&lookup, "VITRINA_CATALOG_CACHE_TTL_SECS") {
            options.catalog_cache_ttl = Duration::from_secs(secs);
        }
        if let Some(capacity) = try_load(&lookup, "VITRINA_CATALOG_CACHE_CAPACITY") {
            options.catalog_cache_capacity = capacity;
        }

        options
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    pub fn with_user_agent(mut self, value: &str) -> Self {
        self.user_agent = value.to_string();
        self
    }

    pub fn with_page_size(mut self, value: u32) -> Self {
        self.page_size = value;
        self
    }

    pub fn with_search_cache_ttl(mut self, value: Duration) -> Self {
        self.search_cache_ttl = value;
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

    /// Set the retry count and base delay used after 429 responses
    pub fn with_retry(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_base_delay = base_delay;
        self
    }

    pub fn with_catalog_cache_ttl(mut self, value: Duration) -> Self {
        self.catalog_cache_ttl = value;
        self
    }

    pub fn with_catalog_cache_capacity(mut self, value: u64) -> Self {
        self.catalog_cache_capacity = value;
        self
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::default()
            .with_page_size(self.page_size)
            .with_cache_ttl(self.search_cache_ttl)
            .with_stale_window(self.stale_window)
            .with_debounce_delay(self.debounce_delay)
            .with_retry(RetryPolicy::new(self.max_retries, self.retry_base_delay))
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions::default()
            .with_cache_ttl(self.catalog_cache_ttl)
            .with_cache_capacity(self.catalog_cache_capacity)
            .with_request_timeout(self.request_timeout)
    }
}

fn try_load<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => {
            debug!("{key} loaded from environment");
            Some(value)
        }
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}, using default");
            None
        }
    }
}
