//! Time-windowed response cache with an injectable clock

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::types::SearchResponse;

/// Source of "now" for cache ageing
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Clock backed by `tokio::time`, so paused test runtimes control it too.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        self.origin + offset
    }
}

struct CacheEntry {
    stored_at: Instant,
    response: SearchResponse,
}

/// Search responses keyed by [`SearchQuery::cache_key`](crate::SearchQuery::cache_key).
///
/// An entry is fresh while younger than `ttl`. Entries are kept until they
/// are older than `retention` so they can still serve as a fallback.
pub struct SearchCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    retention: Duration,
    clock: Arc<dyn Clock>,
}

impl SearchCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            retention: ttl,
            clock,
        }
    }

    /// Keep expired entries around for `retention` (never less than the TTL).
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention.max(self.ttl);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn age(&self, entry: &CacheEntry) -> Duration {
        self.clock.now().saturating_duration_since(entry.stored_at)
    }

    /// Fresh entry for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&SearchResponse> {
        self.get_within(key, self.ttl)
    }

    /// Entry for `key` younger than `max_age`, fresh or not.
    pub fn get_within(&self, key: &str, max_age: Duration) -> Option<&SearchResponse> {
        self.entries
            .get(key)
            .filter(|entry| self.age(entry) < max_age)
            .map(|entry| &entry.response)
    }

    pub fn insert(&mut self, key: String, response: SearchResponse) {
        let stored_at = self.clock.now();
        self.entries.insert(key, CacheEntry { stored_at, response });
    }

    /// Drop entries past the retention window. Returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let retention = self.retention;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < retention);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for SearchCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .field("retention", &self.retention)
            .finish()
    }
}
