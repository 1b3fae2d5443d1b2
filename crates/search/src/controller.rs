//! Search state controller
//!
//! Owns the filter/result state of one search UI, a TTL cache of result
//! pages, the debounce timer and the current-operation token used to cancel
//! superseded requests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::backend::SearchBackend;
use crate::cache::{Clock, SearchCache, TokioClock};
use crate::error::{Result, SearchError};
use crate::filters::SearchFilters;
use crate::options::SearchOptions;
use crate::query::SearchQuery;
use crate::retry::fetch_with_retry;
use crate::state::{ResultSource, SearchState};
use crate::types::{Pagination, SearchItem, SearchResponse};

/// Client-side search state with caching, debouncing and cancellation.
///
/// Cloning is cheap and every clone drives the same state. Methods that
/// schedule work (`debounced_search`, `spawn_cache_sweeper`) must be called
/// from within a Tokio runtime.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use vitrina_search::{HttpSearchBackend, SearchController, SearchFilters, SearchOptions};
///
/// # async fn run() -> vitrina_search::Result<()> {
/// let backend = HttpSearchBackend::new("https://tienda.example.com", reqwest::Client::new());
/// let search = SearchController::new(Arc::new(backend), SearchOptions::default());
///
/// search
///     .search(SearchFilters::new().with_query("reloj"), false, false)
///     .await?;
/// search.load_more().await?;
///
/// println!("{} results", search.state().results.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn SearchBackend>,
    options: SearchOptions,
    initial_filters: SearchFilters,
    cache: Mutex<SearchCache>,
    state: watch::Sender<SearchState>,
    // Incremented by every search and reset; only the holder of the current
    // value may commit.
    operation: watch::Sender<u64>,
    debounce: Mutex<Debounce>,
}

/// The debounced search still waiting for its delay. A task leaves the slot
/// once its delay elapses, so only sleeping tasks are ever aborted; a running
/// one is superseded through the operation token like any other search.
#[derive(Default)]
struct Debounce {
    generation: u64,
    pending: Option<(u64, JoinHandle<()>)>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn SearchBackend>, options: SearchOptions) -> Self {
        Self::with_clock(backend, options, SearchFilters::default(), Arc::new(TokioClock))
    }

    /// Controller whose first [`start`](Self::start) searches `filters`.
    pub fn with_initial_filters(
        backend: Arc<dyn SearchBackend>,
        options: SearchOptions,
        filters: SearchFilters,
    ) -> Self {
        Self::with_clock(backend, options, filters, Arc::new(TokioClock))
    }

    /// Full constructor with an explicit cache clock.
    pub fn with_clock(
        backend: Arc<dyn SearchBackend>,
        options: SearchOptions,
        initial_filters: SearchFilters,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = SearchCache::new(options.cache_ttl, clock).with_retention(options.stale_window);
        let (state, _) = watch::channel(SearchState::initial(
            options.page_size,
            initial_filters.clone(),
        ));
        let (operation, _) = watch::channel(0);

        Self {
            inner: Arc::new(Inner {
                backend,
                options,
                initial_filters,
                cache: Mutex::new(cache),
                state,
                operation,
                debounce: Mutex::new(Debounce::default()),
            }),
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.inner.options
    }

    /// Current state snapshot
    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that always holds the latest state.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Search with `filters` merged over the current filters.
    ///
    /// With `append` the next page is fetched and concatenated to the current
    /// results. With `immediate` a pending debounced search is dropped.
    /// Returns [`SearchError::Cancelled`] if a newer search started before
    /// this one could commit; state is left untouched in that case.
    #[instrument(skip(self, filters))]
    pub async fn search(
        &self,
        filters: SearchFilters,
        append: bool,
        immediate: bool,
    ) -> Result<ResultSource> {
        if immediate {
            self.inner.cancel_pending_debounce();
        }
        self.run(filters, append).await
    }

    /// Schedule a search after the configured debounce delay, replacing any
    /// search still waiting for its delay.
    pub fn debounced_search(&self, filters: SearchFilters) {
        self.debounced_search_with_delay(filters, self.inner.options.debounce_delay);
    }

    pub fn debounced_search_with_delay(&self, filters: SearchFilters, delay: Duration) {
        let mut slot = self.inner.lock_debounce();
        slot.generation += 1;
        let generation = slot.generation;

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.leave_debounce(generation) {
                return;
            }
            let controller = SearchController { inner };
            if let Err(err) = controller.run(filters, false).await {
                if !err.is_cancelled() {
                    debug!(error = %err, "debounced search failed");
                }
            }
        });

        if let Some((_, previous)) = slot.pending.replace((generation, handle)) {
            previous.abort();
        }
    }

    /// Fetch the next page. No-op while a search is in flight or when the
    /// last page has been reached.
    pub async fn load_more(&self) -> Result<Option<ResultSource>> {
        let (has_more, loading) = {
            let state = self.inner.state.borrow();
            (state.pagination.has_more, state.loading)
        };
        if !has_more || loading {
            debug!(has_more, loading, "load_more skipped");
            return Ok(None);
        }
        self.run(SearchFilters::default(), true).await.map(Some)
    }

    /// Search now or through the debouncer.
    pub async fn update_filters(
        &self,
        filters: SearchFilters,
        use_debounce: bool,
    ) -> Result<Option<ResultSource>> {
        if use_debounce {
            self.debounced_search(filters);
            return Ok(None);
        }
        self.search(filters, false, false).await.map(Some)
    }

    /// Run the initial search if the controller was built with filters.
    pub async fn start(&self) -> Result<Option<ResultSource>> {
        if self.inner.initial_filters.is_empty() {
            return Ok(None);
        }
        let filters = self.inner.initial_filters.clone();
        self.search(filters, false, false).await.map(Some)
    }

    /// Drop pending and in-flight work and return to an empty state.
    /// Cached pages are kept.
    pub fn reset(&self) {
        self.inner.cancel_pending_debounce();
        self.inner.begin_operation();
        self.inner.state.send_replace(SearchState::initial(
            self.inner.options.page_size,
            SearchFilters::default(),
        ));
        debug!("search state reset");
    }

    /// Recommended products. Does not touch the controller state.
    #[instrument(skip(self))]
    pub async fn recommended(&self, limit: u32) -> Result<Vec<SearchItem>> {
        self.inner.backend.recommended(limit).await
    }

    /// Periodically purge cache entries past the fallback window. The task
    /// ends once every clone of the controller is dropped.
    pub fn spawn_cache_sweeper(&self) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        let period = self.inner.options.cache_ttl.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let removed = inner.lock_cache().purge_expired();
                if removed > 0 {
                    debug!(removed, "purged expired search pages");
                }
            }
        })
    }

    /// Number of pages currently cached, fresh or stale.
    pub fn cached_pages(&self) -> usize {
        self.inner.lock_cache().len()
    }

    pub fn clear_cache(&self) {
        self.inner.lock_cache().clear();
    }

    async fn run(&self, filters: SearchFilters, append: bool) -> Result<ResultSource> {
        let inner = &self.inner;
        let id = inner.begin_operation();
        let page_size = inner.options.page_size;

        let (merged, offset) = {
            let state = inner.state.borrow();
            let offset = if append {
                state.pagination.offset.saturating_add(page_size)
            } else {
                0
            };
            (state.filters.merged(&filters), offset)
        };
        let query = SearchQuery::new(&merged, offset, page_size);
        let key = query.cache_key();

        let cached = inner.lock_cache().get(&key).cloned();
        if let Some(response) = cached {
            debug!(%key, "search cache hit");
            inner.commit(id, merged, &query, response, append, ResultSource::Cache)?;
            return Ok(ResultSource::Cache);
        }

        inner.mark_loading(id);
        let operation = inner.operation.subscribe();
        let fetched = tokio::select! {
            biased;
            _ = superseded(operation, id) => {
                debug!(%key, "search superseded before completion");
                return Err(SearchError::Cancelled);
            }
            result = fetch_with_retry(inner.backend.as_ref(), &query, inner.options.retry) => result,
        };

        match fetched {
            Ok(response) => {
                let count = response.products.len();
                let total = response.pagination.total;
                inner.lock_cache().insert(key, response.clone());
                inner.commit(id, merged, &query, response, append, ResultSource::Network)?;
                info!(count, total, offset, "search page fetched");
                Ok(ResultSource::Network)
            }
            Err(err) if err.is_rate_limited() => {
                let stale = inner
                    .lock_cache()
                    .get_within(&key, inner.options.stale_window)
                    .cloned();
                match stale {
                    Some(response) => {
                        warn!(error = %err, %key, "serving stale cached results");
                        inner.commit(id, merged, &query, response, append, ResultSource::StaleCache)?;
                        Ok(ResultSource::StaleCache)
                    }
                    None => {
                        inner.fail(id, &err);
                        Err(err)
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "search failed");
                inner.fail(id, &err);
                Err(err)
            }
        }
    }
}

impl Inner {
    fn begin_operation(&self) -> u64 {
        let mut id = 0;
        self.operation.send_modify(|current| {
            *current += 1;
            id = *current;
        });
        id
    }

    fn is_current(&self, id: u64) -> bool {
        *self.operation.borrow() == id
    }

    fn lock_cache(&self) -> MutexGuard<'_, SearchCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_debounce(&self) -> MutexGuard<'_, Debounce> {
        self.debounce.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_pending_debounce(&self) {
        if let Some((_, handle)) = self.lock_debounce().pending.take() {
            handle.abort();
        }
    }

    /// Called by a debounce task whose delay elapsed. Returns false if a
    /// newer debounced search replaced it in the meantime.
    fn leave_debounce(&self, generation: u64) -> bool {
        let mut slot = self.lock_debounce();
        let current = matches!(&slot.pending, Some((pending, _)) if *pending == generation);
        if current {
            slot.pending = None;
        }
        current
    }

    fn mark_loading(&self, id: u64) {
        self.state.send_if_modified(|state| {
            if !self.is_current(id) {
                return false;
            }
            state.loading = true;
            state.error = None;
            true
        });
    }

    fn fail(&self, id: u64, err: &SearchError) {
        self.state.send_if_modified(|state| {
            if !self.is_current(id) {
                return false;
            }
            state.loading = false;
            state.error = Some(err.to_string());
            true
        });
    }

    fn commit(
        &self,
        id: u64,
        filters: SearchFilters,
        query: &SearchQuery,
        response: SearchResponse,
        append: bool,
        source: ResultSource,
    ) -> Result<()> {
        let committed = self.state.send_if_modified(|state| {
            if !self.is_current(id) {
                return false;
            }
            if append {
                state.results.extend(response.products);
            } else {
                state.results = response.products;
            }
            state.pagination = Pagination {
                offset: query.offset,
                limit: query.limit,
                ..response.pagination
            };
            state.filters = filters;
            state.loading = false;
            state.error = None;
            state.source = Some(source);
            true
        });

        if committed {
            Ok(())
        } else {
            Err(SearchError::Cancelled)
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = self.debounce.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, handle)) = slot.pending.take() {
            handle.abort();
        }
    }
}

/// Resolves once operation `id` is no longer the current one.
async fn superseded(mut operation: watch::Receiver<u64>, id: u64) {
    loop {
        if *operation.borrow_and_update() != id {
            return;
        }
        if operation.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
