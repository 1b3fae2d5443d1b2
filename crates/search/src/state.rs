use crate::filters::SearchFilters;
use crate::types::{Pagination, SearchItem};

/// Where the last committed page came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Network,
    Cache,
    /// Expired cache entry served because the backend kept rate limiting.
    StaleCache,
}

/// Snapshot of a controller's search state
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub results: Vec<SearchItem>,
    pub pagination: Pagination,
    pub filters: SearchFilters,
    pub loading: bool,
    pub error: Option<String>,
    pub source: Option<ResultSource>,
}

impl SearchState {
    pub fn initial(page_size: u32, filters: SearchFilters) -> Self {
        Self {
            results: Vec::new(),
            pagination: Pagination::empty(page_size),
            filters,
            loading: false,
            error: None,
            source: None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more
    }
}
