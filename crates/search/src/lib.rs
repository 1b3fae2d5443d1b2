//! Product search client for the Vitrina storefront API
//!
//! This crate provides [`SearchController`], which keeps the filters and
//! results of a product search and talks to `GET /api/search` through a
//! [`SearchBackend`]. It caches result pages, debounces rapid filter changes,
//! retries rate-limited requests and discards responses that belong to
//! superseded searches.

mod backend;
mod cache;
mod controller;
mod error;
mod filters;
mod options;
mod query;
mod retry;
mod state;
mod types;
mod wire;

pub use backend::{HttpSearchBackend, SearchBackend};
pub use cache::{Clock, ManualClock, SearchCache, TokioClock};
pub use controller::SearchController;
pub use error::{Result, SearchError};
pub use filters::{SearchFilters, SortBy};
pub use options::SearchOptions;
pub use query::SearchQuery;
pub use retry::RetryPolicy;
pub use state::{ResultSource, SearchState};
pub use types::{BrandRef, Pagination, SearchItem, SearchResponse, SellerSummary, SellerUser};
pub use wire::{check_status, null_as_default, StatusError};
