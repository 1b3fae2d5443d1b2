//! A single page request against the search endpoint

use url::form_urlencoded;

use crate::filters::SearchFilters;

/// One page of a search: normalised filters plus offset/limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub filters: SearchFilters,
    pub offset: u32,
    pub limit: u32,
    pub recommended: bool,
}

impl SearchQuery {
    pub fn new(filters: &SearchFilters, offset: u32, limit: u32) -> Self {
        Self {
            filters: filters.normalized(),
            offset,
            limit,
            recommended: false,
        }
    }

    /// Recommended listing; the endpoint ignores filters in this mode.
    pub fn recommended(limit: u32) -> Self {
        Self {
            filters: SearchFilters::default(),
            offset: 0,
            limit,
            recommended: true,
        }
    }

    /// Every query-string pair sent to the backend.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = if self.recommended {
            vec![("recommended", "true".to_string())]
        } else {
            self.filters.to_query_pairs()
        };
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }

    /// Cache key: the serialised filter set plus the page offset.
    pub fn cache_key(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.filters.to_query_pairs())
            .append_pair("offset", &self.offset.to_string())
            .finish()
    }
}
