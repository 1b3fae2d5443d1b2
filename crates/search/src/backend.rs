//! Transport seam between the controller and the search endpoint

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, SearchError};
use crate::query::SearchQuery;
use crate::types::{SearchItem, SearchResponse, WireSearchResponse};
use crate::wire::check_status;

/// Something that can answer a [`SearchQuery`].
///
/// A single 429 must be reported as [`SearchError::RateLimited`]; retrying is
/// the controller's job.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn fetch(&self, query: &SearchQuery) -> Result<SearchResponse>;

    /// Recommended products; the filter set does not apply.
    async fn recommended(&self, limit: u32) -> Result<Vec<SearchItem>> {
        let response = self.fetch(&SearchQuery::recommended(limit)).await?;
        Ok(response.products)
    }
}

/// `GET {base}/api/search` over HTTP
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    base_url: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl HttpSearchBackend {
    pub fn new(base_url: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.to_string(),
            http_client,
            timeout: None,
        }
    }

    /// Per-request timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, query: &SearchQuery) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| SearchError::UrlParseError(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("api")
            .push("search");
        url.query_pairs_mut().extend_pairs(query.to_pairs());
        Ok(url)
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    #[instrument(skip(self, query), fields(offset = query.offset, limit = query.limit))]
    async fn fetch(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let url = self.endpoint(query)?;
        debug!(%url, "requesting search page");

        let mut request = self.http_client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = check_status(request.send().await?).await?;
        let wire = response.json::<WireSearchResponse>().await?;
        Ok(wire.into_response(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::SearchFilters;

    #[test]
    fn endpoint_carries_filters_and_paging() {
        let backend = HttpSearchBackend::new("https://tienda.example.com/", Client::new());
        let query = SearchQuery::new(
            &SearchFilters::new()
                .with_query("reloj de oro")
                .with_categories(["Relojes", "Joyas"]),
            50,
            25,
        );

        let url = backend.endpoint(&query).unwrap();
        assert_eq!(url.path(), "/api/search");
        assert_eq!(
            url.query(),
            Some("q=reloj+de+oro&category=Relojes%2CJoyas&limit=25&offset=50")
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let backend = HttpSearchBackend::new("http://localhost:3000/tienda", Client::new());
        let url = backend.endpoint(&SearchQuery::recommended(8)).unwrap();
        assert_eq!(url.path(), "/tienda/api/search");
        assert_eq!(url.query(), Some("recommended=true&limit=8&offset=0"));
    }
}
