//! Vitrina Rust Client Library
//!
//! A Rust client for the Vitrina storefront API, providing product search with
//! client-side caching and debouncing, catalog lookups and the shopping cart.

pub mod config;
pub mod error;

use reqwest::Client;
use std::sync::Arc;
use tracing::warn;

use crate::config::ClientOptions;
use crate::error::{Error, Result};

pub use vitrina_cart as cart;
pub use vitrina_catalog as catalog;
pub use vitrina_search as search;

use vitrina_cart::CartClient;
use vitrina_catalog::CatalogClient;
use vitrina_search::{HttpSearchBackend, SearchController, SearchFilters};

/// The main entry point for the Vitrina Rust client
pub struct Vitrina {
    /// The base URL of the storefront
    pub url: String,
    /// HTTP client shared by every component client
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    catalog: CatalogClient,
}

impl Vitrina {
    /// Create a new Vitrina client
    ///
    /// # Example
    ///
    /// ```
    /// use vitrina::Vitrina;
    ///
    /// let vitrina = Vitrina::new("https://tienda.example.com");
    /// ```
    pub fn new(base_url: &str) -> Self {
        Self::new_with_options(base_url, ClientOptions::default())
    }

    /// Create a new Vitrina client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use vitrina::{Vitrina, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_debounce_delay(Duration::from_millis(300));
    /// let vitrina = Vitrina::new_with_options("https://tienda.example.com", options);
    /// ```
    pub fn new_with_options(base_url: &str, options: ClientOptions) -> Self {
        let http_client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to a default HTTP client");
                Client::new()
            });

        let catalog =
            CatalogClient::new_with_options(base_url, http_client.clone(), options.catalog_options());

        Self {
            url: base_url.to_string(),
            http_client,
            options,
            catalog,
        }
    }

    /// Client for the storefront named by `VITRINA_URL`, with options from
    /// [`ClientOptions::from_env`].
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("VITRINA_URL")
            .map_err(|_| Error::config("VITRINA_URL is not set"))?;
        url::Url::parse(&url)?;
        Ok(Self::new_with_options(&url, ClientOptions::from_env()))
    }

    fn search_backend(&self) -> Arc<HttpSearchBackend> {
        Arc::new(
            HttpSearchBackend::new(&self.url, self.http_client.clone())
                .with_timeout(self.options.request_timeout),
        )
    }

    /// A new search controller with its own state and cache
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vitrina::Vitrina;
    /// use vitrina::search::SearchFilters;
    ///
    /// # async fn run() -> vitrina::error::Result<()> {
    /// let vitrina = Vitrina::new("https://tienda.example.com");
    /// let search = vitrina.search();
    /// search.search(SearchFilters::new().with_query("reloj"), false, false).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn search(&self) -> SearchController {
        SearchController::new(self.search_backend(), self.options.search_options())
    }

    /// A search controller whose [`start`](SearchController::start) runs
    /// `filters`.
    pub fn search_with_filters(&self, filters: SearchFilters) -> SearchController {
        SearchController::with_initial_filters(
            self.search_backend(),
            self.options.search_options(),
            filters,
        )
    }

    /// Catalog client; clones share one cache
    pub fn catalog(&self) -> CatalogClient {
        self.catalog.clone()
    }

    /// Cart client for `user_id`, or an anonymous one
    pub fn cart(&self, user_id: Option<i64>) -> CartClient {
        CartClient::new(&self.url, self.http_client.clone(), user_id)
            .with_timeout(self.options.request_timeout)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::Vitrina;
    pub use vitrina_cart::{CartClient, CartSummary};
    pub use vitrina_catalog::{
        BrandQuery, CatalogClient, ProductDetail, ProductQuery, Seller, VariantSelector,
    };
    pub use vitrina_search::{
        ResultSource, SearchController, SearchFilters, SearchState, SortBy,
    };
}
