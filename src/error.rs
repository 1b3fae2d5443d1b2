//! Error handling for the Vitrina client

use std::fmt;
use thiserror::Error;
use vitrina_cart::CartError;
use vitrina_catalog::CatalogError;
use vitrina_search::SearchError;

/// Unified error type for the Vitrina client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Search errors
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart errors
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Whether the server answered 429 and retries did not help.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Error::Search(e) => e.is_rate_limited(),
            Error::Catalog(CatalogError::RateLimited { .. })
            | Error::Catalog(CatalogError::Search(SearchError::RateLimited { .. }))
            | Error::Cart(CartError::RateLimited { .. }) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
