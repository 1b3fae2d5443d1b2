use std::time::Duration;
use thiserror::Error;
use vitrina_search::{SearchError, StatusError};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Catalog request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Too Many Requests")]
    RateLimited { retry_after: Option<Duration> },

    /// The server answered 200 without the expected record.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl From<StatusError> for CatalogError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::RateLimited { retry_after } => CatalogError::RateLimited { retry_after },
            StatusError::Api { status, message } => CatalogError::ApiError { status, message },
        }
    }
}

impl CatalogError {
    /// Turn a 404 answer into [`CatalogError::NotFound`] for `resource`.
    pub(crate) fn or_not_found(self, resource: &'static str, id: impl ToString) -> Self {
        match self {
            CatalogError::ApiError { status: 404, .. } => CatalogError::NotFound {
                resource,
                id: id.to_string(),
            },
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
