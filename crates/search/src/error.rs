use std::time::Duration;
use thiserror::Error;

use crate::wire::StatusError;

/// Errors produced by the search backend and controller
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Search failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    /// The backend kept answering 429 Too Many Requests.
    #[error("Too Many Requests (gave up after {attempts} attempts)")]
    RateLimited {
        attempts: u32,
        retry_after: Option<Duration>,
    },

    /// A newer search replaced this one before it could commit.
    #[error("Search superseded by a newer request")]
    Cancelled,
}

impl SearchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SearchError::RateLimited { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }
}

impl From<StatusError> for SearchError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::RateLimited { retry_after } => SearchError::RateLimited {
                attempts: 1,
                retry_after,
            },
            StatusError::Api { status, message } => SearchError::ApiError { status, message },
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
