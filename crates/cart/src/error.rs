use std::time::Duration;
use thiserror::Error;
use vitrina_search::StatusError;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// No user is bound to the client.
    #[error("Sign in to use the cart")]
    NotAuthenticated,

    #[error("Quantity must be greater than 0, got {0}")]
    InvalidQuantity(u32),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cart request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Too Many Requests")]
    RateLimited { retry_after: Option<Duration> },
}

impl From<StatusError> for CartError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::RateLimited { retry_after } => CartError::RateLimited { retry_after },
            StatusError::Api {
                status: 404,
                message,
            } => CartError::NotFound(message),
            StatusError::Api { status, message } => CartError::ApiError { status, message },
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
