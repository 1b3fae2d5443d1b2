//! Response handling shared by every storefront client

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

/// A non-success answer from the storefront API.
///
/// Each client converts this into its own error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// 429, with the `Retry-After` seconds when the header parses.
    #[error("Too Many Requests")]
    RateLimited { retry_after: Option<Duration> },

    /// Any other non-success status. `message` is the `error` field of a
    /// JSON body, or the raw body otherwise.
    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Return the response unchanged on success.
pub async fn check_status(
    response: reqwest::Response,
) -> std::result::Result<reqwest::Response, StatusError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(StatusError::RateLimited {
            retry_after: parse_retry_after(&response),
        });
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or(text);
        return Err(StatusError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Deserialize `null` as the type's default value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    fn mock_response_with_retry_after(value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(429)
                .header("Retry-After", value)
                .body(String::new())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn rate_limited_with_header() {
        let err = check_status(mock_response_with_retry_after("30"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StatusError::RateLimited {
                retry_after: Some(Duration::from_secs(30))
            }
        );
    }

    #[tokio::test]
    async fn rate_limited_without_usable_header() {
        let err = check_status(mock_response_with_retry_after("soon"))
            .await
            .unwrap_err();
        assert_eq!(err, StatusError::RateLimited { retry_after: None });
    }

    #[tokio::test]
    async fn error_field_becomes_message() {
        let err = check_status(mock_response(404, r#"{"error":"Producto no encontrado"}"#))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StatusError::Api {
                status: 404,
                message: "Producto no encontrado".to_string()
            }
        );
    }

    #[tokio::test]
    async fn plain_body_is_kept() {
        let err = check_status(mock_response(502, "Bad Gateway"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StatusError::Api {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_status(mock_response(200, "{}")).await.is_ok());
    }

    #[test]
    fn null_reads_as_default() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "null_as_default")]
            tags: Vec<String>,
        }

        let row: Row = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        assert!(row.tags.is_empty());
        let row: Row = serde_json::from_str("{}").unwrap();
        assert!(row.tags.is_empty());
    }
}
