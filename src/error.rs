//! Error kinds surfaced by the pipeline.
//!
//! Every stage returns [`PushError`]; nothing is recovered locally. The binary
//! converts whatever reaches the top into a failed run.
//!
//! Unresolved fields found while scraping the index are *not* errors. They are
//! recorded as [`ParseGap`](crate::models::ParseGap) values and logged.

use reqwest::StatusCode;

/// Errors from fetching, configuring, or delivering a run.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// A GET returned a non-success status.
    #[error("failed to download {url}: HTTP {status}")]
    Retrieval { url: String, status: StatusCode },

    /// The notification API rejected the message.
    #[error("failed to send message: HTTP {status}: {body}")]
    Delivery { status: StatusCode, body: String },

    /// Transport-level failure (DNS, TLS, connection reset, body decoding).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A configured base URL or an issue link could not be resolved.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Serializing a payload or parsing a response failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The index document yielded no usable issues.
    #[error("no issues found in index {url}")]
    EmptyIndex { url: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_mentions_url_and_status() {
        let err = PushError::Retrieval {
            url: "https://example.com/README.md".to_string(),
            status: StatusCode::NOT_FOUND,
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/README.md"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_delivery_error_carries_body() {
        let err = PushError::Delivery {
            status: StatusCode::BAD_REQUEST,
            body: "appToken is invalid".to_string(),
        };
        assert!(err.to_string().ends_with("appToken is invalid"));
    }
}
