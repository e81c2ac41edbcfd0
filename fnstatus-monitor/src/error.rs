use thiserror::Error;

/// Why a fetch produced no data.
///
/// Every network, protocol and decode failure ends up here so a report
/// section can say "unavailable" instead of aborting the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No response within the request timeout.
    #[error("request timed out")]
    Timeout,

    /// DNS, TCP or TLS failure before any response arrived.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Upstream answered with a non-success status.
    #[error("HTTP error {0}")]
    HttpStatus(u16),

    /// Body was not JSON, or not the expected shape.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus(status.as_u16())
        } else if err.is_decode() || err.is_body() {
            FetchError::InvalidBody(err.to_string())
        } else {
            FetchError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::InvalidBody(err.to_string())
    }
}
