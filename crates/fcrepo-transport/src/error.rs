use thiserror::Error;

/// Failures raised by a transport before a status code was obtained.
///
/// Variants carry the rendered cause rather than the underlying client error
/// so that values can be cloned, compared, and scripted by test doubles.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request could not be built (bad URL, header, or method).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Streaming a request or response body failed.
    #[error("body error: {0}")]
    Body(String),

    /// Any other client-side failure.
    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            Self::Timeout(message)
        } else if err.is_connect() {
            Self::Connect(message)
        } else if err.is_builder() {
            Self::InvalidRequest(message)
        } else if err.is_body() || err.is_decode() {
            Self::Body(message)
        } else {
            Self::Other(message)
        }
    }
}

/// Result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
