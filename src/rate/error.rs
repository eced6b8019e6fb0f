use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Everything that can go wrong while obtaining an exchange rate.
///
/// Only [`RateError::Timeout`] and [`RateError::Connection`] are transient;
/// callers may substitute a default rate for those and must treat every other
/// variant as fatal.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("building HTTP client: {0}")]
    Client(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("reading response body: {0}")]
    Body(String),

    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("key path {path}: segment {segment} not found")]
    MissingKey { path: String, segment: String },

    #[error("key path {0} does not end at a scalar")]
    NotScalar(String),

    #[error("'{0}' is not a number")]
    Parse(String),

    #[error("TLS setup: {0}")]
    Tls(String),

    #[error("invalid header {0}")]
    Header(String),
}

impl RateError {
    /// Whether this failure is a network hiccup rather than a bad answer.
    pub fn is_transient(&self) -> bool {
        matches!(self, RateError::Timeout(_) | RateError::Connection(_))
    }
}

impl From<reqwest::Error> for RateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RateError::Timeout(e.to_string())
        } else if e.is_connect() || dropped_by_peer(&e) {
            RateError::Connection(e.to_string())
        } else if e.is_body() || e.is_decode() {
            RateError::Body(e.to_string())
        } else {
            RateError::Request(e.to_string())
        }
    }
}

/// The peer closed or reset an established connection before the response
/// was complete.
fn dropped_by_peer(e: &reqwest::Error) -> bool {
    let mut source = e.source();
    while let Some(cause) = source {
        if let Some(err) = cause.downcast_ref::<io::Error>() {
            if matches!(
                err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        if let Some(err) = cause.downcast_ref::<hyper::Error>() {
            if err.is_incomplete_message() {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_failures_are_transient() {
        assert!(RateError::Timeout("t".into()).is_transient());
        assert!(RateError::Connection("refused".into()).is_transient());
        assert!(!RateError::Status(500).is_transient());
        assert!(!RateError::Parse("abc".into()).is_transient());
        assert!(!RateError::MissingKey {
            path: "rates.EUR".into(),
            segment: "EUR".into()
        }
        .is_transient());
    }
}
