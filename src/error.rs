//! Error types for Kanary
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Kanary operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, token acquisition, and Kafka consumption.
#[derive(Error, Debug)]
pub enum KanaryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token endpoint errors (transport, protocol, malformed responses)
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Errors from the Kafka client
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while fetching a bearer token from the OAuth endpoint.
///
/// Every variant is reported to the Kafka client as a refresh failure;
/// none of them installs a token.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Network or HTTP-level failure before a response was received
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The token endpoint answered with a non-success status
    #[error("token endpoint returned {status}: {body}")]
    Endpoint {
        /// HTTP status code of the response
        status: reqwest::StatusCode,
        /// Raw response body, for diagnostics
        body: String,
    },

    /// The response body was not the expected JSON shape
    #[error("malformed token response: {0}")]
    Malformed(String),
}

/// Result type alias for Kanary operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = KanaryError::Config("invalid broker list".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: invalid broker list"
        );
    }

    #[test]
    fn test_endpoint_error_display_carries_status() {
        let error = TokenError::Endpoint {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "invalid_client".to_string(),
        };
        let s = error.to_string();
        assert!(s.contains("401"));
        assert!(s.contains("invalid_client"));
    }

    #[test]
    fn test_malformed_error_display() {
        let error = TokenError::Malformed("missing field `access_token`".to_string());
        assert_eq!(
            error.to_string(),
            "malformed token response: missing field `access_token`"
        );
    }

    #[test]
    fn test_token_error_converts_to_kanary_error() {
        let error: KanaryError = TokenError::Malformed("empty body".to_string()).into();
        assert!(matches!(error, KanaryError::Token(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: KanaryError = io_error.into();
        assert!(matches!(error, KanaryError::Io(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KanaryError>();
        assert_send_sync::<TokenError>();
    }
}
