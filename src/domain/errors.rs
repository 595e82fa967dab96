//! Domain error types
//!
//! This module defines the error hierarchy for Arx.
//! All errors are domain-specific and don't expose third-party types.

use std::time::Duration;
use thiserror::Error;

/// Main Arx error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ArxError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Microsoft Graph API errors
    #[error("Graph API error: {0}")]
    Graph(#[from] GraphError),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Microsoft Graph specific errors
///
/// Errors that occur when talking to the identity governance endpoints.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Failed to reach the Graph endpoint
    #[error("Failed to connect to Graph API: {0}")]
    ConnectionFailed(String),

    /// Token acquisition failed or the token was rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Response body did not have the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Throttled by Graph (429), with the server's `Retry-After` hint if sent
    #[error("Rate limited by Graph API: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl GraphError {
    /// Whether a failed page request is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GraphError::ConnectionFailed(_)
                | GraphError::RateLimited { .. }
                | GraphError::ServerError { .. }
                | GraphError::Timeout(_)
        )
    }

    /// Map an unsuccessful HTTP status to the matching error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => GraphError::AuthenticationFailed(format!("HTTP {status}: {message}")),
            429 => GraphError::RateLimited {
                message,
                retry_after: None,
            },
            500..=599 => GraphError::ServerError { status, message },
            _ => GraphError::ClientError { status, message },
        }
    }

    /// Attach a `Retry-After` delay; only throttling errors keep it
    pub fn with_retry_after(self, delay: Option<Duration>) -> Self {
        match self {
            GraphError::RateLimited { message, .. } => GraphError::RateLimited {
                message,
                retry_after: delay,
            },
            other => other,
        }
    }

    /// Minimum wait the server asked for before the next attempt
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GraphError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl ArxError {
    /// Whether the underlying failure is transient
    pub fn is_retryable(&self) -> bool {
        match self {
            ArxError::Graph(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Minimum wait the server asked for before retrying
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ArxError::Graph(e) => e.retry_after(),
            _ => None,
        }
    }

    /// Whether this is a configuration or validation problem
    pub fn is_configuration(&self) -> bool {
        matches!(self, ArxError::Configuration(_) | ArxError::Validation(_))
    }
}

impl From<std::io::Error> for ArxError {
    fn from(err: std::io::Error) -> Self {
        ArxError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ArxError {
    fn from(err: serde_json::Error) -> Self {
        ArxError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ArxError {
    fn from(err: toml::de::Error) -> Self {
        ArxError::Configuration(format!("TOML parse error: {err}"))
    }
}
