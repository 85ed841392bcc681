//! Error types for provider operations.

use std::fmt;

/// Universal error type that abstracts provider-specific errors into common variants.
///
/// Every gateway maps its native failures (HTTP status codes, decode errors,
/// missing credentials) onto these variants so the pipeline can decide what is
/// retryable without knowing which provider it talks to.
#[derive(Debug)]
pub enum Error {
    /// API key or access token missing, invalid or lacking permissions.
    Authentication(String),

    /// Connection failures, DNS failures or dropped responses.
    /// These are transient and may succeed when repeated.
    Network(String),

    /// Invalid parameters or missing required configuration.
    Configuration(String),

    /// The provider understood the request and refused it.
    Provider(String),

    /// The request exceeded the client or provider timeout.
    Timeout(String),

    /// Requested resource (task, execution, calendar) does not exist.
    NotFound(String),

    /// Provider rate limit exceeded. Clients must wait before retrying.
    RateLimited { retry_after_seconds: u64 },

    /// The provider answered with a body that does not match the expected shape.
    Deserialization(String),

    /// Catch-all for errors that don't fit other categories.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// True for failures where repeating the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Timeout(_) | Error::RateLimited { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Provider(msg) => write!(f, "Provider error: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::RateLimited {
                retry_after_seconds,
            } => {
                write!(f, "Rate limited: retry after {}s", retry_after_seconds)
            }
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::Other(err) => write!(f, "Other error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
