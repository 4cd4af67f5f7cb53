//! Error types for the MX Local DNS manager
//!
//! Errors stop at the gateway boundary: lists turn them into empty
//! collections, mutations into a [`crate::gateway::MutationFailure`].

use thiserror::Error;

/// Result type alias for manager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the MX Local DNS manager
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error text returned by the API
        message: String,
    },

    /// Authentication errors (bad key, missing permission)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an API status error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether a later identical call could plausibly succeed
    ///
    /// Nothing in this crate retries; the CLI uses this to suggest trying
    /// again later.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(_) | Error::RateLimited(_) => true,
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
