//! Error types for the trend bot

use thiserror::Error;

/// Errors that can occur while fetching, composing or publishing
#[derive(Debug, Error)]
pub enum BotError {
    /// Required settings or credentials are missing or malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A caller passed a value outside the accepted domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The API rejected our credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    #[error("Network error: {0}")]
    Network(String),

    /// The platform refused the post (length, duplicate, policy)
    #[error("Content rejected: {0}")]
    ContentRejected(String),

    /// API returned an unexpected error response
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Failed to decode an API response
    #[error("Parse error: {0}")]
    Parse(String),
}

impl BotError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
