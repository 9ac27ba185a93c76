//! Error types for the FAQ bridge.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias using FaqError.
pub type Result<T> = std::result::Result<T, FaqError>;

/// Message carried by every transport-level connectivity failure.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to connect to the FAQ service. Please check your internet connection.";

/// Errors that can occur in the FAQ bridge.
#[derive(Error, Debug)]
pub enum FaqError {
    /// Malformed credential or configuration. Fatal at startup.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid argument provided.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The service could not be reached at all.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The service answered HTTP 429.
    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    /// Any other non-2xx response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A 2xx body that did not decode.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (unexpected).
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl FaqError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a network error with the fixed connectivity message.
    pub fn network() -> Self {
        Self::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for HTTP 401 and 403 responses.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }

    /// Get the error code for MCP responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "CONFIG_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Api { .. } => "API_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Human-readable guidance for the person running the server.
    pub fn guidance(&self) -> String {
        match self {
            Self::Config { message } => format!(
                "Configuration problem: {}. Set FAQ_API_KEY to a key starting with 'fq'.",
                message
            ),
            Self::Network { .. } => {
                "Could not reach the FAQ service. Check your network connection and the base URL."
                    .to_string()
            }
            Self::Api { status: 401, .. } | Self::Api { status: 403, .. } => {
                "Authentication failed. Check that your API key is valid and has access."
                    .to_string()
            }
            Self::RateLimited { reset_at } => format!(
                "Rate limit exceeded. Try again after {}.",
                reset_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            other => other.to_string(),
        }
    }
}
