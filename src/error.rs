// src/error.rs

//! Unified error handling for the catalog client.

use std::fmt;

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
///
/// Every variant collapses to one human-readable message through `Display`;
/// callers decide whether a failure is skipped (per identifier) or surfaced
/// as a full view error (initial load).
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a status outside the success range
    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Fetch error
    #[error("Fetch failed for {context}: {message}")]
    Fetch { context: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error with context.
    pub fn fetch(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message() {
        let err = AppError::fetch("digimon 42", "connection reset");
        assert_eq!(
            err.to_string(),
            "Fetch failed for digimon 42: connection reset"
        );
    }

    #[test]
    fn test_status_error_message() {
        let err = AppError::Status {
            status: 404,
            url: "https://example.com/digimon/9999".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP status 404 for https://example.com/digimon/9999"
        );
    }
}
