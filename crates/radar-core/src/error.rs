//! Centralized error types for ReviewRadar.

use thiserror::Error;

/// Main error type for ReviewRadar operations.
///
/// The query controller treats every variant as the same coarse analysis
/// failure; the variants exist for diagnostics.
#[derive(Error, Debug)]
pub enum RadarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider returned no text content")]
    EmptyResponse,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ReviewRadar operations.
pub type RadarResult<T> = Result<T, RadarError>;

impl RadarError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
