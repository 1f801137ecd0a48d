//! Core error types for zenlock-core.
//!
//! Best-effort guard failures and quote-provider failures never surface
//! through these types -- they are logged or substituted at the call site.
//! What remains is the genuinely fallible surface: configuration I/O,
//! credential storage, and input validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for zenlock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Session duration outside the supported range
    #[error("Session duration {secs}s outside supported range {min_secs}-{max_secs}s")]
    DurationOutOfRange {
        secs: u64,
        min_secs: u64,
        max_secs: u64,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Quote-provider internal errors.
///
/// Never crosses the [`crate::quotes::QuoteProvider`] boundary -- providers
/// catch these and resolve to a fixed fallback phrase instead.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Request-level failure (network, TLS, timeout)
    #[error("Quote request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Quote provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Malformed quote response: {0}")]
    MalformedResponse(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
