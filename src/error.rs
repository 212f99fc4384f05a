//! Error types for shieldr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in shieldr
#[derive(Debug, Error)]
pub enum ShieldrError {
    /// The upstream call physically did not complete (connection refused,
    /// timeout, non-2xx at the transport layer). Distinct from the upstream
    /// reporting failure in an otherwise well-transported body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for shieldr operations
pub type Result<T> = std::result::Result<T, ShieldrError>;
