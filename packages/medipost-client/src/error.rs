//! Error types for the Medipost backend client.

use thiserror::Error;

/// Result type for Medipost client operations.
pub type Result<T> = std::result::Result<T, MedipostError>;

/// Medipost client errors.
#[derive(Debug, Error)]
pub enum MedipostError {
    /// Configuration error (missing base URL or token, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rejected transition, invalid request)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}
