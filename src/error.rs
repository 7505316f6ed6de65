//! Error types for Proxima operations.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ProximaError>;

/// Errors produced by the index, the store, and the service layer.
#[derive(Debug, Error)]
pub enum ProximaError {
    /// Input failed validation (bad bounding box, negative radius, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A business ID was not found in the durable store.
    #[error("business not found: {0}")]
    NotFound(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}
