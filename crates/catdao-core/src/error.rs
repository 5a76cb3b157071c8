//! Error types for core operations

use thiserror::Error;

/// Core errors
///
/// Trait generation itself never fails; these cover label parsing and the
/// file-backed configuration and observation ledger.
#[derive(Debug, Error)]
pub enum CatDaoError {
    /// Cat kind label not recognised
    #[error("Unknown cat kind: {0}")]
    UnknownKind(String),

    /// Output format label not recognised
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    /// Configuration could not be used
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CatDaoError>;
