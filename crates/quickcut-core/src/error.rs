//! Error types shared across QuickCut crates.

use thiserror::Error;

/// Main error type for QuickCut operations.
#[derive(Error, Debug)]
pub enum QuickCutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Result type alias for QuickCut operations.
pub type Result<T> = std::result::Result<T, QuickCutError>;
