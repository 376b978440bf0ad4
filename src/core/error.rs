//! Error types and error handling for bindery.
//!
//! Missing records and missing paths are not errors: store lookups
//! return `Option` or a caller-supplied default. Errors are reserved
//! for I/O failures, invalid requests and configuration problems.

use thiserror::Error;

/// Result type alias for bindery operations
pub type Result<T> = std::result::Result<T, BinderyError>;

/// Main error type for bindery
#[derive(Error, Debug)]
pub enum BinderyError {
    #[error("Section not found: {0}")]
    SectionNotFound(usize),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Chunking failed: {0}")]
    ChunkingFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl BinderyError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, BinderyError::SectionNotFound(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            BinderyError::InvalidPath(_) | BinderyError::ConfigError(_)
        )
    }
}
