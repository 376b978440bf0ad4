//! Core domain logic
//!
//! Everything below is independent of the CLI.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Section and chunk records
//! - **xdg**: XDG directory handling
//! - **document**: Parsed document tree (input)
//! - **store**: Metadata store, artifact store and the typed library
//! - **segment**: Section extraction and splitting
//! - **chunking**: Sentence segmentation and chunking
//! - **pipeline**: Extraction followed by per-section chunking
//! - **services**: Unified service container

pub mod chunking;
pub mod config;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod segment;
pub mod services;
pub mod store;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{BinderyError, Result};
pub use services::Services;
