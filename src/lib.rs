//! bindery - incremental book segmentation and chunking
//!
//! Turns a parsed document tree into persisted sections and then into
//! overlapping, sentence-bounded chunks ready for retrieval or
//! summarization. Runs are incremental: re-running over the same book
//! adds only what is missing.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - document (input tree)
//!   - store (metadata store, artifacts, library, validator)
//!   - segment (extraction, splitting)
//!   - chunking (sentences, chunker)
//!   - pipeline, services
//!
//! - **cli**: `bindery` command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - Character-based sizes and offsets (UTF-8 safe, Cyrillic friendly)
//! - Content isolation: a section never contains its children's text
//! - Balanced, paragraph-bounded splitting of oversized sections
//! - Sentence-aligned chunk overlap
//! - Self-healing JSON metadata store with atomic writes

// Core domain logic
pub mod core;

// CLI adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::chunking::TextChunker;
pub use core::config::Config;
pub use core::document::{DocumentNode, NodeItem};
pub use core::error::{BinderyError, Result};
pub use core::pipeline::Pipeline;
pub use core::services::Services;
pub use core::store::Library;
pub use core::types::*;
