//! Unified service container for bindery
//!
//! Provides shared access to configuration and builds the library,
//! chunker and pipeline from it.

use crate::core::chunking::TextChunker;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::pipeline::Pipeline;
use crate::core::store::Library;
use std::sync::Arc;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Open the configured library
    ///
    /// The metadata store is re-read on every access, so opening a
    /// library per command is cheap and never stale.
    pub fn open_library(&self) -> Result<Library> {
        Ok(Library::open(
            &self.config.storage.output_dir,
            self.config.storage.metadata_file.clone(),
        )?
        .with_title_banner(self.config.segmentation.title_banner))
    }

    /// Chunker with the configured sizes and language
    pub fn chunker(&self) -> TextChunker {
        TextChunker::from_config(&self.config.chunking)
    }

    /// Pipeline over the configured library
    pub fn create_pipeline(&self) -> Result<Pipeline> {
        Pipeline::from_config(&self.config)
    }
}
