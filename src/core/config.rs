//! Configuration management for bindery.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{BinderyError, Result};
use crate::core::store::METADATA_FILE_NAME;
use crate::core::xdg::{XdgDirs, LEGACY_CONFIG_FILE};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Section extraction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentationConfig {
    /// Sections longer than this (in characters) are split into parts
    #[serde(default = "default_max_section_chars")]
    pub max_section_chars: usize,

    /// Prefix section artifacts with a `=== title ===` banner
    #[serde(default = "default_title_banner")]
    pub title_banner: bool,
}

/// Chunking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Chunks shorter than this (except the first) are merged
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,

    /// Characters per chunk before a chunk is closed
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// Minimum characters of whole sentences repeated between chunks
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,

    /// Language hint for sentence segmentation
    #[serde(default = "default_language")]
    pub language: String,

    /// Write each chunk to its own artifact file (otherwise the text is
    /// stored inline in the metadata)
    #[serde(default = "default_write_chunk_files")]
    pub write_chunk_files: bool,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory for artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Metadata store file (defaults to `{output_dir}/sections_metadata.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_file: Option<PathBuf>,
}

// Default value functions
fn default_max_section_chars() -> usize {
    100_000
}

fn default_title_banner() -> bool {
    true
}

fn default_min_chunk_size() -> usize {
    700
}

fn default_max_chunk_size() -> usize {
    1500
}

fn default_overlap_chars() -> usize {
    200
}

fn default_language() -> String {
    "russian".to_string()
}

fn default_write_chunk_files() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./processed_book")
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_section_chars: default_max_section_chars(),
            title_banner: default_title_banner(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: default_min_chunk_size(),
            max_chunk_size: default_max_chunk_size(),
            overlap_chars: default_overlap_chars(),
            language: default_language(),
            write_chunk_files: default_write_chunk_files(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            metadata_file: None,
        }
    }
}

impl StorageConfig {
    /// Effective metadata file path
    pub fn metadata_path(&self) -> PathBuf {
        self.metadata_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join(METADATA_FILE_NAME))
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| BinderyError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. BINDERY_CONFIG env var
    /// 2. XDG config file (~/.config/bindery/config.toml)
    /// 3. Legacy ./bindery.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("BINDERY_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new(LEGACY_CONFIG_FILE).exists() {
                Self::from_file(LEGACY_CONFIG_FILE)?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Segmentation configuration
        if let Ok(max_section) = env::var("BINDERY_MAX_SECTION_CHARS") {
            if let Ok(size) = max_section.parse() {
                self.segmentation.max_section_chars = size;
            }
        }

        // Chunking configuration
        if let Ok(min_chunk) = env::var("BINDERY_MIN_CHUNK_SIZE") {
            if let Ok(size) = min_chunk.parse() {
                self.chunking.min_chunk_size = size;
            }
        }
        if let Ok(max_chunk) = env::var("BINDERY_MAX_CHUNK_SIZE") {
            if let Ok(size) = max_chunk.parse() {
                self.chunking.max_chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("BINDERY_OVERLAP_CHARS") {
            if let Ok(o) = overlap.parse() {
                self.chunking.overlap_chars = o;
            }
        }
        if let Ok(language) = env::var("BINDERY_LANGUAGE") {
            self.chunking.language = language;
        }

        // Storage configuration
        if let Ok(output_dir) = env::var("BINDERY_OUTPUT_DIR") {
            self.storage.output_dir = PathBuf::from(output_dir);
        }
        if let Ok(metadata_file) = env::var("BINDERY_METADATA_FILE") {
            self.storage.metadata_file = Some(PathBuf::from(metadata_file));
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.segmentation.max_section_chars == 0 {
            return Err(BinderyError::ConfigError(
                "Max section size must be non-zero".to_string(),
            ));
        }

        let chunking = &self.chunking;
        if chunking.max_chunk_size == 0 {
            return Err(BinderyError::ConfigError(
                "Max chunk size must be non-zero".to_string(),
            ));
        }

        if chunking.min_chunk_size > chunking.max_chunk_size {
            return Err(BinderyError::ConfigError(
                "Min chunk size cannot exceed max chunk size".to_string(),
            ));
        }

        if chunking.overlap_chars >= chunking.max_chunk_size {
            return Err(BinderyError::ConfigError(
                "Overlap must be less than max chunk size".to_string(),
            ));
        }

        if chunking.language.trim().is_empty() {
            return Err(BinderyError::ConfigError(
                "Language must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!(
            "  Max section size: {} chars",
            self.segmentation.max_section_chars
        );
        tracing::info!("  Title banner: {}", self.segmentation.title_banner);
        tracing::info!(
            "  Chunk size: {}-{} chars",
            self.chunking.min_chunk_size,
            self.chunking.max_chunk_size
        );
        tracing::info!("  Overlap: {} chars", self.chunking.overlap_chars);
        tracing::info!("  Language: {}", self.chunking.language);
        tracing::info!("  Chunk files: {}", self.chunking.write_chunk_files);
        tracing::info!("  Output dir: {:?}", self.storage.output_dir);
        tracing::info!("  Metadata file: {:?}", self.storage.metadata_path());
    }
}
