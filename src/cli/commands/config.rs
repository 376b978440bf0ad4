//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::config::{ChunkingConfig, SegmentationConfig};
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show where configuration is read from
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub output_dir: String,
    pub metadata_file: String,
    pub segmentation: SegmentationConfig,
    pub chunking: ChunkingConfig,
}

/// Execute the config command
pub fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;
    let xdg = XdgDirs::new();

    let response = ConfigResponse {
        config_file: xdg.config_file().display().to_string(),
        output_dir: config.storage.output_dir.display().to_string(),
        metadata_file: config.storage.metadata_path().display().to_string(),
        segmentation: config.segmentation.clone(),
        chunking: config.chunking.clone(),
    };

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            if args.all {
                println!("  config_file: {}", response.config_file);
            }
            println!("  segmentation:");
            println!(
                "    max_section_chars: {}",
                response.segmentation.max_section_chars
            );
            println!("    title_banner: {}", response.segmentation.title_banner);
            println!("  chunking:");
            println!("    min_chunk_size: {}", response.chunking.min_chunk_size);
            println!("    max_chunk_size: {}", response.chunking.max_chunk_size);
            println!("    overlap_chars: {}", response.chunking.overlap_chars);
            println!("    language: {}", response.chunking.language);
            println!(
                "    write_chunk_files: {}",
                response.chunking.write_chunk_files
            );
            println!("  storage:");
            println!("    output_dir: {}", response.output_dir);
            println!("    metadata_file: {}", response.metadata_file);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
