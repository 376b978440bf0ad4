//! Run command - extract and chunk in one pass

use super::chunk::{print_report, ChunkResponse};
use super::load_tree;
use crate::cli::output::{colors, format_millis};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Parsed document tree (JSON)
    pub tree: PathBuf,

    /// Source book recorded in the metadata (defaults to the tree path)
    #[arg(long, short = 's')]
    pub source: Option<String>,
}

/// Full run response
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub output_dir: String,
    pub sections_created: usize,
    pub sections_skipped: usize,
    pub total_sections: usize,
    pub total_chunks: usize,
    pub chunking: ChunkResponse,
}

/// Execute the run command
pub fn execute(
    args: RunArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = load_tree(&args.tree)?;
    let source_file = args
        .source
        .unwrap_or_else(|| args.tree.display().to_string());

    let pipeline = services.create_pipeline()?;
    let report = pipeline.run(&tree, Some(&source_file))?;

    let response = RunResponse {
        output_dir: services.config.storage.output_dir.display().to_string(),
        sections_created: report.extraction.sections_created(),
        sections_skipped: report.extraction.sections_skipped,
        total_sections: pipeline.library().section_count(),
        total_chunks: pipeline.library().chunk_count(),
        chunking: ChunkResponse::from(report.chunking),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} new sections ({} already present) in {}",
                colors::success("Extracted"),
                colors::number(&response.sections_created.to_string()),
                colors::number(&response.sections_skipped.to_string()),
                format_millis(report.extraction.duration_ms)
            );
            print_report(&response.chunking, format)?;
            println!(
                "{}: {} sections, {} chunks in {}",
                colors::label("Library"),
                colors::number(&response.total_sections.to_string()),
                colors::number(&response.total_chunks.to_string()),
                colors::file_path(&response.output_dir)
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
