//! Extract command - add new sections from a document tree

use super::load_tree;
use crate::cli::output::{colors, format_millis};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Parsed document tree (JSON)
    pub tree: PathBuf,

    /// Source book recorded in the metadata (defaults to the tree path)
    #[arg(long, short = 's')]
    pub source: Option<String>,
}

/// Extraction result response
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub output_dir: String,
    pub source_file: String,
    pub sections_created: usize,
    pub sections_skipped: usize,
    pub first_index: usize,
    pub next_index: usize,
    pub created: Vec<usize>,
    pub duration_ms: u64,
}

/// Execute the extract command
pub fn execute(
    args: ExtractArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = load_tree(&args.tree)?;
    let source_file = args
        .source
        .unwrap_or_else(|| args.tree.display().to_string());

    let pipeline = services.create_pipeline()?;
    pipeline.library().set_source_file(&source_file)?;
    let report = pipeline.extract(&tree)?;

    let response = ExtractResponse {
        output_dir: services.config.storage.output_dir.display().to_string(),
        source_file,
        sections_created: report.sections_created(),
        sections_skipped: report.sections_skipped,
        first_index: report.first_index,
        next_index: report.next_index,
        created: report.created,
        duration_ms: report.duration_ms,
    };

    match format {
        OutputFormat::Human => {
            if response.sections_created == 0 {
                println!(
                    "{} (all {} sections already extracted)",
                    colors::dim("Nothing new to extract"),
                    colors::number(&response.sections_skipped.to_string())
                );
            } else {
                println!(
                    "{} {} sections ({}..{}) into {} in {}",
                    colors::success("Extracted"),
                    colors::number(&response.sections_created.to_string()),
                    colors::index(&response.first_index.to_string()),
                    colors::index(&(response.next_index - 1).to_string()),
                    colors::file_path(&response.output_dir),
                    format_millis(response.duration_ms)
                );
                if response.sections_skipped > 0 {
                    println!(
                        "  {}: {}",
                        colors::label("Skipped (already present)"),
                        colors::number(&response.sections_skipped.to_string())
                    );
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
