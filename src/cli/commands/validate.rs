//! Validate command - check the metadata store against the files on disk

use crate::cli::output::{colors, format_bytes};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::store::LibraryValidator;
use clap::Args;
use std::sync::Arc;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Exit with an error if the library is inconsistent
    #[arg(long)]
    pub strict: bool,
}

/// Execute the validate command
pub fn execute(
    args: ValidateArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let library = services.open_library()?;
    let report = LibraryValidator::new(&library).validate()?;

    match format {
        OutputFormat::Human => {
            println!(
                "{}: {} sections, {} chunks, {} on disk",
                colors::label("Library"),
                colors::number(&report.total_sections.to_string()),
                colors::number(&report.total_chunks.to_string()),
                colors::number(&format_bytes(report.artifact_bytes))
            );

            for idx in &report.missing_section_files {
                println!(
                    "  {} section {} content file",
                    colors::error("missing"),
                    colors::index(&idx.to_string())
                );
            }
            for (section_idx, chunk_idx) in &report.missing_chunk_files {
                println!(
                    "  {} chunk {} of section {}",
                    colors::error("missing"),
                    colors::index(&chunk_idx.to_string()),
                    colors::index(&section_idx.to_string())
                );
            }
            for orphan in &report.orphan_files {
                println!(
                    "  {} {}",
                    colors::warning("orphan"),
                    colors::file_path(orphan)
                );
            }

            if report.is_consistent {
                println!("{}", colors::success("Library is consistent"));
            } else {
                println!("{}", colors::error("Library is inconsistent"));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if args.strict && !report.is_consistent {
        return Err(format!(
            "{} missing section files, {} missing chunk files, {} orphan files",
            report.missing_section_files.len(),
            report.missing_chunk_files.len(),
            report.orphan_files.len()
        )
        .into());
    }

    Ok(())
}
