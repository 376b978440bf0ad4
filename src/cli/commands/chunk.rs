//! Chunk command - chunk stored sections

use crate::cli::output::{colors, format_millis};
use crate::cli::OutputFormat;
use crate::core::pipeline::{ChunkingReport, ItemStatus, SectionOutcome};
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the chunk command
#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// Chunk only this section
    #[arg(long, short = 's')]
    pub section: Option<usize>,

    /// Chunk again even if chunks already exist (new chunks are appended)
    #[arg(long)]
    pub rechunk: bool,
}

/// Chunking result response
#[derive(Debug, Serialize)]
pub struct ChunkResponse {
    pub sections_chunked: usize,
    pub sections_already_chunked: usize,
    pub sections_failed: usize,
    pub chunks_created: usize,
    pub duration_ms: u64,
    pub outcomes: Vec<SectionOutcome>,
}

impl From<ChunkingReport> for ChunkResponse {
    fn from(report: ChunkingReport) -> Self {
        Self {
            sections_chunked: report.sections_chunked(),
            sections_already_chunked: report.sections_already_chunked(),
            sections_failed: report.sections_failed(),
            chunks_created: report.chunks_created,
            duration_ms: report.duration_ms,
            outcomes: report.outcomes,
        }
    }
}

/// Execute the chunk command
pub fn execute(
    args: ChunkArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = services.create_pipeline()?.with_rechunk(args.rechunk);

    let report = match args.section {
        Some(idx) => {
            let start = Instant::now();
            let section = pipeline.library().section(idx).ok_or_else(|| {
                format!("Section {idx} not found. Run 'bindery list-sections' to see stored sections.")
            })?;

            let mut outcome = SectionOutcome {
                idx,
                title: section.title,
                status: ItemStatus::Success,
                chunks_created: 0,
                already_chunked: false,
            };
            if !args.rechunk && pipeline.library().has_chunks(idx) {
                outcome.already_chunked = true;
            } else {
                outcome.chunks_created = pipeline.chunk_section(idx)?.len();
            }

            ChunkingReport {
                chunks_created: outcome.chunks_created,
                outcomes: vec![outcome],
                duration_ms: start.elapsed().as_millis() as u64,
            }
        }
        None => pipeline.chunk_all()?,
    };

    print_report(&ChunkResponse::from(report), format)
}

/// Print a chunking report in the requested format
pub(crate) fn print_report(
    response: &ChunkResponse,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            for outcome in &response.outcomes {
                if let ItemStatus::Failed(reason) = &outcome.status {
                    println!(
                        "  {} [{}] {}: {}",
                        colors::error("failed"),
                        colors::index(&outcome.idx.to_string()),
                        colors::title(&outcome.title),
                        reason
                    );
                }
            }
            println!(
                "{} {} sections into {} chunks in {}",
                colors::success("Chunked"),
                colors::number(&response.sections_chunked.to_string()),
                colors::number(&response.chunks_created.to_string()),
                format_millis(response.duration_ms)
            );
            if response.sections_already_chunked > 0 {
                println!(
                    "  {}: {}",
                    colors::label("Already chunked"),
                    colors::number(&response.sections_already_chunked.to_string())
                );
            }
            if response.sections_failed > 0 {
                println!(
                    "  {}: {}",
                    colors::label("Failed"),
                    colors::warning(&response.sections_failed.to_string())
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
    }

    Ok(())
}
