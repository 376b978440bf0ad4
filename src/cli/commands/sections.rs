//! Section commands - list, show and delete stored sections

use crate::cli::output::{colors, preview_line, truncate_text};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::{ChunkRecord, SectionRecord};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

/// Arguments for list-sections command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show chunk counts and summary state
    #[arg(long, short = 'd')]
    pub detailed: bool,
}

/// Arguments for show-section command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Section index
    pub idx: usize,

    /// Print the full section text
    #[arg(long, short = 'c')]
    pub content: bool,
}

/// Arguments for delete-section command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Section index
    pub idx: usize,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Section listing response
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub source_file: Option<String>,
    pub sections: Vec<SectionSummary>,
    pub total_sections: usize,
    pub total_chunks: usize,
}

#[derive(Debug, Serialize)]
pub struct SectionSummary {
    pub idx: usize,
    pub title: String,
    pub section_file: String,
    pub chunks: usize,
    pub has_summary: bool,
}

/// Section detail response
#[derive(Debug, Serialize)]
pub struct ShowResponse {
    #[serde(flatten)]
    pub section: SectionRecord,
    pub content_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub summary: Option<String>,
    pub chunks: Vec<ChunkRecord>,
}

fn not_found(idx: usize) -> Box<dyn std::error::Error> {
    format!("Section {idx} not found. Run 'bindery list-sections' to see stored sections.").into()
}

/// Execute list-sections command
pub fn execute_list(
    args: ListArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let library = services.open_library()?;

    let sections: Vec<SectionSummary> = library
        .all_sections()
        .into_values()
        .map(|s| SectionSummary {
            chunks: library.section_chunks(s.idx).len(),
            has_summary: s.summary_file.is_some(),
            idx: s.idx,
            title: s.title,
            section_file: s.section_file,
        })
        .collect();

    let response = ListResponse {
        source_file: library.source_file(),
        total_sections: sections.len(),
        total_chunks: sections.iter().map(|s| s.chunks).sum(),
        sections,
    };

    match format {
        OutputFormat::Human => {
            if response.sections.is_empty() {
                println!("No sections stored.");
                println!();
                println!(
                    "Extract some with: {}",
                    colors::dim("bindery run <tree.json>")
                );
                return Ok(());
            }

            if let Some(source) = &response.source_file {
                println!("{}: {}", colors::label("Source"), colors::file_path(source));
            }
            for section in &response.sections {
                if args.detailed {
                    println!(
                        "{:>5}  {}  {} chunks{}",
                        colors::index(&section.idx.to_string()),
                        colors::title(&section.title),
                        colors::number(&section.chunks.to_string()),
                        if section.has_summary {
                            colors::dim(", summarized").to_string()
                        } else {
                            String::new()
                        }
                    );
                } else {
                    println!(
                        "{:>5}  {}",
                        colors::index(&section.idx.to_string()),
                        section.title
                    );
                }
            }
            println!();
            println!(
                "{} sections, {} chunks",
                colors::number(&response.total_sections.to_string()),
                colors::number(&response.total_chunks.to_string())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Execute show-section command
pub fn execute_show(
    args: ShowArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let library = services.open_library()?;
    let section = library.section(args.idx).ok_or_else(|| not_found(args.idx))?;

    let text = library.read_section_text(&section)?;
    let summary = library.section_summary(args.idx)?;
    let chunks: Vec<ChunkRecord> = library.section_chunks(args.idx).into_values().collect();

    let response = ShowResponse {
        content_length: text.as_ref().map(|t| t.chars().count()),
        content: if args.content { text.clone() } else { None },
        summary,
        chunks,
        section,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {}",
                colors::index(&format!("[{}]", response.section.idx)),
                colors::title(&response.section.title)
            );
            println!(
                "  {}: {}",
                colors::label("File"),
                colors::file_path(&response.section.section_file)
            );
            match response.content_length {
                Some(len) => println!(
                    "  {}: {} chars",
                    colors::label("Length"),
                    colors::number(&len.to_string())
                ),
                None => println!(
                    "  {}: {}",
                    colors::label("Length"),
                    colors::error("content file missing")
                ),
            }
            println!(
                "  {}: {}",
                colors::label("Created"),
                colors::dim(&response.section.created_at.to_rfc3339())
            );
            if let Some(summary) = &response.summary {
                println!(
                    "  {}: {}",
                    colors::label("Summary"),
                    truncate_text(summary, 120)
                );
            }

            println!(
                "  {}: {}",
                colors::label("Chunks"),
                colors::number(&response.chunks.len().to_string())
            );
            for chunk in &response.chunks {
                let chunk_text = library.chunk_text(chunk)?.unwrap_or_default();
                println!(
                    "    {}",
                    preview_line(
                        chunk.idx,
                        chunk.text_length,
                        chunk.start_offset,
                        chunk.end_offset,
                        &chunk_text
                    )
                );
            }

            if let Some(content) = &response.content {
                println!();
                println!("{content}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Execute delete-section command
pub fn execute_delete(
    args: DeleteArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let library = services.open_library()?;
    let section = library.section(args.idx).ok_or_else(|| not_found(args.idx))?;

    // Confirmation prompt unless --force
    if !args.force {
        print!(
            "Delete section {} '{}' and its chunks? [y/N] ",
            colors::index(&section.idx.to_string()),
            colors::title(&section.title)
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", colors::dim("Cancelled."));
            return Ok(());
        }
    }

    let chunks = library.section_chunks(args.idx).len();
    let deleted = library.delete_section(args.idx)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} section {} ({} chunks)",
                colors::success("Deleted"),
                colors::index(&args.idx.to_string()),
                colors::number(&chunks.to_string())
            );
        }
        OutputFormat::Json => {
            let response = serde_json::json!({
                "deleted": deleted,
                "idx": args.idx,
                "title": section.title,
                "chunks_deleted": chunks
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
