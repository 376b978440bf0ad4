//! Preview command - chunk a text file without persisting anything

use crate::cli::output::{colors, preview_line};
use crate::cli::OutputFormat;
use crate::core::chunking::TextChunker;
use crate::core::services::Services;
use crate::core::types::TextChunk;
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the preview-chunks command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Plain text file (UTF-8)
    pub file: PathBuf,

    /// Override the configured max chunk size
    #[arg(long)]
    pub max_chunk_size: Option<usize>,

    /// Override the configured min chunk size
    #[arg(long)]
    pub min_chunk_size: Option<usize>,

    /// Override the configured overlap
    #[arg(long)]
    pub overlap: Option<usize>,
}

/// Preview response
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub file: String,
    pub text_length: usize,
    pub chunk_count: usize,
    pub chunks: Vec<PreviewChunk>,
}

#[derive(Debug, Serialize)]
pub struct PreviewChunk {
    pub index: usize,
    pub length: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
}

impl PreviewChunk {
    fn new(index: usize, chunk: TextChunk) -> Self {
        Self {
            index,
            length: chunk.char_len(),
            start_offset: chunk.start_offset,
            end_offset: chunk.end_offset,
            text: chunk.text,
        }
    }
}

/// Execute the preview-chunks command
pub fn execute(
    args: PreviewArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(&args.file).map_err(|e| {
        format!(
            "Failed to read '{}': {}. The file must exist and be valid UTF-8.",
            args.file.display(),
            e
        )
    })?;

    let chunking = &services.config.chunking;
    let max = args.max_chunk_size.unwrap_or(chunking.max_chunk_size);
    let min = args.min_chunk_size.unwrap_or(chunking.min_chunk_size);
    let overlap = args.overlap.unwrap_or(chunking.overlap_chars);

    if max == 0 {
        return Err("Max chunk size must be greater than 0.".into());
    }
    if overlap >= max {
        return Err(format!("Overlap ({overlap}) must be less than max chunk size ({max}).").into());
    }

    let chunker = TextChunker::new(min, max, overlap, &chunking.language);
    let chunks: Vec<PreviewChunk> = chunker
        .chunk_text(&text)
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| PreviewChunk::new(i, chunk))
        .collect();

    let response = PreviewResponse {
        file: args.file.display().to_string(),
        text_length: text.chars().count(),
        chunk_count: chunks.len(),
        chunks,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} chunks from {} ({} chars, max {}, min {}, overlap {})",
                colors::success("Preview:"),
                colors::number(&response.chunk_count.to_string()),
                colors::file_path(&response.file),
                colors::number(&response.text_length.to_string()),
                max,
                min,
                overlap
            );
            for chunk in &response.chunks {
                println!(
                    "{}",
                    preview_line(
                        chunk.index,
                        chunk.length,
                        chunk.start_offset,
                        chunk.end_offset,
                        &chunk.text
                    )
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
