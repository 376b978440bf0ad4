//! Processing pipeline orchestration.
//!
//! Coordinates the end-to-end workflow:
//! 1. Record the source document
//! 2. Extract new sections from the document tree
//! 3. Chunk every section that has no chunks yet
//!
//! Each section's chunking outcome is tracked as an explicit
//! [`ItemStatus`]. A section whose text cannot be read is marked failed
//! and the run moves on; a failed store write aborts the run.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::core::chunking::TextChunker;
use crate::core::config::Config;
use crate::core::document::DocumentNode;
use crate::core::error::{BinderyError, Result};
use crate::core::segment::{ExtractionReport, SectionExtractor, SectionSplitter};
use crate::core::store::{ArtifactStore, FsArtifactStore, JsonMetadataStore, Library, MetadataStore};
use crate::core::types::{ChunkRecord, SectionRecord};

/// Chunking status of one section within a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ItemStatus {
    NotAttempted,
    Failed(String),
    Success,
}

impl ItemStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemStatus::Success)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ItemStatus::Failed(_))
    }
}

/// Outcome for one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionOutcome {
    pub idx: usize,
    pub title: String,
    pub status: ItemStatus,

    /// Chunks created for this section by this run
    pub chunks_created: usize,

    /// Set when the section already had chunks and was left alone
    pub already_chunked: bool,
}

/// Outcome of a chunking pass over the library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkingReport {
    pub outcomes: Vec<SectionOutcome>,
    pub chunks_created: usize,
    pub duration_ms: u64,
}

impl ChunkingReport {
    /// Sections chunked by this run
    pub fn sections_chunked(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_success() && !o.already_chunked)
            .count()
    }

    /// Sections left alone because they already had chunks
    pub fn sections_already_chunked(&self) -> usize {
        self.outcomes.iter().filter(|o| o.already_chunked).count()
    }

    pub fn sections_failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_failed()).count()
    }
}

/// Outcome of a full run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub extraction: ExtractionReport,
    pub chunking: ChunkingReport,
}

/// Extraction followed by per-section chunking
pub struct Pipeline<M = JsonMetadataStore, A = FsArtifactStore> {
    library: Library<M, A>,
    splitter: SectionSplitter,
    chunker: TextChunker,
    write_chunk_files: bool,
    rechunk: bool,
}

impl Pipeline {
    /// Open the configured library and build a pipeline from validated
    /// configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let library = Library::open(
            &config.storage.output_dir,
            config.storage.metadata_file.clone(),
        )?
        .with_title_banner(config.segmentation.title_banner);

        Ok(Self::new(
            library,
            SectionSplitter::new(config.segmentation.max_section_chars),
            TextChunker::from_config(&config.chunking),
        )
        .with_chunk_files(config.chunking.write_chunk_files))
    }
}

impl<M: MetadataStore, A: ArtifactStore> Pipeline<M, A> {
    /// Create a pipeline over `library`
    pub fn new(library: Library<M, A>, splitter: SectionSplitter, chunker: TextChunker) -> Self {
        Self {
            library,
            splitter,
            chunker,
            write_chunk_files: true,
            rechunk: false,
        }
    }

    /// Write chunk artifacts (default) or store chunk text inline
    pub fn with_chunk_files(mut self, enabled: bool) -> Self {
        self.write_chunk_files = enabled;
        self
    }

    /// Chunk sections again even if they already have chunks. New
    /// chunks are appended after the existing ones.
    pub fn with_rechunk(mut self, rechunk: bool) -> Self {
        self.rechunk = rechunk;
        self
    }

    pub fn library(&self) -> &Library<M, A> {
        &self.library
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Run extraction and chunking for a document tree
    pub fn run(&self, root: &DocumentNode, source_file: Option<&str>) -> Result<PipelineReport> {
        if let Some(source) = source_file {
            self.library.set_source_file(source)?;
        }

        let extraction = self.extract(root)?;
        let chunking = self.chunk_all()?;

        Ok(PipelineReport {
            extraction,
            chunking,
        })
    }

    /// Extract new sections only
    pub fn extract(&self, root: &DocumentNode) -> Result<ExtractionReport> {
        SectionExtractor::new(&self.library, self.splitter.clone()).extract(root)
    }

    /// Chunk every stored section that needs it.
    ///
    /// Entries that do not parse as section records are reported as
    /// failed.
    pub fn chunk_all(&self) -> Result<ChunkingReport> {
        let start = Instant::now();
        let sections = self.library.all_sections();
        let unreadable = self.library.unreadable_sections();

        tracing::info!(
            "Chunking pass over {} sections",
            sections.len() + unreadable.len()
        );

        let mut outcomes = Vec::with_capacity(sections.len() + unreadable.len());
        for entry in unreadable {
            tracing::warn!("Failed to chunk section {}: {}", entry.idx, entry.reason);
            outcomes.push(SectionOutcome {
                idx: entry.idx,
                title: entry.title,
                status: ItemStatus::Failed(entry.reason),
                chunks_created: 0,
                already_chunked: false,
            });
        }

        let mut chunks_created = 0;
        for section in sections.values() {
            let outcome = self.chunk_one(section)?;
            chunks_created += outcome.chunks_created;
            outcomes.push(outcome);
        }
        outcomes.sort_by_key(|outcome| outcome.idx);

        let report = ChunkingReport {
            outcomes,
            chunks_created,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Chunking complete: {} sections chunked, {} already chunked, {} failed, \
             {} chunks created in {}ms",
            report.sections_chunked(),
            report.sections_already_chunked(),
            report.sections_failed(),
            report.chunks_created,
            report.duration_ms
        );

        Ok(report)
    }

    /// Chunk one section regardless of its existing chunks and return
    /// the new chunk records
    pub fn chunk_section(&self, idx: usize) -> Result<Vec<ChunkRecord>> {
        let section = self.library.require_section(idx)?;
        let text = self.read_text(&section)?;
        self.persist_chunks(&section, &text)
    }

    fn chunk_one(&self, section: &SectionRecord) -> Result<SectionOutcome> {
        let mut outcome = SectionOutcome {
            idx: section.idx,
            title: section.title.clone(),
            status: ItemStatus::NotAttempted,
            chunks_created: 0,
            already_chunked: false,
        };

        if !self.rechunk && self.library.has_chunks(section.idx) {
            tracing::debug!("Section {} already chunked, skipping", section.idx);
            outcome.status = ItemStatus::Success;
            outcome.already_chunked = true;
            return Ok(outcome);
        }

        let text = match self.read_text(section) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to chunk section {}: {}", section.idx, e);
                outcome.status = ItemStatus::Failed(e.to_string());
                return Ok(outcome);
            }
        };

        let records = self.persist_chunks(section, &text)?;
        outcome.chunks_created = records.len();
        outcome.status = ItemStatus::Success;
        Ok(outcome)
    }

    fn read_text(&self, section: &SectionRecord) -> Result<String> {
        self.library.read_section_text(section)?.ok_or_else(|| {
            BinderyError::ChunkingFailed(format!(
                "Content artifact {} is missing",
                section.section_file
            ))
        })
    }

    fn persist_chunks(&self, section: &SectionRecord, text: &str) -> Result<Vec<ChunkRecord>> {
        let chunks = self.chunker.chunk_text(text);
        let records = self
            .library
            .store_section_chunks(section, &chunks, self.write_chunk_files)?;

        tracing::debug!(
            "Chunked section {} '{}' into {} chunks",
            section.idx,
            section.title,
            records.len()
        );
        Ok(records)
    }
}
