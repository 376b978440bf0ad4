//! Section extraction from a document tree.
//!
//! Walks the tree depth-first and persists every leaf node with
//! non-blank content as a section. Titles accumulate down the tree
//! (`"Part One - 1"`), a node's content is only its own direct text
//! items, and oversized leaves are split into parts first.
//!
//! Extraction is incremental: indices continue after the largest index
//! already in the library, and a candidate whose title is already
//! stored is skipped. Re-running over the same tree adds nothing.

use crate::core::document::DocumentNode;
use crate::core::error::Result;
use crate::core::segment::splitter::{SectionSplitter, PARAGRAPH_SEPARATOR};
use crate::core::store::{ArtifactStore, Library, MetadataStore};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Separator between ancestor and node titles
pub const TITLE_SEPARATOR: &str = " - ";

/// Outcome of one extraction run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Indices of the sections persisted by this run, in order
    pub created: Vec<usize>,

    /// Candidates (or parts) skipped because their title was stored
    pub sections_skipped: usize,

    /// First index this run could assign
    pub first_index: usize,

    /// Next free index after the run
    pub next_index: usize,

    pub duration_ms: u64,
}

impl ExtractionReport {
    pub fn sections_created(&self) -> usize {
        self.created.len()
    }
}

/// Depth-first section extractor
pub struct SectionExtractor<'a, M, A> {
    library: &'a Library<M, A>,
    splitter: SectionSplitter,
}

impl<'a, M: MetadataStore, A: ArtifactStore> SectionExtractor<'a, M, A> {
    /// Create an extractor writing into `library`
    pub fn new(library: &'a Library<M, A>, splitter: SectionSplitter) -> Self {
        Self { library, splitter }
    }

    /// Extract every new leaf section of `root`
    pub fn extract(&self, root: &DocumentNode) -> Result<ExtractionReport> {
        let start = Instant::now();
        let first_index = self.library.next_section_index();

        tracing::info!("Starting extraction at section index {}", first_index);

        let mut report = ExtractionReport {
            first_index,
            ..Default::default()
        };
        let next_index = self.visit(root, String::new(), first_index, &mut report)?;

        report.next_index = next_index;
        report.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Extraction complete: {} sections created, {} skipped in {}ms",
            report.sections_created(),
            report.sections_skipped,
            report.duration_ms
        );

        Ok(report)
    }

    /// Visit one node and return the next free index
    fn visit(
        &self,
        node: &DocumentNode,
        ancestor_title: String,
        mut next_index: usize,
        report: &mut ExtractionReport,
    ) -> Result<usize> {
        let full_title = compose_title(&ancestor_title, node.title());

        if node.has_child_sections() {
            for child in node.child_sections() {
                next_index = self.visit(child, full_title.clone(), next_index, report)?;
            }
            return Ok(next_index);
        }

        let content = isolated_content(node);
        if content.is_empty() {
            tracing::debug!("Dropping empty leaf '{}'", full_title);
            return Ok(next_index);
        }

        if self.is_stored(&full_title) {
            tracing::debug!("Skipping already stored section '{}'", full_title);
            report.sections_skipped += 1;
            return Ok(next_index);
        }

        for part in self.splitter.split(&full_title, &content) {
            if part.title != full_title && self.is_stored(&part.title) {
                tracing::debug!("Skipping already stored part '{}'", part.title);
                report.sections_skipped += 1;
                continue;
            }

            self.library
                .add_section(next_index, &part.title, &part.content, None)?;
            tracing::debug!(
                "Extracted section {} '{}' ({} chars)",
                next_index,
                part.title,
                part.content.chars().count()
            );

            report.created.push(next_index);
            next_index += 1;
        }

        Ok(next_index)
    }

    /// Title-based dedup guard. Empty titles never match.
    fn is_stored(&self, title: &str) -> bool {
        self.library.section_by_title(title).is_some()
    }
}

/// `"ancestor - own"`, inheriting the ancestor title when the node has
/// none
pub fn compose_title(ancestor: &str, own: Option<&str>) -> String {
    match own {
        None => ancestor.to_string(),
        Some(own) if ancestor.is_empty() => own.to_string(),
        Some(own) => format!("{ancestor}{TITLE_SEPARATOR}{own}"),
    }
}

/// The node's own text: direct content items joined by the paragraph
/// separator, child sections excluded
pub fn isolated_content(node: &DocumentNode) -> String {
    node.content_items()
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}
