//! Library consistency checking.
//!
//! Compares the records in the metadata store with the artifacts on
//! disk: every section must have its content file, every chunk with an
//! artifact handle must have its file, and files under the artifact
//! directories that no record references are reported as orphans.

use crate::core::error::Result;
use crate::core::store::artifacts::{ArtifactStore, FsArtifactStore};
use crate::core::store::library::Library;
use crate::core::store::metadata::MetadataStore;
use crate::core::store::naming::{CHUNKS_DIR, SECTIONS_DIR, SUMMARIES_DIR};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Library validation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_sections: usize,
    pub total_chunks: usize,

    /// Section indices whose content artifact is missing
    pub missing_section_files: Vec<usize>,

    /// `(section_idx, chunk_idx)` pairs whose chunk artifact is missing
    pub missing_chunk_files: Vec<(usize, usize)>,

    /// Artifact handles no record refers to
    pub orphan_files: Vec<String>,

    /// Total size of all artifact files in bytes
    pub artifact_bytes: u64,

    pub is_consistent: bool,

    /// Validation timestamp
    pub validated_at: String,
}

/// Validator for a library stored on the local filesystem
pub struct LibraryValidator<'a, M> {
    library: &'a Library<M, FsArtifactStore>,
}

impl<'a, M: MetadataStore> LibraryValidator<'a, M> {
    /// Create a new validator
    pub fn new(library: &'a Library<M, FsArtifactStore>) -> Self {
        Self { library }
    }

    /// Check every record against the artifacts on disk
    pub fn validate(&self) -> Result<ValidationReport> {
        let artifacts = self.library.artifacts();
        let sections = self.library.all_sections();

        let mut referenced = HashSet::new();
        let mut missing_section_files = Vec::new();
        let mut missing_chunk_files = Vec::new();
        let mut total_chunks = 0;

        for (idx, section) in &sections {
            if !artifacts.exists(&section.section_file) {
                missing_section_files.push(*idx);
            }
            referenced.insert(section.section_file.clone());
            if let Some(summary) = &section.summary_file {
                referenced.insert(summary.clone());
            }

            let chunks = self.library.section_chunks(*idx);
            total_chunks += chunks.len();
            for (chunk_idx, chunk) in &chunks {
                let Some(file) = &chunk.chunk_file else {
                    continue;
                };
                if !artifacts.exists(file) {
                    missing_chunk_files.push((*idx, *chunk_idx));
                }
                referenced.insert(file.clone());
            }
        }

        let mut orphan_files = Vec::new();
        let mut artifact_bytes = 0u64;
        for dir in [SECTIONS_DIR, SUMMARIES_DIR, CHUNKS_DIR] {
            for (handle, size) in list_artifacts(artifacts.root(), dir) {
                artifact_bytes += size;
                if !referenced.contains(&handle) {
                    orphan_files.push(handle);
                }
            }
        }
        orphan_files.sort();

        let is_consistent = missing_section_files.is_empty()
            && missing_chunk_files.is_empty()
            && orphan_files.is_empty();

        if !is_consistent {
            tracing::warn!(
                "Library inconsistent: {} missing section files, {} missing chunk files, {} orphans",
                missing_section_files.len(),
                missing_chunk_files.len(),
                orphan_files.len()
            );
        }

        Ok(ValidationReport {
            total_sections: sections.len(),
            total_chunks,
            missing_section_files,
            missing_chunk_files,
            orphan_files,
            artifact_bytes,
            is_consistent,
            validated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

/// Files under `root/dir` as `(handle, size)` pairs, with handles using
/// `/` separators relative to `root`
fn list_artifacts(root: &Path, dir: &str) -> Vec<(String, u64)> {
    let dir_path = root.join(dir);
    if !dir_path.exists() {
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&dir_path).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let handle = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        files.push((handle, size));
    }
    files
}
