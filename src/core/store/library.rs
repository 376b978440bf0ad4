//! Typed access to sections and chunks.
//!
//! A [`Library`] pairs a metadata store with an artifact store and
//! keeps the two consistent: artifacts are written before the records
//! that reference them.

use crate::core::error::{BinderyError, Result};
use crate::core::store::artifacts::{ArtifactStore, FsArtifactStore};
use crate::core::store::metadata::{
    max_index, JsonMetadataStore, MetadataStore, CHUNKS, SECTIONS, SOURCE_FILE,
};
use crate::core::store::naming;
use crate::core::types::{ChunkRecord, SectionRecord, TextChunk};
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default metadata file name inside the output directory
pub const METADATA_FILE_NAME: &str = "sections_metadata.json";

/// Field of a chunk container naming the section artifact
const SECTION_FILE_FIELD: &str = "section_file";

/// A stored section entry that does not parse as a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadableSection {
    pub idx: usize,

    /// Title from the raw entry, empty if absent
    pub title: String,

    pub reason: String,
}

/// Sections and chunks of one processed document
#[derive(Debug, Clone)]
pub struct Library<M = JsonMetadataStore, A = FsArtifactStore> {
    metadata: M,
    artifacts: A,
    title_banner: bool,
}

impl Library {
    /// Open (or create) a library in `output_dir`.
    ///
    /// The metadata file defaults to `{output_dir}/sections_metadata.json`.
    pub fn open(output_dir: impl AsRef<Path>, metadata_file: Option<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.as_ref();
        let metadata_file = metadata_file.unwrap_or_else(|| output_dir.join(METADATA_FILE_NAME));

        let metadata = JsonMetadataStore::open(metadata_file)?;
        let artifacts = FsArtifactStore::new(output_dir);

        Ok(Self::new(metadata, artifacts))
    }
}

impl<M: MetadataStore, A: ArtifactStore> Library<M, A> {
    /// Create a library from explicit stores
    pub fn new(metadata: M, artifacts: A) -> Self {
        Self {
            metadata,
            artifacts,
            title_banner: true,
        }
    }

    /// Enable or disable the `=== title ===` banner on section artifacts
    pub fn with_title_banner(mut self, enabled: bool) -> Self {
        self.title_banner = enabled;
        self
    }

    /// Underlying metadata store
    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    /// Underlying artifact store
    pub fn artifacts(&self) -> &A {
        &self.artifacts
    }

    // ------------------------------------------------------------------
    // Provenance
    // ------------------------------------------------------------------

    /// Record the source document path
    pub fn set_source_file(&self, source: &str) -> Result<()> {
        self.metadata
            .set(&[SOURCE_FILE], Value::String(source.to_string()))
    }

    /// Source document path, if recorded
    pub fn source_file(&self) -> Option<String> {
        self.metadata
            .get(&[SOURCE_FILE])
            .and_then(|v| v.as_str().map(str::to_string))
    }

    // ------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------

    /// All parseable section records, ordered by index
    pub fn all_sections(&self) -> BTreeMap<usize, SectionRecord> {
        let sections = match self.metadata.get(&[SECTIONS]) {
            Some(Value::Object(map)) => map,
            _ => return BTreeMap::new(),
        };
        parse_records(sections, "section")
    }

    /// Number of stored sections
    pub fn section_count(&self) -> usize {
        self.all_sections().len()
    }

    /// One section record
    pub fn section(&self, idx: usize) -> Option<SectionRecord> {
        let value = self.metadata.get(&[SECTIONS, &idx.to_string()])?;
        serde_json::from_value(value).ok()
    }

    /// Largest stored section index
    pub fn max_section_index(&self) -> Option<usize> {
        match self.metadata.get(&[SECTIONS]) {
            Some(Value::Object(map)) => max_index(&map),
            _ => None,
        }
    }

    /// First index a new run should assign
    pub fn next_section_index(&self) -> usize {
        self.max_section_index().map_or(0, |max| max + 1)
    }

    /// Index of a stored section whose title equals `title` exactly.
    ///
    /// Titles are read from the raw entries, so records that do not
    /// parse still count. An empty title never matches.
    pub fn section_by_title(&self, title: &str) -> Option<usize> {
        if title.is_empty() {
            return None;
        }
        let Some(Value::Object(sections)) = self.metadata.get(&[SECTIONS]) else {
            return None;
        };
        sections.iter().find_map(|(key, value)| {
            let stored = value.get("title").and_then(Value::as_str)?;
            if stored == title {
                key.parse().ok()
            } else {
                None
            }
        })
    }

    /// Section entries that do not parse as a [`SectionRecord`],
    /// ordered by index
    pub fn unreadable_sections(&self) -> Vec<UnreadableSection> {
        let Some(Value::Object(sections)) = self.metadata.get(&[SECTIONS]) else {
            return Vec::new();
        };

        let mut unreadable: Vec<UnreadableSection> = sections
            .into_iter()
            .filter_map(|(key, value)| {
                let idx = key.parse::<usize>().ok()?;
                let title = value
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let err = serde_json::from_value::<SectionRecord>(value).err()?;
                Some(UnreadableSection {
                    idx,
                    title,
                    reason: format!("Unreadable section record: {err}"),
                })
            })
            .collect();
        unreadable.sort_by_key(|entry| entry.idx);
        unreadable
    }

    /// Persist a section: content artifact, optional summary artifact,
    /// then the record at `sections.{idx}`.
    pub fn add_section(
        &self,
        idx: usize,
        title: &str,
        content: &str,
        summary: Option<&str>,
    ) -> Result<SectionRecord> {
        let section_file = naming::section_handle(idx, title);
        self.artifacts
            .write(&section_file, &self.render(title, content))?;

        let summary_file = match summary {
            Some(summary) => {
                let handle = naming::summary_handle(&section_file);
                self.artifacts.write(&handle, &self.render(title, summary))?;
                Some(handle)
            }
            None => None,
        };

        let record = SectionRecord {
            idx,
            title: title.to_string(),
            section_file,
            summary_file,
            created_at: Utc::now(),
            updated_at: None,
        };

        self.metadata
            .set(&[SECTIONS, &idx.to_string()], serde_json::to_value(&record)?)?;

        tracing::debug!("Stored section {} '{}'", idx, title);
        Ok(record)
    }

    /// Replace a section's content. Returns `false` if the section is
    /// unknown.
    pub fn set_section_content(&self, idx: usize, content: &str) -> Result<bool> {
        let Some(mut record) = self.section(idx) else {
            return Ok(false);
        };

        self.artifacts
            .write(&record.section_file, &self.render(&record.title, content))?;

        record.updated_at = Some(Utc::now());
        self.put_section(&record)?;
        Ok(true)
    }

    /// Write (or replace) a section's summary. Returns `false` if the
    /// section is unknown.
    pub fn set_section_summary(&self, idx: usize, summary: &str) -> Result<bool> {
        let Some(mut record) = self.section(idx) else {
            return Ok(false);
        };

        let handle = naming::summary_handle(&record.section_file);
        self.artifacts
            .write(&handle, &self.render(&record.title, summary))?;

        record.summary_file = Some(handle);
        record.updated_at = Some(Utc::now());
        self.put_section(&record)?;
        Ok(true)
    }

    /// Section text with the title banner removed, or `None` if the
    /// section or its artifact is missing
    pub fn section_content(&self, idx: usize) -> Result<Option<String>> {
        let Some(record) = self.section(idx) else {
            return Ok(None);
        };
        self.read_section_text(&record)
    }

    /// Section text of a known record with the title banner removed
    pub fn read_section_text(&self, record: &SectionRecord) -> Result<Option<String>> {
        let Some(raw) = self.artifacts.read(&record.section_file)? else {
            return Ok(None);
        };

        let banner = naming::title_banner(&record.title);
        let text = match raw.strip_prefix(banner.as_str()) {
            Some(body) if !record.title.is_empty() => body.to_string(),
            _ => raw,
        };
        Ok(Some(text))
    }

    /// Summary text with the title banner removed
    pub fn section_summary(&self, idx: usize) -> Result<Option<String>> {
        let Some(record) = self.section(idx) else {
            return Ok(None);
        };
        let Some(handle) = record.summary_file.as_deref() else {
            return Ok(None);
        };
        let Some(raw) = self.artifacts.read(handle)? else {
            return Ok(None);
        };

        let banner = naming::title_banner(&record.title);
        Ok(Some(
            raw.strip_prefix(banner.as_str())
                .map(str::to_string)
                .unwrap_or(raw),
        ))
    }

    /// Remove a section, its chunks and all of their artifacts.
    /// Returns `false` if the section is unknown.
    pub fn delete_section(&self, idx: usize) -> Result<bool> {
        let Some(record) = self.section(idx) else {
            return Ok(false);
        };
        let chunks = self.section_chunks(idx);

        let key = idx.to_string();
        let container_key = naming::chunk_container_key(idx);
        self.metadata.update(|data| {
            if let Some(Value::Object(sections)) = data.get_mut(SECTIONS) {
                sections.remove(&key);
            }
            if let Some(Value::Object(containers)) = data.get_mut(CHUNKS) {
                containers.remove(&container_key);
            }
        })?;

        // Records are gone first; leftover files show up as orphans
        self.artifacts.remove(&record.section_file)?;
        if let Some(summary) = &record.summary_file {
            self.artifacts.remove(summary)?;
        }
        for chunk in chunks.values() {
            if let Some(file) = &chunk.chunk_file {
                self.artifacts.remove(file)?;
            }
        }

        tracing::info!(
            "Deleted section {} '{}' ({} chunks)",
            idx,
            record.title,
            chunks.len()
        );
        Ok(true)
    }

    fn put_section(&self, record: &SectionRecord) -> Result<()> {
        self.metadata.set(
            &[SECTIONS, &record.idx.to_string()],
            serde_json::to_value(record)?,
        )
    }

    fn render(&self, title: &str, body: &str) -> String {
        if self.title_banner && !title.is_empty() {
            format!("{}{}", naming::title_banner(title), body)
        } else {
            body.to_string()
        }
    }

    // ------------------------------------------------------------------
    // Chunks
    // ------------------------------------------------------------------

    /// Chunk records of one section, ordered by chunk index
    pub fn section_chunks(&self, section_idx: usize) -> BTreeMap<usize, ChunkRecord> {
        let container_key = naming::chunk_container_key(section_idx);
        match self.metadata.get(&[CHUNKS, &container_key, CHUNKS]) {
            Some(Value::Object(map)) => parse_records(map, "chunk"),
            _ => BTreeMap::new(),
        }
    }

    /// Whether a section already has at least one chunk
    pub fn has_chunks(&self, section_idx: usize) -> bool {
        !self.section_chunks(section_idx).is_empty()
    }

    /// Largest chunk index of a section
    pub fn max_chunk_index(&self, section_idx: usize) -> Option<usize> {
        let container_key = naming::chunk_container_key(section_idx);
        match self.metadata.get(&[CHUNKS, &container_key, CHUNKS]) {
            Some(Value::Object(map)) => max_index(&map),
            _ => None,
        }
    }

    /// Total number of chunk records across all sections
    pub fn chunk_count(&self) -> usize {
        let containers = match self.metadata.get(&[CHUNKS]) {
            Some(Value::Object(map)) => map,
            _ => return 0,
        };
        containers
            .values()
            .filter_map(|container| container.get(CHUNKS).and_then(Value::as_object))
            .map(Map::len)
            .sum()
    }

    /// Persist one chunking pass of a section as a unit.
    ///
    /// New chunks are numbered after the section's highest existing
    /// chunk index, so earlier passes are kept. Chunk artifacts (when
    /// `write_files` is set) are written first; the section's whole
    /// chunk container is then written in a single store update.
    pub fn store_section_chunks(
        &self,
        section: &SectionRecord,
        chunks: &[TextChunk],
        write_files: bool,
    ) -> Result<Vec<ChunkRecord>> {
        let first_idx = self.max_chunk_index(section.idx).map_or(0, |max| max + 1);
        let now = Utc::now();

        let mut records = Vec::with_capacity(chunks.len());
        for (offset, chunk) in chunks.iter().enumerate() {
            let idx = first_idx + offset;

            let (chunk_file, text) = if write_files {
                let handle = naming::chunk_handle(section.idx, idx);
                self.artifacts.write(&handle, &chunk.text)?;
                (Some(handle), None)
            } else {
                (None, Some(chunk.text.clone()))
            };

            records.push(ChunkRecord {
                idx,
                section_idx: section.idx,
                start_offset: chunk.start_offset,
                end_offset: chunk.end_offset,
                text_length: chunk.char_len(),
                chunk_file,
                text,
                created_at: now,
            });
        }

        let mut serialized = Vec::with_capacity(records.len());
        for record in &records {
            serialized.push((record.idx.to_string(), serde_json::to_value(record)?));
        }

        let container_key = naming::chunk_container_key(section.idx);
        let section_file = section.section_file.clone();
        self.metadata.update(|data| {
            let containers = object_entry(data, CHUNKS);
            let container = object_entry(containers, &container_key);
            container.insert(
                SECTION_FILE_FIELD.to_string(),
                Value::String(section_file),
            );
            let chunk_map = object_entry(container, CHUNKS);
            for (key, value) in serialized {
                chunk_map.insert(key, value);
            }
        })?;

        tracing::debug!(
            "Stored {} chunks for section {} starting at index {}",
            records.len(),
            section.idx,
            first_idx
        );
        Ok(records)
    }

    /// Text of a stored chunk, from its artifact or inline copy
    pub fn chunk_text(&self, record: &ChunkRecord) -> Result<Option<String>> {
        if let Some(text) = &record.text {
            return Ok(Some(text.clone()));
        }
        match &record.chunk_file {
            Some(handle) => self.artifacts.read(handle),
            None => Ok(None),
        }
    }

    /// Look up a section or fail with `SectionNotFound`
    pub fn require_section(&self, idx: usize) -> Result<SectionRecord> {
        self.section(idx)
            .ok_or(BinderyError::SectionNotFound(idx))
    }
}

/// Deserialize every record of a mapping keyed by decimal index,
/// skipping (and logging) entries that do not parse
fn parse_records<T: serde::de::DeserializeOwned>(
    map: Map<String, Value>,
    kind: &str,
) -> BTreeMap<usize, T> {
    let mut records = BTreeMap::new();
    for (key, value) in map {
        let Ok(idx) = key.parse::<usize>() else {
            continue;
        };
        match serde_json::from_value::<T>(value) {
            Ok(record) => {
                records.insert(idx, record);
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable {} record '{}': {}", kind, key, e);
            }
        }
    }
    records
}

/// Mapping stored under `key`, created (or reset) if absent or not a
/// mapping
fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(inner) => inner,
        _ => unreachable!("slot was just made a mapping"),
    }
}
