//! Core data types for bindery.
//!
//! Records persisted in the metadata store and the chunks produced
//! by the text chunker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted leaf section (or part of an oversized section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Global section index, unique across runs
    pub idx: usize,

    /// Hierarchical title ("Part One - 1", "Part One - 1 - part 2")
    #[serde(default)]
    pub title: String,

    /// Content artifact handle, relative to the output directory
    pub section_file: String,

    /// Summary artifact handle, if a summary has been written
    #[serde(default)]
    pub summary_file: Option<String>,

    /// Older stores name this field `processed_at` and write naive
    /// timestamps
    #[serde(
        default = "Utc::now",
        alias = "processed_at",
        deserialize_with = "timestamp::deserialize"
    )]
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A persisted chunk of a section's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk index, scoped to the owning section
    pub idx: usize,

    /// Index of the owning section
    pub section_idx: usize,

    /// Character offset where the chunk starts in the section text
    pub start_offset: usize,

    /// Character offset where the chunk ends (exclusive)
    pub end_offset: usize,

    /// Chunk length in characters
    pub text_length: usize,

    /// Chunk artifact handle, relative to the output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_file: Option<String>,

    /// Inline text, kept only when no chunk artifact is written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(
        default = "Utc::now",
        alias = "processed_at",
        deserialize_with = "timestamp::deserialize"
    )]
    pub created_at: DateTime<Utc>,
}

/// A chunk produced by the text chunker
///
/// Offsets are **character** positions (not bytes) into the
/// normalized text, and `text` is exactly the characters in
/// `[start_offset, end_offset)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl TextChunk {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }
}

/// Timestamp parsing for stored records
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Parse an RFC 3339 timestamp, or a naive ISO 8601 one taken as UTC
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}
