//! Artifact naming.
//!
//! Section artifacts are named from the global index plus a sanitized
//! form of the title, e.g. `"ЧАСТЬ ПЕРВАЯ - 1"` at index 1 becomes
//! `sections/0001_часть_первая_1.txt`. The index prefix keeps names
//! unique even when titles collide.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length (in characters) of the sanitized title component
pub const MAX_NAME_CHARS: usize = 50;

/// Directory for section content artifacts
pub const SECTIONS_DIR: &str = "sections";

/// Directory for section summary artifacts
pub const SUMMARIES_DIR: &str = "summaries";

/// Directory for chunk artifacts
pub const CHUNKS_DIR: &str = "chunks";

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-]+").unwrap());
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\x{0400}-\x{04FF}]").unwrap());
static UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// Convert a title into a filename component.
///
/// Lowercases, turns whitespace/dash runs into `_`, strips everything
/// but word characters and Cyrillic, collapses `_` runs, trims `_` at
/// both ends and caps the length.
pub fn sanitize_title(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }

    let lowered = title.to_lowercase();
    let separated = SEPARATORS.replace_all(&lowered, "_");
    let stripped = DISALLOWED.replace_all(&separated, "");
    let collapsed = UNDERSCORES.replace_all(&stripped, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.chars().count() > MAX_NAME_CHARS {
        let capped: String = trimmed.chars().take(MAX_NAME_CHARS).collect();
        capped.trim_end_matches('_').to_string()
    } else {
        trimmed.to_string()
    }
}

/// File stem for a section: `{idx:04}_{sanitized}` or `{idx:04}`
pub fn section_stem(idx: usize, title: &str) -> String {
    let sanitized = sanitize_title(title);
    if sanitized.is_empty() {
        format!("{idx:04}")
    } else {
        format!("{idx:04}_{sanitized}")
    }
}

/// Handle of a section content artifact
pub fn section_handle(idx: usize, title: &str) -> String {
    format!("{SECTIONS_DIR}/{}.txt", section_stem(idx, title))
}

/// Handle of a summary artifact, sharing the section's file name
pub fn summary_handle(section_handle: &str) -> String {
    let file_name = section_handle
        .rsplit('/')
        .next()
        .unwrap_or(section_handle);
    format!("{SUMMARIES_DIR}/{file_name}")
}

/// Handle of a chunk artifact
pub fn chunk_handle(section_idx: usize, chunk_idx: usize) -> String {
    format!("{CHUNKS_DIR}/section_{section_idx:04}/chunk_{chunk_idx:04}.txt")
}

/// Metadata key of a section's chunk container
pub fn chunk_container_key(section_idx: usize) -> String {
    format!("section_{section_idx}")
}

/// Human-readable banner written above section text
pub fn title_banner(title: &str) -> String {
    format!("=== {title} ===\n\n")
}
