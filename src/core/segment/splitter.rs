//! Balanced splitting of oversized sections.
//!
//! A section longer than the threshold is cut on paragraph boundaries
//! into parts of roughly equal size. The target part size is
//! `len / ceil(len / threshold)`. Each paragraph costs its length plus
//! the two-character separator, except the one that opens a new part.
//! A part closes before the paragraph that would push it past the
//! target, so the last part can be short when paragraphs do not divide
//! the target evenly.

/// Separator between paragraphs of section content
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// One part of a split section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPart {
    pub title: String,
    pub content: String,
}

/// Paragraph-bounded section splitter
#[derive(Debug, Clone)]
pub struct SectionSplitter {
    /// Maximum section length in characters
    threshold: usize,
}

impl SectionSplitter {
    /// Create a splitter for the given threshold (in characters).
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is 0.
    pub fn new(threshold: usize) -> Self {
        assert!(threshold > 0, "threshold must be > 0");
        Self { threshold }
    }

    /// Threshold in characters
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether `content` would be split
    pub fn needs_split(&self, content: &str) -> bool {
        content.chars().count() > self.threshold
    }

    /// Split `content` into parts.
    ///
    /// Content within the threshold comes back as a single part with
    /// the title unchanged. Otherwise parts are titled
    /// `"<title> - part N"` (1-based). Paragraphs are never cut, and
    /// joining the parts with [`PARAGRAPH_SEPARATOR`] gives back
    /// `content` exactly.
    pub fn split(&self, title: &str, content: &str) -> Vec<SectionPart> {
        let total = content.chars().count();
        if total <= self.threshold {
            return vec![SectionPart {
                title: title.to_string(),
                content: content.to_string(),
            }];
        }

        let part_count = total.div_ceil(self.threshold);
        let target = total / part_count;
        let separator_len = PARAGRAPH_SEPARATOR.chars().count();

        let mut contents: Vec<String> = Vec::with_capacity(part_count);
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0;

        for paragraph in content.split(PARAGRAPH_SEPARATOR) {
            let paragraph_len = paragraph.chars().count();

            if !current.is_empty() && current_len + paragraph_len + separator_len > target {
                contents.push(current.join(PARAGRAPH_SEPARATOR));
                current.clear();
                // The opening paragraph of a part is counted without its separator
                current.push(paragraph);
                current_len = paragraph_len;
            } else {
                current.push(paragraph);
                current_len += paragraph_len + separator_len;
            }
        }

        if !current.is_empty() {
            contents.push(current.join(PARAGRAPH_SEPARATOR));
        }

        tracing::debug!(
            "Split '{}' ({} chars) into {} parts (target {} chars)",
            title,
            total,
            contents.len(),
            target
        );

        contents
            .into_iter()
            .enumerate()
            .map(|(i, content)| SectionPart {
                title: part_title(title, i + 1),
                content,
            })
            .collect()
    }
}

/// Title of the `n`th part (1-based)
pub fn part_title(title: &str, n: usize) -> String {
    if title.is_empty() {
        format!("part {n}")
    } else {
        format!("{title} - part {n}")
    }
}
