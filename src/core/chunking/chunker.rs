//! Sentence-bounded text chunking.
//!
//! Splits text into overlapping chunks whose boundaries always fall
//! between sentences. All sizes and offsets are measured in
//! **characters**, not bytes, so multi-byte text (Cyrillic, emoji)
//! never produces invalid slices.
//!
//! # Example
//!
//! ```
//! use bindery::core::chunking::TextChunker;
//!
//! let chunker = TextChunker::new(10, 40, 10, "english");
//! let chunks = chunker.chunk_text("First sentence here. Second one follows. Third closes.");
//!
//! assert!(chunks.len() > 1);
//! for chunk in &chunks {
//!     assert!(chunk.start_offset < chunk.end_offset);
//! }
//! ```

use crate::core::chunking::sentence::{SentenceSegmenter, UnicodeSentenceSegmenter};
use crate::core::config::ChunkingConfig;
use crate::core::types::TextChunk;
use once_cell::sync::Lazy;
use regex::Regex;

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Collapse runs of three or more newlines to two and trim.
///
/// Chunk offsets are positions in the text returned here.
pub fn normalize_text(text: &str) -> String {
    EXCESS_NEWLINES.replace_all(text, "\n\n").trim().to_string()
}

/// Sentence-bounded chunker with sentence-aligned overlap
#[derive(Debug, Clone)]
pub struct TextChunker<S = UnicodeSentenceSegmenter> {
    /// Chunks shorter than this (except the first) merge into their
    /// predecessor
    min_chunk_size: usize,

    /// A chunk closes before it would grow past this
    max_chunk_size: usize,

    /// Minimum characters of trailing sentences repeated in the next
    /// chunk
    overlap_chars: usize,

    /// Language hint passed to the segmenter
    language: String,

    segmenter: S,
}

/// One sentence located in the text: byte range plus char range
#[derive(Debug, Clone, Copy)]
struct Span {
    byte_start: usize,
    byte_end: usize,
    char_start: usize,
    char_end: usize,
}

impl Span {
    fn char_len(&self) -> usize {
        self.char_end - self.char_start
    }
}

impl TextChunker {
    /// Create a chunker using Unicode sentence segmentation.
    ///
    /// # Panics
    ///
    /// Panics if `max_chunk_size` is 0 or if
    /// `overlap_chars >= max_chunk_size`.
    pub fn new(
        min_chunk_size: usize,
        max_chunk_size: usize,
        overlap_chars: usize,
        language: impl Into<String>,
    ) -> Self {
        Self::with_segmenter(
            min_chunk_size,
            max_chunk_size,
            overlap_chars,
            language,
            UnicodeSentenceSegmenter,
        )
    }

    /// Create a chunker from validated configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(
            config.min_chunk_size,
            config.max_chunk_size,
            config.overlap_chars,
            config.language.clone(),
        )
    }
}

impl<S: SentenceSegmenter> TextChunker<S> {
    /// Create a chunker with a custom sentence segmenter.
    ///
    /// # Panics
    ///
    /// Panics if `max_chunk_size` is 0 or if
    /// `overlap_chars >= max_chunk_size`.
    pub fn with_segmenter(
        min_chunk_size: usize,
        max_chunk_size: usize,
        overlap_chars: usize,
        language: impl Into<String>,
        segmenter: S,
    ) -> Self {
        assert!(max_chunk_size > 0, "max_chunk_size must be > 0");
        assert!(
            overlap_chars < max_chunk_size,
            "overlap_chars must be < max_chunk_size"
        );

        Self {
            min_chunk_size,
            max_chunk_size,
            overlap_chars,
            language: language.into(),
            segmenter,
        }
    }

    pub fn min_chunk_size(&self) -> usize {
        self.min_chunk_size
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    pub fn overlap_chars(&self) -> usize {
        self.overlap_chars
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Normalize `text` and split it into chunks.
    ///
    /// Every chunk's `text` is exactly the normalized characters in
    /// `[start_offset, end_offset)`. Consecutive chunks overlap by
    /// whole sentences and together cover the normalized text.
    pub fn chunk_text(&self, text: &str) -> Vec<TextChunk> {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let spans = self.sentence_spans(&normalized);
        let groups = self.group_sentences(&spans);

        let chunks: Vec<TextChunk> = groups
            .into_iter()
            .map(|(first, last)| make_chunk(&normalized, &spans[first], &spans[last - 1]))
            .collect();

        let merged = self.merge_small_chunks(&normalized, chunks);

        tracing::debug!(
            "Chunked {} chars ({} sentences) into {} chunks",
            spans.last().map_or(0, |s| s.char_end),
            spans.len(),
            merged.len()
        );

        merged
    }

    /// Locate the segmenter's sentences and widen them so they tile
    /// the text: any gap belongs to the preceding sentence and leading
    /// text to the first one.
    fn sentence_spans(&self, text: &str) -> Vec<Span> {
        let mut starts = Vec::new();
        let mut cursor = 0;

        for sentence in self.segmenter.segment(text, &self.language) {
            if sentence.is_empty() {
                continue;
            }
            match text[cursor..].find(sentence) {
                Some(pos) => {
                    starts.push(cursor + pos);
                    cursor += pos + sentence.len();
                }
                None => {
                    tracing::debug!("Segmenter returned text not found in input, skipping");
                }
            }
        }

        if starts.is_empty() {
            starts.push(0);
        }
        starts[0] = 0;

        let mut spans = Vec::with_capacity(starts.len());
        let mut char_start = 0;
        for (i, &byte_start) in starts.iter().enumerate() {
            let byte_end = starts.get(i + 1).copied().unwrap_or(text.len());
            let char_end = char_start + text[byte_start..byte_end].chars().count();
            spans.push(Span {
                byte_start,
                byte_end,
                char_start,
                char_end,
            });
            char_start = char_end;
        }
        spans
    }

    /// Group sentences into chunks as `[first, last)` sentence ranges
    fn group_sentences(&self, spans: &[Span]) -> Vec<(usize, usize)> {
        let mut groups = Vec::new();
        let mut start = 0;
        let mut current_len = 0;

        for (i, span) in spans.iter().enumerate() {
            let sentence_len = span.char_len();

            if i > start && current_len + sentence_len > self.max_chunk_size {
                groups.push((start, i));

                // Seed the next chunk with whole trailing sentences, never
                // the entire closed chunk
                let mut overlap_start = i;
                let mut overlap_len = 0;
                while overlap_len < self.overlap_chars && overlap_start > start + 1 {
                    overlap_start -= 1;
                    overlap_len += spans[overlap_start].char_len();
                }

                start = overlap_start;
                current_len = overlap_len;
            }

            current_len += sentence_len;
        }

        if start < spans.len() {
            groups.push((start, spans.len()));
        }
        groups
    }

    /// Merge every chunk shorter than the minimum, other than the
    /// first, into the chunk before it
    fn merge_small_chunks(&self, text: &str, chunks: Vec<TextChunk>) -> Vec<TextChunk> {
        let mut merged: Vec<TextChunk> = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            match merged.last_mut() {
                Some(prev) if chunk.char_len() < self.min_chunk_size => {
                    prev.text = slice_chars(text, prev.start_offset, chunk.end_offset);
                    prev.end_offset = chunk.end_offset;
                }
                _ => merged.push(chunk),
            }
        }

        merged
    }
}

fn make_chunk(text: &str, first: &Span, last: &Span) -> TextChunk {
    TextChunk {
        text: text[first.byte_start..last.byte_end].to_string(),
        start_offset: first.char_start,
        end_offset: last.char_end,
    }
}

/// Characters `[start, end)` of `text`
fn slice_chars(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}
