//! Text chunking.
//!
//! Turns a section's text into overlapping, sentence-bounded chunks
//! sized for downstream consumption:
//!
//! - Sizes and offsets in characters, never bytes
//! - Chunk boundaries only between sentences
//! - Overlap made of whole trailing sentences
//! - Short trailing chunks merged into their predecessor
//!
//! Sentence detection is pluggable through [`SentenceSegmenter`].

pub mod chunker;
pub mod sentence;

pub use chunker::{normalize_text, TextChunker};
pub use sentence::{SentenceSegmenter, UnicodeSentenceSegmenter};
