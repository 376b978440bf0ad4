//! Document segmentation.
//!
//! - **extractor**: depth-first extraction of leaf sections from a
//!   document tree, with title accumulation and resume
//! - **splitter**: balanced, paragraph-bounded splitting of oversized
//!   sections into parts

pub mod extractor;
pub mod splitter;

pub use extractor::{ExtractionReport, SectionExtractor};
pub use splitter::{SectionPart, SectionSplitter};
