//! Persistence for sections and chunks.
//!
//! Structured records live in a [`MetadataStore`]; section, summary and
//! chunk bodies live as artifacts in an [`ArtifactStore`]. [`Library`]
//! combines the two behind typed operations.
//!
//! # Output Directory Structure
//!
//! ```text
//! {output_dir}/
//! ├── sections_metadata.json      # Metadata store (default location)
//! ├── sections/
//! │   └── 0001_часть_первая_1.txt # "=== title ===" banner + content
//! ├── summaries/
//! │   └── 0001_часть_первая_1.txt
//! └── chunks/
//!     └── section_0001/
//!         └── chunk_0000.txt
//! ```

pub mod artifacts;
pub mod library;
pub mod metadata;
pub mod naming;
mod validator;

pub use artifacts::{ArtifactStore, FsArtifactStore};
pub use library::{Library, UnreadableSection, METADATA_FILE_NAME};
pub use metadata::{JsonMetadataStore, MetadataStore};
pub use validator::{LibraryValidator, ValidationReport};
