//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod chunk;
pub mod completions;
pub mod config;
pub mod extract;
pub mod preview;
pub mod run;
pub mod sections;
pub mod validate;

// Re-export argument types for use in mod.rs
pub use chunk::ChunkArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use extract::ExtractArgs;
pub use preview::PreviewArgs;
pub use run::RunArgs;
pub use validate::ValidateArgs;

use crate::core::document::DocumentNode;
use std::path::Path;

/// Load a document tree, mapping failures to a message that names the file
pub(crate) fn load_tree(path: &Path) -> Result<DocumentNode, Box<dyn std::error::Error>> {
    if !path.is_file() {
        return Err(format!(
            "Document tree '{}' not found. Pass the path to a parsed tree in JSON form.",
            path.display()
        )
        .into());
    }

    DocumentNode::from_json_file(path)
        .map_err(|e| format!("Failed to load document tree '{}': {}", path.display(), e).into())
}
