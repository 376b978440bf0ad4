//! Parsed document tree.
//!
//! The tree is produced by an external markup parser. bindery only
//! reads it: node titles, direct content items and child section
//! nodes. The serde representation lets a parser hand the tree over
//! as JSON:
//!
//! ```json
//! {
//!   "title": "Part One",
//!   "items": [
//!     { "type": "paragraph", "text": "Opening words." },
//!     { "type": "section", "title": "1", "items": [] }
//!   ]
//! }
//! ```

use crate::core::error::{BinderyError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A node of the document tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    /// Optional node title (chapter name, part number, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Ordered content items and child sections
    #[serde(default)]
    pub items: Vec<NodeItem>,
}

/// A direct child of a [`DocumentNode`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeItem {
    /// Loose text directly inside the node
    Text { text: String },

    /// A paragraph element
    Paragraph { text: String },

    /// A nested section node
    Section(DocumentNode),
}

impl DocumentNode {
    /// Create an untitled node with no items
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a titled node with no items
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            items: Vec::new(),
        }
    }

    /// Append a paragraph item (builder style)
    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.items.push(NodeItem::Paragraph { text: text.into() });
        self
    }

    /// Append a loose text item (builder style)
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.items.push(NodeItem::Text { text: text.into() });
        self
    }

    /// Append a child section (builder style)
    pub fn section(mut self, child: DocumentNode) -> Self {
        self.items.push(NodeItem::Section(child));
        self
    }

    /// Node title, with blank titles treated as absent
    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Direct child section nodes, in document order
    pub fn child_sections(&self) -> impl Iterator<Item = &DocumentNode> {
        self.items.iter().filter_map(|item| match item {
            NodeItem::Section(node) => Some(node),
            _ => None,
        })
    }

    /// Whether the node has at least one child section
    pub fn has_child_sections(&self) -> bool {
        self.child_sections().next().is_some()
    }

    /// Text of the direct (non-section) content items, trimmed, blanks
    /// removed
    pub fn content_items(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                NodeItem::Text { text } | NodeItem::Paragraph { text } => Some(text.trim()),
                NodeItem::Section(_) => None,
            })
            .filter(|text| !text.is_empty())
    }

    /// Load a tree from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            BinderyError::InvalidPath(format!("Failed to read document {}: {e}", path.display()))
        })?;
        let node = serde_json::from_str(&contents)?;
        Ok(node)
    }
}
