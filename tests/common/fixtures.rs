// Test fixtures for integration testing

use bindery::core::document::DocumentNode;
use bindery::core::store::Library;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A library in its own temporary output directory
#[allow(dead_code)] // Used in integration tests
pub struct TestLibrary {
    pub dir: TempDir,
    pub library: Library,
}

impl TestLibrary {
    #[allow(dead_code)] // Used in integration tests
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let library = Library::open(dir.path(), None).unwrap();
        Self { dir, library }
    }

    #[allow(dead_code)] // Used in integration tests
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Reopen the same output directory
    #[allow(dead_code)] // Used in integration tests
    pub fn reopen(&self) -> Library {
        Library::open(self.dir.path(), None).unwrap()
    }
}

/// "Part One" with two leaf chapters and a preface of its own
#[allow(dead_code)] // Used in integration tests
pub fn part_one() -> DocumentNode {
    DocumentNode::titled("Part One")
        .paragraph("Preface that belongs to the part itself.")
        .section(
            DocumentNode::titled("1")
                .paragraph("Alpha begins here.")
                .paragraph("Alpha continues."),
        )
        .section(DocumentNode::titled("2").paragraph("Beta is the second chapter."))
}

/// Two parts, one untitled wrapper and one chapter with nested scenes
#[allow(dead_code)] // Used in integration tests
pub fn nested_book() -> DocumentNode {
    DocumentNode::new()
        .section(
            DocumentNode::titled("ЧАСТЬ ПЕРВАЯ")
                .section(DocumentNode::titled("I").paragraph("Первая глава. Она короткая."))
                .section(DocumentNode::titled("II").paragraph("Вторая глава. Тоже короткая.")),
        )
        .section(
            DocumentNode::titled("ЧАСТЬ ВТОРАЯ").section(
                DocumentNode::titled("III")
                    .section(DocumentNode::titled("Сцена 1").text("Текст сцены один."))
                    .section(DocumentNode::new().text("Сцена без заголовка.")),
            ),
        )
}

/// `count` Cyrillic sentences of exactly 80 characters each
/// (including the trailing space)
#[allow(dead_code)] // Used in integration tests
pub fn russian_sentences(count: usize) -> String {
    (0..count)
        .map(|i| format!("Предложение {:02} {}. ", i, "а".repeat(63)))
        .collect()
}

/// Write a tree as JSON into `dir` and return its path
#[allow(dead_code)] // Used in integration tests
pub fn write_tree(dir: &Path, tree: &DocumentNode) -> PathBuf {
    let path = dir.join("tree.json");
    std::fs::write(&path, serde_json::to_string_pretty(tree).unwrap()).unwrap();
    path
}
