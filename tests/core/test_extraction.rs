// Integration tests for section extraction and splitting

use crate::common::{nested_book, part_one, TestLibrary};
use bindery::core::document::DocumentNode;
use bindery::core::segment::{SectionExtractor, SectionSplitter};
use bindery::core::store::MetadataStore;
use serde_json::json;

fn extract(lib: &TestLibrary, tree: &DocumentNode, threshold: usize) -> Vec<usize> {
    SectionExtractor::new(&lib.library, SectionSplitter::new(threshold))
        .extract(tree)
        .unwrap()
        .created
}

#[test]
fn test_part_one_yields_two_leaf_sections() {
    let lib = TestLibrary::new();

    let created = extract(&lib, &part_one(), 100_000);

    assert_eq!(created, vec![0, 1]);
    let sections = lib.library.all_sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[&0].title, "Part One - 1");
    assert_eq!(sections[&1].title, "Part One - 2");
}

#[test]
fn test_content_is_isolated() {
    let lib = TestLibrary::new();
    extract(&lib, &part_one(), 100_000);

    let first = lib.library.section_content(0).unwrap().unwrap();
    let second = lib.library.section_content(1).unwrap().unwrap();

    assert_eq!(first, "Alpha begins here.\n\nAlpha continues.");
    assert_eq!(second, "Beta is the second chapter.");
    assert!(!first.contains("Beta"));
    assert!(!second.contains("Alpha"));
    assert!(!first.contains("Preface"));
    assert!(!second.contains("Preface"));
}

#[test]
fn test_section_artifacts_carry_title_banner() {
    let lib = TestLibrary::new();
    extract(&lib, &part_one(), 100_000);

    let record = lib.library.section(0).unwrap();
    let on_disk = std::fs::read_to_string(lib.path().join(&record.section_file)).unwrap();

    assert!(record.section_file.starts_with("sections/0000_part_one_1"));
    assert!(on_disk.starts_with("=== Part One - 1 ==="));
    assert!(on_disk.ends_with("Alpha continues."));
}

#[test]
fn test_nested_titles_and_untitled_nodes() {
    let lib = TestLibrary::new();
    extract(&lib, &nested_book(), 100_000);

    let titles: Vec<String> = lib
        .library
        .all_sections()
        .into_values()
        .map(|s| s.title)
        .collect();

    assert_eq!(
        titles,
        vec![
            "ЧАСТЬ ПЕРВАЯ - I",
            "ЧАСТЬ ПЕРВАЯ - II",
            "ЧАСТЬ ВТОРАЯ - III - Сцена 1",
            "ЧАСТЬ ВТОРАЯ - III",
        ]
    );
    assert_eq!(
        lib.library.section_content(3).unwrap().as_deref(),
        Some("Сцена без заголовка.")
    );
}

#[test]
fn test_indices_continue_across_runs() {
    let lib = TestLibrary::new();
    extract(&lib, &part_one(), 100_000);

    let part_two = DocumentNode::titled("Part Two")
        .section(DocumentNode::titled("3").paragraph("Gamma."))
        .section(DocumentNode::titled("4").paragraph("Delta."));

    // A fresh handle on the same directory sees the earlier sections
    let reopened = lib.reopen();
    let report = SectionExtractor::new(&reopened, SectionSplitter::new(100_000))
        .extract(&part_two)
        .unwrap();

    assert_eq!(report.first_index, 2);
    assert_eq!(report.created, vec![2, 3]);
    assert_eq!(report.next_index, 4);
    assert_eq!(reopened.section(3).unwrap().title, "Part Two - 4");
}

#[test]
fn test_rerun_creates_nothing() {
    let lib = TestLibrary::new();
    extract(&lib, &nested_book(), 100_000);

    let report = SectionExtractor::new(&lib.library, SectionSplitter::new(100_000))
        .extract(&nested_book())
        .unwrap();

    assert_eq!(report.sections_created(), 0);
    assert_eq!(report.sections_skipped, 4);
    assert_eq!(lib.library.section_count(), 4);
}

#[test]
fn test_oversized_section_split_into_parts() {
    let lib = TestLibrary::new();
    let paragraphs: Vec<String> = (0..12)
        .map(|i| format!("Абзац {i:02}. {}", "текст ".repeat(15).trim_end()))
        .collect();

    let mut chapter = DocumentNode::titled("Глава");
    for p in &paragraphs {
        chapter = chapter.paragraph(p.clone());
    }
    let tree = DocumentNode::new().section(chapter);

    let created = extract(&lib, &tree, 400);
    assert!(created.len() > 1, "Expected several parts, got {created:?}");

    let sections = lib.library.all_sections();
    let mut rejoined = Vec::new();
    for (n, idx) in created.iter().enumerate() {
        let record = &sections[idx];
        assert_eq!(record.title, format!("Глава - part {}", n + 1));
        let content = lib.library.section_content(*idx).unwrap().unwrap();
        rejoined.push(content);
    }

    // Parts reassemble the original content, paragraphs intact
    assert_eq!(rejoined.join("\n\n"), paragraphs.join("\n\n"));

    // Splitting again finds every part already stored
    let again = extract(&lib, &tree, 400);
    assert!(again.is_empty());
}

#[test]
fn test_splitter_reconstruction() {
    let content = (0..30)
        .map(|i| format!("Paragraph {i} has some words in it."))
        .collect::<Vec<_>>()
        .join("\n\n");
    let splitter = SectionSplitter::new(200);

    let parts = splitter.split("Chapter", &content);

    assert!(parts.len() >= 5);
    let rejoined = parts
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    assert_eq!(rejoined, content);
}

#[test]
fn test_legacy_record_blocks_duplicate_title() {
    let lib = TestLibrary::new();
    lib.library
        .metadata()
        .set(
            &["sections", "0"],
            json!({
                "idx": 0,
                "title": "Part One - 1",
                "section_file": "sections/0000_part_one_1.txt",
                "processed_at": "2025-01-01T10:00:00.123456"
            }),
        )
        .unwrap();

    let report = SectionExtractor::new(&lib.library, SectionSplitter::new(100_000))
        .extract(&part_one())
        .unwrap();

    assert_eq!(report.created, vec![1]);
    assert_eq!(report.sections_skipped, 1);

    let titles: Vec<String> = lib
        .library
        .all_sections()
        .into_values()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["Part One - 1", "Part One - 2"]);
}

#[test]
fn test_unparseable_record_title_still_blocks_duplicate() {
    let lib = TestLibrary::new();
    lib.library
        .metadata()
        .add(&["sections"], json!({"title": "Part One - 2"}))
        .unwrap();

    let created = extract(&lib, &part_one(), 100_000);

    assert_eq!(created, vec![1]);
    assert_eq!(lib.library.section(1).unwrap().title, "Part One - 1");
}
