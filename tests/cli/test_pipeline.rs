//! Tests for extract, chunk and run CLI commands
//!
//! Each test writes a document tree to a temp dir and runs the command
//! handler against services pointing at a second temp dir.

use crate::common::{create_test_services, part_one, write_tree};
use bindery::cli::commands::chunk::{execute as execute_chunk, ChunkArgs};
use bindery::cli::commands::extract::{execute as execute_extract, ExtractArgs};
use bindery::cli::commands::run::{execute as execute_run, RunArgs};
use bindery::cli::OutputFormat;
use tempfile::TempDir;

#[test]
fn test_extract_human() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());
    let tree = write_tree(input.path(), &part_one());

    let args = ExtractArgs {
        tree: tree.clone(),
        source: None,
    };
    let result = execute_extract(args, &services, OutputFormat::Human);
    assert!(result.is_ok(), "Extract should succeed: {:?}", result.err());

    let library = services.open_library().unwrap();
    assert_eq!(library.section_count(), 2);
    assert_eq!(
        library.source_file(),
        Some(tree.display().to_string())
    );
    assert_eq!(library.chunk_count(), 0);
}

#[test]
fn test_extract_twice_json() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());
    let tree = write_tree(input.path(), &part_one());

    for _ in 0..2 {
        let args = ExtractArgs {
            tree: tree.clone(),
            source: Some("book.fb2".to_string()),
        };
        execute_extract(args, &services, OutputFormat::Json).unwrap();
    }

    let library = services.open_library().unwrap();
    assert_eq!(library.section_count(), 2);
    assert_eq!(library.source_file().as_deref(), Some("book.fb2"));
}

#[test]
fn test_extract_missing_tree() {
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());

    let args = ExtractArgs {
        tree: output.path().join("nope.json"),
        source: None,
    };
    let err = execute_extract(args, &services, OutputFormat::Human).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_extract_invalid_json() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());
    let tree = input.path().join("tree.json");
    std::fs::write(&tree, "[1, 2, 3").unwrap();

    let args = ExtractArgs { tree, source: None };
    let err = execute_extract(args, &services, OutputFormat::Human).unwrap_err();
    assert!(err.to_string().contains("Failed to load document tree"));
}

#[test]
fn test_chunk_all_then_single_section() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());
    let tree = write_tree(input.path(), &part_one());
    execute_extract(
        ExtractArgs { tree, source: None },
        &services,
        OutputFormat::Human,
    )
    .unwrap();

    let args = ChunkArgs {
        section: None,
        rechunk: false,
    };
    execute_chunk(args, &services, OutputFormat::Human).unwrap();
    assert_eq!(services.open_library().unwrap().chunk_count(), 2);

    // Already chunked: nothing new without --rechunk
    let args = ChunkArgs {
        section: Some(0),
        rechunk: false,
    };
    execute_chunk(args, &services, OutputFormat::Json).unwrap();
    assert_eq!(services.open_library().unwrap().section_chunks(0).len(), 1);

    let args = ChunkArgs {
        section: Some(0),
        rechunk: true,
    };
    execute_chunk(args, &services, OutputFormat::Json).unwrap();
    assert_eq!(services.open_library().unwrap().section_chunks(0).len(), 2);
}

#[test]
fn test_chunk_unknown_section() {
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());

    let args = ChunkArgs {
        section: Some(5),
        rechunk: false,
    };
    let err = execute_chunk(args, &services, OutputFormat::Human).unwrap_err();
    assert!(err.to_string().contains("Section 5 not found"));
}

#[test]
fn test_run_is_idempotent() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());
    let tree = write_tree(input.path(), &part_one());

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = RunArgs {
            tree: tree.clone(),
            source: None,
        };
        let result = execute_run(args, &services, format);
        assert!(result.is_ok(), "Run should succeed: {:?}", result.err());
    }

    let library = services.open_library().unwrap();
    assert_eq!(library.section_count(), 2);
    assert_eq!(library.chunk_count(), 2);
}
