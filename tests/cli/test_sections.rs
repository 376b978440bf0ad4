//! Tests for section, validate, preview and config CLI commands

use crate::common::{create_test_services, part_one, russian_sentences};
use bindery::cli::commands::config::{execute as execute_config, ConfigArgs};
use bindery::cli::commands::preview::{execute as execute_preview, PreviewArgs};
use bindery::cli::commands::sections::{
    execute_delete, execute_list, execute_show, DeleteArgs, ListArgs, ShowArgs,
};
use bindery::cli::commands::validate::{execute as execute_validate, ValidateArgs};
use bindery::cli::OutputFormat;
use bindery::core::services::Services;
use std::sync::Arc;
use tempfile::TempDir;

/// Services over a library that already holds "Part One"
fn services_with_book() -> (Arc<Services>, TempDir) {
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());
    services
        .create_pipeline()
        .unwrap()
        .run(&part_one(), Some("part_one.json"))
        .unwrap();
    (services, output)
}

#[test]
fn test_list_sections_empty_library() {
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());

    let args = ListArgs { detailed: false };
    assert!(execute_list(args, &services, OutputFormat::Human).is_ok());
}

#[test]
fn test_list_sections_both_formats() {
    let (services, _output) = services_with_book();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = ListArgs { detailed: true };
        let result = execute_list(args, &services, format);
        assert!(result.is_ok(), "List should succeed: {:?}", result.err());
    }
}

#[test]
fn test_show_section() {
    let (services, _output) = services_with_book();

    let args = ShowArgs {
        idx: 1,
        content: true,
    };
    assert!(execute_show(args, &services, OutputFormat::Human).is_ok());

    let args = ShowArgs {
        idx: 0,
        content: false,
    };
    assert!(execute_show(args, &services, OutputFormat::Json).is_ok());
}

#[test]
fn test_show_missing_section() {
    let (services, _output) = services_with_book();

    let args = ShowArgs {
        idx: 99,
        content: false,
    };
    let err = execute_show(args, &services, OutputFormat::Human).unwrap_err();
    assert!(err.to_string().contains("Section 99 not found"));
}

#[test]
fn test_delete_section_force() {
    let (services, output) = services_with_book();
    let section_file = services.open_library().unwrap().section(0).unwrap().section_file;

    let args = DeleteArgs {
        idx: 0,
        force: true,
    };
    execute_delete(args, &services, OutputFormat::Json).unwrap();

    let library = services.open_library().unwrap();
    assert!(library.section(0).is_none());
    assert!(!library.has_chunks(0));
    assert!(!output.path().join(section_file).exists());
    assert_eq!(library.section_count(), 1);
}

#[test]
fn test_delete_missing_section() {
    let (services, _output) = services_with_book();

    let args = DeleteArgs {
        idx: 42,
        force: true,
    };
    assert!(execute_delete(args, &services, OutputFormat::Human).is_err());
}

#[test]
fn test_validate_consistent_and_strict() {
    let (services, output) = services_with_book();

    let args = ValidateArgs { strict: true };
    assert!(execute_validate(args, &services, OutputFormat::Json).is_ok());

    std::fs::write(output.path().join("sections").join("9999_stray.txt"), "x").unwrap();

    // Reported but not an error without --strict
    let args = ValidateArgs { strict: false };
    assert!(execute_validate(args, &services, OutputFormat::Human).is_ok());

    let args = ValidateArgs { strict: true };
    let err = execute_validate(args, &services, OutputFormat::Human).unwrap_err();
    assert!(err.to_string().contains("1 orphan files"));
}

#[test]
fn test_preview_chunks() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());
    let file = input.path().join("chapter.txt");
    std::fs::write(&file, russian_sentences(40)).unwrap();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = PreviewArgs {
            file: file.clone(),
            max_chunk_size: None,
            min_chunk_size: None,
            overlap: None,
        };
        let result = execute_preview(args, &services, format);
        assert!(result.is_ok(), "Preview should succeed: {:?}", result.err());
    }

    // Nothing is persisted
    assert_eq!(services.open_library().unwrap().section_count(), 0);
    assert!(!output.path().join("chunks").exists());
}

#[test]
fn test_preview_rejects_bad_overlap() {
    let input = TempDir::new().unwrap();
    let services = create_test_services(input.path());
    let file = input.path().join("chapter.txt");
    std::fs::write(&file, "Одно предложение.").unwrap();

    let args = PreviewArgs {
        file,
        max_chunk_size: Some(100),
        min_chunk_size: None,
        overlap: Some(100),
    };
    let err = execute_preview(args, &services, OutputFormat::Human).unwrap_err();
    assert!(err.to_string().contains("must be less than"));
}

#[test]
fn test_preview_missing_file() {
    let input = TempDir::new().unwrap();
    let services = create_test_services(input.path());

    let args = PreviewArgs {
        file: input.path().join("missing.txt"),
        max_chunk_size: None,
        min_chunk_size: None,
        overlap: None,
    };
    assert!(execute_preview(args, &services, OutputFormat::Human).is_err());
}

#[test]
fn test_show_config() {
    let output = TempDir::new().unwrap();
    let services = create_test_services(output.path());

    let args = ConfigArgs { all: true };
    assert!(execute_config(args, &services, OutputFormat::Human).is_ok());

    let args = ConfigArgs { all: false };
    assert!(execute_config(args, &services, OutputFormat::Json).is_ok());
}
