//! Tests for command-line parsing
//!
//! Parsing only; nothing is executed.

use bindery::cli::{Cli, Commands, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parse_run_with_globals() {
    let cli = Cli::try_parse_from([
        "bindery", "run", "tree.json", "--format", "json", "--output", "/tmp/out", "-v",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.output, Some(PathBuf::from("/tmp/out")));
    assert!(cli.verbose);
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.tree, PathBuf::from("tree.json"));
            assert!(args.source.is_none());
        }
        other => panic!("Expected run, got {other:?}"),
    }
}

#[test]
fn test_parse_defaults() {
    let cli = Cli::try_parse_from(["bindery", "list-sections"]).unwrap();
    assert_eq!(cli.format, OutputFormat::Human);
    assert!(!cli.verbose);
    assert!(matches!(cli.command, Commands::ListSections(ref a) if !a.detailed));
}

#[test]
fn test_parse_chunk_options() {
    let cli = Cli::try_parse_from(["bindery", "chunk", "--section", "3", "--rechunk"]).unwrap();
    match cli.command {
        Commands::Chunk(args) => {
            assert_eq!(args.section, Some(3));
            assert!(args.rechunk);
        }
        other => panic!("Expected chunk, got {other:?}"),
    }

    let cli = Cli::try_parse_from(["bindery", "chunk"]).unwrap();
    assert!(matches!(cli.command, Commands::Chunk(ref a) if a.section.is_none() && !a.rechunk));
}

#[test]
fn test_parse_section_commands() {
    let cli = Cli::try_parse_from(["bindery", "show-section", "7", "--content"]).unwrap();
    assert!(matches!(cli.command, Commands::ShowSection(ref a) if a.idx == 7 && a.content));

    let cli = Cli::try_parse_from(["bindery", "delete-section", "2", "--force"]).unwrap();
    assert!(matches!(cli.command, Commands::DeleteSection(ref a) if a.idx == 2 && a.force));
}

#[test]
fn test_parse_preview_overrides() {
    let cli = Cli::try_parse_from([
        "bindery",
        "preview-chunks",
        "chapter.txt",
        "--max-chunk-size",
        "1000",
        "--overlap",
        "100",
    ])
    .unwrap();

    match cli.command {
        Commands::PreviewChunks(args) => {
            assert_eq!(args.file, PathBuf::from("chapter.txt"));
            assert_eq!(args.max_chunk_size, Some(1000));
            assert_eq!(args.overlap, Some(100));
            assert_eq!(args.min_chunk_size, None);
        }
        other => panic!("Expected preview-chunks, got {other:?}"),
    }
}

#[test]
fn test_parse_rejects_bad_input() {
    assert!(Cli::try_parse_from(["bindery"]).is_err());
    assert!(Cli::try_parse_from(["bindery", "show-section", "abc"]).is_err());
    assert!(Cli::try_parse_from(["bindery", "list-sections", "--format", "xml"]).is_err());
    assert!(Cli::try_parse_from(["bindery", "extract"]).is_err());
}

#[test]
fn test_parse_completions_and_validate() {
    let cli = Cli::try_parse_from(["bindery", "completions", "bash"]).unwrap();
    assert!(matches!(cli.command, Commands::Completions(_)));

    let cli = Cli::try_parse_from(["bindery", "validate", "--strict"]).unwrap();
    assert!(matches!(cli.command, Commands::Validate(ref a) if a.strict));
}
