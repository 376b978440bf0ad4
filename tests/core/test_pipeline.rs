// Integration tests for full pipeline runs

use crate::common::{create_test_services, russian_sentences, test_config};
use bindery::core::document::DocumentNode;
use bindery::core::pipeline::Pipeline;
use bindery::core::store::LibraryValidator;
use tempfile::TempDir;

fn russian_book() -> DocumentNode {
    DocumentNode::titled("Книга")
        .section(
            DocumentNode::titled("ЧАСТЬ ПЕРВАЯ")
                .section(DocumentNode::titled("I").paragraph(russian_sentences(40)))
                .section(DocumentNode::titled("II").paragraph(russian_sentences(10))),
        )
        .section(DocumentNode::titled("ЧАСТЬ ВТОРАЯ").paragraph(russian_sentences(25)))
}

#[test]
fn test_full_run_over_russian_book() {
    let temp_dir = TempDir::new().unwrap();
    let services = create_test_services(temp_dir.path());
    let pipeline = services.create_pipeline().unwrap();

    let report = pipeline.run(&russian_book(), Some("book.fb2")).unwrap();

    assert_eq!(report.extraction.created, vec![0, 1, 2]);
    assert_eq!(report.chunking.sections_chunked(), 3);
    assert_eq!(report.chunking.sections_failed(), 0);

    let library = pipeline.library();
    assert_eq!(library.section(0).unwrap().title, "Книга - ЧАСТЬ ПЕРВАЯ - I");
    assert_eq!(library.section(2).unwrap().title, "Книга - ЧАСТЬ ВТОРАЯ");

    // 3200-char chapter gives three chunks, the short one a single chunk
    assert_eq!(library.section_chunks(0).len(), 3);
    assert_eq!(library.section_chunks(1).len(), 1);

    let validation = LibraryValidator::new(library).validate().unwrap();
    assert!(validation.is_consistent, "{validation:?}");
    assert_eq!(validation.total_chunks, report.chunking.chunks_created);
}

#[test]
fn test_second_run_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let services = create_test_services(temp_dir.path());

    services
        .create_pipeline()
        .unwrap()
        .run(&russian_book(), None)
        .unwrap();
    let library = services.open_library().unwrap();
    let sections = library.section_count();
    let chunks = library.chunk_count();

    // A new process over the same output directory
    let report = services
        .create_pipeline()
        .unwrap()
        .run(&russian_book(), None)
        .unwrap();

    assert_eq!(report.extraction.sections_created(), 0);
    assert_eq!(report.chunking.chunks_created, 0);
    assert_eq!(report.chunking.sections_already_chunked(), sections);
    assert_eq!(library.section_count(), sections);
    assert_eq!(library.chunk_count(), chunks);
}

#[test]
fn test_resume_after_extraction_only() {
    let temp_dir = TempDir::new().unwrap();
    let services = create_test_services(temp_dir.path());

    // First run stops after extraction and one section's chunks
    let pipeline = services.create_pipeline().unwrap();
    pipeline.extract(&russian_book()).unwrap();
    pipeline.chunk_section(1).unwrap();

    let report = services
        .create_pipeline()
        .unwrap()
        .run(&russian_book(), None)
        .unwrap();

    assert_eq!(report.extraction.sections_created(), 0);
    assert_eq!(report.chunking.sections_already_chunked(), 1);
    assert_eq!(report.chunking.sections_chunked(), 2);
    assert_eq!(services.open_library().unwrap().section_chunks(1).len(), 1);
}

#[test]
fn test_new_sections_chunked_on_later_run() {
    let temp_dir = TempDir::new().unwrap();
    let services = create_test_services(temp_dir.path());
    let pipeline = services.create_pipeline().unwrap();

    pipeline.run(&russian_book(), None).unwrap();

    let extended = russian_book().section(
        DocumentNode::titled("ЧАСТЬ ТРЕТЬЯ").paragraph("Новая глава. Совсем короткая."),
    );
    let report = pipeline.run(&extended, None).unwrap();

    assert_eq!(report.extraction.created, vec![3]);
    assert_eq!(report.chunking.sections_chunked(), 1);
    assert_eq!(report.chunking.sections_already_chunked(), 3);
}

#[test]
fn test_inline_chunks_when_files_disabled() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(temp_dir.path());
    config.chunking.write_chunk_files = false;
    config.segmentation.title_banner = false;

    let pipeline = Pipeline::from_config(&config).unwrap();
    pipeline.run(&russian_book(), None).unwrap();

    let library = pipeline.library();
    let section = library.section(1).unwrap();
    let raw = std::fs::read_to_string(temp_dir.path().join(&section.section_file)).unwrap();
    assert!(raw.starts_with("Предложение 00"));

    let chunk = library.section_chunks(1).remove(&0).unwrap();
    assert!(chunk.chunk_file.is_none());
    assert_eq!(library.chunk_text(&chunk).unwrap().unwrap(), raw.trim());
    assert!(!temp_dir.path().join("chunks").exists());
}

#[test]
fn test_missing_section_file_does_not_stop_other_sections() {
    let temp_dir = TempDir::new().unwrap();
    let services = create_test_services(temp_dir.path());
    let pipeline = services.create_pipeline().unwrap();

    pipeline.extract(&russian_book()).unwrap();
    let broken = pipeline.library().section(1).unwrap();
    std::fs::remove_file(temp_dir.path().join(&broken.section_file)).unwrap();

    let report = pipeline.chunk_all().unwrap();

    assert_eq!(report.sections_failed(), 1);
    assert_eq!(report.sections_chunked(), 2);
    assert!(report.outcomes[1].status.is_failed());
    assert!(!pipeline.library().has_chunks(1));

    // Restoring the file lets a later run finish the job
    pipeline.library().set_section_content(1, &russian_sentences(10)).unwrap();
    let retry = pipeline.chunk_all().unwrap();
    assert_eq!(retry.sections_chunked(), 1);
    assert_eq!(retry.sections_already_chunked(), 2);
}
