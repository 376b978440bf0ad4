// Test helper functions

use bindery::core::config::Config;
use bindery::core::services::Services;
use bindery::core::types::TextChunk;
use std::path::Path;
use std::sync::Arc;

/// Default configuration writing into `output_dir`
#[allow(dead_code)] // Used in integration tests
pub fn test_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.output_dir = output_dir.to_path_buf();
    config
}

/// Services over `output_dir`, wrapped the way CLI commands take them
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(output_dir: &Path) -> Arc<Services> {
    Arc::new(Services::new(test_config(output_dir)))
}

/// Assert that chunks start at 0, end at the text length, never leave a
/// gap, and are exact character slices of `text`
#[allow(dead_code)] // Used in integration tests
pub fn assert_chunks_cover(text: &str, chunks: &[TextChunk]) {
    let chars: Vec<char> = text.chars().collect();
    assert!(!chunks.is_empty(), "Expected at least one chunk");
    assert_eq!(chunks[0].start_offset, 0, "First chunk must start at 0");
    assert_eq!(
        chunks.last().unwrap().end_offset,
        chars.len(),
        "Last chunk must end at the text length"
    );

    for pair in chunks.windows(2) {
        assert!(
            pair[1].start_offset <= pair[0].end_offset,
            "Gap between chunks: {} .. {}",
            pair[0].end_offset,
            pair[1].start_offset
        );
        assert!(pair[1].start_offset > pair[0].start_offset);
    }

    for chunk in chunks {
        let slice: String = chars[chunk.start_offset..chunk.end_offset].iter().collect();
        assert_eq!(chunk.text, slice, "Chunk text must match its offsets");
    }
}
