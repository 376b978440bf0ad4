// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{nested_book, part_one, russian_sentences, write_tree, TestLibrary};
#[allow(unused_imports)]
pub use helpers::{assert_chunks_cover, create_test_services, test_config};
