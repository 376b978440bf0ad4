//! bindery - command-line interface for the segmentation pipeline
//!
//! # Examples
//!
//! ```bash
//! # Extract sections and chunk them
//! bindery run book_tree.json --output ./processed_book
//!
//! # Chunk only what is missing
//! bindery chunk
//!
//! # Try chunk settings on a text file
//! bindery preview-chunks chapter.txt --max-chunk-size 1000
//!
//! # Inspect the library
//! bindery list-sections --detailed
//! bindery validate
//! ```

use bindery::cli::{run, Cli};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "bindery=debug" } else { "bindery=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
