//! CLI adapter for bindery
//!
//! Provides the command-line interface over the segmentation and
//! chunking pipeline. Depends on `core/`; nothing in `core/` depends on
//! this module.
//!
//! # Architecture
//!
//! ```text
//! +------------------+      +------------------+
//! |      cli/        | ---> |      core/       |
//! | (clap adapter)   |      |  (domain logic)  |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bindery - incremental book segmentation and chunking
///
/// Turns a parsed document tree (JSON) into numbered sections and
/// sentence-bounded, overlapping chunks. Re-running over the same book
/// only adds what is missing.
#[derive(Parser, Debug)]
#[command(name = "bindery")]
#[command(version)]
#[command(about = "Incremental book segmentation and chunking", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Output directory (overrides storage.output_dir)
    #[arg(long, short = 'o', global = true, env = "BINDERY_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract new sections from a document tree
    Extract(commands::ExtractArgs),

    /// Chunk stored sections
    Chunk(commands::ChunkArgs),

    /// Extract sections and chunk them in one pass
    Run(commands::RunArgs),

    /// Chunk a text file without persisting and print a preview
    #[command(name = "preview-chunks")]
    PreviewChunks(commands::PreviewArgs),

    /// List stored sections
    #[command(name = "list-sections")]
    ListSections(commands::sections::ListArgs),

    /// Show one section with its chunks
    #[command(name = "show-section")]
    ShowSection(commands::sections::ShowArgs),

    /// Delete a section, its chunks and its files
    #[command(name = "delete-section")]
    DeleteSection(commands::sections::DeleteArgs),

    /// Check the metadata store against the files on disk
    Validate(commands::ValidateArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  bindery completions bash > ~/.local/share/bash-completion/completions/bindery
    ///   zsh:   bindery completions zsh > ~/.zfunc/_bindery
    ///   fish:  bindery completions fish > ~/.config/fish/completions/bindery.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::{migrate_legacy_paths, XdgDirs};
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.log_paths();

    // Run migration from legacy paths (if needed)
    if let Err(e) = migrate_legacy_paths(&xdg) {
        output::print_warning(&format!("Migration issue: {e}"));
    }

    // Load configuration
    let mut config = Config::load_with_xdg(&xdg)?;
    if let Some(dir) = cli.output {
        config.storage.output_dir = dir;
    }
    config.log_config();

    // Create services
    let services = Arc::new(Services::new(config));

    // Execute command
    match cli.command {
        Commands::Extract(args) => commands::extract::execute(args, &services, cli.format),
        Commands::Chunk(args) => commands::chunk::execute(args, &services, cli.format),
        Commands::Run(args) => commands::run::execute(args, &services, cli.format),
        Commands::PreviewChunks(args) => commands::preview::execute(args, &services, cli.format),
        Commands::ListSections(args) => {
            commands::sections::execute_list(args, &services, cli.format)
        }
        Commands::ShowSection(args) => {
            commands::sections::execute_show(args, &services, cli.format)
        }
        Commands::DeleteSection(args) => {
            commands::sections::execute_delete(args, &services, cli.format)
        }
        Commands::Validate(args) => commands::validate::execute(args, &services, cli.format),
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
