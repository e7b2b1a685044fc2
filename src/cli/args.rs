//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Generate literate docs and runnable examples from annotated Rust sources
#[derive(Parser, Debug)]
#[command(name = "dokgen")]
#[command(about = "Generate literate docs and runnable examples from annotated Rust sources")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Output format of the `process` command
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessFormat {
    /// The rendered document
    Markdown,
    /// Document, programs and media as JSON
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process a sources directory and write documents, programs and the index
    Build {
        /// Path to the sources directory
        path: PathBuf,

        /// Output directory for rendered documents
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output directory for synthesized programs
        #[arg(long)]
        examples: Option<PathBuf>,

        /// Base URL used to link documents to their programs
        #[arg(long)]
        web_root_url: Option<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Process files one at a time
        #[arg(long)]
        sequential: bool,

        /// Skip writing the JSON manifest
        #[arg(long)]
        no_manifest: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Extract a single source file and print the result
    Process {
        /// Source file to process
        file: PathBuf,

        /// Namespace written into program headers
        #[arg(long, default_value = "examples")]
        package: String,

        /// Title prefixed to the rendered document
        #[arg(long)]
        title: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ProcessFormat::Markdown)]
        format: ProcessFormat,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the navigational index of a sources directory
    Index {
        /// Path to the sources directory
        path: PathBuf,

        /// Name of the per-directory title override file
        #[arg(long)]
        metadata_file: Option<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}
