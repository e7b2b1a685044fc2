//! Dokgen - Generate literate docs and runnable examples from annotated Rust sources
//!
//! Authors interleave narrative and code in one annotated source file. Dokgen
//! splits it into a markdown document and a set of standalone programs, and
//! builds a navigational index over a tree of such files.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod index;
pub mod output;
pub mod parser;
pub mod text;

// Re-export main types
pub use config::Config;
pub use error::{Error, Result};
pub use extract::{ExtractSettings, ProcessedSource, Program, SourceProcessor};
pub use generator::{BuildReport, Generator};
pub use index::{IndexBuilder, IndexEntry};
