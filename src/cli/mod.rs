//! CLI module for dokgen

mod args;

pub use args::{Args, Command, ProcessFormat};

use crate::config::{CliOverrides, Config};
use crate::error::{Error, Result};
use crate::extract::{ExtractSettings, SourceProcessor};
use crate::generator::Generator;
use crate::index::IndexBuilder;
use crate::output::MarkdownRenderer;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Default config file looked up in the working directory
const DEFAULT_CONFIG: &str = "dokgen.toml";

/// Environment variable overriding the log filter
const LOG_ENV: &str = "DOKGEN_LOG";

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    let verbose = matches!(args.command, Command::Build { verbose: true, .. });
    init_logging(verbose);

    match execute(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber
fn init_logging(verbose: bool) {
    let default = if verbose { "dokgen=debug" } else { "dokgen=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

fn load_config(config: Option<&Path>) -> Result<Config> {
    match config {
        Some(path) => {
            if !path.exists() {
                return Err(Error::PathNotFound(path.to_path_buf()));
            }
            Config::load(path)
        }
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG)),
    }
}

/// Execute a command; `Ok(false)` when it completed with failures
fn execute(args: Args) -> Result<bool> {
    match args.command {
        Command::Build {
            path,
            output,
            examples,
            web_root_url,
            config,
            exclude,
            sequential,
            no_manifest,
            verbose,
        } => {
            let mut cfg = load_config(config.as_deref())?;

            // Merge CLI arguments (CLI takes precedence)
            cfg.merge_cli(CliOverrides {
                markdown_dir: output,
                examples_dir: examples,
                web_root_url,
                exclude,
                sequential,
                no_manifest,
            });

            if verbose {
                println!("Sources: {}", path.display());
                println!("Documents: {}", cfg.output.markdown_dir.display());
                println!("Examples: {}", cfg.output.examples_dir.display());
                println!("Include: {:?}", cfg.sources.include);
                println!("Exclude: {:?}", cfg.sources.exclude);
                println!("Parallel: {}", cfg.sources.parallel);
            }

            if !path.exists() {
                return Err(Error::PathNotFound(path));
            }

            let generator = Generator::new(cfg.clone())?.with_verbose(verbose);
            let report = generator.run(&path)?;

            println!("{}", report.summary());

            if !report.errors.is_empty() {
                println!("\nFailed files ({}):", report.errors.len());
                for error in &report.errors {
                    println!("  {}: {}", error.path.display(), error.message);
                }
            }

            if !report.missing_media.is_empty() {
                println!("\nMissing media ({}):", report.missing_media.len());
                for missing in &report.missing_media {
                    println!("  {}: {}", missing.file.display(), missing.src);
                }
            }

            println!("Documentation written to: {}", cfg.output.markdown_dir.display());
            Ok(report.is_success())
        }

        Command::Process {
            file,
            package,
            title,
            format,
            config,
        } => {
            let cfg = load_config(config.as_deref())?;
            if !file.is_file() {
                return Err(Error::PathNotFound(file));
            }

            let source = std::fs::read_to_string(&file)?.replace("\r\n", "\n");
            let mut processor = SourceProcessor::new(ExtractSettings::from_config(&cfg)?)?;
            let processed = processor.process(&source, &package, None)?;

            match format {
                ProcessFormat::Markdown => {
                    let renderer = MarkdownRenderer::new(cfg.output.code_language.clone());
                    print!("{}", renderer.render(&processed.elements, title.as_deref()));
                }
                ProcessFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&processed)?);
                }
            }
            Ok(true)
        }

        Command::Index {
            path,
            metadata_file,
            config,
        } => {
            let cfg = load_config(config.as_deref())?;
            let metadata_file = metadata_file.unwrap_or(cfg.index.metadata_file);
            let index = IndexBuilder::new(metadata_file).generate(&path)?;
            println!("{}", index);
            Ok(true)
        }

        Command::Version => {
            println!("dokgen {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_explicit_missing() {
        let result = load_config(Some(Path::new("/nonexistent/dokgen.toml")));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_load_config_explicit() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[annotations]\nnamespace = \"doc\"").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.annotations.namespace, "doc");
    }

    #[test]
    fn test_execute_version() {
        let args = Args {
            command: Command::Version,
        };
        assert!(execute(args).unwrap());
    }
}
