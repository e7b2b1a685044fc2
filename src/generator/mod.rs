// Generator: batch driver over a tree of annotated sources
//
// Discovers sources, extracts every Rust file (optionally on a thread pool),
// then writes documents, programs, copied markdown, the index and the
// manifest in sorted path order.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::{package_for, ExtractSettings, ProcessedSource, SourceProcessor};
use crate::index::IndexBuilder;
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Name of the manifest written next to the rendered documents
pub const MANIFEST_FILE: &str = "dokgen-manifest.json";

/// A source file that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// A media reference not found in any media directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingMedia {
    pub file: PathBuf,
    pub src: String,
}

/// Summary of a generator run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Rendered documents, relative to the markdown directory
    pub documents: Vec<PathBuf>,
    /// Markdown files copied unchanged
    pub copied: Vec<PathBuf>,
    /// Synthesized programs, relative to the examples directory
    pub programs: Vec<PathBuf>,
    /// Media references per source file
    pub media: BTreeMap<PathBuf, Vec<String>>,
    pub missing_media: Vec<MissingMedia>,
    pub errors: Vec<FileError>,
    /// Index file, relative to the markdown directory
    pub index: Option<PathBuf>,
}

impl BuildReport {
    pub fn summary(&self) -> String {
        format!(
            "Generated {} documents, {} programs, copied {} markdown files, {} errors",
            self.documents.len(),
            self.programs.len(),
            self.copied.len(),
            self.errors.len()
        )
    }

    /// Whether every source file was processed
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Drives extraction over a sources directory
pub struct Generator {
    config: Config,
    verbose: bool,
}

impl Generator {
    /// Create a new generator with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            verbose: false,
        })
    }

    /// Create generator with a progress bar
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Process every source under `root` and write all outputs
    pub fn run(&self, root: &Path) -> Result<BuildReport> {
        if !root.is_dir() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }

        let settings = ExtractSettings::from_config(&self.config)?;
        let files = self.discover_files(root)?;
        let (sources, markdown): (Vec<PathBuf>, Vec<PathBuf>) =
            files.into_iter().partition(|p| has_extension(p, "rs"));
        info!(
            sources = sources.len(),
            markdown = markdown.len(),
            root = %root.display(),
            "Discovered files"
        );

        let results = self.process_all(root, &sources, &settings);

        let mut report = BuildReport::default();
        let mut indexed = Vec::new();
        for (rel, result) in results {
            match result {
                Ok(processed) => {
                    self.write_outputs(&rel, processed, &mut report)?;
                    indexed.push(rel);
                }
                Err(e) => {
                    warn!(path = %rel.display(), error = %e, "Failed to process source");
                    report.errors.push(FileError {
                        path: rel,
                        message: e.to_string(),
                    });
                }
            }
        }

        for rel in markdown {
            let target = self.config.output.markdown_dir.join(&rel);
            ensure_parent(&target)?;
            fs::copy(root.join(&rel), &target)?;
            debug!(path = %rel.display(), "Copied markdown");
            indexed.push(rel.clone());
            report.copied.push(rel);
        }

        if self.config.index.enabled {
            // Only documents actually written are linked
            let index = IndexBuilder::new(self.config.index.metadata_file.clone())
                .with_files(indexed)
                .generate(root)?;
            let index_rel = PathBuf::from(&self.config.index.file_name);
            let target = self.config.output.markdown_dir.join(&index_rel);
            ensure_parent(&target)?;
            fs::write(&target, format!("{}\n", index))?;
            report.index = Some(index_rel);
        }

        if self.config.output.manifest {
            let target = self.config.output.markdown_dir.join(MANIFEST_FILE);
            ensure_parent(&target)?;
            fs::write(&target, serde_json::to_string_pretty(&report)?)?;
        }

        Ok(report)
    }

    /// Discover source and markdown files, relative to `root`, sorted
    pub fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let include = compile_patterns(&self.config.sources.include)?;
        let exclude = compile_patterns(&self.config.sources.exclude)?;
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if !(has_extension(relative, "rs") || has_extension(relative, "md")) {
                continue;
            }
            if !include.iter().any(|p| p.matches_path(relative)) {
                continue;
            }
            if exclude.iter().any(|p| p.matches_path(relative)) {
                continue;
            }

            files.push(relative.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn process_all(
        &self,
        root: &Path,
        sources: &[PathBuf],
        settings: &ExtractSettings,
    ) -> Vec<(PathBuf, Result<ProcessedSource>)> {
        let progress = self.verbose.then(|| {
            let pb = ProgressBar::new(sources.len() as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            pb.set_style(style);
            pb
        });

        let run = |processor: &mut Result<SourceProcessor>, rel: &PathBuf| {
            if let Some(pb) = &progress {
                pb.set_message(rel.display().to_string());
                pb.inc(1);
            }
            let result = match processor {
                Ok(processor) => self.process_file(processor, root, rel),
                Err(e) => Err(Error::other(format!("Failed to create processor: {}", e))),
            };
            (rel.clone(), result)
        };
        let init = || SourceProcessor::new(settings.clone());

        let results: Vec<_> = if self.config.sources.parallel {
            sources.par_iter().map_init(init, run).collect()
        } else {
            let mut processor = init();
            sources.iter().map(|rel| run(&mut processor, rel)).collect()
        };

        if let Some(pb) = progress {
            pb.finish_with_message("Extraction complete");
        }
        results
    }

    fn process_file(
        &self,
        processor: &mut SourceProcessor,
        root: &Path,
        rel: &Path,
    ) -> Result<ProcessedSource> {
        let text = fs::read_to_string(root.join(rel))?.replace("\r\n", "\n");
        let rel_dir = rel.parent().unwrap_or(Path::new(""));
        let package = package_for(&self.config.examples.package_root, rel_dir);
        let stem = file_stem(rel);

        debug!(path = %rel.display(), package = %package, "Processing source");
        match &self.config.examples.web_root_url {
            Some(url) => {
                let link = |index: usize| program_url(url, rel_dir, &stem, index);
                processor.process(&text, &package, Some(&link))
            }
            None => processor.process(&text, &package, None),
        }
    }

    fn write_outputs(
        &self,
        rel: &Path,
        processed: ProcessedSource,
        report: &mut BuildReport,
    ) -> Result<()> {
        let rel_dir = rel.parent().unwrap_or(Path::new(""));
        let stem = file_stem(rel);

        let doc_rel = rel.with_extension("md");
        let doc_path = self.config.output.markdown_dir.join(&doc_rel);
        ensure_parent(&doc_path)?;
        fs::write(&doc_path, &processed.document)?;
        report.documents.push(doc_rel);

        for program in &processed.programs {
            let program_rel = rel_dir.join(program.file_name(&stem));
            let program_path = self.config.output.examples_dir.join(&program_rel);
            ensure_parent(&program_path)?;
            fs::write(&program_path, &program.source)?;
            report.programs.push(program_rel);
        }

        if !processed.media.is_empty() {
            for src in &processed.media {
                if !self.media_exists(src) {
                    warn!(path = %rel.display(), src = %src, "Media reference not found");
                    report.missing_media.push(MissingMedia {
                        file: rel.to_path_buf(),
                        src: src.clone(),
                    });
                }
            }
            report.media.insert(rel.to_path_buf(), processed.media);
        }

        debug!(
            path = %rel.display(),
            programs = processed.programs.len(),
            "Wrote outputs"
        );
        Ok(())
    }

    /// Whether a media reference resolves; always true without media directories
    fn media_exists(&self, src: &str) -> bool {
        let dirs = &self.config.media.directories;
        if dirs.is_empty() || src.starts_with("http://") || src.starts_with("https://") {
            return true;
        }
        let src = src.trim_start_matches('/');
        dirs.iter().any(|dir| dir.join(src).exists())
    }
}

/// URL of program `index` generated from `<rel_dir>/<stem>.rs`
pub fn program_url(web_root: &str, rel_dir: &Path, stem: &str, index: usize) -> String {
    let mut url = format!("{}/examples/", web_root.trim_end_matches('/'));
    for component in rel_dir.components() {
        url.push_str(&component.as_os_str().to_string_lossy());
        url.push('/');
    }
    url.push_str(&format!("{}{:03}.rs", stem, index));
    url
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(Error::from))
        .collect()
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
