//! Annotation-driven extraction
//!
//! One source file goes in; a rendered document, the synthesized programs
//! and the media references come out. The classified tree is shared by two
//! independent views: the document view (exclusions omitted) feeds the
//! document builder, the original tree feeds the application synthesizer.

mod application;
mod classify;
mod document;
mod views;
mod vocabulary;

pub use application::{collect_applications, AppModel};
pub use classify::{Classifier, Role};
pub use document::{build_document, DocElement, Document, LinkFactory};
pub use views::{document_view, program_view};
pub use vocabulary::{Marker, Vocabulary};

use crate::config::Config;
use crate::error::Result;
use crate::output::{MarkdownRenderer, ProgramTemplate};
use crate::parser::RustParser;
use serde::Serialize;
use std::path::{Component, Path};
use tracing::debug;

/// One synthesized program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    /// Zero-based position among the file's applications
    pub index: usize,
    pub source: String,
}

impl Program {
    /// Index as a fixed-width string, e.g. `007`
    pub fn padded_index(&self) -> String {
        format!("{:03}", self.index)
    }

    /// File name of the program generated from `stem`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}{}.rs", stem, self.padded_index())
    }
}

/// Everything extracted from one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessedSource {
    /// Rendered markdown
    pub document: String,
    /// Document model the markdown was rendered from
    pub elements: Document,
    pub programs: Vec<Program>,
    pub media: Vec<String>,
}

/// Settings shared by every source processor of a run
#[derive(Debug, Clone)]
pub struct ExtractSettings {
    pub namespace: String,
    pub code_language: String,
    pub template: ProgramTemplate,
}

impl ExtractSettings {
    /// Build settings from configuration, loading a custom template if set
    pub fn from_config(config: &Config) -> Result<Self> {
        let template = match &config.examples.template {
            Some(path) => ProgramTemplate::from_file(path)?,
            None => ProgramTemplate::new()?,
        };
        Ok(Self {
            namespace: config.annotations.namespace.clone(),
            code_language: config.output.code_language.clone(),
            template,
        })
    }
}

/// Runs the extraction pipeline on source files
pub struct SourceProcessor {
    parser: RustParser,
    vocabulary: Vocabulary,
    classifier: Classifier,
    renderer: MarkdownRenderer,
    template: ProgramTemplate,
}

impl SourceProcessor {
    pub fn new(settings: ExtractSettings) -> Result<Self> {
        let vocabulary = Vocabulary::new(settings.namespace);
        Ok(Self {
            parser: RustParser::new()?,
            classifier: Classifier::new(vocabulary.clone()),
            vocabulary,
            renderer: MarkdownRenderer::new(settings.code_language),
            template: settings.template,
        })
    }

    /// Process one source file.
    ///
    /// `package` is written into every program header; `link` maps an
    /// application index to the URL of its program.
    pub fn process(
        &mut self,
        source: &str,
        package: &str,
        link: Option<LinkFactory<'_>>,
    ) -> Result<ProcessedSource> {
        let tree = self.parser.parse_source(source)?;
        let classified = self.classifier.classify(&tree)?;

        let document = build_document(&document_view(&classified), link);
        let programs = collect_applications(&classified, &self.vocabulary)
            .iter()
            .enumerate()
            .map(|(index, app)| {
                Ok(Program {
                    index,
                    source: self.template.render(package, app)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            elements = document.elements.len(),
            programs = programs.len(),
            package,
            "Extracted source"
        );

        Ok(ProcessedSource {
            document: self.renderer.render(&document, None),
            media: document.media(),
            elements: document,
            programs,
        })
    }
}

/// Program namespace for a directory relative to the sources root.
///
/// Segments are appended with dots; a segment holding anything but letters
/// is wrapped in backticks.
pub fn package_for(root: &str, rel_dir: &Path) -> String {
    let mut package = root.to_string();
    for component in rel_dir.components() {
        if let Component::Normal(part) = component {
            let part = part.to_string_lossy();
            package.push('.');
            if part.chars().all(char::is_alphabetic) {
                package.push_str(&part);
            } else {
                package.push('`');
                package.push_str(&part);
                package.push('`');
            }
        }
    }
    package
}
