use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub output: OutputConfig,
    pub examples: ExamplesConfig,
    pub annotations: AnnotationsConfig,
    pub index: IndexConfig,
    pub media: MediaConfig,
}

/// Source discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Process files on a thread pool
    pub parallel: bool,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Rendered documents
    pub markdown_dir: PathBuf,
    /// Synthesized programs
    pub examples_dir: PathBuf,
    /// Fence language of code blocks
    pub code_language: String,
    /// Write `dokgen-manifest.json`
    pub manifest: bool,
}

/// Synthesized program settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamplesConfig {
    /// Base URL for links from documents to their programs
    pub web_root_url: Option<String>,
    /// First segment of every program namespace
    pub package_root: String,
    /// Custom tera template for programs
    pub template: Option<PathBuf>,
}

/// Annotation vocabulary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationsConfig {
    /// Path segment that qualifies vocabulary annotations and imports
    pub namespace: String,
}

/// Navigational index settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub enabled: bool,
    pub file_name: String,
    /// Per-directory title overrides
    pub metadata_file: String,
}

/// Media reference checks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directories media references are resolved against
    pub directories: Vec<PathBuf>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.rs".to_string(), "**/*.md".to_string()],
            exclude: vec!["target/**".to_string(), ".git/**".to_string()],
            parallel: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            markdown_dir: PathBuf::from("build/dokgen/md"),
            examples_dir: PathBuf::from("build/dokgen/examples"),
            code_language: "rust".to_string(),
            manifest: true,
        }
    }
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        Self {
            web_root_url: None,
            package_root: "examples".to_string(),
            template: None,
        }
    }
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            namespace: "annotations".to_string(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_name: "_sidebar.md".to_string(),
            metadata_file: "_titles.toml".to_string(),
        }
    }
}

/// Command-line overrides for a build
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub markdown_dir: Option<PathBuf>,
    pub examples_dir: Option<PathBuf>,
    pub web_root_url: Option<String>,
    pub exclude: Vec<String>,
    pub sequential: bool,
    pub no_manifest: bool,
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or return defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: CliOverrides) {
        if let Some(dir) = cli.markdown_dir {
            self.output.markdown_dir = dir;
        }

        if let Some(dir) = cli.examples_dir {
            self.output.examples_dir = dir;
        }

        if let Some(url) = cli.web_root_url {
            self.examples.web_root_url = Some(url);
        }

        if !cli.exclude.is_empty() {
            self.sources.exclude.extend(cli.exclude);
        }

        if cli.sequential {
            self.sources.parallel = false;
        }

        if cli.no_manifest {
            self.output.manifest = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sources.include.is_empty() {
            return Err(Error::config_validation("at least one include pattern required"));
        }

        if self.annotations.namespace.trim().is_empty() {
            return Err(Error::config_validation("annotation namespace must not be empty"));
        }

        if self.examples.package_root.trim().is_empty() {
            return Err(Error::config_validation("package_root must not be empty"));
        }

        if self.index.file_name.trim().is_empty() {
            return Err(Error::config_validation("index file name must not be empty"));
        }

        if self.index.metadata_file.trim().is_empty() {
            return Err(Error::config_validation("index metadata file name must not be empty"));
        }

        if self.output.markdown_dir == self.output.examples_dir {
            return Err(Error::config_validation(
                "markdown_dir and examples_dir must differ",
            ));
        }

        Ok(())
    }
}
