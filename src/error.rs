use std::path::PathBuf;
use thiserror::Error;

/// Dokgen error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("Invalid use of @{annotation} on {construct} (line {line}): {message}")]
    Annotation {
        annotation: String,
        construct: String,
        line: usize,
        message: String,
    },

    #[error("@{annotation} expects a string literal, found {construct} (line {line})")]
    UnsupportedArgument {
        annotation: String,
        construct: String,
        line: usize,
    },

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Invalid title metadata in {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for dokgen operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a malformed annotation error
    pub fn annotation(
        annotation: impl Into<String>,
        construct: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Error::Annotation {
            annotation: annotation.into(),
            construct: construct.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an unsupported argument error
    pub fn unsupported_argument(
        annotation: impl Into<String>,
        construct: impl Into<String>,
        line: usize,
    ) -> Self {
        Error::UnsupportedArgument {
            annotation: annotation.into(),
            construct: construct.into(),
            line,
        }
    }

    /// Create a metadata error
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
