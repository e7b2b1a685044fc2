//! Navigational index over a tree of documentation sources
//!
//! Directories become unlinked items and files become linked leaves. Titles
//! come from a per-directory metadata table when present, otherwise from the
//! entry's name.

pub mod titles;

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub use titles::{compare_entries, derive_title};

/// Extensions of files listed in the index
const LISTED_EXTENSIONS: &[&str] = &["rs", "md"];

/// One node of the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexEntry {
    /// A document
    Page { title: String, link: String },
    /// A directory
    Section {
        title: String,
        children: Vec<IndexEntry>,
    },
}

impl IndexEntry {
    pub fn title(&self) -> &str {
        match self {
            IndexEntry::Page { title, .. } | IndexEntry::Section { title, .. } => title,
        }
    }
}

/// Builds the index of a sources directory
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    metadata_file: String,
    /// Root-relative files allowed in the index; every listed file when unset
    files: Option<BTreeSet<PathBuf>>,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new("_titles.toml")
    }
}

impl IndexBuilder {
    /// Create a builder reading title overrides from `metadata_file`
    pub fn new(metadata_file: impl Into<String>) -> Self {
        Self {
            metadata_file: metadata_file.into(),
            files: None,
        }
    }

    /// Restrict the index to these root-relative files.
    ///
    /// Directories whose files are all filtered out are dropped; directories
    /// holding no listed files at all still appear.
    pub fn with_files(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.files = Some(files.into_iter().collect());
        self
    }

    /// Build the entries under `root`
    pub fn build(&self, root: &Path) -> Result<Vec<IndexEntry>> {
        if !root.is_dir() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }
        self.build_dir(root, root)
    }

    /// Build and render the index of `root`
    pub fn generate(&self, root: &Path) -> Result<String> {
        Ok(render(&self.build(root)?))
    }

    fn build_dir(&self, root: &Path, dir: &Path) -> Result<Vec<IndexEntry>> {
        let overrides = self.load_overrides(dir)?;

        let mut listed: Vec<(String, PathBuf, bool)> = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || name == self.metadata_file {
                continue;
            }
            let is_dir = entry.file_type().is_dir();
            if !is_dir && !has_listed_extension(entry.path()) {
                continue;
            }
            if !is_dir && !self.allows(root, entry.path()) {
                continue;
            }
            listed.push((name, entry.into_path(), is_dir));
        }
        listed.sort_by(|a, b| compare_entries(&a.0, &b.0));

        let mut entries = Vec::with_capacity(listed.len());
        for (name, path, is_dir) in listed {
            let stem = if is_dir {
                name.clone()
            } else {
                file_stem(&path)
            };
            let title = overrides
                .get(&stem)
                .cloned()
                .unwrap_or_else(|| derive_title(&stem));

            if is_dir {
                let children = self.build_dir(root, &path)?;
                if children.is_empty() && self.files.is_some() && holds_listed_files(&path) {
                    continue;
                }
                entries.push(IndexEntry::Section { title, children });
            } else {
                entries.push(IndexEntry::Page {
                    title,
                    link: document_link(root, &path),
                });
            }
        }
        Ok(entries)
    }

    fn allows(&self, root: &Path, path: &Path) -> bool {
        match &self.files {
            Some(files) => files.contains(path.strip_prefix(root).unwrap_or(path)),
            None => true,
        }
    }

    /// Title overrides of one directory
    fn load_overrides(&self, dir: &Path) -> Result<HashMap<String, String>> {
        let path = dir.join(&self.metadata_file);
        if !path.is_file() {
            return Ok(HashMap::new());
        }

        debug!(path = %path.display(), "Loading title overrides");
        let content = std::fs::read_to_string(&path)?;
        let table: toml::Table =
            toml::from_str(&content).map_err(|e| Error::metadata(&path, e.to_string()))?;

        table
            .into_iter()
            .map(|(key, value)| match value {
                toml::Value::String(title) => Ok((key, title)),
                other => Err(Error::metadata(
                    &path,
                    format!("value for `{}` must be a string, found {}", key, other.type_str()),
                )),
            })
            .collect()
    }
}

fn has_listed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| LISTED_EXTENSIONS.contains(&e))
}

/// Whether any file below `dir` would be listed without a file filter
fn holds_listed_files(dir: &Path) -> bool {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file() && has_listed_extension(e.path()))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Root-relative link to the rendered document of a source file
fn document_link(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("md");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Render entries as a nested bullet list, two spaces per level
pub fn render(entries: &[IndexEntry]) -> String {
    let mut lines = Vec::new();
    render_into(entries, 0, &mut lines);
    lines.join("\n")
}

fn render_into(entries: &[IndexEntry], depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for entry in entries {
        match entry {
            IndexEntry::Page { title, link } => {
                lines.push(format!("{}- [{}]({})", indent, title, link));
            }
            IndexEntry::Section { title, children } => {
                lines.push(format!("{}- {}", indent, title));
                render_into(children, depth + 1, lines);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_pages_and_sections() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "02_Drawing/CirclesAndRects.rs");
        touch(dir.path(), "01_Intro.md");
        fs::create_dir_all(dir.path().join("03_Empty")).unwrap();

        let entries = IndexBuilder::default().build(dir.path()).unwrap();
        assert_eq!(
            entries,
            vec![
                IndexEntry::Page {
                    title: "Intro".to_string(),
                    link: "01_Intro.md".to_string()
                },
                IndexEntry::Section {
                    title: "Drawing".to_string(),
                    children: vec![IndexEntry::Page {
                        title: "Circles And Rects".to_string(),
                        link: "02_Drawing/CirclesAndRects.md".to_string()
                    }]
                },
                IndexEntry::Section {
                    title: "Empty".to_string(),
                    children: vec![]
                },
            ]
        );
    }

    #[test]
    fn test_skips_hidden_and_unlisted_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".hidden.rs");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "_titles.toml");
        touch(dir.path(), "Page.rs");

        let out = IndexBuilder::default().generate(dir.path()).unwrap();
        assert_eq!(out, "- [Page](Page.md)");
    }

    #[test]
    fn test_metadata_overrides_title() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "C002ArticleBazQux.rs");
        fs::write(
            dir.path().join("_titles.toml"),
            "C002ArticleBazQux = \"Article $ Baz ? Qux !!!\"\n",
        )
        .unwrap();

        let out = IndexBuilder::default().generate(dir.path()).unwrap();
        assert_eq!(out, "- [Article $ Baz ? Qux !!!](C002ArticleBazQux.md)");
    }

    #[test]
    fn test_metadata_non_string_value() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Page.rs");
        fs::write(dir.path().join("_titles.toml"), "Page = 3\n").unwrap();

        let result = IndexBuilder::default().build(dir.path());
        assert!(matches!(result, Err(Error::Metadata { .. })));
    }

    #[test]
    fn test_custom_metadata_file_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Page.rs");
        fs::write(dir.path().join("titles.toml"), "Page = \"Front Page\"\n").unwrap();

        let out = IndexBuilder::new("titles.toml").generate(dir.path()).unwrap();
        assert_eq!(out, "- [Front Page](Page.md)");
    }

    #[test]
    fn test_file_filter_drops_unlisted_entries() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Intro.md");
        touch(dir.path(), "drafts/Wip.rs");
        touch(dir.path(), "01_Basics/Shapes.rs");
        touch(dir.path(), "01_Basics/Scratch.rs");
        fs::create_dir_all(dir.path().join("02_Later")).unwrap();

        let out = IndexBuilder::default()
            .with_files([PathBuf::from("Intro.md"), PathBuf::from("01_Basics/Shapes.rs")])
            .generate(dir.path())
            .unwrap();
        assert_eq!(
            out,
            "- Basics\n  - [Shapes](01_Basics/Shapes.md)\n- Later\n- [Intro](Intro.md)"
        );
    }

    #[test]
    fn test_missing_root() {
        let result = IndexBuilder::default().build(Path::new("/nonexistent/docs"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_render_nesting() {
        let entries = vec![IndexEntry::Section {
            title: "A".to_string(),
            children: vec![IndexEntry::Section {
                title: "B".to_string(),
                children: vec![IndexEntry::Page {
                    title: "C".to_string(),
                    link: "a/b/c.md".to_string(),
                }],
            }],
        }];
        assert_eq!(render(&entries), "- A\n  - B\n    - [C](a/b/c.md)");
    }
}
