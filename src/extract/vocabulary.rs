// Annotation vocabulary
//
// Maps attribute paths onto the fixed set of markers. Paths may be fully
// qualified; everything up to the last namespace segment is ignored.

use serde::Serialize;

/// One annotation of the vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Marker {
    Text,
    Code,
    CodeBlock,
    MediaImage,
    MediaVideo,
    Application,
    Exclude,
}

impl Marker {
    /// Dotted display name, as used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Marker::Text => "Text",
            Marker::Code => "Code",
            Marker::CodeBlock => "Code.Block",
            Marker::MediaImage => "Media.Image",
            Marker::MediaVideo => "Media.Video",
            Marker::Application => "Application",
            Marker::Exclude => "Exclude",
        }
    }

    fn from_segments(segments: &[String]) -> Option<Self> {
        let lowered: Vec<String> = segments.iter().map(|s| s.to_ascii_lowercase()).collect();
        let lowered: Vec<&str> = lowered.iter().map(String::as_str).collect();
        match lowered.as_slice() {
            ["text"] => Some(Marker::Text),
            ["code"] => Some(Marker::Code),
            ["code", "block"] => Some(Marker::CodeBlock),
            ["media", "image"] => Some(Marker::MediaImage),
            ["media", "video"] => Some(Marker::MediaVideo),
            ["application"] => Some(Marker::Application),
            ["exclude"] => Some(Marker::Exclude),
            _ => None,
        }
    }
}

/// Recognizes vocabulary annotations and imports
#[derive(Debug, Clone)]
pub struct Vocabulary {
    namespace: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new("annotations")
    }
}

impl Vocabulary {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Marker for an attribute path, if it belongs to the vocabulary
    pub fn marker(&self, path: &[String]) -> Option<Marker> {
        let start = path
            .iter()
            .rposition(|s| s == &self.namespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        Marker::from_segments(&path[start..])
    }

    /// Whether a `use` declaration imports from the vocabulary namespace
    pub fn references_namespace(&self, use_text: &str) -> bool {
        use_text
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .any(|segment| segment == self.namespace)
    }
}
