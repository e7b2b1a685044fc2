// Markdown rendering of extracted documents

use crate::extract::{DocElement, Document};
use crate::text::trim_indent;

/// Renders a document model to markdown
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    fence: String,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new("rust")
    }
}

impl MarkdownRenderer {
    /// Create a renderer using `fence` as the code block language
    pub fn new(fence: impl Into<String>) -> Self {
        Self {
            fence: fence.into(),
        }
    }

    /// Render a document, optionally under a top-level title.
    ///
    /// Every element is surrounded by newlines.
    pub fn render(&self, doc: &Document, title: Option<&str>) -> String {
        let mut out = String::new();
        if let Some(title) = title {
            out.push_str(&format!("# {}\n", title));
        }
        for element in &doc.elements {
            out.push('\n');
            out.push_str(&self.render_element(element));
            out.push('\n');
        }
        out
    }

    fn render_element(&self, element: &DocElement) -> String {
        match element {
            DocElement::Markdown(text) => trim_indent(text),
            DocElement::Code(code) => format!("```{}\n{}\n```", self.fence, code),
            DocElement::Image(src) => format!("<img src=\"{}\"/>", src.trim()),
            DocElement::Video(src) => format!(
                "<video controls>\n    <source src=\"{}\" type=\"video/mp4\"></source>\n</video>\n",
                src.trim()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(elements: Vec<DocElement>) -> Document {
        Document { elements }
    }

    #[test]
    fn test_empty_document() {
        let renderer = MarkdownRenderer::default();
        assert_eq!(renderer.render(&Document::default(), None), "");
    }

    #[test]
    fn test_markdown_is_trimmed() {
        let renderer = MarkdownRenderer::default();
        let out = renderer.render(
            &doc(vec![DocElement::Markdown(
                "\n        # Intro\n\n        Some *text*.\n    ".to_string(),
            )]),
            None,
        );
        assert_eq!(out, "\n# Intro\n\nSome *text*.\n");
    }

    #[test]
    fn test_code_fence() {
        let renderer = MarkdownRenderer::new("rs");
        let out = renderer.render(&doc(vec![DocElement::Code("let a = 1;".to_string())]), None);
        assert_eq!(out, "\n```rs\nlet a = 1;\n```\n");
    }

    #[test]
    fn test_media() {
        let renderer = MarkdownRenderer::default();
        let out = renderer.render(
            &doc(vec![
                DocElement::Image("image.png".to_string()),
                DocElement::Video("video.mp4".to_string()),
            ]),
            None,
        );
        assert_eq!(
            out,
            "\n<img src=\"image.png\"/>\n\n<video controls>\n    <source src=\"video.mp4\" type=\"video/mp4\"></source>\n</video>\n\n"
        );
    }

    #[test]
    fn test_title() {
        let renderer = MarkdownRenderer::default();
        let out = renderer.render(&doc(vec![DocElement::Markdown("x".to_string())]), Some("Intro"));
        assert_eq!(out, "# Intro\n\nx\n");
    }
}
