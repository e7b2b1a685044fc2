// Document model and builder

use crate::extract::classify::Role;
use crate::extract::views::program_view;
use crate::parser::{block_expression, SyntaxNode, SyntaxTree};
use serde::Serialize;
use std::rc::Rc;

/// Maps an application index to the URL of its generated program
pub type LinkFactory<'a> = &'a dyn Fn(usize) -> String;

/// One unit of document content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DocElement {
    Markdown(String),
    Code(String),
    Image(String),
    Video(String),
}

/// Ordered document content of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub elements: Vec<DocElement>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Media references in document order
    pub fn media(&self) -> Vec<String> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                DocElement::Image(src) | DocElement::Video(src) => Some(src.clone()),
                _ => None,
            })
            .collect()
    }
}

/// State threaded through the document traversal
struct Accumulator<'a> {
    elements: Vec<DocElement>,
    apps_seen: usize,
    link: Option<LinkFactory<'a>>,
}

impl Accumulator<'_> {
    fn push_code(&mut self, code: String) {
        self.elements.push(DocElement::Code(code));
        if let (Some(link), Some(app)) = (self.link, self.apps_seen.checked_sub(1)) {
            self.elements.push(DocElement::Markdown(format!(
                "[Link to the full example]({})",
                link(app)
            )));
        }
    }
}

/// Build the document from the document view of a classified tree
pub fn build_document(view: &SyntaxTree, link: Option<LinkFactory<'_>>) -> Document {
    let mut acc = Accumulator {
        elements: Vec::new(),
        apps_seen: 0,
        link,
    };
    visit(view.root(), &mut acc);
    Document {
        elements: acc.elements,
    }
}

fn visit(node: &Rc<SyntaxNode>, acc: &mut Accumulator<'_>) {
    match node.role() {
        Some(Role::Text(text)) => acc.elements.push(DocElement::Markdown(text.clone())),
        Some(Role::Code { caption }) => {
            if let Some(caption) = caption {
                acc.elements.push(DocElement::Markdown(caption.clone()));
            }
            let code = program_view(node).map(|n| n.to_source()).unwrap_or_default();
            acc.push_code(code);
        }
        Some(Role::CodeBlock { caption }) => {
            acc.elements.push(DocElement::Markdown(caption.clone()));
            acc.push_code(block_statements(node));
        }
        Some(Role::Image(src)) => acc.elements.push(DocElement::Image(src.clone())),
        Some(Role::Video(src)) => acc.elements.push(DocElement::Video(src.clone())),
        Some(Role::Application) => acc.apps_seen += 1,
        Some(Role::Exclude) | None => {}
    }

    if !node.is_annotated() {
        return;
    }
    for child in node.children() {
        visit(child, acc);
    }
}

/// Top-level statements of an annotated block, serialized one by one
fn block_statements(node: &Rc<SyntaxNode>) -> String {
    let Some(block) = block_expression(node) else {
        return String::new();
    };
    block
        .children()
        .filter_map(program_view)
        .map(|stmt| stmt.to_source())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::classify::Classifier;
    use crate::extract::views::document_view;
    use crate::parser::RustParser;

    fn document(source: &str, link: Option<LinkFactory<'_>>) -> Document {
        let tree = RustParser::new().unwrap().parse_source(source).unwrap();
        let classified = Classifier::default().classify(&tree).unwrap();
        build_document(&document_view(&classified), link)
    }

    #[test]
    fn test_no_annotations() {
        let doc = document("fn main() {\n    let a = 1;\n}\n", None);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_text_element() {
        let doc = document("fn main() {\n    #[text]\n    \"x\";\n}\n", None);
        assert_eq!(doc.elements, vec![DocElement::Markdown("x".to_string())]);
    }

    #[test]
    fn test_code_with_caption() {
        let source = r#"
#[code("A helper")]
#[inline]
fn helper() -> u32 {
    #[exclude]
    let secret = 1;
    2
}
"#;
        let doc = document(source, None);
        assert_eq!(
            doc.elements,
            vec![
                DocElement::Markdown("A helper".to_string()),
                DocElement::Code("#[inline]\nfn helper() -> u32 {\n    2\n}".to_string()),
            ]
        );
    }

    #[test]
    fn test_code_block_statements() {
        let source = r#"
fn main() {
    #[code::block("Setup")]
    {
        let a = 1;
        // the answer
        let b = vec![
            a,
        ];
    }
}
"#;
        let doc = document(source, None);
        assert_eq!(
            doc.elements,
            vec![
                DocElement::Markdown("Setup".to_string()),
                DocElement::Code(
                    "let a = 1;\n// the answer\nlet b = vec![\n    a,\n];".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_media_elements() {
        let source = r#"
fn main() {
    #[media::image]
    "image.png";
    #[media::video]
    "video.mp4";
}
"#;
        let doc = document(source, None);
        assert_eq!(doc.media(), vec!["image.png", "video.mp4"]);
    }

    #[test]
    fn test_link_after_application() {
        let source = r#"
fn main() {
    #[code]
    let before = 0;
    #[application]
    {
        #[code]
        let first = 1;
    }
    #[application]
    {
        #[code::block("Second")]
        {
            let second = 2;
        }
    }
}
"#;
        let link = |i: usize| format!("https://example.com/Demo{:03}.rs", i);
        let doc = document(source, Some(&link));
        assert_eq!(
            doc.elements,
            vec![
                DocElement::Code("let before = 0;".to_string()),
                DocElement::Code("let first = 1;".to_string()),
                DocElement::Markdown(
                    "[Link to the full example](https://example.com/Demo000.rs)".to_string()
                ),
                DocElement::Markdown("Second".to_string()),
                DocElement::Code("let second = 2;".to_string()),
                DocElement::Markdown(
                    "[Link to the full example](https://example.com/Demo001.rs)".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_no_link_without_factory() {
        let source = "fn main() {\n    #[application]\n    {\n        #[code]\n        let a = 1;\n    }\n}\n";
        let doc = document(source, None);
        assert_eq!(doc.elements, vec![DocElement::Code("let a = 1;".to_string())]);
    }

    #[test]
    fn test_excluded_field_takes_its_comma() {
        let source = r#"
#[code]
struct Point {
    x: f64,
    #[exclude]
    y: f64,
}
"#;
        let doc = document(source, None);
        assert_eq!(
            doc.elements,
            vec![DocElement::Code("struct Point {\n    x: f64,\n}".to_string())]
        );
    }

    #[test]
    fn test_excluded_match_arm() {
        let source = r#"
fn main() {
    #[code]
    match 1 {
        #[exclude]
        0 => zero(),
        _ => other(),
    }
}
"#;
        let doc = document(source, None);
        assert_eq!(
            doc.elements,
            vec![DocElement::Code("match 1 {\n    _ => other(),\n}".to_string())]
        );
    }

    #[test]
    fn test_comment_after_annotation_is_kept() {
        let source = r#"
fn main() {
    #[code]
    // explains x
    let x = 1;
}
"#;
        let doc = document(source, None);
        assert_eq!(
            doc.elements,
            vec![DocElement::Code("// explains x\nlet x = 1;".to_string())]
        );
    }

    #[test]
    fn test_excluded_content_not_in_document() {
        let source = r#"
fn main() {
    #[application]
    {
        #[text]
        "visible";
        #[exclude]
        {
            #[text]
            "hidden";
        }
    }
}
"#;
        let doc = document(source, None);
        assert_eq!(doc.elements, vec![DocElement::Markdown("visible".to_string())]);
    }
}
