// Derived views over a classified tree
//
// Both views are pure rewrites: the classified tree is left untouched and
// every sub-tree without annotations is shared.

use crate::extract::classify::Role;
use crate::parser::{rewrite, Edit, SyntaxNode, SyntaxTree};
use std::rc::Rc;

/// The tree used for rendering: excluded sub-trees become omitted markers
pub fn document_view(tree: &SyntaxTree) -> SyntaxTree {
    tree.rewrite(&|node: &SyntaxNode| match node.role() {
        Some(Role::Exclude) => Edit::Omit,
        _ => Edit::Keep,
    })
}

/// A sub-tree as it appears in generated code.
///
/// Vocabulary annotations are stripped and narrative nodes are omitted.
/// Returns `None` when the node itself is narrative.
pub fn program_view(node: &Rc<SyntaxNode>) -> Option<Rc<SyntaxNode>> {
    rewrite(node, &|n: &SyntaxNode| match n.role() {
        Some(Role::Text(_) | Role::Image(_) | Role::Video(_)) => Edit::Omit,
        _ => Edit::Strip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::classify::Classifier;
    use crate::parser::RustParser;

    fn classified(source: &str) -> SyntaxTree {
        let tree = RustParser::new().unwrap().parse_source(source).unwrap();
        Classifier::default().classify(&tree).unwrap()
    }

    #[test]
    fn test_document_view_omits_excluded() {
        let source = "fn main() {\n    let a = 1;\n    #[exclude]\n    let hidden = 2;\n    let b = 3;\n}\n";
        let tree = classified(source);
        let view = document_view(&tree);
        let text = view.root().raw_text();
        assert!(!text.contains("hidden"));
        assert!(!text.contains("#[exclude]"));
        assert!(text.contains("let a = 1;\n    let b = 3;"));
        // The classified tree still has everything
        assert!(tree.root().raw_text().contains("let hidden = 2;"));
    }

    #[test]
    fn test_program_view_strips_vocabulary() {
        let source = r#"fn main() {
    #[text]
    "narrative";
    #[allow(unused_variables)]
    #[exclude]
    let kept = 1;
    #[code]
    let shown = 2;
}
"#;
        let tree = classified(source);
        let view = program_view(tree.root()).unwrap();
        assert_eq!(
            view.raw_text(),
            "fn main() {\n    #[allow(unused_variables)]\n    let kept = 1;\n    let shown = 2;\n}\n"
        );
    }

    #[test]
    fn test_program_view_of_narrative_node() {
        let source = "fn main() {\n    #[text]\n    \"only text\";\n}\n";
        let tree = classified(source);
        let mut text_node = None;
        for child in tree.root().children() {
            for grandchild in child.children() {
                for stmt in grandchild.children() {
                    if stmt.role().is_some() {
                        text_node = Some(Rc::clone(stmt));
                    }
                }
            }
        }
        assert!(program_view(&text_node.unwrap()).is_none());
    }
}
