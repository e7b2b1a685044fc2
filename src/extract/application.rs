// Application synthesizer
//
// Collects every application-tagged node of the classified tree, exclusions
// included, together with the file's imports.

use crate::extract::classify::Role;
use crate::extract::views::program_view;
use crate::extract::vocabulary::Vocabulary;
use crate::parser::{block_expression, is_import, SyntaxNode, SyntaxTree};
use crate::text::trim_indent;
use serde::Serialize;
use std::rc::Rc;

/// Imports and body of one synthesized program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppModel {
    pub imports: Vec<String>,
    pub body: String,
}

/// Collect one model per application node, in source order
pub fn collect_applications(tree: &SyntaxTree, vocabulary: &Vocabulary) -> Vec<AppModel> {
    let mut models = Vec::new();
    find_applications(tree.root(), &mut models);
    if models.is_empty() {
        return models;
    }

    let imports = file_imports(tree, vocabulary);
    for model in &mut models {
        model.imports = imports.clone();
    }
    models
}

fn find_applications(node: &Rc<SyntaxNode>, models: &mut Vec<AppModel>) {
    if !node.is_annotated() {
        return;
    }
    if let Some(Role::Application) = node.role() {
        models.push(AppModel {
            imports: Vec::new(),
            body: application_body(node),
        });
    }
    for child in node.children() {
        find_applications(child, models);
    }
}

/// Program text of an application node: a block loses its braces
fn application_body(node: &Rc<SyntaxNode>) -> String {
    let Some(view) = program_view(node) else {
        return String::new();
    };
    match block_expression(&view) {
        Some(block) => {
            let source = block.to_source();
            let inner = source
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .unwrap_or(&source);
            trim_indent(inner)
        }
        None => view.to_source(),
    }
}

/// Top-level `use` declarations, minus those of the vocabulary
fn file_imports(tree: &SyntaxTree, vocabulary: &Vocabulary) -> Vec<String> {
    tree.root()
        .children()
        .filter(|node| is_import(node))
        .filter_map(program_view)
        .map(|node| node.to_source())
        .filter(|text| !vocabulary.references_namespace(text))
        .collect()
}
