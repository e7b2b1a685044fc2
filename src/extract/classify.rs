// Annotation classifier
//
// Tags every node carrying a vocabulary annotation with its role. Only the
// first vocabulary annotation of a node decides the role; the others are
// still marked so that rewrites strip them.

use crate::error::{Error, Result};
use crate::extract::vocabulary::{Marker, Vocabulary};
use crate::parser::{
    block_expression, is_expression, string_value, Annotation, AnnotationArg, Piece, SyntaxNode,
    SyntaxTree,
};
use std::rc::Rc;

/// Semantic role of an annotated node
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    /// Narrative markdown
    Text(String),
    /// A code sample with an optional caption
    Code { caption: Option<String> },
    /// The statements of a block as one code sample
    CodeBlock { caption: String },
    Image(String),
    Video(String),
    /// Body of a synthesized program
    Application,
    /// Hidden from the document view
    Exclude,
}

/// Assigns roles to annotated nodes
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    vocabulary: Vocabulary,
}

impl Classifier {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Classify a whole tree, returning a new tree with roles set
    pub fn classify(&self, tree: &SyntaxTree) -> Result<SyntaxTree> {
        Ok(SyntaxTree::new(self.classify_node(tree.root())?))
    }

    fn classify_node(&self, node: &Rc<SyntaxNode>) -> Result<Rc<SyntaxNode>> {
        if !node.is_annotated() {
            return Ok(Rc::clone(node));
        }

        let mut pieces = Vec::with_capacity(node.pieces().len());
        for piece in node.pieces() {
            pieces.push(match piece {
                Piece::Node(child) => Piece::Node(self.classify_node(child)?),
                other => other.clone(),
            });
        }

        let annotations: Vec<Annotation> = node
            .annotations()
            .iter()
            .map(|ann| Annotation {
                marker: self.vocabulary.marker(&ann.path),
                ..ann.clone()
            })
            .collect();

        let role = match annotations.iter().find(|a| a.marker.is_some()) {
            Some(first) => match first.marker {
                Some(marker) => Some(role_for(marker, first, node)?),
                None => None,
            },
            None => None,
        };

        Ok(Rc::new(node.rebuild(annotations, role, pieces)))
    }
}

fn role_for(marker: Marker, ann: &Annotation, node: &Rc<SyntaxNode>) -> Result<Role> {
    let role = match marker {
        Marker::Text => Role::Text(literal(marker, ann, node)?),
        Marker::MediaImage => Role::Image(literal(marker, ann, node)?.trim().to_string()),
        Marker::MediaVideo => Role::Video(literal(marker, ann, node)?.trim().to_string()),
        Marker::Code => Role::Code {
            caption: caption(marker, ann)?,
        },
        Marker::CodeBlock => {
            if block_expression(node).is_none() {
                return Err(Error::annotation(
                    marker.name(),
                    node.kind(),
                    ann.line,
                    "only a block expression can be annotated",
                ));
            }
            match caption(marker, ann)? {
                Some(caption) => Role::CodeBlock { caption },
                None => {
                    return Err(Error::annotation(
                        marker.name(),
                        node.kind(),
                        ann.line,
                        "a caption argument is required",
                    ))
                }
            }
        }
        Marker::Application => {
            if !is_expression(node) {
                return Err(Error::annotation(
                    marker.name(),
                    node.kind(),
                    ann.line,
                    "only an expression or a block can be an application",
                ));
            }
            Role::Application
        }
        Marker::Exclude => Role::Exclude,
    };
    Ok(role)
}

/// String value of a node that must evaluate to a literal
fn literal(marker: Marker, ann: &Annotation, node: &SyntaxNode) -> Result<String> {
    string_value(node).ok_or_else(|| Error::unsupported_argument(marker.name(), node.kind(), ann.line))
}

/// Optional single string argument of an annotation
fn caption(marker: Marker, ann: &Annotation) -> Result<Option<String>> {
    match ann.args.as_slice() {
        [] => Ok(None),
        [AnnotationArg::Str(value)] => Ok(Some(value.clone())),
        [AnnotationArg::Expr { kind, .. }] => {
            Err(Error::unsupported_argument(marker.name(), kind.as_str(), ann.line))
        }
        args => Err(Error::annotation(
            marker.name(),
            ann.source.as_str(),
            ann.line,
            format!("expected at most one argument, found {}", args.len()),
        )),
    }
}
