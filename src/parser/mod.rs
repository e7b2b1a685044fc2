// Parser module: annotated Rust source to persistent syntax tree

mod rust;
pub mod tree;

pub use rust::{
    block_expression, decode_string_literal, is_expression, is_import, literal_expression,
    string_value, RustParser,
};
pub use tree::{rewrite, Annotation, AnnotationArg, Edit, Piece, Snippet, SyntaxNode, SyntaxTree};
