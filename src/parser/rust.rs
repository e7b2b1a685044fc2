// Rust source parser using tree-sitter
//
// Lowers the tree-sitter concrete tree into a `SyntaxTree`. Outer attributes
// are siblings of the statement or item they decorate in tree-sitter; here
// they are folded into the annotation list of that following node.

use crate::error::{Error, Result};
use crate::parser::tree::{Annotation, AnnotationArg, Piece, SyntaxNode, SyntaxTree};
use std::rc::Rc;
use tree_sitter::{Node, Parser};

/// Node kinds kept as a single verbatim text piece
const OPAQUE_KINDS: &[&str] = &[
    "string_literal",
    "raw_string_literal",
    "char_literal",
    "token_tree",
    "line_comment",
    "block_comment",
];

/// Node kinds whose own leading children are their outer attributes
const SELF_ATTRIBUTED_KINDS: &[&str] = &[
    "match_arm",
    "field_initializer",
    "shorthand_field_initializer",
];

/// Parser for annotated Rust source files
pub struct RustParser {
    parser: Parser,
}

impl RustParser {
    /// Create a new Rust parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_rust::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parser(format!("Failed to set Rust language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Parse Rust source code into a syntax tree
    pub fn parse_source(&mut self, source: &str) -> Result<SyntaxTree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parser("Failed to parse Rust source"))?;

        let root = tree.root_node();
        if root.has_error() {
            let at = first_error(root).unwrap_or(root);
            return Err(Error::Syntax {
                line: at.start_position().row + 1,
                column: at.start_position().column + 1,
            });
        }

        // The root node starts after leading trivia; keep it anyway
        let root = lower_span(root, source, 0, source.len());
        Ok(SyntaxTree::new(Rc::new(root)))
    }
}

/// Locate the first error or missing node, depth first
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error())
        .find_map(first_error)
}

fn slice<'s>(source: &'s str, start: usize, end: usize) -> &'s str {
    source.get(start..end).unwrap_or_default()
}

fn node_text<'s>(node: &Node, source: &'s str) -> &'s str {
    slice(source, node.start_byte(), node.end_byte())
}

fn text_piece(text: &str) -> Piece {
    Piece::Text(Rc::from(text))
}

/// Lower one tree-sitter node and its descendants
fn lower(node: Node, source: &str) -> SyntaxNode {
    lower_span(node, source, node.start_byte(), node.end_byte())
}

fn lower_span(node: Node, source: &str, start: usize, end: usize) -> SyntaxNode {
    let kind = node.kind();
    let mut line = node.start_position().row + 1;
    let mut column = node.start_position().column;

    if node.child_count() == 0 || OPAQUE_KINDS.contains(&kind) {
        return SyntaxNode::new(kind, line, column, vec![text_piece(slice(source, start, end))]);
    }

    let mut pieces = Vec::new();
    let mut pending: Vec<Annotation> = Vec::new();
    let mut own: Vec<Annotation> = Vec::new();
    let mut leading = SELF_ATTRIBUTED_KINDS.contains(&kind);
    let mut offset = start;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let mut gap = slice(source, offset, child.start_byte());
        offset = child.end_byte();

        if leading {
            if child.kind() == "attribute_item" {
                if let Some(previous) = own.last_mut() {
                    previous.trailing.push_str(gap);
                }
                own.push(lower_attribute(child, source));
                continue;
            }
            if let Some(previous) = own.last_mut() {
                previous.trailing.push_str(gap);
                if child.is_extra() {
                    previous.trailing.push_str(node_text(&child, source));
                    continue;
                }
                gap = "";
                line = child.start_position().row + 1;
                column = child.start_position().column;
            }
            leading = false;
        }

        if child.kind() == "attribute_item" {
            match pending.last_mut() {
                Some(previous) => previous.trailing.push_str(gap),
                None if !gap.is_empty() => pieces.push(text_piece(gap)),
                None => {}
            }
            pending.push(lower_attribute(child, source));
            continue;
        }

        if let Some(previous) = pending.last_mut() {
            previous.trailing.push_str(gap);
            if child.is_extra() {
                // Comments between an attribute and its target travel with the attribute
                previous.trailing.push_str(node_text(&child, source));
                continue;
            }
            if child.is_named() {
                let target = lower(child, source);
                let mut annotations = std::mem::take(&mut pending);
                annotations.extend_from_slice(target.annotations());
                pieces.push(Piece::Node(Rc::new(target.with_annotations(annotations))));
                continue;
            }
            flush_pending(&mut pending, &mut pieces);
        } else if !gap.is_empty() {
            pieces.push(text_piece(gap));
        }

        if child.is_named() {
            pieces.push(Piece::Node(Rc::new(lower(child, source))));
        } else {
            pieces.push(text_piece(node_text(&child, source)));
        }
    }

    flush_pending(&mut pending, &mut pieces);
    let tail = slice(source, offset, end);
    if !tail.is_empty() {
        pieces.push(text_piece(tail));
    }

    let lowered = SyntaxNode::new(kind, line, column, pieces);
    if own.is_empty() {
        lowered
    } else {
        lowered.with_annotations(own)
    }
}

/// Attributes with nothing to attach to stay in the text
fn flush_pending(pending: &mut Vec<Annotation>, pieces: &mut Vec<Piece>) {
    for ann in pending.drain(..) {
        pieces.push(text_piece(&ann.source));
        if !ann.trailing.is_empty() {
            pieces.push(text_piece(&ann.trailing));
        }
    }
}

/// Lower an `attribute_item` into an annotation
fn lower_attribute(item: Node, source: &str) -> Annotation {
    let mut path = Vec::new();
    let mut args = Vec::new();

    let mut cursor = item.walk();
    let attribute = item
        .named_children(&mut cursor)
        .find(|c| c.kind() == "attribute");

    if let Some(attribute) = attribute {
        if let Some(path_node) = attribute.named_child(0) {
            path = node_text(&path_node, source)
                .split("::")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(arguments) = attribute.child_by_field_name("arguments") {
            let mut cursor = arguments.walk();
            args = arguments
                .named_children(&mut cursor)
                .map(|arg| literal_arg(arg, source))
                .collect();
        } else if let Some(value) = attribute.child_by_field_name("value") {
            args.push(literal_arg(value, source));
        }
    }

    Annotation {
        path,
        args,
        source: node_text(&item, source).to_string(),
        trailing: String::new(),
        line: item.start_position().row + 1,
        marker: None,
    }
}

fn literal_arg(node: Node, source: &str) -> AnnotationArg {
    let text = node_text(&node, source);
    match node.kind() {
        "string_literal" | "raw_string_literal" => match decode_string_literal(text) {
            Some(value) => AnnotationArg::Str(value),
            None => AnnotationArg::Expr {
                kind: node.kind().to_string(),
                text: text.to_string(),
            },
        },
        kind => AnnotationArg::Expr {
            kind: kind.to_string(),
            text: text.to_string(),
        },
    }
}

/// Decode a Rust string literal (`"..."` or `r#"..."#`) to its value.
///
/// Returns `None` for byte and C strings and for malformed escapes.
pub fn decode_string_literal(raw: &str) -> Option<String> {
    if let Some(rest) = raw.strip_prefix('r') {
        let hashes = rest.len() - rest.trim_start_matches('#').len();
        let closing = format!("\"{}", "#".repeat(hashes));
        let body = rest[hashes..].strip_prefix('"')?.strip_suffix(closing.as_str())?;
        return Some(body.to_string());
    }

    let body = raw.strip_prefix('"')?.strip_suffix('"')?;
    unescape(body)
}

fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&hex, 16).ok()?;
                out.push(char::from(byte));
            }
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                let code = u32::from_str_radix(&hex.replace('_', ""), 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            '\n' | '\r' => {
                // Line continuation: skip the newline and leading whitespace
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            _ => return None,
        }
    }

    Some(out)
}

fn is_string_literal(node: &SyntaxNode) -> bool {
    matches!(node.kind(), "string_literal" | "raw_string_literal")
}

/// The string literal an annotated node evaluates to.
///
/// Accepts a literal, an expression statement wrapping one, or a `let`,
/// `const` or `static` whose value is one.
pub fn literal_expression(node: &SyntaxNode) -> Option<&SyntaxNode> {
    match node.kind() {
        "string_literal" | "raw_string_literal" => Some(node),
        "expression_statement" => node
            .children()
            .next()
            .map(|c| c.as_ref())
            .filter(|c| is_string_literal(c)),
        "let_declaration" | "const_item" | "static_item" => node
            .children()
            .filter(|c| c.kind() != "line_comment" && c.kind() != "block_comment")
            .last()
            .map(|c| c.as_ref())
            .filter(|c| is_string_literal(c)),
        _ => None,
    }
}

/// Decoded value of the node's string literal, if it has one
pub fn string_value(node: &SyntaxNode) -> Option<String> {
    literal_expression(node).and_then(|lit| decode_string_literal(lit.raw_text().trim()))
}

/// The block expression an annotated node stands for.
///
/// A block is either the node itself (a block as trailing expression) or the
/// expression of an expression statement.
pub fn block_expression(node: &Rc<SyntaxNode>) -> Option<Rc<SyntaxNode>> {
    match node.kind() {
        "block" => Some(Rc::clone(node)),
        "expression_statement" => node.children().next().filter(|c| c.kind() == "block").cloned(),
        _ => None,
    }
}

/// Whether a node is an expression, an expression statement or a block
pub fn is_expression(node: &SyntaxNode) -> bool {
    let kind = node.kind();
    matches!(
        kind,
        "block" | "expression_statement" | "macro_invocation" | "identifier" | "scoped_identifier"
    ) || kind.ends_with("_expression")
        || kind.ends_with("_literal")
}

/// Whether a top-level node is an import
pub fn is_import(node: &SyntaxNode) -> bool {
    node.kind() == "use_declaration"
}
