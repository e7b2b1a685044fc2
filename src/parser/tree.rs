// Persistent syntax tree
//
// The tree keeps every byte of the parsed source: a node is an ordered list of
// pieces (verbatim text, child nodes, or an omitted marker left by a rewrite).
// Nodes are never mutated. Rewrites build new nodes and share every sub-tree
// they did not touch.

use crate::extract::{Marker, Role};
use crate::text::strip_indent;
use std::rc::Rc;

/// An outer attribute (`#[...]`) attached to the node that follows it
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Path segments, e.g. `["code", "block"]`
    pub path: Vec<String>,
    /// Literal arguments in declaration order
    pub args: Vec<AnnotationArg>,
    /// The attribute as written, `#[` and `]` included
    pub source: String,
    /// Whitespace and comments between the attribute and what follows it
    pub trailing: String,
    /// 1-based line of the attribute
    pub line: usize,
    /// Vocabulary marker, set by the classifier
    pub marker: Option<Marker>,
}

impl Annotation {
    /// Dotted name, e.g. `code.block`
    pub fn name(&self) -> String {
        self.path.join(".")
    }
}

/// One argument of an annotation
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationArg {
    /// A string literal, already unescaped
    Str(String),
    /// Anything else, kept as written
    Expr { kind: String, text: String },
}

/// A slot in a node's content
#[derive(Debug, Clone)]
pub enum Piece {
    Text(Rc<str>),
    Node(Rc<SyntaxNode>),
    /// A sub-tree removed by a rewrite
    Omitted,
}

/// An immutable syntax tree node
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    kind: &'static str,
    line: usize,
    column: usize,
    annotations: Vec<Annotation>,
    role: Option<Role>,
    pieces: Vec<Piece>,
    annotated: bool,
}

impl SyntaxNode {
    /// Create a node from its pieces
    pub fn new(kind: &'static str, line: usize, column: usize, pieces: Vec<Piece>) -> Self {
        let annotated = pieces_annotated(&pieces);
        Self {
            kind,
            line,
            column,
            annotations: Vec::new(),
            role: None,
            pieces,
            annotated,
        }
    }

    /// Copy of this node carrying `annotations`
    pub fn with_annotations(&self, annotations: Vec<Annotation>) -> Self {
        self.rebuild(annotations, self.role.clone(), self.pieces.clone())
    }

    /// Copy of this node with new pieces
    pub fn with_pieces(&self, pieces: Vec<Piece>) -> Self {
        self.rebuild(self.annotations.clone(), self.role.clone(), pieces)
    }

    /// Copy of this node with every part replaced except kind and position
    pub fn rebuild(
        &self,
        annotations: Vec<Annotation>,
        role: Option<Role>,
        pieces: Vec<Piece>,
    ) -> Self {
        let annotated = !annotations.is_empty() || pieces_annotated(&pieces);
        Self {
            kind: self.kind,
            line: self.line,
            column: self.column,
            annotations,
            role,
            pieces,
            annotated,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// 1-based line where the node (not its attributes) starts
    pub fn line(&self) -> usize {
        self.line
    }

    /// 0-based column where the node starts
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Whether this node or any descendant carries an annotation
    pub fn is_annotated(&self) -> bool {
        self.annotated
    }

    /// Child nodes in source order
    pub fn children(&self) -> impl Iterator<Item = &Rc<SyntaxNode>> {
        self.pieces.iter().filter_map(|p| match p {
            Piece::Node(n) => Some(n),
            _ => None,
        })
    }

    /// Serialize into fragments, retained annotations first
    pub fn write(&self) -> Snippet {
        let mut snippet = Snippet::default();
        self.write_into(&mut snippet);
        snippet
    }

    fn write_into(&self, out: &mut Snippet) {
        for ann in &self.annotations {
            out.push_text(&ann.source);
            out.push_text(&ann.trailing);
        }
        for piece in &self.pieces {
            match piece {
                Piece::Text(t) => out.push_text(t),
                Piece::Node(n) => n.write_into(out),
                Piece::Omitted => out.fragments.push(Fragment::Omitted),
            }
        }
    }

    /// Source text of the node, re-indented as if it started at column 0
    pub fn to_source(&self) -> String {
        self.write().to_text(self.column)
    }

    /// Source text of the node exactly as written
    pub fn raw_text(&self) -> String {
        self.write().to_text(0)
    }
}

fn pieces_annotated(pieces: &[Piece]) -> bool {
    pieces.iter().any(|p| matches!(p, Piece::Node(n) if n.annotated))
}

/// What a rewrite does with one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Keep the node and rewrite its children
    Keep,
    /// Drop vocabulary annotations and the role, then rewrite the children
    Strip,
    /// Replace the whole sub-tree with an omitted marker
    Omit,
}

/// Rewrite a sub-tree. Returns `None` when the node itself is omitted.
///
/// Sub-trees without annotations are returned as-is (same `Rc`).
pub fn rewrite<F>(node: &Rc<SyntaxNode>, decide: &F) -> Option<Rc<SyntaxNode>>
where
    F: Fn(&SyntaxNode) -> Edit,
{
    if !node.annotated {
        return Some(Rc::clone(node));
    }

    let edit = decide(node);
    if edit == Edit::Omit {
        return None;
    }

    let mut changed = false;
    // An omitted list element takes its separating comma with it
    let mut drop_separator = false;
    let mut pieces = Vec::with_capacity(node.pieces.len());
    for piece in &node.pieces {
        match piece {
            Piece::Node(child) => {
                drop_separator = false;
                match rewrite(child, decide) {
                    Some(next) => {
                        changed |= !Rc::ptr_eq(&next, child);
                        pieces.push(Piece::Node(next));
                    }
                    None => {
                        changed = true;
                        drop_separator = true;
                        pieces.push(Piece::Omitted);
                    }
                }
            }
            Piece::Text(text) if drop_separator => {
                let rest = text.trim_start();
                match rest.strip_prefix(',') {
                    Some(after) => {
                        let before = &text[..text.len() - rest.len()];
                        pieces.push(Piece::Text(Rc::from(format!("{}{}", before, after))));
                        drop_separator = false;
                    }
                    None => {
                        drop_separator = rest.is_empty();
                        pieces.push(piece.clone());
                    }
                }
            }
            other => pieces.push(other.clone()),
        }
    }

    match edit {
        Edit::Strip => {
            let retained = node
                .annotations
                .iter()
                .filter(|a| a.marker.is_none())
                .cloned()
                .collect();
            // Comments after a stripped annotation stay in front of the node
            let comments: String = node
                .annotations
                .iter()
                .filter(|a| a.marker.is_some() && !a.trailing.trim().is_empty())
                .map(|a| a.trailing.trim_start())
                .collect();
            if !comments.is_empty() {
                pieces.insert(0, Piece::Text(Rc::from(comments)));
            }
            Some(Rc::new(node.rebuild(retained, None, pieces)))
        }
        Edit::Keep if changed => Some(Rc::new(node.with_pieces(pieces))),
        _ => Some(Rc::clone(node)),
    }
}

/// The parse of one source file
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    root: Rc<SyntaxNode>,
}

impl SyntaxTree {
    pub fn new(root: Rc<SyntaxNode>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Rc<SyntaxNode> {
        &self.root
    }

    /// Rewrite the whole tree into a new one
    pub fn rewrite<F>(&self, decide: &F) -> SyntaxTree
    where
        F: Fn(&SyntaxNode) -> Edit,
    {
        let root = rewrite(&self.root, decide)
            .unwrap_or_else(|| Rc::new(self.root.with_pieces(vec![Piece::Omitted])));
        SyntaxTree { root }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Fragment {
    Text(String),
    Omitted,
}

/// Serialized node content, before omitted markers are resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snippet {
    fragments: Vec<Fragment>,
}

impl Snippet {
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.fragments.last_mut() {
            Some(Fragment::Text(last)) => last.push_str(text),
            _ => self.fragments.push(Fragment::Text(text.to_string())),
        }
    }

    /// Whether any sub-tree was omitted
    pub fn has_omissions(&self) -> bool {
        self.fragments.contains(&Fragment::Omitted)
    }

    /// Join into text.
    ///
    /// A line that held an omitted sub-tree and is blank without it is dropped,
    /// together with the blank lines right above it. Lines after the first
    /// lose up to `column` characters of indentation.
    pub fn to_text(&self, column: usize) -> String {
        let mut lines: Vec<(String, bool)> = vec![(String::new(), false)];
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => {
                    let mut parts = text.split('\n');
                    if let Some(first) = parts.next() {
                        if let Some(current) = lines.last_mut() {
                            current.0.push_str(first);
                        }
                    }
                    for part in parts {
                        lines.push((part.to_string(), false));
                    }
                }
                Fragment::Omitted => {
                    if let Some(current) = lines.last_mut() {
                        current.1 = true;
                    }
                }
            }
        }

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        for (index, (line, omitted)) in lines.into_iter().enumerate() {
            let line = if index == 0 {
                line
            } else {
                strip_indent(&line, column).to_string()
            };
            if !omitted {
                out.push(line);
            } else if line.trim().is_empty() {
                while out.len() > 1 && out.last().is_some_and(|l| l.trim().is_empty()) {
                    out.pop();
                }
            } else {
                out.push(line.trim_end().to_string());
            }
        }
        out.join("\n")
    }
}
