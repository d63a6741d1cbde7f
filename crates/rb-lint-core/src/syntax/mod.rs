//! Ruby syntax adapter built on tree-sitter.
//!
//! [`SourceFile::parse`] runs the tree-sitter Ruby grammar and keeps two
//! views of the result: the concrete tree, queried by simple node-shape
//! rules through [`pattern`], and the lowered [`SyntaxTree`] arena that the
//! constant resolver walks.

mod lower;
pub mod pattern;
mod tree;

pub use tree::{ConstRef, NamespaceDecl, NodeId, NodeKind, Preorder, Span, SyntaxNode, SyntaxTree};

use tree_sitter::{Node, Parser, Tree};

/// Errors raised while parsing Ruby source.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The Ruby grammar could not be loaded into the parser.
    #[error("Failed to load Ruby grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser returned no tree.
    #[error("Parser produced no syntax tree")]
    NoTree,

    /// The source contains a syntax error.
    #[error("Syntax error at line {line}, column {column}")]
    Syntax {
        /// 1-indexed line of the first error node.
        line: usize,
        /// 1-indexed column of the first error node.
        column: usize,
    },
}

/// A parsed Ruby file.
pub struct SourceFile {
    tree: Tree,
    syntax: SyntaxTree,
}

impl SourceFile {
    /// Parses Ruby source and lowers it into the resolver arena.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] if the source does not parse cleanly.
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_ruby::LANGUAGE.into())?;
        let tree = parser.parse(content, None).ok_or(ParseError::NoTree)?;

        let root = tree.root_node();
        if root.has_error() {
            let at = first_error(root).unwrap_or(root).start_position();
            return Err(ParseError::Syntax {
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        let syntax = lower::lower(root, content);
        Ok(Self { tree, syntax })
    }

    /// Returns the root of the concrete tree (`program`).
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Returns the lowered constant/namespace arena.
    #[must_use]
    pub fn syntax(&self) -> &SyntaxTree {
        &self.syntax
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("nodes", &self.syntax.len())
            .finish_non_exhaustive()
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|child| child.has_error())
        .find_map(first_error);
    found
}
