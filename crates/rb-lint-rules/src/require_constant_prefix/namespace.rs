//! Namespace paths and the lexical scope of syntax nodes.

use rb_lint_core::syntax::{NodeId, SyntaxTree};
use std::fmt;

/// Root-relative sequence of namespace segments. Empty means the root scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NamespacePath(Vec<String>);

impl NamespacePath {
    /// The root scope.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the root scope.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `prefix` is a prefix of (or equal to) this path.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns a new path with `segments` appended.
    #[must_use]
    pub fn join(&self, segments: &[String]) -> Self {
        let mut joined = self.0.clone();
        joined.extend_from_slice(segments);
        Self(joined)
    }

    /// Renders the path fully qualified, e.g. `::Outer::Inner` for `"::"`.
    #[must_use]
    pub fn render(&self, separator: &str) -> String {
        self.0
            .iter()
            .fold(String::new(), |mut out, segment| {
                out.push_str(separator);
                out.push_str(segment);
                out
            })
    }
}

impl From<Vec<String>> for NamespacePath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render("::"))
    }
}

/// Full path of the namespace declared by `decl`.
///
/// Every enclosing declaration contributes its own (possibly compound)
/// header segments. Methods, blocks and bodies in between contribute
/// nothing. Returns the root path if `decl` is not a declaration.
#[must_use]
pub fn declaration_path(tree: &SyntaxTree, decl: NodeId) -> NamespacePath {
    let mut reversed: Vec<&[String]> = Vec::new();
    for id in std::iter::once(decl).chain(tree.ancestors(decl)) {
        if let Some(ns) = tree.namespace(id) {
            reversed.push(&ns.segments);
        }
    }
    NamespacePath(reversed.into_iter().rev().flatten().cloned().collect())
}

/// Path of the scope lexically enclosing `node`: the nearest ancestor
/// declaration's path, or the root.
#[must_use]
pub fn context_path(tree: &SyntaxTree, node: NodeId) -> NamespacePath {
    tree.ancestors(node)
        .find(|&id| tree.namespace(id).is_some())
        .map_or_else(NamespacePath::root, |decl| declaration_path(tree, decl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_lint_core::syntax::SourceFile;

    fn path(segments: &[&str]) -> NamespacePath {
        NamespacePath::from(segments.iter().map(|s| (*s).to_string()).collect::<Vec<_>>())
    }

    fn declarations(source: &str) -> Vec<String> {
        let file = SourceFile::parse(source).unwrap();
        let tree = file.syntax();
        tree.preorder()
            .filter(|&id| tree.namespace(id).is_some())
            .map(|id| declaration_path(tree, id).to_string())
            .collect()
    }

    #[test]
    fn renders_with_separator() {
        assert_eq!(path(&["Outer", "Inner"]).render("::"), "::Outer::Inner");
        assert_eq!(path(&["A"]).render("."), ".A");
        assert_eq!(NamespacePath::root().render("::"), "");
    }

    #[test]
    fn prefix_checks() {
        let outer = path(&["A"]);
        let inner = path(&["A", "C"]);
        assert!(inner.starts_with(&outer));
        assert!(inner.starts_with(&inner));
        assert!(!outer.starts_with(&inner));
        assert!(inner.starts_with(&NamespacePath::root()));
        assert!(!path(&["AB"]).starts_with(&path(&["A"])));
    }

    #[test]
    fn nested_declarations_accumulate_segments() {
        let source = "\
module Outer
  module Inner
    class Target
    end
  end

  class Deep::Compound
  end
end
";
        assert_eq!(
            declarations(source),
            vec!["::Outer", "::Outer::Inner", "::Outer::Inner::Target", "::Outer::Deep::Compound"]
        );
    }

    #[test]
    fn blocks_and_methods_do_not_contribute() {
        let source = "\
module Outer
  def self.build
    Class.new do
      CONFIG = 1
    end
  end

  included do
    class Hidden
    end
  end
end
";
        assert_eq!(declarations(source), vec!["::Outer", "::Outer::Hidden"]);

        let file = SourceFile::parse(source).unwrap();
        let tree = file.syntax();
        let assign = tree
            .preorder()
            .find(|&id| matches!(tree.kind(id), rb_lint_core::syntax::NodeKind::ConstAssign { .. }))
            .unwrap();
        assert_eq!(context_path(tree, assign), path(&["Outer"]));
    }

    #[test]
    fn top_level_nodes_have_root_context() {
        let file = SourceFile::parse("VALUE = 1\n").unwrap();
        let tree = file.syntax();
        let assign = tree.children(tree.root())[0];
        assert!(context_path(tree, assign).is_root());
    }
}
