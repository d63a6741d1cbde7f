//! Finds where a constant reference is defined in the current file.

use super::namespace::{context_path, NamespacePath};
use rb_lint_core::syntax::{NodeId, NodeKind, SyntaxTree};

/// A declaration or assignment that may define a referenced name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDefinition {
    /// The defining node.
    pub node: NodeId,
    /// Path of the scope containing the definition.
    pub context: NamespacePath,
    /// The short name it defines.
    pub name: String,
}

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Fully qualified path of the reference.
    Resolved(NamespacePath),
    /// No definition in this file could be proven.
    Unresolved,
}

/// Lists every definition of `name` in pre-order.
///
/// A namespace declaration qualifies when its leading header segment is
/// `name`; an assignment qualifies when it assigns `name`.
pub fn candidates<'t>(
    tree: &'t SyntaxTree,
    name: &'t str,
) -> impl Iterator<Item = CandidateDefinition> + 't {
    tree.preorder().filter_map(move |id| {
        let defines = match tree.kind(id) {
            NodeKind::NamespaceDecl(decl) => decl.segments.first().is_some_and(|s| s == name),
            NodeKind::ConstAssign { name: assigned } => assigned == name,
            NodeKind::ConstRef(_) | NodeKind::Other => false,
        };
        defines.then(|| CandidateDefinition {
            node: id,
            context: context_path(tree, id),
            name: name.to_string(),
        })
    })
}

/// How well a candidate's scope fits the reference's scope.
///
/// Definitions in an enclosing scope rank by nesting depth. Definitions
/// accepted only because the reference sits at the root rank lowest.
fn rank(definition: &NamespacePath, reference: &NamespacePath) -> Option<(u8, usize)> {
    if reference.starts_with(definition) {
        Some((1, definition.len()))
    } else if reference.is_root() {
        Some((0, 0))
    } else {
        None
    }
}

/// Resolves a reference given its segments (`["A", "B"]` for `A::B`) and
/// the path of the scope it appears in.
///
/// Only the leading segment is looked up; the trailing segments are
/// appended to the resolved prefix unchanged. Among accepted candidates the
/// one in the nearest enclosing scope wins, then the first in pre-order.
#[must_use]
pub fn locate(tree: &SyntaxTree, reference: &[String], context: &NamespacePath) -> Resolution {
    let Some(leading) = reference.first() else {
        return Resolution::Unresolved;
    };

    let mut best: Option<((u8, usize), CandidateDefinition)> = None;
    for candidate in candidates(tree, leading) {
        let Some(score) = rank(&candidate.context, context) else {
            continue;
        };
        if best.as_ref().map_or(true, |(top, _)| score > *top) {
            best = Some((score, candidate));
        }
    }

    best.map_or(Resolution::Unresolved, |(_, found)| {
        Resolution::Resolved(found.context.join(reference))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_lint_core::syntax::SourceFile;

    fn segments(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn resolve(source: &str, reference: &[&str], context: &[&str]) -> Resolution {
        let file = SourceFile::parse(source).unwrap();
        locate(
            file.syntax(),
            &segments(reference),
            &NamespacePath::from(segments(context)),
        )
    }

    fn resolved(names: &[&str]) -> Resolution {
        Resolution::Resolved(NamespacePath::from(segments(names)))
    }

    #[test]
    fn lists_declarations_and_assignments() {
        let source = "\
module A
  B = 1
  class B
  end
end
class B::Nested
end
";
        let file = SourceFile::parse(source).unwrap();
        let found: Vec<_> = candidates(file.syntax(), "B")
            .map(|c| (c.context.to_string(), c.name))
            .collect();
        assert_eq!(
            found,
            vec![
                ("::A".to_string(), "B".to_string()),
                ("::A".to_string(), "B".to_string()),
                (String::new(), "B".to_string()),
            ]
        );
    }

    #[test]
    fn resolves_in_enclosing_scope() {
        let source = "\
module Outer
  module Inner
    class TargetClass
    end
  end
end
";
        assert_eq!(
            resolve(source, &["TargetClass"], &["Outer", "Inner"]),
            resolved(&["Outer", "Inner", "TargetClass"])
        );
    }

    #[test]
    fn resolves_from_parent_scope() {
        let source = "\
module Parent
  PARENT_CONSTANT = 'value'

  module Child
  end
end
";
        assert_eq!(
            resolve(source, &["PARENT_CONSTANT"], &["Parent", "Child"]),
            resolved(&["Parent", "PARENT_CONSTANT"])
        );
    }

    #[test]
    fn sibling_scopes_are_not_visible() {
        let source = "\
module Left
  HIDDEN = 1
end
module Right
end
";
        assert_eq!(resolve(source, &["HIDDEN"], &["Right"]), Resolution::Unresolved);
    }

    #[test]
    fn root_references_fall_back_to_any_scope() {
        let source = "\
module Left
  SHARED = 1
end
";
        assert_eq!(
            resolve(source, &["SHARED"], &[]),
            resolved(&["Left", "SHARED"])
        );
    }

    #[test]
    fn nearest_scope_beats_earlier_outer_definition() {
        let source = "\
module A
  class B
  end

  module C
    class B
    end
  end
end
";
        assert_eq!(resolve(source, &["B"], &["A", "C"]), resolved(&["A", "C", "B"]));
        assert_eq!(resolve(source, &["B"], &["A"]), resolved(&["A", "B"]));
    }

    #[test]
    fn enclosing_definition_beats_root_fallback() {
        let source = "\
module Other
  class Widget
  end
end

class Widget
end
";
        assert_eq!(resolve(source, &["Widget"], &[]), resolved(&["Widget"]));
    }

    #[test]
    fn trailing_segments_are_preserved() {
        let source = "\
module Outer
  module MyModule
  end
end
";
        assert_eq!(
            resolve(source, &["MyModule", "CONSTANT"], &["Outer"]),
            resolved(&["Outer", "MyModule", "CONSTANT"])
        );
    }

    #[test]
    fn compound_headers_match_on_leading_segment() {
        let source = "class Parent::Child\nend\n";
        assert_eq!(
            resolve(source, &["Parent", "Child"], &[]),
            resolved(&["Parent", "Child"])
        );
        assert_eq!(resolve(source, &["Child"], &[]), Resolution::Unresolved);
    }

    #[test]
    fn unknown_names_are_unresolved() {
        assert_eq!(
            resolve("module A\nend\n", &["UnknownClass"], &["A"]),
            Resolution::Unresolved
        );
        assert_eq!(resolve("", &[], &[]), Resolution::Unresolved);
    }
}
