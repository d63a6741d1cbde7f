//! Rule preferring `T::Struct` over `T::ImmutableStruct`.
//!
//! # Autofix
//!
//! Rewrites `T::ImmutableStruct` to `T::Struct`.

use rb_lint_core::syntax::pattern::{descendants, node_text};
use rb_lint_core::{
    FileContext, Replacement, Rule, Severity, SourceFile, Suggestion, Violation,
};
use tree_sitter::Node;

/// Rule code for prefer-t-struct.
pub const CODE: &str = "RBL007";

/// Rule name for prefer-t-struct.
pub const NAME: &str = "prefer-t-struct";

const MESSAGE: &str = "Prefer `T::Struct` over `T::ImmutableStruct`.";

/// Flags `T::ImmutableStruct` references.
#[derive(Debug, Clone, Default)]
pub struct PreferTStruct;

impl PreferTStruct {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_immutable_struct(node: Node<'_>, source: &str) -> bool {
    if node.kind() != "scope_resolution" {
        return false;
    }
    let scope = node
        .child_by_field_name("scope")
        .is_some_and(|s| s.kind() == "constant" && node_text(s, source) == "T");
    let name = node
        .child_by_field_name("name")
        .is_some_and(|n| node_text(n, source) == "ImmutableStruct");
    scope && name
}

impl Rule for PreferTStruct {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Prefers T::Struct over T::ImmutableStruct"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        descendants(file.root())
            .filter(|node| is_immutable_struct(*node, ctx.content))
            .map(|node| {
                let location = ctx.location(node.start_byte(), node.end_byte());
                Violation::new(CODE, NAME, self.default_severity(), location.clone(), MESSAGE)
                    .with_suggestion(Suggestion::with_fix(
                        "Replace with `T::Struct`",
                        Replacement::new(location, "T::Struct"),
                    ))
            })
            .collect()
    }
}
