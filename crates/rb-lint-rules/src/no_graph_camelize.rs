//! Rule forbidding the GraphQL `camelize:` option.
//!
//! # Rationale
//!
//! Field and argument names should always be camelized by the schema. An
//! explicit `camelize: false` leaks snake_case names to clients, and
//! `camelize: true` restates the default.
//!
//! # Autofix
//!
//! Removes the pair together with the separator before it, so
//! `field :a, String, camelize: false, null: true` becomes
//! `field :a, String, null: true`.

use rb_lint_core::syntax::pattern::{descendants, node_text, CallPattern};
use rb_lint_core::{
    FileContext, Replacement, Rule, Severity, SourceFile, Suggestion, Violation,
};
use tree_sitter::Node;

/// Rule code for no-graph-camelize.
pub const CODE: &str = "RBL008";

/// Rule name for no-graph-camelize.
pub const NAME: &str = "no-graph-camelize";

const MESSAGE: &str = "Do not use the camelize option.";

const OPTION: &str = "camelize";

/// Forbids `camelize:` on `field` and `argument` definitions.
#[derive(Debug, Clone, Default)]
pub struct NoGraphCamelize;

impl NoGraphCamelize {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Returns true for `camelize:`, `:camelize =>` and `"camelize" =>` keys.
fn is_camelize_key(pair: Node<'_>, source: &str) -> bool {
    pair.child_by_field_name("key").is_some_and(|key| {
        let text = node_text(key, source);
        text.trim_start_matches(':').trim_matches(|c| c == '"' || c == '\'') == OPTION
    })
}

/// Option pairs passed to a call, whether bare or inside `{ }`.
fn option_pairs<'t>(arguments: &[Node<'t>]) -> Vec<Node<'t>> {
    let mut pairs = Vec::new();
    for arg in arguments {
        match arg.kind() {
            "pair" => pairs.push(*arg),
            "hash" => {
                let mut cursor = arg.walk();
                pairs.extend(arg.named_children(&mut cursor).filter(|n| n.kind() == "pair"));
            }
            _ => {}
        }
    }
    pairs
}

/// Byte range covering the pair and the separator in front of it.
fn removal_range(pair: Node<'_>) -> (usize, usize) {
    let start = pair
        .prev_named_sibling()
        .map_or(pair.start_byte(), |left| left.end_byte());
    (start, pair.end_byte())
}

impl Rule for NoGraphCamelize {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids the camelize option on GraphQL fields and arguments"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let pattern = CallPattern::methods(&["field", "argument"]);

        descendants(file.root())
            .filter_map(|node| pattern.match_call(node, ctx.content))
            .flat_map(|call| option_pairs(&call.arguments()))
            .filter(|pair| is_camelize_key(*pair, ctx.content))
            .map(|pair| {
                let (start, end) = removal_range(pair);
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.location(pair.start_byte(), pair.end_byte()),
                    MESSAGE,
                )
                .with_suggestion(Suggestion::with_fix(
                    "Remove the camelize option",
                    Replacement::new(ctx.location(start, end), ""),
                ))
            })
            .collect()
    }
}
