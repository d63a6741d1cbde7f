//! Rule forbidding GraphQL enum values generated in a loop.
//!
//! # Rationale
//!
//! `SomeEnum.each_value { |v| value v }` hides the enum's members from
//! readers and from schema diffs. Listing each `value` keeps the schema
//! reviewable.

use rb_lint_core::syntax::pattern::{node_text, descendants, CallPattern, CallView, Expect};
use rb_lint_core::{FileContext, Rule, Severity, SourceFile, Violation};
use tree_sitter::Node;

/// Rule code for no-programmatic-enum-value.
pub const CODE: &str = "RBL009";

/// Rule name for no-programmatic-enum-value.
pub const NAME: &str = "no-programmatic-enum-value";

const MESSAGE: &str = "Do not assign graphql enums programmatically.";

const VALUE_METHODS: &[&str] = &["enum_value", "value"];

/// Forbids `each_value` blocks whose only statement defines an enum value.
#[derive(Debug, Clone, Default)]
pub struct NoProgrammaticEnumValue;

impl NoProgrammaticEnumValue {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// The single statement of a block body, if there is exactly one.
fn single_statement(block: Node<'_>) -> Option<Node<'_>> {
    let body = block.child_by_field_name("body").unwrap_or(block);
    let mut cursor = body.walk();
    let mut statements = body
        .named_children(&mut cursor)
        .filter(|n| !matches!(n.kind(), "comment" | "block_parameters"));
    let first = statements.next()?;
    statements.next().is_none().then_some(first)
}

fn defines_value(statement: Node<'_>, source: &str) -> bool {
    let name = match statement.kind() {
        "identifier" => node_text(statement, source),
        "call" => CallView::new(statement).map_or("", |c| c.method(source)),
        _ => return false,
    };
    VALUE_METHODS.iter().any(|m| *m == name)
}

impl Rule for NoProgrammaticEnumValue {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids defining GraphQL enum values inside an each_value loop"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let pattern = CallPattern::methods(&["each_value"])
            .receiver(Expect::Present)
            .block(Expect::Present)
            .args(0);

        descendants(file.root())
            .filter_map(|node| pattern.match_call(node, ctx.content))
            .filter(|call| {
                call.block()
                    .and_then(single_statement)
                    .is_some_and(|statement| defines_value(statement, ctx.content))
            })
            .map(|call| {
                let node = call.node();
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.location(node.start_byte(), node.end_byte()),
                    MESSAGE,
                )
            })
            .collect()
    }
}
