//! Rule forbidding `resolve_field` in GraphQL tests.
//!
//! # Rationale
//!
//! `resolve_field` calls the resolver directly and skips the GraphQL layer,
//! so arguments, authorization and serialization go untested.
//! `resolve_raw_query` runs the query the way a client would.

use rb_lint_core::syntax::pattern::{descendants, CallPattern, Expect};
use rb_lint_core::{FileContext, Rule, Severity, SourceFile, Violation};

/// Rule code for no-resolve-field.
pub const CODE: &str = "RBL006";

/// Rule name for no-resolve-field.
pub const NAME: &str = "no-resolve-field";

const MESSAGE: &str = "`resolve_field` skips the GraphQL layer. \
                       Use `resolve_raw_query` instead to replicate real client behavior.";

/// Forbids receiverless `resolve_field(...)` calls.
#[derive(Debug, Clone, Default)]
pub struct NoResolveField;

impl NoResolveField {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoResolveField {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids resolve_field; use resolve_raw_query"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let pattern = CallPattern::methods(&["resolve_field"]).receiver(Expect::Absent);

        descendants(file.root())
            .filter(|node| pattern.matches(*node, ctx.content))
            .map(|node| {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check(source: &str) -> Vec<Violation> {
        let file = SourceFile::parse(source).unwrap();
        let ctx = FileContext::from_source(Path::new("test.rb"), source);
        NoResolveField::new().check(&ctx, &file)
    }

    #[test]
    fn flags_resolve_field() {
        let source =
            "resolve_field(field: 'full_name', object: user, args: args, context: context)\n";
        let violations = check(source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.length, source.trim_end().len());
        assert!(violations[0].message.starts_with("`resolve_field` skips the GraphQL layer. Use"));
    }

    #[test]
    fn accepts_raw_queries() {
        assert!(check("resolve_raw_query(query, user: user, variables: { id: user.gid })\n").is_empty());
        assert!(check("helper.resolve_field(:x)\n").is_empty());
    }
}
