//! Rule forbidding `record.reload`.
//!
//! # Rationale
//!
//! `reload` issues another query for a row the code already holds. Updating
//! the in-memory model keeps request paths and specs fast.

use rb_lint_core::syntax::pattern::{descendants, CallPattern, Expect};
use rb_lint_core::{FileContext, Rule, Severity, SourceFile, Violation};

/// Rule code for no-reload.
pub const CODE: &str = "RBL005";

/// Rule name for no-reload.
pub const NAME: &str = "no-reload";

const MESSAGE: &str = "Update the model in memory instead of calling .reload";

/// Forbids argument-less `.reload` calls on a receiver.
#[derive(Debug, Clone, Default)]
pub struct NoReload;

impl NoReload {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoReload {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids .reload; update the model in memory instead"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let pattern = CallPattern::methods(&["reload"])
            .receiver(Expect::Present)
            .args(0);

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
