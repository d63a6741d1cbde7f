//! Rule traits for defining lint rules.

use crate::context::FileContext;
use crate::syntax::SourceFile;
use crate::types::{Severity, Violation};

/// A per-file lint rule over the parsed Ruby syntax tree.
///
/// Rules receive the parsed file and may either walk the concrete
/// tree-sitter tree (see [`crate::syntax::pattern`]) or the lowered
/// constant/namespace arena ([`crate::syntax::SyntaxTree`]).
///
/// # Example
///
/// ```ignore
/// use rb_lint_core::{FileContext, Rule, Severity, SourceFile, Violation};
/// use rb_lint_core::syntax::pattern::{descendants, CallPattern};
///
/// pub struct NoSleep;
///
/// impl Rule for NoSleep {
///     fn name(&self) -> &'static str { "no-sleep" }
///     fn code(&self) -> &'static str { "RBL900" }
///
///     fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
///         let pattern = CallPattern::methods(&["sleep"]);
///         descendants(file.root())
///             .filter(|node| pattern.matches(*node, ctx.content))
///             .map(|node| Violation::new(
///                 self.code(),
///                 self.name(),
///                 self.default_severity(),
///                 ctx.location(node.start_byte(), node.end_byte()),
///                 "Avoid sleep",
///             ))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "require-constant-prefix").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "RBL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single file and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `file` - The parsed syntax tree of the file
    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// A lint rule over raw text of non-Ruby files (templates and the like).
///
/// The analyzer discovers files whose extension appears in
/// [`TextRule::extensions`] and hands their content over unparsed.
pub trait TextRule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns the rule code.
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// File extensions (without dot) this rule inspects.
    fn extensions(&self) -> &'static [&'static str];

    /// Checks the raw content of a file.
    fn check_text(&self, ctx: &FileContext) -> Vec<Violation>;
}

/// Type alias for boxed `TextRule` trait objects.
pub type TextRuleBox = Box<dyn TextRule>;
