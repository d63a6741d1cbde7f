//! Rule requiring constant references to be qualified from the root namespace.
//!
//! # Rationale
//!
//! Ruby resolves a bare constant through the lexical scope chain first, so
//! `Client` inside `module Billing` silently picks `Billing::Client` when
//! one exists. Writing `::Billing::Client` or `::Client` makes the intended
//! constant explicit.
//!
//! # Resolution
//!
//! For every flagged reference the rule looks for a definition in the same
//! file (a `module`/`class` declaration or a constant assignment) visible
//! from the reference's scope. When one is found the fix rewrites the
//! reference to its full path (`Client` becomes `::Billing::Client`);
//! otherwise the fix only prefixes the separator.
//!
//! # Configuration
//!
//! - `separator`: root-qualifying separator (default: `"::"`)
//! - `well_known`: names never flagged, replacing the built-in list
//! - `extra_well_known`: names added to the built-in list
//!
//! # Suppression
//!
//! - `# rb-lint: allow(require-constant-prefix) reason="..."` comment

mod locator;
mod namespace;

pub use locator::{candidates, locate, CandidateDefinition, Resolution};
pub use namespace::{context_path, declaration_path, NamespacePath};

use rb_lint_core::syntax::{NodeId, SyntaxTree};
use rb_lint_core::{
    FileContext, Location, Replacement, Rule, RuleConfig, Severity, SourceFile, Suggestion,
    Violation,
};
use std::collections::HashSet;

/// Rule code for require-constant-prefix.
pub const CODE: &str = "RBL001";

/// Rule name for require-constant-prefix.
pub const NAME: &str = "require-constant-prefix";

fn message(separator: &str) -> String {
    format!("Use `{separator}` prefix for constants to ensure resolution from root namespace.")
}

/// Core and standard library constants that never need qualification.
pub const DEFAULT_WELL_KNOWN: &[&str] = &[
    "Array", "BasicObject", "Binding", "Class", "Complex", "Data", "Dir", "Encoding",
    "Enumerator", "Exception", "FalseClass", "File", "Float", "Hash", "Integer", "IO",
    "Kernel", "MatchData", "Method", "Module", "NilClass", "Numeric", "Object", "Proc",
    "Range", "Rational", "Regexp", "String", "Struct", "Symbol", "Thread", "Time",
    "TrueClass", "UnboundMethod", "Comparable", "Enumerable", "Math", "FileTest", "Marshal",
    "ObjectSpace", "Process", "GC", "Signal", "Fiber", "Random", "SecureRandom", "Set",
    "OpenStruct", "Pathname", "URI", "JSON", "CSV", "YAML", "Zlib", "Digest", "Base64",
    "Logger", "Benchmark", "Date", "DateTime", "BigDecimal", "StringIO", "Tempfile",
    // Global constants and the Sorbet runtime namespace.
    "T", "STDOUT", "STDERR", "STDIN", "ARGV", "ENV", "RUBY_VERSION",
];

/// Requires constant references to start with the root separator.
#[derive(Debug, Clone)]
pub struct RequireConstantPrefix {
    /// Root-qualifying separator token.
    pub separator: String,
    /// Names exempt from the rule.
    pub well_known: HashSet<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for RequireConstantPrefix {
    fn default() -> Self {
        Self::new()
    }
}

impl RequireConstantPrefix {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            separator: "::".to_string(),
            well_known: DEFAULT_WELL_KNOWN.iter().map(|s| (*s).to_string()).collect(),
            severity: Severity::Warning,
        }
    }

    /// Creates a rule from its `[rules.require-constant-prefix]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let mut rule = Self::new();
        let Some(config) = config else {
            return rule;
        };
        rule.separator = config.get_str("separator", "::").to_string();
        if let Some(names) = config.get_str_array("well_known") {
            rule.well_known = names.into_iter().collect();
        }
        if let Some(extra) = config.get_str_array("extra_well_known") {
            rule.well_known.extend(extra);
        }
        rule
    }

    /// Sets the separator.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Adds names to the exempt set.
    #[must_use]
    pub fn allow<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.well_known.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns true if the reference at `id` needs no qualification.
    fn is_exempt(&self, tree: &SyntaxTree, id: NodeId) -> bool {
        let Some(reference) = tree.const_ref(id) else {
            return true;
        };
        if reference.rooted || self.well_known.contains(&reference.name) {
            return true;
        }
        // Only the leftmost segment of `A::B` is classified.
        if reference.scope.is_some() {
            return true;
        }
        tree.is_namespace_header(tree.const_chain_top(id))
    }

    fn fix_for(&self, ctx: &FileContext, tree: &SyntaxTree, id: NodeId) -> Suggestion {
        let top = tree.const_chain_top(id);
        let written = tree.const_segments(top);

        let resolved = match locate(tree, &written, &context_path(tree, id)) {
            Resolution::Resolved(path) if path.segments() != written.as_slice() => Some(path),
            Resolution::Resolved(_) | Resolution::Unresolved => None,
        };

        if let Some(path) = resolved {
            let span = tree.span(top);
            let text = path.render(&self.separator);
            Suggestion::with_fix(
                format!("Replace with `{text}`"),
                Replacement::new(ctx.location(span.start, span.end), text),
            )
        } else {
            let start = tree.span(id).start;
            Suggestion::with_fix(
                format!("Prefix with `{}`", self.separator),
                Replacement::new(ctx.location(start, start), self.separator.clone()),
            )
        }
    }

    fn violation(&self, ctx: &FileContext, tree: &SyntaxTree, id: NodeId) -> Violation {
        let span = tree.span(id);
        let location: Location = ctx.location(span.start, span.end);
        Violation::new(CODE, NAME, self.severity, location, message(&self.separator))
            .with_suggestion(self.fix_for(ctx, tree, id))
    }
}

impl Rule for RequireConstantPrefix {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires constants to be referenced from the root namespace"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let tree = file.syntax();
        tree.preorder()
            .filter(|&id| tree.const_ref(id).is_some() && !self.is_exempt(tree, id))
            .map(|id| self.violation(ctx, tree, id))
            .collect()
    }
}
