//! Rule requiring logging inside data migration loops.
//!
//! # Rationale
//!
//! Data migrations that iterate over large tables run for a long time. A
//! loop without any `logger` call gives no sign of progress or of where it
//! stopped.
//!
//! # Configuration
//!
//! - `paths`: glob patterns of files treated as data migrations
//!   (default: `["**/db/data/**", "**/db/data_migrations/**"]`)

use rb_lint_core::syntax::pattern::{descendants, node_text, CallPattern, CallView, Expect};
use rb_lint_core::{FileContext, Rule, RuleConfig, Severity, SourceFile, Violation};
use tree_sitter::Node;

/// Rule code for data-migration-logging.
pub const CODE: &str = "RBL012";

/// Rule name for data-migration-logging.
pub const NAME: &str = "data-migration-logging";

/// Paths checked when no `paths` option is configured.
pub const DEFAULT_PATHS: &[&str] = &["**/db/data/**", "**/db/data_migrations/**"];

const MESSAGE: &str = "Long running data migrations blocks require logging";

/// Requires `in_batches`/`each` blocks in data migrations to log.
#[derive(Debug, Clone)]
pub struct DataMigrationLogging {
    paths: Vec<glob::Pattern>,
}

impl Default for DataMigrationLogging {
    fn default() -> Self {
        Self::new()
    }
}

impl DataMigrationLogging {
    /// Creates a new rule checking [`DEFAULT_PATHS`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_paths(DEFAULT_PATHS)
    }

    /// Creates a rule checking files matching `patterns`.
    ///
    /// Invalid patterns are skipped with a warning.
    #[must_use]
    pub fn with_paths<S: AsRef<str>>(patterns: &[S]) -> Self {
        let paths = patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p.as_ref()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = p.as_ref(), error = %e, "Ignoring invalid path pattern");
                    None
                }
            })
            .collect();
        Self { paths }
    }

    /// Creates a rule from its `[rules.data-migration-logging]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        config
            .and_then(|c| c.get_str_array("paths"))
            .map_or_else(Self::new, |paths| Self::with_paths(paths.as_slice()))
    }

    fn applies_to(&self, ctx: &FileContext) -> bool {
        let path = ctx.relative_path.to_string_lossy().replace('\\', "/");
        self.paths.iter().any(|p| p.matches(&path))
    }
}

fn is_logger(node: Node<'_>, source: &str) -> bool {
    match node.kind() {
        "identifier" => node_text(node, source) == "logger",
        "call" => CallView::new(node).is_some_and(|c| c.method(source) == "logger"),
        _ => false,
    }
}

impl Rule for DataMigrationLogging {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires logging inside in_batches/each blocks of data migrations"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        if !self.applies_to(ctx) {
            return Vec::new();
        }
        let pattern = CallPattern::methods(&["in_batches", "each"]).block(Expect::Present);

        descendants(file.root())
            .filter_map(|node| pattern.match_call(node, ctx.content))
            .filter(|call| {
                call.block()
                    .is_some_and(|block| !descendants(block).any(|n| is_logger(n, ctx.content)))
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
