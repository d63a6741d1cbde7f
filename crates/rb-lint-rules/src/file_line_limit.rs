//! Rule limiting the number of lines in a Ruby file.
//!
//! # Configuration
//!
//! - `max_lines`: maximum number of lines allowed (default: 1180)

use rb_lint_core::{FileContext, Rule, RuleConfig, Severity, SourceFile, Violation};

/// Rule code for file-line-limit.
pub const CODE: &str = "RBL010";

/// Rule name for file-line-limit.
pub const NAME: &str = "file-line-limit";

/// Line limit used when no `max_lines` option is configured.
pub const DEFAULT_MAX_LINES: usize = 1180;

/// Flags files longer than a configured number of lines.
#[derive(Debug, Clone)]
pub struct FileLineLimit {
    /// Maximum number of lines allowed.
    pub max_lines: usize,
}

impl Default for FileLineLimit {
    fn default() -> Self {
        Self::new()
    }
}

impl FileLineLimit {
    /// Creates a new rule with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    /// Creates a rule from its `[rules.file-line-limit]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let max = config.map_or(DEFAULT_MAX_LINES as i64, |c| {
            c.get_int("max_lines", DEFAULT_MAX_LINES as i64)
        });
        Self::new().max_lines(usize::try_from(max).unwrap_or(DEFAULT_MAX_LINES))
    }

    /// Sets the maximum number of lines.
    #[must_use]
    pub fn max_lines(mut self, max: usize) -> Self {
        self.max_lines = max;
        self
    }
}

impl Rule for FileLineLimit {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the number of lines in a file"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, _file: &SourceFile) -> Vec<Violation> {
        if ctx.line_count() <= self.max_lines {
            return Vec::new();
        }
        vec![Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            ctx.location(0, 0),
            format!(
                "This file contains more than the limit of {} lines of code.",
                self.max_lines
            ),
        )]
    }
}
