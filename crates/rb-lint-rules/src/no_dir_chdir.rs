//! Rule forbidding block-form `Dir.chdir`.
//!
//! # Rationale
//!
//! The working directory is process-wide state. `Dir.chdir(path) do ... end`
//! changes it for every thread until the block returns, so concurrent code
//! such as Puma or Sidekiq workers resolves relative paths against the
//! wrong directory.

use rb_lint_core::syntax::pattern::{descendants, CallPattern, Expect};
use rb_lint_core::{FileContext, Rule, SourceFile, Violation};

/// Rule code for no-dir-chdir.
pub const CODE: &str = "RBL004";

/// Rule name for no-dir-chdir.
pub const NAME: &str = "no-dir-chdir";

const MESSAGE: &str = "Avoid using Dir.chdir due to thread safety issues";

/// Forbids `Dir.chdir(path) { ... }` and receiverless `chdir path do ... end`.
#[derive(Debug, Clone, Default)]
pub struct NoDirChdir;

impl NoDirChdir {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoDirChdir {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids Dir.chdir with a block, which is not thread safe"
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let pattern = CallPattern::methods(&["chdir"])
            .receiver_const("Dir")
            .block(Expect::Present)
            .args(1);

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
    use rb_lint_core::Severity;
    use std::path::Path;

    fn check(source: &str) -> Vec<Violation> {
        let file = SourceFile::parse(source).unwrap();
        let ctx = FileContext::from_source(Path::new("test.rb"), source);
        NoDirChdir::new().check(&ctx, &file)
    }

    #[test]
    fn flags_block_forms() {
        let violations = check("Dir.chdir(APP_ROOT) do\n  123\nend\nchdir APP_ROOT do\n  123\nend\n");
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].location.line, 1);
        assert_eq!(violations[1].location.line, 4);
        assert_eq!(violations[0].message, MESSAGE);
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn ignores_other_shapes() {
        assert!(check("Test.chdir = 123\n").is_empty());
        assert!(check("Dir.chdir(APP_ROOT)\n").is_empty());
        assert!(check("Project.chdir(root) { build }\n").is_empty());
    }
}
