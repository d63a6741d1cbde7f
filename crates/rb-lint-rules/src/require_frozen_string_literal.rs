//! Rule requiring the `frozen_string_literal` magic comment.
//!
//! # Rationale
//!
//! Without the magic comment every string literal allocates a new mutable
//! object each time it is evaluated.
//!
//! # Autofix
//!
//! Inserts `# frozen_string_literal: true` after the last leading shebang or
//! magic comment (`typed`, `encoding`, ...), or at the top of the file when
//! there is none.

use rb_lint_core::syntax::pattern::descendants;
use rb_lint_core::{
    FileContext, Replacement, Rule, Severity, SourceFile, Suggestion, Violation,
};

/// Rule code for require-frozen-string-literal.
pub const CODE: &str = "RBL002";

/// Rule name for require-frozen-string-literal.
pub const NAME: &str = "require-frozen-string-literal";

const MESSAGE: &str =
    "Require \"# frozen_string_literal: true\" in any file that creates a string literal";

const COMMENT: &str = "# frozen_string_literal: true";

const MAGIC_KEYS: &[&str] = &[
    "frozen_string_literal",
    "encoding",
    "coding",
    "typed",
    "warn_indent",
    "shareable_constant_value",
];

const STRING_KINDS: &[&str] = &["string", "string_array", "heredoc_body", "chained_string"];

/// Requires the frozen string literal comment in files with string literals.
#[derive(Debug, Clone, Default)]
pub struct RequireFrozenStringLiteral;

impl RequireFrozenStringLiteral {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Returns the key of a magic comment such as `# typed: strict`.
fn magic_comment_key(line: &str) -> Option<String> {
    let body = line.trim().strip_prefix('#')?.trim();
    let (key, _) = body.split_once(':')?;
    let key = key.trim().to_ascii_lowercase().replace('-', "_");
    MAGIC_KEYS.iter().any(|k| *k == key).then_some(key)
}

fn is_special(line: &str) -> bool {
    line.starts_with("#!") || magic_comment_key(line).is_some()
}

/// Lines before the first line of code, with their 1-indexed numbers.
fn leading_comments(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .take_while(|(_, line)| line.trim_start().starts_with('#'))
}

fn has_frozen_comment(content: &str) -> bool {
    leading_comments(content)
        .any(|(_, line)| magic_comment_key(line).as_deref() == Some("frozen_string_literal"))
}

fn has_string_literal(file: &SourceFile) -> bool {
    descendants(file.root()).any(|node| STRING_KINDS.contains(&node.kind()))
}

impl Rule for RequireFrozenStringLiteral {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires the frozen_string_literal magic comment in files with string literals"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        if has_frozen_comment(ctx.content) || !has_string_literal(file) {
            return Vec::new();
        }

        let last_special = leading_comments(ctx.content)
            .take_while(|(_, line)| is_special(line))
            .last()
            .map(|(number, _)| number);

        let replacement = match last_special {
            Some(line) => {
                let end = ctx.line_end(line);
                Replacement::new(ctx.location(end, end), format!("\n{COMMENT}"))
            }
            None => Replacement::new(ctx.location(0, 0), format!("{COMMENT}\n")),
        };

        vec![Violation::new(CODE, NAME, self.default_severity(), ctx.location(0, 0), MESSAGE)
            .with_suggestion(Suggestion::with_fix(format!("Add `{COMMENT}`"), replacement))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_lint_core::apply_fixes;
    use std::path::Path;

    fn check(source: &str) -> Vec<Violation> {
        let file = SourceFile::parse(source).unwrap();
        let ctx = FileContext::from_source(Path::new("test.rb"), source);
        RequireFrozenStringLiteral::new().check(&ctx, &file)
    }

    fn corrected(source: &str) -> String {
        apply_fixes(source, &check(source)).content
    }

    #[test]
    fn accepts_file_with_comment() {
        let source = "# typed: strict\n# frozen_string_literal: true\nmodule Thing\n  NAME = \"x\"\nend\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn ignores_files_without_strings() {
        assert!(check("# typed: strict\nmodule Thing; end\n").is_empty());
    }

    #[test]
    fn flags_any_string_literal_at_file_start() {
        for body in [
            "NAME = 'hello there'",
            "NAME = \"hello\".freeze",
            "NAME = \"h\" + \"ello\"",
            "NAME = \"hello #{1}\"",
            "NAMES = %w[a b]",
        ] {
            let source = format!("# typed: strict\nmodule Thing\n  {body}\nend\n");
            let violations = check(&source);
            assert_eq!(violations.len(), 1, "{body}");
            let loc = &violations[0].location;
            assert_eq!((loc.line, loc.column, loc.length), (1, 1, 0));
            assert_eq!(violations[0].message, MESSAGE);
        }
    }

    #[test]
    fn inserts_after_magic_comments() {
        insta::assert_snapshot!(corrected("# encoding: utf-8\nVAL = \"hello\"\n"), @r###"
        # encoding: utf-8
        # frozen_string_literal: true
        VAL = "hello"
        "###);

        insta::assert_snapshot!(corrected("# typed: true\n\nVAL = \"hello\"\n"), @r###"
        # typed: true
        # frozen_string_literal: true

        VAL = "hello"
        "###);
    }

    #[test]
    fn stops_at_first_ordinary_comment() {
        let source = "#!/usr/bin/env ruby\n# typed: strict\n# encoding: utf-8\n# hey how's it going?\n\nVAL = \"hello\"\n";
        insta::assert_snapshot!(corrected(source), @r###"
        #!/usr/bin/env ruby
        # typed: strict
        # encoding: utf-8
        # frozen_string_literal: true
        # hey how's it going?

        VAL = "hello"
        "###);
    }

    #[test]
    fn inserts_at_top_without_magic_comments() {
        assert_eq!(
            corrected("module Module1\n  VAL = \"hello\"\nend\n"),
            "# frozen_string_literal: true\nmodule Module1\n  VAL = \"hello\"\nend\n"
        );
        assert_eq!(
            corrected("\n\nmodule Module1\n  VAL = \"hello\"\nend\n"),
            "# frozen_string_literal: true\n\n\nmodule Module1\n  VAL = \"hello\"\nend\n"
        );
    }

    #[test]
    fn fix_is_idempotent() {
        let once = corrected("# typed: true\nVAL = 'x'\n");
        assert!(check(&once).is_empty());
    }
}
