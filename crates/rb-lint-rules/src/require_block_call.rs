//! Rule requiring certain methods to be called with a block.
//!
//! # Rationale
//!
//! `File.open(path)` without a block leaves closing the handle to the
//! caller, and `Sidekiq::Testing.inline!` without a block leaks the testing
//! mode into every later test. The block forms scope both.
//!
//! # Configuration
//!
//! - `methods`: method names that need a block (default: `["open", "inline!"]`)

use rb_lint_core::syntax::pattern::{descendants, CallPattern, Expect};
use rb_lint_core::{FileContext, Rule, RuleConfig, Severity, SourceFile, Violation};

/// Rule code for require-block-call.
pub const CODE: &str = "RBL003";

/// Rule name for require-block-call.
pub const NAME: &str = "require-block-call";

/// Methods checked when no `methods` option is configured.
pub const DEFAULT_METHODS: &[&str] = &["open", "inline!"];

fn message_for(method: &str) -> String {
    match method {
        "open" => "Use File.open with a block to ensure the file is closed after use.".to_string(),
        "inline!" => {
            "Use Sidekiq::Testing.inline! with a block to ensure setting does not leak".to_string()
        }
        other => format!("Call `{other}` with a block so its effect is scoped."),
    }
}

/// Requires a block on calls to the configured methods.
#[derive(Debug, Clone)]
pub struct RequireBlockCall {
    /// Method names that must receive a block.
    pub methods: Vec<String>,
}

impl Default for RequireBlockCall {
    fn default() -> Self {
        Self::new()
    }
}

impl RequireBlockCall {
    /// Creates a new rule checking [`DEFAULT_METHODS`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            methods: DEFAULT_METHODS.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    /// Creates a rule from its `[rules.require-block-call]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        config
            .and_then(|c| c.get_str_array("methods"))
            .map_or_else(Self::new, |methods| Self { methods })
    }
}

impl Rule for RequireBlockCall {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires File.open and Sidekiq::Testing.inline! to be called with a block"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let pattern = CallPattern::methods(self.methods.as_slice())
            .receiver(Expect::Present)
            .block(Expect::Absent);

        descendants(file.root())
            .filter_map(|node| pattern.match_call(node, ctx.content))
            .map(|call| {
                let node = call.node();
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.location(node.start_byte(), node.end_byte()),
                    message_for(call.method(ctx.content)),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn flagged(rule: &RequireBlockCall, source: &str) -> Vec<String> {
        let file = SourceFile::parse(source).unwrap();
        let ctx = FileContext::from_source(Path::new("test.rb"), source);
        rule.check(&ctx, &file)
            .iter()
            .map(|v| source[v.location.offset..v.location.end()].to_string())
            .collect()
    }

    #[test]
    fn flags_open_without_block() {
        let source = "\
File.open(\"file_path\")
f = File.open(\"file_path\", 'w')
File.open(file_path).tap do |file|
  file.read
end
tempfile.open if tempfile.closed? && !opts[:unlink]
Base64.strict_encode64(image.tempfile.open.read)
";
        assert_eq!(
            flagged(&RequireBlockCall::new(), source),
            vec![
                "File.open(\"file_path\")",
                "File.open(\"file_path\", 'w')",
                "File.open(file_path)",
                "tempfile.open",
                "image.tempfile.open",
            ]
        );
    }

    #[test]
    fn accepts_block_forms() {
        let source = "\
File.open(file_path) { |file| file.read }
xml_file = remote_file.open { |contents| parse(contents) }
File.open(@image.path, 'rb') do |file|
  file.read
end
Sidekiq::Testing.inline! { 4 * 5 }
open('receiverless')
";
        assert!(flagged(&RequireBlockCall::new(), source).is_empty());
    }

    #[test]
    fn flags_inline_testing_mode_with_its_message() {
        let source = "Sidekiq::Testing.inline!\n";
        let file = SourceFile::parse(source).unwrap();
        let ctx = FileContext::from_source(Path::new("spec/a_spec.rb"), source);
        let violations = RequireBlockCall::new().check(&ctx, &file);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "Use Sidekiq::Testing.inline! with a block to ensure setting does not leak"
        );
    }

    #[test]
    fn methods_are_configurable() {
        let config = rb_lint_core::Config::parse(
            "[rules.require-block-call]\nmethods = [\"transaction\"]\n",
        )
        .unwrap();
        let rule = RequireBlockCall::from_config(config.rule(NAME));
        assert_eq!(
            flagged(&rule, "ActiveRecord::Base.transaction\nFile.open(x)\n"),
            vec!["ActiveRecord::Base.transaction"]
        );
    }
}
