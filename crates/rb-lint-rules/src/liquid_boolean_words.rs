//! Rule replacing `||` and `&&` with `or` and `and` in Liquid templates.
//!
//! # Rationale
//!
//! Liquid has no `||`/`&&` operators. A template using them renders without
//! error but the condition never does what it reads like.
//!
//! # Autofix
//!
//! Replaces each operator with its word form.

use rb_lint_core::{FileContext, Replacement, Suggestion, TextRule, Violation};

/// Rule code for liquid-boolean-words.
pub const CODE: &str = "RBL011";

/// Rule name for liquid-boolean-words.
pub const NAME: &str = "liquid-boolean-words";

const OPERATORS: &[(&str, &str)] = &[("||", "or"), ("&&", "and")];

/// Flags Ruby boolean operators in `.liquid` files.
#[derive(Debug, Clone, Default)]
pub struct LiquidBooleanWords;

impl LiquidBooleanWords {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Finds every `||` and `&&` in order, without overlaps.
fn operators(content: &str) -> Vec<(usize, &'static str, &'static str)> {
    let bytes = content.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        let pair = &bytes[i..i + 2];
        match OPERATORS.iter().find(|(op, _)| op.as_bytes() == pair) {
            Some((op, word)) => {
                found.push((i, *op, *word));
                i += 2;
            }
            None => i += 1,
        }
    }
    found
}

impl TextRule for LiquidBooleanWords {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires `or`/`and` instead of `||`/`&&` in Liquid templates"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["liquid"]
    }

    fn check_text(&self, ctx: &FileContext) -> Vec<Violation> {
        operators(ctx.content)
            .into_iter()
            .map(|(offset, op, word)| {
                let location = ctx.location(offset, offset + op.len());
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    location.clone(),
                    format!("Use '{word}' instead of {op}"),
                )
                .with_suggestion(Suggestion::with_fix(
                    format!("Replace with `{word}`"),
                    Replacement::new(location, word),
                ))
            })
            .collect()
    }
}
