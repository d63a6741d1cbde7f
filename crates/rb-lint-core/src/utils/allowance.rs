//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! # rb-lint: allow(require-constant-prefix) reason="resolved by Zeitwerk"
//! Legacy::Thing.call # rb-lint: allow(require-constant-prefix) reason="generated"
//! ```
//!
//! A directive applies to its own line and to the line after it.

use std::collections::{HashMap, HashSet};

const MARKER: &str = "rb-lint:";

/// Result of checking for an allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowDirective {
    /// Rule names that are allowed (`all` allows every rule).
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn covers(&self, rule_name: &str) -> bool {
        self.rules.contains(rule_name) || self.rules.contains("all")
    }
}

/// All directives of one file, keyed by 1-indexed line.
#[derive(Debug, Clone, Default)]
pub struct AllowIndex {
    directives: HashMap<usize, AllowDirective>,
}

impl AllowIndex {
    /// Scans `content` for directives.
    #[must_use]
    pub fn new(content: &str) -> Self {
        let directives = content
            .lines()
            .enumerate()
            .filter_map(|(i, line)| parse_allow_directive(line).map(|d| (i + 1, d)))
            .collect();
        Self { directives }
    }

    /// Returns true if the file has no directives at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Checks whether `rule_name` is allowed on `line` (1-indexed).
    ///
    /// The line itself wins over the line before it.
    #[must_use]
    pub fn check(&self, line: usize, rule_name: &str) -> AllowCheck {
        [line, line.saturating_sub(1)]
            .into_iter()
            .filter(|&l| l > 0)
            .filter_map(|l| self.directives.get(&l))
            .find(|d| d.covers(rule_name))
            .map_or(AllowCheck::Denied, |d| AllowCheck::Allowed {
                reason: d.reason.clone(),
            })
    }
}

/// Parses an allowance directive from a line, as a full-line or trailing comment.
#[must_use]
pub fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    // The marker must directly follow a `#`, ignoring whitespace.
    let directive = line.match_indices('#').find_map(|(i, _)| {
        line[i + 1..].trim_start().strip_prefix(MARKER)
    })?;

    let directive = directive.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();
    let paren_end = allow_content.find(')')?;

    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("# rb-lint: allow(no-reload)").unwrap();
        assert!(directive.rules.contains("no-reload"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive =
            parse_allow_directive("  # rb-lint: allow(no-dir-chdir) reason=\"single threaded rake task\"")
                .unwrap();
        assert!(directive.rules.contains("no-dir-chdir"));
        assert_eq!(directive.reason.as_deref(), Some("single threaded rake task"));
    }

    #[test]
    fn test_parse_multiple_rules() {
        let directive = parse_allow_directive("# rb-lint: allow(rule1, rule2,rule3)").unwrap();
        assert_eq!(directive.rules.len(), 3);
        assert!(directive.rules.contains("rule3"));
    }

    #[test]
    fn test_parse_trailing_directive() {
        let directive =
            parse_allow_directive("record.reload # rb-lint: allow(no-reload) reason=\"spec\"").unwrap();
        assert!(directive.rules.contains("no-reload"));
        assert_eq!(directive.reason.as_deref(), Some("spec"));
    }

    #[test]
    fn test_ignores_non_directives() {
        assert!(parse_allow_directive("# just a comment about rb-lint: allow(x)").is_none());
        assert!(parse_allow_directive("# rb-lint: allow()").is_none());
        assert!(parse_allow_directive("foo(1)").is_none());
        assert!(parse_allow_directive("# rb-lint: deny(x)").is_none());
    }

    #[test]
    fn test_index_checks_line_and_line_before() {
        let content = "\
def foo
  # rb-lint: allow(no-reload) reason=\"needs fresh row\"
  user.reload
  other.reload
  thing.reload # rb-lint: allow(all)
end
";
        let index = AllowIndex::new(content);
        assert!(!index.is_empty());

        let allowed = index.check(3, "no-reload");
        assert!(allowed.is_allowed());
        assert_eq!(allowed.reason(), Some("needs fresh row"));

        assert_eq!(index.check(4, "no-reload"), AllowCheck::Denied);
        assert_eq!(index.check(3, "no-dir-chdir"), AllowCheck::Denied);

        let all = index.check(5, "no-dir-chdir");
        assert!(all.is_allowed());
        assert_eq!(all.reason(), None);
    }
}
