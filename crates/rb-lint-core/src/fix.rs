//! Application of automatic replacements to source text.

use crate::types::{Replacement, Violation};

/// Outcome of applying one batch of replacements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// The rewritten content.
    pub content: String,
    /// Number of replacements applied.
    pub applied: usize,
    /// Number of replacements skipped because they overlapped an earlier
    /// one or pointed outside the content.
    pub conflicts: usize,
}

impl FixOutcome {
    /// Returns true if the content changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Applies the replacements carried by `violations` to `content`.
#[must_use]
pub fn apply_fixes(content: &str, violations: &[Violation]) -> FixOutcome {
    let replacements: Vec<&Replacement> = violations
        .iter()
        .filter_map(Violation::replacement)
        .collect();
    apply_replacements(content, &replacements)
}

/// Applies non-overlapping replacements, earliest first.
///
/// When two edits touch the same bytes the earlier one wins and the later
/// one is counted as a conflict; a second pass over the fixed content will
/// pick it up again. Two insertions at the same offset both apply, in the
/// order given.
#[must_use]
pub fn apply_replacements(content: &str, replacements: &[&Replacement]) -> FixOutcome {
    let mut ordered: Vec<(usize, &Replacement)> = replacements.iter().copied().enumerate().collect();
    ordered.sort_by_key(|(i, r)| (r.location.offset, r.location.length, *i));

    let mut output = String::with_capacity(content.len());
    let mut cursor = 0;
    let mut applied = 0;
    let mut conflicts = 0;

    for (_, replacement) in ordered {
        let start = replacement.location.offset;
        let end = replacement.location.end();
        let in_bounds = end <= content.len()
            && content.is_char_boundary(start)
            && content.is_char_boundary(end);
        if start < cursor || !in_bounds {
            conflicts += 1;
            continue;
        }
        output.push_str(&content[cursor..start]);
        output.push_str(&replacement.new_text);
        cursor = end;
        applied += 1;
    }
    output.push_str(&content[cursor..]);

    FixOutcome {
        content: output,
        applied,
        conflicts,
    }
}
