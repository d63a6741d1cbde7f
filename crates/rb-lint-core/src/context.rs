//! Context types for rule execution.

use crate::types::Location;
use std::path::{Path, PathBuf};

/// Context provided to per-file rules.
///
/// Carries the file contents plus the line table needed to turn byte
/// offsets from the syntax tree into [`Location`]s.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    line_starts: Vec<usize>,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
            line_starts: compute_line_starts(content),
        }
    }

    /// Creates a context for in-memory source, using `path` as both the
    /// absolute and relative path.
    #[must_use]
    pub fn from_source(path: &'a Path, content: &'a str) -> Self {
        Self {
            path,
            content,
            relative_path: path.to_path_buf(),
            line_starts: compute_line_starts(content),
        }
    }

    /// Returns the file extension without the leading dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    /// Returns the number of lines in the file.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number (in characters)
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or the file length if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }
        let Some(&start) = self.line_starts.get(line - 1) else {
            return self.content.len();
        };
        self.content[start..]
            .char_indices()
            .nth(column.saturating_sub(1))
            .map_or(self.content.len(), |(i, _)| start + i)
    }

    /// Converts a byte offset into a 1-indexed `(line, column)` pair.
    #[must_use]
    pub fn position_for(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let start = self.line_starts[line_index];
        let column = self
            .content
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.chars().count());
        (line_index + 1, column + 1)
    }

    /// Builds a [`Location`] for the byte range `start..end`.
    #[must_use]
    pub fn location(&self, start: usize, end: usize) -> Location {
        let (line, column) = self.position_for(start);
        Location::new(self.relative_path.clone(), line, column)
            .with_span(start, end.saturating_sub(start))
    }

    /// Returns the byte offset just before the newline that ends `line`.
    #[must_use]
    pub fn line_end(&self, line: usize) -> usize {
        let next = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.content.len() + 1);
        let end = next.saturating_sub(1).min(self.content.len());
        if self.content[..end].ends_with('\r') {
            end - 1
        } else {
            end
        }
    }
}

fn compute_line_starts(content: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(content.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(content: &str) -> FileContext<'_> {
        FileContext::from_source(Path::new("test.rb"), content)
    }

    #[test]
    fn test_relative_path() {
        let ctx = FileContext::new(
            Path::new("/project/app/models/user.rb"),
            "",
            Path::new("/project"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("app/models/user.rb"));
        assert_eq!(ctx.extension(), Some("rb"));
    }

    #[test]
    fn test_offset_calculation() {
        let ctx = ctx("line1\nline2\nline3");
        assert_eq!(ctx.offset_for(1, 1), 0);
        assert_eq!(ctx.offset_for(2, 1), 6);
        assert_eq!(ctx.offset_for(2, 3), 8);
    }

    #[test]
    fn test_position_roundtrip() {
        let ctx = ctx("module A\n  B.new\nend\n");
        assert_eq!(ctx.position_for(0), (1, 1));
        assert_eq!(ctx.position_for(11), (2, 3));
        assert_eq!(ctx.offset_for(2, 3), 11);
    }

    #[test]
    fn test_position_counts_characters() {
        let ctx = ctx("x = \"é\"; Foo\n");
        // "é" is two bytes but one column.
        assert_eq!(ctx.position_for(10), (1, 10));
    }

    #[test]
    fn test_location_span() {
        let ctx = ctx("a\nFoo.bar\n");
        let loc = ctx.location(2, 5);
        assert_eq!((loc.line, loc.column), (2, 1));
        assert_eq!((loc.offset, loc.length), (2, 3));
    }

    #[test]
    fn test_line_end() {
        let ctx = ctx("# typed: true\n\nVAL = 1\n");
        assert_eq!(ctx.line_end(1), 13);
        assert_eq!(ctx.line_end(2), 14);
        assert_eq!(ctx.line_count(), 3);
    }
}
