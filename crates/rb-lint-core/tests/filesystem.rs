//! Analyzer discovery and multi-pass fixing against a real directory.

use rb_lint_core::{
    Analyzer, FileContext, Replacement, Rule, Severity, SourceFile, Suggestion, Violation,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Replaces constants named `from` with `to`.
struct Rename {
    from: &'static str,
    to: &'static str,
}

impl Rule for Rename {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn code(&self) -> &'static str {
        "TEST001"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let tree = file.syntax();
        tree.preorder()
            .filter(|&id| tree.const_ref(id).is_some_and(|r| r.name == self.from))
            .map(|id| {
                let span = tree.span(id);
                // Only the name segment is renamed, whatever the scope.
                let start = span.end - self.from.len();
                let location = ctx.location(start, span.end);
                Violation::new(self.code(), self.name(), Severity::Warning, location.clone(), "rename")
                    .with_suggestion(Suggestion::with_fix("rename", Replacement::new(location, self.to)))
            })
            .collect()
    }
}

/// Rewrites every scoped `A::Leaf` chain to `A::Node`, covering the scope too.
struct ScopedLeaf;

impl Rule for ScopedLeaf {
    fn name(&self) -> &'static str {
        "scoped-leaf"
    }

    fn code(&self) -> &'static str {
        "TEST002"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let tree = file.syntax();
        tree.preorder()
            .filter(|&id| {
                tree.const_ref(id)
                    .is_some_and(|r| r.scope.is_some() && r.name == "Leaf")
            })
            .map(|id| {
                let span = tree.span(id);
                let text = span.text(ctx.content);
                let fixed = format!("{}Node", &text[..text.len() - "Leaf".len()]);
                let location = ctx.location(span.start, span.end);
                Violation::new(self.code(), self.name(), Severity::Warning, location.clone(), "leaf")
                    .with_suggestion(Suggestion::with_fix("leaf", Replacement::new(location, fixed)))
            })
            .collect()
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn discovers_ruby_files_and_honours_gitignore() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir(root.join(".git")).unwrap();
    write(root, ".gitignore", "generated/\n");
    write(root, "app/a.rb", "Short\n");
    write(root, "Gemfile", "Short\n");
    write(root, "lib/tasks/db.rake", "Short\n");
    write(root, "README.md", "Short\n");
    write(root, "generated/b.rb", "Short\n");
    write(root, "vendor/c.rb", "Short\n");

    let analyzer = Analyzer::builder()
        .root(root)
        .rule(Rename { from: "Short", to: "Long" })
        .build()
        .unwrap();
    let result = analyzer.analyze().unwrap();

    let files: Vec<String> = result
        .violations
        .iter()
        .map(|v| v.location.file.display().to_string())
        .collect();
    assert_eq!(files, vec!["Gemfile", "app/a.rb", "lib/tasks/db.rake"]);
    assert_eq!(result.files_checked, 3);
    assert_eq!(result.fixable_count(), 3);
}

#[test]
fn conflicting_fixes_are_applied_over_several_passes() {
    let analyzer = Analyzer::builder()
        .root("/project")
        .rule(Rename { from: "Short", to: "Long" })
        .rule(ScopedLeaf)
        .build()
        .unwrap();

    let (fixed, applied) = analyzer
        .fix_source(Path::new("/project/a.rb"), "Short::Leaf.call\n")
        .unwrap();
    assert_eq!(fixed, "Long::Node.call\n");
    assert_eq!(applied, 2);
}

#[test]
fn pass_producing_invalid_ruby_is_discarded() {
    let analyzer = Analyzer::builder()
        .root("/project")
        .rule(Rename { from: "Short", to: "Long(" })
        .build()
        .unwrap();

    let source = "x = Short\n";
    let (fixed, applied) = analyzer.fix_source(Path::new("/project/a.rb"), source).unwrap();
    assert_eq!(fixed, source);
    assert_eq!(applied, 0);
}

#[test]
fn fix_writes_only_changed_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a.rb", "puts Short\n");
    write(root, "b.rb", "puts 1\n");
    write(root, "broken.rb", "def oops(\n  Short\n");

    let analyzer = Analyzer::builder()
        .root(root)
        .rule(Rename { from: "Short", to: "Long" })
        .build()
        .unwrap();
    let report = analyzer.fix().unwrap();

    assert_eq!(report.files_fixed, vec![root.join("a.rb")]);
    assert_eq!(report.fixes_applied, 1);
    insta::assert_snapshot!(fs::read_to_string(root.join("a.rb")).unwrap(), @"puts Long");
    assert_eq!(fs::read_to_string(root.join("broken.rb")).unwrap(), "def oops(\n  Short\n");
}
