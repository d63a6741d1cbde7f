//! Core analyzer for orchestrating lint execution.

use crate::config::{default_excludes, Config};
use crate::context::FileContext;
use crate::fix::apply_fixes;
use crate::rule::{Rule, RuleBox, TextRuleBox};
use crate::syntax::SourceFile;
use crate::types::{LintResult, Severity, Violation};
use crate::utils::allowance::{AllowCheck, AllowIndex};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Extensions of files parsed as Ruby.
const RUBY_EXTENSIONS: &[&str] = &["rb", "rake", "gemspec", "ru"];

/// Extension-less file names parsed as Ruby.
const RUBY_FILE_NAMES: &[&str] = &["Gemfile", "Rakefile"];

/// Upper bound on fix passes per file.
const MAX_FIX_PASSES: usize = 10;

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a Ruby source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Error walking the directory tree.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    text_rules: Vec<TextRuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a Ruby rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed Ruby rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a boxed text rule to the analyzer.
    #[must_use]
    pub fn text_rule_box(mut self, rule: TextRuleBox) -> Self {
        self.text_rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern, matched against root-relative paths.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            patterns.extend(config.analyzer.exclude.iter().cloned());
        }
        if patterns.is_empty() {
            patterns = default_excludes();
        }
        let exclude = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let config = self.config.unwrap_or_default();
        Ok(Analyzer {
            root,
            rules: self.rules,
            text_rules: self.text_rules,
            exclude,
            respect_gitignore: config.analyzer.respect_gitignore,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Summary of an [`Analyzer::fix`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixReport {
    /// Files whose content was rewritten.
    pub files_fixed: Vec<PathBuf>,
    /// Total number of replacements applied.
    pub fixes_applied: usize,
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    text_rules: Vec<TextRuleBox>,
    exclude: Vec<glob::Pattern>,
    respect_gitignore: bool,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len() + self.text_rules.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails, or if a file
    /// does not parse and `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for path in &files {
            let content = std::fs::read_to_string(path)?;
            match self.analyze_source(path, &content) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Runs every applicable rule over one file's content.
    ///
    /// Ruby files are parsed first; files matching a text rule's extension
    /// are checked as raw text. Allow directives and severity overrides are
    /// already applied to the returned violations.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if a Ruby file does not parse.
    pub fn analyze_source(&self, path: &Path, content: &str) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let ctx = FileContext::new(path, content, &self.root);
        let allowances = AllowIndex::new(content);
        let mut violations = Vec::new();

        if is_ruby_file(path) {
            let file = SourceFile::parse(content).map_err(|e| AnalyzerError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

            for rule in &self.rules {
                if !self.config.is_rule_enabled(rule.name()) {
                    debug!("Skipping disabled rule: {}", rule.name());
                    continue;
                }
                let found = rule.check(&ctx, &file);
                let found = self.apply_severity_override(rule.name(), found);
                violations.extend(filter_allowed(
                    &allowances,
                    rule.name(),
                    rule.requires_allow_reason(),
                    found,
                ));
            }
        }

        for rule in self.text_rules_for(path) {
            let found = rule.check_text(&ctx);
            let found = self.apply_severity_override(rule.name(), found);
            violations.extend(filter_allowed(&allowances, rule.name(), false, found));
        }

        Ok(violations)
    }

    /// Applies automatic fixes to every discovered file and writes the
    /// changed files back.
    ///
    /// Each file is re-analyzed after every pass so edits that conflicted
    /// in one pass are retried in the next. A pass whose output no longer
    /// parses is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery, reading or writing fails.
    pub fn fix(&self) -> Result<FixReport, AnalyzerError> {
        let mut report = FixReport::default();

        for path in self.discover_files()? {
            let original = std::fs::read_to_string(&path)?;
            let (content, applied) = self.fix_source(&path, &original)?;
            if content != original {
                std::fs::write(&path, &content)?;
                info!("Fixed {} issue(s) in {}", applied, path.display());
                report.files_fixed.push(path);
                report.fixes_applied += applied;
            }
        }

        Ok(report)
    }

    /// Applies fixes to in-memory content, returning the new content and
    /// the number of replacements applied.
    ///
    /// # Errors
    ///
    /// Returns an error only when the original content fails to parse and
    /// `fail_on_parse_error` is set.
    pub fn fix_source(&self, path: &Path, content: &str) -> Result<(String, usize), AnalyzerError> {
        let mut current = content.to_string();
        let mut previous: Option<(String, usize)> = None;
        let mut applied = 0;

        for pass in 0..MAX_FIX_PASSES {
            let violations = match self.analyze_source(path, &current) {
                Ok(violations) => violations,
                Err(AnalyzerError::Parse { message, .. }) if pass > 0 => {
                    warn!("Discarding fix pass for {}: {}", path.display(), message);
                    if let Some((good, count)) = previous.take() {
                        current = good;
                        applied = count;
                    }
                    break;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                    break;
                }
                Err(e) => return Err(e),
            };

            let outcome = apply_fixes(&current, &violations);
            if !outcome.changed() {
                break;
            }
            debug!(
                "Pass {}: applied {} fix(es) to {} ({} deferred)",
                pass + 1,
                outcome.applied,
                path.display(),
                outcome.conflicts
            );
            previous = Some((std::mem::replace(&mut current, outcome.content), applied));
            applied += outcome.applied;
        }

        Ok((current, applied))
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    fn text_rules_for<'r>(&'r self, path: &'r Path) -> impl Iterator<Item = &'r TextRuleBox> + 'r {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.text_rules.iter().filter(move |rule| {
            rule.extensions().iter().any(|e| *e == extension)
                && self.config.is_rule_enabled(rule.name())
        })
    }

    fn wants(&self, path: &Path) -> bool {
        is_ruby_file(path) || self.text_rules_for(path).next().is_some()
    }

    /// Discovers all files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let walker = ignore::WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            if !self.wants(path) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

fn is_ruby_file(path: &Path) -> bool {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RUBY_EXTENSIONS.iter().any(|r| *r == e));
    let by_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| RUBY_FILE_NAMES.iter().any(|r| *r == n));
    by_extension || by_name
}

/// Drops violations covered by an allow directive.
///
/// A directive without a reason on a rule that requires one is turned
/// into a warning instead of silently suppressing the violation.
fn filter_allowed(
    allowances: &AllowIndex,
    rule_name: &str,
    requires_reason: bool,
    violations: Vec<Violation>,
) -> Vec<Violation> {
    if allowances.is_empty() {
        return violations;
    }

    violations
        .into_iter()
        .filter_map(|v| match allowances.check(v.location.line, rule_name) {
            AllowCheck::Denied => Some(v),
            AllowCheck::Allowed { reason: None } if requires_reason => {
                Some(missing_reason(&v, rule_name))
            }
            AllowCheck::Allowed { .. } => {
                debug!("Allowed {} at {}:{}", rule_name, v.location.file.display(), v.location.line);
                None
            }
        })
        .collect()
}

fn missing_reason(violation: &Violation, rule_name: &str) -> Violation {
    Violation::new(
        violation.code.clone(),
        rule_name,
        Severity::Warning,
        violation.location.clone(),
        format!("Allow directive for '{rule_name}' is missing required reason"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstFlag;

    impl Rule for ConstFlag {
        fn name(&self) -> &'static str {
            "const-flag"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
            let tree = file.syntax();
            tree.preorder()
                .filter(|&id| tree.const_ref(id).is_some())
                .map(|id| {
                    let span = tree.span(id);
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        ctx.location(span.start, span.end),
                        "constant",
                    )
                })
                .collect()
        }
    }

    fn analyzer() -> Analyzer {
        Analyzer::builder()
            .root("/project")
            .rule(ConstFlag)
            .build()
            .expect("Failed to build analyzer")
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/vendor/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let result = Analyzer::builder().root(".").exclude("a/***b[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_exclude_patterns_match_relative_paths() {
        let analyzer = analyzer();
        assert!(analyzer.should_exclude(Path::new("/project/vendor/bundle/gem.rb")));
        assert!(analyzer.should_exclude(Path::new("/project/app/tmp/cache.rb")));
        assert!(!analyzer.should_exclude(Path::new("/project/app/models/user.rb")));
    }

    #[test]
    fn test_ruby_file_detection() {
        assert!(is_ruby_file(Path::new("app/models/user.rb")));
        assert!(is_ruby_file(Path::new("lib/tasks/db.rake")));
        assert!(is_ruby_file(Path::new("Gemfile")));
        assert!(is_ruby_file(Path::new("demo.gemspec")));
        assert!(!is_ruby_file(Path::new("app/views/mail.liquid")));
        assert!(!is_ruby_file(Path::new("README.md")));
    }

    #[test]
    fn test_analyze_source_applies_allow_directives() {
        let source = "\
Foo.call
# rb-lint: allow(const-flag) reason=\"legacy\"
Bar.call
Baz.call # rb-lint: allow(const-flag)
";
        let violations = analyzer()
            .analyze_source(Path::new("/project/a.rb"), source)
            .unwrap();

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].location.line, 1);
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(violations[1].location.line, 4);
        assert_eq!(violations[1].severity, Severity::Warning);
        assert!(violations[1].message.contains("missing required reason"));
    }

    #[test]
    fn test_severity_override_and_disable() {
        let config = Config::parse("[rules.const-flag]\nseverity = \"info\"\n").unwrap();
        let analyzer = Analyzer::builder()
            .root("/project")
            .rule(ConstFlag)
            .config(config)
            .build()
            .unwrap();
        let violations = analyzer
            .analyze_source(Path::new("/project/a.rb"), "Foo\n")
            .unwrap();
        assert_eq!(violations[0].severity, Severity::Info);

        let config = Config::parse("[rules.const-flag]\nenabled = false\n").unwrap();
        let analyzer = Analyzer::builder()
            .root("/project")
            .rule(ConstFlag)
            .config(config)
            .build()
            .unwrap();
        assert!(analyzer
            .analyze_source(Path::new("/project/a.rb"), "Foo\n")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = analyzer()
            .analyze_source(Path::new("/project/a.rb"), "def broken(\n")
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Parse { .. }));
    }
}
