//! # rb-lint-core
//!
//! Core framework for Ruby linting based on tree-sitter syntax trees.
//!
//! This crate provides the foundational traits and types for building
//! Ruby linters. It includes:
//!
//! - [`Rule`] trait for per-file syntax-tree rules
//! - [`TextRule`] trait for rules over non-Ruby templates
//! - [`SourceFile`] and [`SyntaxTree`], the parsed views of a Ruby file
//! - [`Analyzer`] for orchestrating lint execution and autofix
//! - [`Violation`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use rb_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./app")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod fix;
mod rule;
mod types;

/// Ruby syntax adapter.
pub mod syntax;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, FixReport};
pub use config::{default_excludes, AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use fix::{apply_fixes, apply_replacements, FixOutcome};
pub use rule::{Rule, RuleBox, TextRule, TextRuleBox};
pub use syntax::{ParseError, SourceFile, SyntaxTree};
pub use types::{
    Label, LintResult, Location, Replacement, Severity, Suggestion, Violation, ViolationDiagnostic,
};
pub use utils::allowance::AllowCheck;
