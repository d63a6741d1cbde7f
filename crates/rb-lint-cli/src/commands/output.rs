//! Shared output formatting for lint results.

use anyhow::Result;
use miette::{NamedSource, Report};
use rb_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is used to read sources for the `pretty` format.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, root),
    }
    Ok(())
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn print_text(result: &LintResult) {
    let mut current: Option<&Path> = None;

    for violation in &result.violations {
        let file = violation.location.file.as_path();
        if current != Some(file) {
            if current.is_some() {
                println!();
            }
            println!("\x1b[1m{}\x1b[0m", file.display());
            current = Some(file);
        }
        println!(
            "  {}:{}  {}  {} {}  {}",
            violation.location.line,
            violation.location.column,
            severity_label(violation.severity),
            violation.code,
            violation.rule,
            violation.message,
        );
        if let Some(suggestion) = &violation.suggestion {
            println!("      = help: {}", suggestion.message);
        }
    }
    if current.is_some() {
        println!();
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
    let fixable = result.fixable_count();
    if fixable > 0 {
        println!("{fixable} issue(s) can be fixed with --fix");
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_pretty(result: &LintResult, root: &Path) {
    for violation in &result.violations {
        match pretty_report(violation, root) {
            Some(report) => eprintln!("{report:?}"),
            None => eprint!("{}", violation.format()),
        }
    }
    print_summary(result);
}

fn pretty_report(violation: &Violation, root: &Path) -> Option<Report> {
    let file = &violation.location.file;
    let content = std::fs::read_to_string(root.join(file)).ok()?;
    let diagnostic = ViolationDiagnostic::from(violation);
    Some(
        Report::new(diagnostic)
            .with_source_code(NamedSource::new(file.display().to_string(), content)),
    )
}
