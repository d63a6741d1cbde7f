//! Check command implementation.

use anyhow::{bail, Context, Result};
use rb_lint_core::{Analyzer, Config, RuleBox, TextRuleBox};
use rb_lint_rules::{rules_by_names, Preset};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of a `check` run.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes; overrides the preset.
    pub rules: Option<String>,
    /// Preset name; overrides the configured preset.
    pub preset: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Apply fixes before reporting.
    pub fix: bool,
}

/// Runs the check command. Returns `false` when errors remain.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the rule selection
/// names nothing known, or analysis fails.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = source.load()?;
    let (rules, text_rules) = select_rules(options, &config)?;

    let mut builder = Analyzer::builder()
        .root(path)
        .excludes(options.exclude.iter().cloned())
        .config(config);
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    for rule in text_rules {
        builder = builder.text_rule_box(rule);
    }
    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    if options.fix {
        let report = analyzer.fix().context("Autofix failed")?;
        tracing::info!(
            "Applied {} fix(es) to {} file(s)",
            report.fixes_applied,
            report.files_fixed.len()
        );
    }

    let result = analyzer.analyze().context("Analysis failed")?;
    super::output::print(&result, options.format, analyzer.root())?;

    Ok(!result.has_errors())
}

fn select_rules(options: &CheckOptions, config: &Config) -> Result<(Vec<RuleBox>, Vec<TextRuleBox>)> {
    if let Some(filter) = &options.rules {
        let names: Vec<String> = filter
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .collect();
        let (rules, text_rules, unknown) = rules_by_names(&names, config);
        for name in &unknown {
            tracing::warn!("Unknown rule: {}", name);
        }
        if rules.is_empty() && text_rules.is_empty() {
            bail!("No known rules selected by --rules {filter}");
        }
        return Ok((rules, text_rules));
    }

    let preset = preset_for(options.preset.as_deref(), config)?;
    tracing::debug!("Using preset: {}", preset.name());
    Ok((preset.rules(config), preset.text_rules(config)))
}

fn preset_for(flag: Option<&str>, config: &Config) -> Result<Preset> {
    let name = flag
        .or(config.preset.as_deref())
        .unwrap_or(Preset::Recommended.name());
    Preset::from_name(name).with_context(|| {
        format!("Unknown preset '{name}' (expected recommended, strict or minimal)")
    })
}
