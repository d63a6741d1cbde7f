//! Rule presets for common configurations.

use crate::{
    data_migration_logging, file_line_limit, require_block_call, require_constant_prefix,
    DataMigrationLogging, FileLineLimit, LiquidBooleanWords, NoDirChdir, NoGraphCamelize,
    NoProgrammaticEnumValue, NoReload, NoResolveField, PreferTStruct, RequireBlockCall,
    RequireConstantPrefix, RequireFrozenStringLiteral,
};
use rb_lint_core::{Config, RuleBox, TextRuleBox};

/// Preset configurations for rb-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Every rule, including the opt-in ones.
    Strict,
    /// Only constant qualification, for gradual adoption.
    Minimal,
}

impl Preset {
    /// All presets, in the order they are listed to users.
    pub const ALL: [Self; 3] = [Self::Recommended, Self::Strict, Self::Minimal];

    /// Looks up a preset by its name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Returns the preset's name as used in configuration files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }

    /// Returns the Ruby rules for this preset.
    ///
    /// Rules outside the preset are added when the configuration sets
    /// `enabled = true` for them explicitly.
    #[must_use]
    pub fn rules(self, config: &Config) -> Vec<RuleBox> {
        let selected = match self {
            Self::Recommended => recommended_rules(config),
            Self::Strict => all_rules(config),
            Self::Minimal => minimal_rules(config),
        };
        with_opted_in(selected, all_rules(config), config, |r| r.name())
    }

    /// Returns the text rules for this preset.
    #[must_use]
    pub fn text_rules(self, config: &Config) -> Vec<TextRuleBox> {
        let selected = match self {
            Self::Recommended | Self::Strict => all_text_rules(config),
            Self::Minimal => Vec::new(),
        };
        with_opted_in(selected, all_text_rules(config), config, |r| r.name())
    }
}

fn explicitly_enabled(config: &Config, name: &str) -> bool {
    config.rule(name).and_then(|r| r.enabled) == Some(true)
}

fn with_opted_in<R>(
    mut selected: Vec<R>,
    available: Vec<R>,
    config: &Config,
    name: impl Fn(&R) -> &'static str,
) -> Vec<R> {
    for rule in available {
        let rule_name = name(&rule);
        if explicitly_enabled(config, rule_name) && !selected.iter().any(|r| name(r) == rule_name)
        {
            selected.push(rule);
        }
    }
    selected
}

/// Returns the recommended set of rules.
///
/// Every Ruby rule except `file-line-limit` (RBL010) and the opt-in
/// `data-migration-logging` (RBL012).
#[must_use]
pub fn recommended_rules(config: &Config) -> Vec<RuleBox> {
    all_rules(config)
        .into_iter()
        .filter(|r| r.name() != file_line_limit::NAME && r.name() != data_migration_logging::NAME)
        .collect()
}

/// Returns the minimal set of rules: `require-constant-prefix` only.
#[must_use]
pub fn minimal_rules(config: &Config) -> Vec<RuleBox> {
    vec![Box::new(RequireConstantPrefix::from_config(
        config.rule(require_constant_prefix::NAME),
    ))]
}

/// Returns every Ruby rule, configured from `config`.
#[must_use]
pub fn all_rules(config: &Config) -> Vec<RuleBox> {
    vec![
        Box::new(RequireConstantPrefix::from_config(
            config.rule(require_constant_prefix::NAME),
        )),
        Box::new(RequireFrozenStringLiteral::new()),
        Box::new(RequireBlockCall::from_config(config.rule(require_block_call::NAME))),
        Box::new(NoDirChdir::new()),
        Box::new(NoReload::new()),
        Box::new(NoResolveField::new()),
        Box::new(PreferTStruct::new()),
        Box::new(NoGraphCamelize::new()),
        Box::new(NoProgrammaticEnumValue::new()),
        Box::new(FileLineLimit::from_config(config.rule(file_line_limit::NAME))),
        Box::new(DataMigrationLogging::from_config(
            config.rule(data_migration_logging::NAME),
        )),
    ]
}

/// Returns every text rule.
#[must_use]
pub fn all_text_rules(_config: &Config) -> Vec<TextRuleBox> {
    vec![Box::new(LiquidBooleanWords::new())]
}

/// Returns the rules whose name or code appears in `names`.
///
/// Names that match no rule are returned in the third element.
#[must_use]
pub fn rules_by_names(
    names: &[String],
    config: &Config,
) -> (Vec<RuleBox>, Vec<TextRuleBox>, Vec<String>) {
    let wanted = |name: &str, code: &str| names.iter().any(|n| n == name || n == code);

    let rules: Vec<RuleBox> = all_rules(config)
        .into_iter()
        .filter(|r| wanted(r.name(), r.code()))
        .collect();
    let text_rules: Vec<TextRuleBox> = all_text_rules(config)
        .into_iter()
        .filter(|r| wanted(r.name(), r.code()))
        .collect();

    let unknown = names
        .iter()
        .filter(|n| {
            !rules.iter().any(|r| r.name() == n.as_str() || r.code() == n.as_str())
                && !text_rules
                    .iter()
                    .any(|r| r.name() == n.as_str() || r.code() == n.as_str())
        })
        .cloned()
        .collect();

    (rules, text_rules, unknown)
}
