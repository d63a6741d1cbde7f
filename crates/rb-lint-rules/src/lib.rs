//! # rb-lint-rules
//!
//! Built-in lint rules for rb-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | RBL001 | `require-constant-prefix` | Requires constants to be qualified from the root namespace |
//! | RBL002 | `require-frozen-string-literal` | Requires the `frozen_string_literal` magic comment |
//! | RBL003 | `require-block-call` | Requires `File.open`/`Sidekiq::Testing.inline!` to take a block |
//! | RBL004 | `no-dir-chdir` | Forbids block-form `Dir.chdir` |
//! | RBL005 | `no-reload` | Forbids `.reload` |
//! | RBL006 | `no-resolve-field` | Forbids `resolve_field` in GraphQL tests |
//! | RBL007 | `prefer-t-struct` | Prefers `T::Struct` over `T::ImmutableStruct` |
//! | RBL008 | `no-graph-camelize` | Forbids the GraphQL `camelize:` option |
//! | RBL009 | `no-programmatic-enum-value` | Forbids enum values defined in `each_value` loops |
//! | RBL010 | `file-line-limit` | Limits the number of lines per file |
//! | RBL011 | `liquid-boolean-words` | Requires `or`/`and` in Liquid templates |
//! | RBL012 | `data-migration-logging` | Requires logging in data migration loops |
//!
//! ## Usage
//!
//! ```ignore
//! use rb_lint_core::Analyzer;
//! use rb_lint_rules::{NoReload, RequireConstantPrefix};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./app")
//!     .rule(RequireConstantPrefix::new())
//!     .rule(NoReload::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod data_migration_logging;
pub mod file_line_limit;
pub mod liquid_boolean_words;
pub mod no_dir_chdir;
pub mod no_graph_camelize;
pub mod no_programmatic_enum_value;
pub mod no_reload;
pub mod no_resolve_field;
pub mod prefer_t_struct;
mod presets;
pub mod require_block_call;
pub mod require_constant_prefix;
pub mod require_frozen_string_literal;

pub use data_migration_logging::DataMigrationLogging;
pub use file_line_limit::FileLineLimit;
pub use liquid_boolean_words::LiquidBooleanWords;
pub use no_dir_chdir::NoDirChdir;
pub use no_graph_camelize::NoGraphCamelize;
pub use no_programmatic_enum_value::NoProgrammaticEnumValue;
pub use no_reload::NoReload;
pub use no_resolve_field::NoResolveField;
pub use prefer_t_struct::PreferTStruct;
pub use presets::{
    all_rules, all_text_rules, minimal_rules, recommended_rules, rules_by_names, Preset,
};
pub use require_block_call::RequireBlockCall;
pub use require_constant_prefix::RequireConstantPrefix;
pub use require_frozen_string_literal::RequireFrozenStringLiteral;

/// Re-export core types for convenience.
pub use rb_lint_core::{Rule, Severity, TextRule, Violation};
