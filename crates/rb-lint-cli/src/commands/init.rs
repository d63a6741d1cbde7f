//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_NAME: &str = "rb-lint.toml";

const DEFAULT_CONFIG: &str = r#"# rb-lint configuration

# recommended | strict | minimal
preset = "recommended"

[analyzer]
# Glob patterns to exclude from analysis
exclude = [
    "**/vendor/**",
    "**/node_modules/**",
    "**/tmp/**",
]

# Respect .gitignore files
respect_gitignore = true

# Each rule can be enabled/disabled and have its severity overridden.

[rules.require-constant-prefix]
enabled = true
# severity = "error"
# separator = "::"
# Names added to the built-in list of core and stdlib constants
extra_well_known = []

[rules.require-block-call]
methods = ["open", "inline!"]

[rules.file-line-limit]
max_lines = 1180

# Opt-in outside the strict preset.
# [rules.data-migration-logging]
# enabled = true
# paths = ["**/db/data/**", "**/db/data_migrations/**"]
"#;

/// Writes a starter `rb-lint.toml` into `dir`.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to configure rules");
    println!("  2. Run: rb-lint check");

    Ok(())
}
