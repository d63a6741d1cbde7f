//! Locates and loads the configuration file.
//!
//! Resolution order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `rb-lint.toml` or `.rb-lint.toml` in the checked directory or the
//!    nearest ancestor that has one
//! 3. `config.toml` in the global directory
//!    (`$RB_LINT_CONFIG_DIR`, else `~/.rb-lint/`)
//! 4. Built-in defaults

use anyhow::{Context, Result};
use rb_lint_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to the checked code.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the file to load, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No configuration file found, using defaults");
            return Ok(Config::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// File names recognised in a project, in order of preference.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["rb-lint.toml", ".rb-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration for a check of `target`.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(target, explicit, global_config_dir())
}

fn resolve_with(target: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = find_project_config(target) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |candidate| {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        })
}

/// Searches `start` and then its ancestors for a project config file.
fn find_project_config(start: &Path) -> Option<PathBuf> {
    let start = std::fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    let dir = if start.is_file() {
        start.parent()?.to_path_buf()
    } else {
        start
    };
    dir.ancestors().find_map(|ancestor| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| ancestor.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Returns the global config directory: `$RB_LINT_CONFIG_DIR`, else
/// `~/.rb-lint`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os("RB_LINT_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".rb-lint")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn canonical(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap()
    }

    #[test]
    fn explicit_path_wins_and_is_not_checked() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("rb-lint.toml"), "").unwrap();

        let source = resolve_with(project.path(), Some(Path::new("/missing.toml")), None);
        assert_eq!(source, ConfigSource::Explicit(PathBuf::from("/missing.toml")));
        assert!(source.load().is_err());
    }

    #[test]
    fn plain_name_preferred_over_dotfile() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("rb-lint.toml"), "").unwrap();
        fs::write(project.path().join(".rb-lint.toml"), "").unwrap();

        assert_eq!(
            resolve_with(project.path(), None, None),
            ConfigSource::Project(canonical(project.path()).join("rb-lint.toml"))
        );
    }

    #[test]
    fn dotfile_found_in_ancestor() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join(".rb-lint.toml"), "").unwrap();
        let nested = project.path().join("app/models");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            resolve_with(&nested, None, None),
            ConfigSource::Project(canonical(project.path()).join(".rb-lint.toml"))
        );
    }

    #[test]
    fn global_used_without_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "preset = \"strict\"\n").unwrap();

        let source = resolve_with(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(source, ConfigSource::Global(global.path().join("config.toml")));
        assert_eq!(source.load().unwrap().preset.as_deref(), Some("strict"));
    }

    #[test]
    fn project_config_shadows_global() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("rb-lint.toml"), "").unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let source = resolve_with(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(source, ConfigSource::Project(_)));
    }

    #[test]
    fn defaults_when_nothing_exists() {
        let project = TempDir::new().unwrap();
        let empty_global = TempDir::new().unwrap();

        let source = resolve_with(project.path(), None, Some(empty_global.path().to_path_buf()));
        assert_eq!(source, ConfigSource::Default);
        assert!(source.load().unwrap().rules.is_empty());
    }

    #[test]
    fn invalid_toml_reports_path() {
        let project = TempDir::new().unwrap();
        let path = project.path().join("rb-lint.toml");
        fs::write(&path, "preset = [").unwrap();

        let error = ConfigSource::Project(path).load().unwrap_err();
        assert!(error.to_string().starts_with("Failed to load config:"));
    }
}
