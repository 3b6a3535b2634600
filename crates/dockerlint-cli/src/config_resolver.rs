//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/dockerlint.toml` or `.dockerlint.toml`
//! 3. `~/.dockerlint/config.toml` (global fallback)
//! 4. No config found → defaults
//!
//! Relative paths inside a config file (`linter.rules`, `pins.catalog`) are
//! resolved against the directory holding that file.

use anyhow::{Context, Result};
use dockerlint_core::Config;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["dockerlint.toml", ".dockerlint.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Finds the config file to use, if any. See module-level docs for the order.
fn locate(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> Option<PathBuf> {
    // Explicit path is trusted as-is; a missing file fails at load time
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }

    if let Some(candidate) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|c| c.exists())
    {
        tracing::debug!("Found project config: {}", candidate.display());
        return Some(candidate);
    }

    let candidate = global_dir?.join(GLOBAL_CONFIG_NAME);
    if candidate.exists() {
        tracing::info!("Using global config: {}", candidate.display());
        return Some(candidate);
    }
    None
}

/// Returns the global config directory path.
///
/// Resolution: `$DOCKERLINT_CONFIG_DIR` > `~/.dockerlint/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("DOCKERLINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".dockerlint"))
}

/// A parsed configuration and the directory its relative paths refer to.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Parsed configuration, or defaults.
    pub config: Config,
    base_dir: Option<PathBuf>,
}

impl LoadedConfig {
    /// Resolves a path taken from the config file.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Configured rule catalog path, resolved.
    #[must_use]
    pub fn rules_path(&self) -> Option<PathBuf> {
        self.config.linter.rules.as_deref().map(|p| self.resolve_path(p))
    }

    /// Configured package catalog path, resolved.
    #[must_use]
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.config.pins.catalog.as_deref().map(|p| self.resolve_path(p))
    }
}

/// Resolves and parses the configuration for `project_dir`.
///
/// # Errors
///
/// Returns an error if a resolved config file cannot be read or parsed.
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<LoadedConfig> {
    load_from(project_dir, explicit, global_config_dir().as_deref())
}

/// Testable core: takes `global_dir` as a parameter to avoid env var races.
fn load_from(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let Some(path) = locate(project_dir, explicit, global_dir) else {
        return Ok(LoadedConfig {
            config: Config::default(),
            base_dir: None,
        });
    };
    let config = Config::from_file(&path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    Ok(LoadedConfig {
        config,
        base_dir: path.parent().map(Path::to_path_buf),
    })
}
