//! Configuration types for dockerlint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::types::Severity;

/// Top-level configuration (`dockerlint.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold for a failing exit status (default: "critical").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Linter configuration.
    #[serde(default)]
    pub linter: LinterConfig,

    /// Pin validator configuration.
    #[serde(default)]
    pub pins: PinsConfig,

    /// Per-rule configurations, keyed by rule id or rule name.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or `fail_on` names no severity.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.fail_on_severity()?;
        Ok(config)
    }

    /// Checks if a rule is enabled. `key` is a rule id or name.
    #[must_use]
    pub fn is_rule_enabled(&self, key: &str) -> bool {
        self.rules
            .get(key)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Keys of every rule explicitly disabled.
    pub fn disabled_rules(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(|(_, c)| c.enabled == Some(false))
            .map(|(key, _)| key.as_str())
    }

    /// Parsed `fail_on` threshold, if set.
    ///
    /// # Errors
    ///
    /// Returns an error if the value names no severity.
    pub fn fail_on_severity(&self) -> Result<Option<Severity>, ConfigError> {
        self.fail_on
            .as_deref()
            .map(|value| {
                Severity::parse(value).ok_or_else(|| ConfigError::UnknownSeverity {
                    value: value.to_string(),
                })
            })
            .transpose()
    }
}

/// Linter-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Rule catalog file (JSON or TOML). The built-in catalog is used when unset.
    #[serde(default)]
    pub rules: Option<PathBuf>,

    /// Glob patterns to exclude from directory analysis.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            rules: None,
            exclude: default_excludes(),
        }
    }
}

fn default_excludes() -> Vec<String> {
    vec!["**/target/**".to_string(), "**/node_modules/**".to_string()]
}

/// Pin validator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinsConfig {
    /// Package catalog file (YAML or JSON).
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// `fail_on` is not a severity name.
    #[error("unknown severity `{value}`, expected: critical, high, medium, low")]
    UnknownSeverity {
        /// The invalid value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.rules.is_empty());
        assert!(config.linter.rules.is_none());
        assert_eq!(config.linter.exclude.len(), 2);
        assert_eq!(config.fail_on_severity().unwrap(), None);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "high"

[linter]
rules = "rules.json"
exclude = ["**/vendor/**"]

[pins]
catalog = "package_catalog.yaml"

[rules.DL004]
enabled = false

[rules.avoid-latest-tag]
enabled = true
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.linter.rules, Some(PathBuf::from("rules.json")));
        assert_eq!(config.linter.exclude, vec!["**/vendor/**".to_string()]);
        assert_eq!(
            config.pins.catalog,
            Some(PathBuf::from("package_catalog.yaml"))
        );
        assert_eq!(config.fail_on_severity().unwrap(), Some(Severity::High));
        assert!(!config.is_rule_enabled("DL004"));
        assert!(config.is_rule_enabled("avoid-latest-tag"));
        assert!(config.is_rule_enabled("DL001"));
        assert_eq!(config.disabled_rules().collect::<Vec<_>>(), vec!["DL004"]);
    }

    #[test]
    fn test_unknown_fail_on_is_rejected() {
        let result = Config::parse("fail_on = \"severe\"");
        assert!(matches!(result, Err(ConfigError::UnknownSeverity { .. })));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        assert!(matches!(
            Config::parse("fail_on = "),
            Err(ConfigError::Parse { .. })
        ));
    }
}
