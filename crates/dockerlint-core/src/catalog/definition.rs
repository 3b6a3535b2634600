//! Rule definition records (DTO layer).
//!
//! These types exist solely for serde. They are converted to compiled
//! [`Rule`](crate::Rule) records by the loader.

use serde::{Deserialize, Serialize};

use super::CatalogError;

/// One rule as written in a rules file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Display title.
    pub title: String,
    /// What the rule checks.
    #[serde(default)]
    pub description: String,
    /// Category label; severity is derived from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Regular expression, compiled case-insensitive and multi-line.
    #[serde(default)]
    pub regex_pattern: String,
    /// Remediation text.
    #[serde(default)]
    pub suggestion: String,
    /// Optional kebab-case name usable in configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `"line"` (default) or `"file"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Engine role key (e.g., `"non_root_user"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Exclusion pattern: the rule does not fire when this also matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unless_pattern: Option<String>,
}

/// A definition as read from a document, or the reason it could not be read.
pub type DefinitionEntry = Result<RuleDefinition, String>;

/// Splits a JSON document (a top-level array) into per-rule entries.
///
/// Each element is deserialized on its own so that one malformed record
/// does not reject the rest.
///
/// # Errors
///
/// Returns an error if the text is not JSON or not an array.
pub fn parse_json(content: &str) -> Result<Vec<DefinitionEntry>, CatalogError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Array(items) = value else {
        return Err(CatalogError::Shape(
            "expected a JSON array of rule definitions".to_string(),
        ));
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value::<RuleDefinition>(item).map_err(|e| e.to_string()))
        .collect())
}

/// Splits a TOML document of `[[rule]]` tables into per-rule entries.
///
/// # Errors
///
/// Returns an error if the text is not TOML or `rule` is not an array.
pub fn parse_toml(content: &str) -> Result<Vec<DefinitionEntry>, CatalogError> {
    let table: toml::Table = toml::from_str(content)?;
    let Some(rules) = table.get("rule") else {
        return Ok(Vec::new());
    };
    let toml::Value::Array(items) = rules else {
        return Err(CatalogError::Shape(
            "expected `rule` to be an array of tables".to_string(),
        ));
    };
    Ok(items
        .iter()
        .cloned()
        .map(|item| {
            let definition: Result<RuleDefinition, toml::de::Error> = item.try_into();
            definition.map_err(|e| e.to_string())
        })
        .collect())
}
