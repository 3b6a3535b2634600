//! Rule catalog: loading, compiling and querying rule definitions.
//!
//! # Pipeline
//!
//! ```text
//! JSON / TOML text
//!   ↓ serde (DTO layer)
//! definition::RuleDefinition
//!   ↓ compile + validate (skip, warn, continue)
//! Rule (ids assigned by position)
//!   ↓ role resolution (first holder wins)
//! RuleCatalog
//! ```
//!
//! Loading never fails the whole catalog because of one rule. Problems are
//! kept as [`CatalogDiagnostic`]s next to the rules that did load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::rule::{Rule, RuleId, RuleRole};

pub mod definition;
mod loader;

pub use definition::{DefinitionEntry, RuleDefinition};

/// Document-level failure while reading a rule catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The source could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// JSON deserialization failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The document parsed but has the wrong shape.
    #[error("{0}")]
    Shape(String),
}

/// A non-fatal problem found while loading a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogDiagnostic {
    /// The whole source was missing, unreadable or unparseable.
    #[error("rule source {path} unavailable: {reason}")]
    SourceUnavailable {
        /// Source path (or `<inline>`).
        path: String,
        /// Why it could not be used.
        reason: String,
    },

    /// A record could not be read as a rule definition.
    #[error("{id}: invalid definition: {reason}")]
    InvalidDefinition {
        /// Id the definition would have had.
        id: RuleId,
        /// What was wrong.
        reason: String,
    },

    /// A pattern failed to compile.
    #[error("{id} ({title}): invalid {field}: {reason}")]
    InvalidPattern {
        /// Rule id.
        id: RuleId,
        /// Rule title.
        title: String,
        /// `regex_pattern` or `unless_pattern`.
        field: &'static str,
        /// Compiler message.
        reason: String,
    },

    /// The rule has no pattern and nothing else fires it.
    #[error("{id} ({title}): regex_pattern is required")]
    MissingPattern {
        /// Rule id.
        id: RuleId,
        /// Rule title.
        title: String,
    },

    /// Scope is neither `line` nor `file`.
    #[error("{id}: unknown scope `{value}`, expected: line, file")]
    UnknownScope {
        /// Rule id.
        id: RuleId,
        /// The invalid value.
        value: String,
    },

    /// Role key is not one the engine knows.
    #[error("{id}: unknown role `{value}`, rule kept without a role")]
    UnknownRole {
        /// Rule id.
        id: RuleId,
        /// The invalid value.
        value: String,
    },

    /// Roles are fired by the line scan, so a file-scoped rule cannot hold one.
    #[error("{id}: role `{role}` requires line scope")]
    FileScopedRole {
        /// Rule that was skipped.
        id: RuleId,
        /// The requested role.
        role: RuleRole,
    },

    /// A second rule claimed a role that is already held.
    #[error("{id}: role `{role}` already held by {holder}, rule kept without a role")]
    DuplicateRole {
        /// Rule that lost the role.
        id: RuleId,
        /// The contested role.
        role: RuleRole,
        /// Rule that holds it.
        holder: RuleId,
    },
}

/// Immutable, queryable set of compiled rules.
///
/// Built once per process and shared behind an [`Arc`].
#[derive(Debug, Default)]
pub struct RuleCatalog {
    rules: Vec<Arc<Rule>>,
    roles: BTreeMap<RuleRole, usize>,
    diagnostics: Vec<CatalogDiagnostic>,
}

impl RuleCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a catalog from already compiled rules.
    #[must_use]
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self::assemble(rules.into_iter().collect(), Vec::new())
    }

    /// Compiles definitions in order. Never fails; see [`Self::diagnostics`].
    #[must_use]
    pub fn from_definitions(definitions: impl IntoIterator<Item = RuleDefinition>) -> Self {
        Self::from_entries(definitions.into_iter().map(Ok))
    }

    /// Compiles entries produced by the document parsers.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = DefinitionEntry>) -> Self {
        let mut diagnostics = Vec::new();
        let rules = loader::compile_all(entries, &mut diagnostics);
        Self::assemble(rules, diagnostics)
    }

    /// Parses a JSON array of definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a JSON array.
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        Ok(Self::from_entries(definition::parse_json(content)?))
    }

    /// Parses a TOML document of `[[rule]]` tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML.
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        Ok(Self::from_entries(definition::parse_toml(content)?))
    }

    /// Reads a catalog file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn try_load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Reads a catalog file, degrading to an empty catalog on failure.
    ///
    /// The returned catalog then carries a single
    /// [`CatalogDiagnostic::SourceUnavailable`].
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(catalog) => {
                debug!(path = %path.display(), rules = catalog.len(), "Loaded rule catalog");
                catalog
            }
            Err(e) => {
                warn!("Rule catalog {} unavailable: {e}", path.display());
                Self {
                    diagnostics: vec![CatalogDiagnostic::SourceUnavailable {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }],
                    ..Self::default()
                }
            }
        }
    }

    fn assemble(rules: Vec<Rule>, mut diagnostics: Vec<CatalogDiagnostic>) -> Self {
        let mut roles: BTreeMap<RuleRole, usize> = BTreeMap::new();
        let mut compiled: Vec<Arc<Rule>> = Vec::with_capacity(rules.len());
        for mut rule in rules {
            if let Some(role) = rule.role() {
                if let Some(&holder) = roles.get(&role) {
                    let diagnostic = CatalogDiagnostic::DuplicateRole {
                        id: rule.id().clone(),
                        role,
                        holder: compiled[holder].id().clone(),
                    };
                    warn!("{diagnostic}");
                    diagnostics.push(diagnostic);
                    rule.clear_role();
                } else {
                    roles.insert(role, compiled.len());
                }
            }
            compiled.push(Arc::new(rule));
        }
        Self {
            rules: compiled,
            roles,
            diagnostics,
        }
    }

    /// All rules in definition order.
    #[must_use]
    pub fn rules(&self) -> &[Arc<Rule>] {
        &self.rules
    }

    /// Looks up a rule by id or name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<Rule>> {
        self.rules.iter().find(|r| r.is_named(key))
    }

    /// The rule holding `role`, if any.
    #[must_use]
    pub fn by_role(&self, role: RuleRole) -> Option<&Arc<Rule>> {
        self.roles.get(&role).map(|&index| &self.rules[index])
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Problems found while loading.
    #[must_use]
    pub fn diagnostics(&self) -> &[CatalogDiagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"title": "Avoid latest tag", "category": "Base Image Selection & Versioning",
         "regex_pattern": "^FROM\\s+\\S+:latest", "name": "avoid-latest-tag",
         "description": "d", "suggestion": "s"},
        {"title": "Run as non-root", "category": "Security Best Practices",
         "regex_pattern": "^USER\\s+root\\b", "role": "non_root_user"},
        {"title": "Another user rule", "regex_pattern": "^USER", "role": "non_root_user"}
    ]"#;

    #[test]
    fn from_json_assigns_ids_and_roles() {
        let catalog = RuleCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("DL001").unwrap().title(), "Avoid latest tag");
        assert_eq!(catalog.get("avoid-latest-tag").unwrap().id().as_str(), "DL001");
        assert_eq!(
            catalog.by_role(RuleRole::NonRootUser).unwrap().id().as_str(),
            "DL002"
        );
        assert!(catalog.by_role(RuleRole::CombineRuns).is_none());
    }

    #[test]
    fn duplicate_role_first_wins() {
        let catalog = RuleCatalog::from_json(SAMPLE).unwrap();
        assert!(catalog.get("DL003").unwrap().role().is_none());
        assert!(matches!(
            catalog.diagnostics(),
            [CatalogDiagnostic::DuplicateRole { role: RuleRole::NonRootUser, .. }]
        ));
    }

    #[test]
    fn load_missing_file_degrades_to_empty() {
        let catalog = RuleCatalog::load(Path::new("/nonexistent/rules.json"));
        assert!(catalog.is_empty());
        assert!(matches!(
            catalog.diagnostics(),
            [CatalogDiagnostic::SourceUnavailable { .. }]
        ));
    }

    #[test]
    fn load_unparseable_file_degrades_to_empty() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"not json").unwrap();
        let catalog = RuleCatalog::load(file.path());
        assert!(catalog.is_empty());
        assert_eq!(catalog.diagnostics().len(), 1);
    }

    #[test]
    fn load_picks_toml_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"[[rule]]\ntitle = \"x\"\nregex_pattern = \"y\"\n")
            .unwrap();
        let catalog = RuleCatalog::load(file.path());
        assert_eq!(catalog.len(), 1);
        assert!(catalog.diagnostics().is_empty());
    }

    #[test]
    fn catalog_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleCatalog>();
    }
}
