//! Definition → compiled rule conversion.
//!
//! Every problem is reported as a [`CatalogDiagnostic`]; a definition that
//! cannot be compiled is skipped and the rest still load.

use tracing::warn;

use super::definition::{DefinitionEntry, RuleDefinition};
use super::CatalogDiagnostic;
use crate::rule::{compile_pattern, Category, Rule, RuleId, RuleRole, RuleScope};

/// Compiles definitions in order, assigning ids by position.
///
/// Skipped definitions still consume their id, so later ids do not shift
/// when one rule is broken.
pub(crate) fn compile_all(
    entries: impl IntoIterator<Item = DefinitionEntry>,
    diagnostics: &mut Vec<CatalogDiagnostic>,
) -> Vec<Rule> {
    let mut rules = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let id = RuleId::from_index(index);
        let compiled = match entry {
            Ok(definition) => compile(definition, id, diagnostics),
            Err(reason) => Err(CatalogDiagnostic::InvalidDefinition { id, reason }),
        };
        match compiled {
            Ok(rule) => rules.push(rule),
            Err(diagnostic) => {
                warn!("Skipping rule: {diagnostic}");
                diagnostics.push(diagnostic);
            }
        }
    }
    rules
}

/// Compiles one definition.
///
/// Non-fatal problems (an unknown role) are pushed to `diagnostics` and the
/// rule is kept; fatal ones are returned as the error.
fn compile(
    definition: RuleDefinition,
    id: RuleId,
    diagnostics: &mut Vec<CatalogDiagnostic>,
) -> Result<Rule, CatalogDiagnostic> {
    let title = definition.title.trim().to_string();
    if title.is_empty() {
        return Err(CatalogDiagnostic::InvalidDefinition {
            id,
            reason: "title must not be empty".to_string(),
        });
    }

    let scope = match definition.scope.as_deref() {
        None => RuleScope::Line,
        Some(value) => RuleScope::parse(value).ok_or_else(|| CatalogDiagnostic::UnknownScope {
            id: id.clone(),
            value: value.to_string(),
        })?,
    };

    let role = definition.role.as_deref().and_then(|value| {
        let role = RuleRole::parse(value);
        if role.is_none() {
            let diagnostic = CatalogDiagnostic::UnknownRole {
                id: id.clone(),
                value: value.to_string(),
            };
            warn!("{diagnostic}");
            diagnostics.push(diagnostic);
        }
        role
    });
    if let Some(role) = role.filter(|_| scope == RuleScope::File) {
        return Err(CatalogDiagnostic::FileScopedRole { id, role });
    }

    let category = definition
        .category
        .as_deref()
        .map(Category::from_label)
        .unwrap_or_default();

    let mut builder = Rule::builder(id.clone(), title.clone())
        .description(definition.description)
        .category(category)
        .suggestion(definition.suggestion)
        .scope(scope);
    if let Some(name) = definition.name.filter(|n| !n.trim().is_empty()) {
        builder = builder.name(name.trim());
    }
    if let Some(role) = role {
        builder = builder.role(role);
    }

    let pattern = definition.regex_pattern.trim();
    if pattern.is_empty() {
        // Role-bound rules are fired by the engine and may omit a pattern.
        if role.is_none() {
            return Err(CatalogDiagnostic::MissingPattern { id, title });
        }
    } else {
        let compiled = compile_pattern(pattern).map_err(|e| CatalogDiagnostic::InvalidPattern {
            id: id.clone(),
            title: title.clone(),
            field: "regex_pattern",
            reason: e.to_string(),
        })?;
        builder = builder.pattern(compiled);
    }

    if let Some(unless) = definition
        .unless_pattern
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
    {
        let compiled = compile_pattern(unless).map_err(|e| CatalogDiagnostic::InvalidPattern {
            id,
            title,
            field: "unless_pattern",
            reason: e.to_string(),
        })?;
        builder = builder.unless(compiled);
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    fn def(title: &str, pattern: &str) -> RuleDefinition {
        RuleDefinition {
            title: title.to_string(),
            regex_pattern: pattern.to_string(),
            ..RuleDefinition::default()
        }
    }

    fn compile_one(definition: RuleDefinition) -> (Vec<Rule>, Vec<CatalogDiagnostic>) {
        let mut diagnostics = Vec::new();
        let rules = compile_all([Ok(definition)], &mut diagnostics);
        (rules, diagnostics)
    }

    #[test]
    fn compiles_valid_definition() {
        let mut definition = def("Avoid latest", r"^\s*FROM\s+\S+:latest$");
        definition.category = Some("Base Image Selection & Versioning".to_string());
        let (rules, diagnostics) = compile_one(definition);
        assert!(diagnostics.is_empty());
        assert_eq!(rules[0].id().as_str(), "DL001");
        assert_eq!(rules[0].severity(), Severity::High);
        assert!(rules[0].matches("from node:latest"));
    }

    #[test]
    fn missing_category_defaults_to_maintainability() {
        let (rules, _) = compile_one(def("x", "y"));
        assert_eq!(rules[0].category(), &Category::Maintainability);
        assert_eq!(rules[0].severity(), Severity::Medium);
    }

    #[test]
    fn invalid_pattern_is_skipped_and_ids_stay_stable() {
        let mut diagnostics = Vec::new();
        let rules = compile_all(
            [
                Ok(def("first", "a")),
                Ok(def("broken", "(unclosed")),
                Ok(def("third", "c")),
            ],
            &mut diagnostics,
        );
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].id().as_str(), "DL003");
        assert!(matches!(
            diagnostics.as_slice(),
            [CatalogDiagnostic::InvalidPattern { field: "regex_pattern", .. }]
        ));
    }

    #[test]
    fn lookahead_pattern_is_reported_invalid() {
        let (rules, diagnostics) = compile_one(def("lookahead", r"^ADD\s+(?!--chown)"));
        assert!(rules.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn invalid_unless_pattern_is_skipped() {
        let mut definition = def("x", "y");
        definition.unless_pattern = Some("[".to_string());
        let (rules, diagnostics) = compile_one(definition);
        assert!(rules.is_empty());
        assert!(matches!(
            diagnostics.as_slice(),
            [CatalogDiagnostic::InvalidPattern { field: "unless_pattern", .. }]
        ));
    }

    #[test]
    fn empty_pattern_allowed_only_with_role() {
        let (rules, diagnostics) = compile_one(def("no pattern", ""));
        assert!(rules.is_empty());
        assert!(matches!(
            diagnostics.as_slice(),
            [CatalogDiagnostic::MissingPattern { .. }]
        ));

        let mut definition = def("combine", "");
        definition.role = Some("combine_runs".to_string());
        let (rules, diagnostics) = compile_one(definition);
        assert!(diagnostics.is_empty());
        assert_eq!(rules[0].role(), Some(RuleRole::CombineRuns));
        assert!(rules[0].pattern().is_none());
    }

    #[test]
    fn unknown_role_keeps_rule_without_role() {
        let mut definition = def("x", "y");
        definition.role = Some("teleport".to_string());
        let (rules, diagnostics) = compile_one(definition);
        assert_eq!(rules.len(), 1);
        assert!(rules[0].role().is_none());
        assert!(matches!(
            diagnostics.as_slice(),
            [CatalogDiagnostic::UnknownRole { .. }]
        ));
    }

    #[test]
    fn unknown_scope_is_skipped() {
        let mut definition = def("x", "y");
        definition.scope = Some("paragraph".to_string());
        let (rules, diagnostics) = compile_one(definition);
        assert!(rules.is_empty());
        assert!(matches!(
            diagnostics.as_slice(),
            [CatalogDiagnostic::UnknownScope { .. }]
        ));
    }

    #[test]
    fn unreadable_record_is_reported() {
        let mut diagnostics = Vec::new();
        let rules = compile_all([Err("missing field `title`".to_string())], &mut diagnostics);
        assert!(rules.is_empty());
        assert!(matches!(
            diagnostics.as_slice(),
            [CatalogDiagnostic::InvalidDefinition { .. }]
        ));
    }

    #[test]
    fn file_scoped_rule_with_role_is_skipped() {
        let mut definition = def("multi-stage", r"^FROM\s");
        definition.scope = Some("file".to_string());
        definition.role = Some("multi_stage_build".to_string());
        let (rules, diagnostics) = compile_one(definition);
        assert!(rules.is_empty());
        assert!(matches!(
            diagnostics.as_slice(),
            [CatalogDiagnostic::FileScopedRole {
                role: RuleRole::MultiStageBuild,
                ..
            }]
        ));
    }
}
