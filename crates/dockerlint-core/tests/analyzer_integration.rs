//! Integration test: catalog file → Analyzer → per-file reports.

use dockerlint_core::{Analyzer, Config, LintError, RuleCatalog, Severity};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const RULES: &str = r#"[
  {"title": "Avoid latest tag", "category": "Base Image Selection & Versioning",
   "regex_pattern": "^FROM\\s+\\S+:latest\\b", "name": "avoid-latest-tag",
   "description": "Pin base images", "suggestion": "Use a versioned tag"},
  {"title": "Run as non-root user", "category": "Security Best Practices",
   "regex_pattern": "^USER\\s+root\\b", "role": "non_root_user",
   "description": "Containers should not run as root", "suggestion": "Add USER app"},
  {"title": "Broken rule", "regex_pattern": "(unclosed"},
  {"title": "Use multi-stage builds", "category": "Build Optimization",
   "regex_pattern": "", "role": "multi_stage_build",
   "description": "Separate build and runtime", "suggestion": "FROM x AS build"},
  {"title": "Combine RUN instructions", "category": "Build Optimization",
   "regex_pattern": "", "role": "combine_runs",
   "description": "Each RUN adds a layer", "suggestion": "Chain commands with &&"},
  {"title": "Use --no-install-recommends", "category": "Dependency Management",
   "regex_pattern": "apt-get\\s+install", "unless_pattern": "--no-install-recommends",
   "description": "Avoid extra packages", "suggestion": "Add --no-install-recommends"}
]"#;

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn catalog(dir: &Path) -> Arc<RuleCatalog> {
    write(dir, "rules.json", RULES);
    Arc::new(RuleCatalog::load(&dir.join("rules.json")))
}

#[test]
fn broken_rule_is_skipped_and_ids_are_stable() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog(dir.path());
    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.diagnostics().len(), 1);
    assert!(catalog.get("DL003").is_none());
    assert_eq!(catalog.get("DL006").unwrap().title(), "Use --no-install-recommends");
}

#[test]
fn analyzes_every_dockerfile_in_tree() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog(dir.path());
    write(
        dir.path(),
        "Dockerfile",
        "FROM python:latest\nRUN apt-get update\nRUN apt-get install -y curl\nUSER root\n",
    );
    write(
        dir.path(),
        "services/api/Dockerfile.prod",
        "FROM rust:1.80 AS build\nRUN cargo build\nFROM debian:12\nUSER app\n",
    );
    write(dir.path(), "web.Dockerfile", "FROM node:20\n");
    write(dir.path(), "node_modules/pkg/Dockerfile", "FROM x:latest\n");
    write(dir.path(), "README.md", "FROM x:latest\n");

    let analyzer = Analyzer::builder()
        .root(dir.path())
        .catalog(catalog)
        .build()
        .unwrap();
    let result = analyzer.analyze().unwrap();

    assert_eq!(result.files_checked, 3);

    let root_report = result
        .files
        .iter()
        .find(|f| f.path.ends_with("Dockerfile") && f.path.parent() == Some(dir.path()))
        .unwrap();
    let found: Vec<(&str, usize)> = root_report
        .issues
        .iter()
        .map(|i| (i.rule.id().as_str(), i.line_number))
        .collect();
    assert_eq!(
        found,
        vec![
            ("DL001", 1),
            ("DL006", 3),
            ("DL005", 2),
            ("DL002", 4),
            ("DL004", 1),
        ]
    );

    let prod = result
        .files
        .iter()
        .find(|f| f.path.ends_with("Dockerfile.prod"))
        .unwrap();
    assert!(prod.issues.is_empty());

    let web = result
        .files
        .iter()
        .find(|f| f.path.ends_with("web.Dockerfile"))
        .unwrap();
    let web_ids: Vec<_> = web.issues.iter().map(|i| i.rule.id().as_str()).collect();
    assert_eq!(web_ids, vec!["DL002", "DL004"]);

    assert!(result.has_critical());
    assert_eq!(result.count_by_severity().critical, 2);
}

#[test]
fn config_disables_rule_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog(dir.path());
    write(dir.path(), "Dockerfile", "FROM python:latest AS app\nUSER app\n");

    let config = Config::parse("[rules.avoid-latest-tag]\nenabled = false\n").unwrap();
    let analyzer = Analyzer::builder()
        .root(dir.path().join("Dockerfile"))
        .catalog(catalog)
        .config(config)
        .build()
        .unwrap();
    let result = analyzer.analyze().unwrap();
    assert_eq!(result.files_checked, 1);
    assert_eq!(result.issue_count(), 0);
    assert!(!result.has_violations_at(Severity::Low));
}

#[test]
fn missing_path_is_explicit_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = Analyzer::builder()
        .root(dir.path().join("missing"))
        .build()
        .unwrap();
    match analyzer.analyze() {
        Err(LintError::NotFound { path }) => assert!(path.ends_with("missing")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}
