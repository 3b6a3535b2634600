//! # dockerlint-rules
//!
//! Built-in Dockerfile lint rules for dockerlint.
//!
//! The rules are plain data (`rules/builtin.json`), loaded through the same
//! path as user-supplied catalogs.
//!
//! ## Available Rules
//!
//! | Code | Name | Category |
//! |------|------|----------|
//! | DL001 | `avoid-latest-tag` | Base Image Selection & Versioning |
//! | DL002 | `pin-base-image` | Base Image Selection & Versioning |
//! | DL003 | `non-root-user` | Security Best Practices |
//! | DL004 | `multi-stage-build` | Build Optimization |
//! | DL005 | `combine-run-instructions` | Build Optimization |
//! | DL006 | `workdir-over-cd` | Maintainability |
//! | DL007 | `no-sensitive-ports` | Security Best Practices |
//! | DL008 | `no-secrets-in-env` | Security Best Practices |
//! | DL009 | `apt-update-alone` | Dependency Management |
//! | DL010 | `apt-no-install-recommends` | Dependency Management |
//! | DL011 | `split-update-install` | Dependency Management |
//! | DL012 | `apt-clean-lists` | Build Optimization |
//! | DL013 | `unnecessary-packages` | Build Optimization |
//! | DL014 | `dockerignore` | Build Optimization |
//! | DL015 | `copy-over-add` | Maintainability |
//! | DL016 | `non-ephemeral-writes` | Maintainability |
//! | DL017 | `single-process` | Maintainability |
//! | DL018 | `empty-env` | CI/CD & Best Practices |
//! | DL019 | `absolute-workdir` | CI/CD & Best Practices |
//! | DL020 | `healthcheck` | CI/CD & Best Practices |
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use dockerlint_core::Linter;
//!
//! let linter = Linter::new(Arc::new(dockerlint_rules::builtin_catalog()));
//! let issues = linter.run("FROM node:latest\n");
//! assert!(issues.iter().any(|i| i.rule.name() == Some("avoid-latest-tag")));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use dockerlint_core::RuleCatalog;
use tracing::warn;

/// The built-in rule definitions as a JSON array.
pub const BUILTIN_RULES_JSON: &str = include_str!("../rules/builtin.json");

/// Compiles the built-in catalog.
#[must_use]
pub fn builtin_catalog() -> RuleCatalog {
    RuleCatalog::from_json(BUILTIN_RULES_JSON).unwrap_or_else(|e| {
        warn!("Built-in rule catalog is unreadable: {e}");
        RuleCatalog::empty()
    })
}

/// Re-export core types for convenience.
pub use dockerlint_core::{Rule, RuleRole, Severity};
