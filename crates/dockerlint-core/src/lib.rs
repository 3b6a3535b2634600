//! # dockerlint-core
//!
//! Rule engine for linting Dockerfiles.
//!
//! This crate provides:
//!
//! - [`RuleCatalog`] for loading and compiling rule definitions
//! - [`Linter`] for scanning one Dockerfile into a deduplicated issue list
//! - [`Analyzer`] for linting a file or a directory tree of Dockerfiles
//! - [`Issue`] and [`LintResult`] for representing findings
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use dockerlint_core::{Linter, RuleCatalog};
//!
//! let catalog = RuleCatalog::from_json(r#"[
//!     {"title": "Avoid latest tag", "category": "Base Image Selection & Versioning",
//!      "regex_pattern": "^FROM\\s+\\S+:latest", "description": "", "suggestion": ""}
//! ]"#)?;
//! let linter = Linter::new(Arc::new(catalog));
//! let issues = linter.run("FROM node:latest\n");
//! assert_eq!(issues[0].rule.id().as_str(), "DL001");
//! # Ok::<(), dockerlint_core::CatalogError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
pub mod catalog;
mod config;
mod context;
mod engine;
pub mod instruction;
mod rule;
mod types;

pub use analyzer::{Analyzer, AnalyzerBuilder, LintError, DOCKERFILE_GLOBS};
pub use catalog::{CatalogDiagnostic, CatalogError, RuleCatalog, RuleDefinition};
pub use config::{Config, ConfigError, LinterConfig, PinsConfig, RuleConfig};
pub use context::{FileContext, LineKind, SourceLine};
pub use engine::{Linter, NO_FROM_CONTENT, NO_USER_CONTENT};
pub use rule::{compile_pattern, Category, Rule, RuleBuilder, RuleId, RuleRole, RuleScope};
pub use types::{
    FileReport, Issue, IssueDiagnostic, IssueRecord, LintResult, Severity, SeverityCounts,
};
