//! The scan engine.
//!
//! ```text
//! text ─ FileContext ─┬─ LineScanner ─┬─ RunAccumulator ─┐
//!                     │               └──────────────────┤
//!                     ├─ MultiLineMatcher ───────────────┤─ IssueCollector ─ Vec<Issue>
//!                     └─ GlobalInvariantChecker ─────────┘
//! ```
//!
//! All per-file state lives in a [`ScanState`] created for one run and
//! dropped at its end, so a [`Linter`] can be shared freely.

mod collector;
mod invariants;
mod line_scanner;
mod multi_line;
mod run_accumulator;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::analyzer::LintError;
use crate::catalog::RuleCatalog;
use crate::config::Config;
use crate::context::FileContext;
use crate::rule::{RuleId, RuleRole};
use crate::types::{FileReport, Issue};

use collector::IssueCollector;
use run_accumulator::RunAccumulator;

pub use invariants::{NO_FROM_CONTENT, NO_USER_CONTENT};

/// Mutable state for scanning one file.
#[derive(Debug)]
pub(crate) struct ScanState<'a> {
    collector: IssueCollector<'a>,
    runs: RunAccumulator,
    current_keyword: Option<String>,
    has_user: bool,
}

impl<'a> ScanState<'a> {
    pub(crate) fn new(disabled: &'a HashSet<RuleId>) -> Self {
        Self {
            collector: IssueCollector::new(disabled),
            runs: RunAccumulator::new("RUN"),
            current_keyword: None,
            has_user: false,
        }
    }

    /// Records an issue for the rule holding `role`, if one exists.
    fn fire(&mut self, catalog: &RuleCatalog, role: RuleRole, line: usize, content: &str) {
        if let Some(rule) = catalog.by_role(role) {
            self.collector.record(line, rule, content);
        }
    }
}

/// Lints Dockerfile text against a shared rule catalog.
#[derive(Debug, Clone)]
pub struct Linter {
    catalog: Arc<RuleCatalog>,
    disabled: HashSet<RuleId>,
}

impl Linter {
    /// Creates a linter with every rule enabled.
    #[must_use]
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self {
            catalog,
            disabled: HashSet::new(),
        }
    }

    /// Creates a linter honoring `[rules.<key>] enabled = false` entries.
    ///
    /// Keys naming no rule are logged and ignored.
    #[must_use]
    pub fn with_config(catalog: Arc<RuleCatalog>, config: &Config) -> Self {
        config
            .disabled_rules()
            .fold(Self::new(catalog), |linter, key| linter.disable(key))
    }

    /// Disables a rule by id or name.
    #[must_use]
    pub fn disable(mut self, key: &str) -> Self {
        match self.catalog.get(key) {
            Some(rule) => {
                debug!("Disabling rule {} ({})", rule.id(), rule.title());
                self.disabled.insert(rule.id().clone());
            }
            None => warn!("Cannot disable unknown rule `{key}`"),
        }
        self
    }

    /// The catalog this linter scans with.
    #[must_use]
    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Returns true if the rule with `id` is enabled.
    #[must_use]
    pub fn is_enabled(&self, id: &RuleId) -> bool {
        !self.disabled.contains(id)
    }

    /// Scans Dockerfile text and returns issues in discovery order.
    ///
    /// Order: line matches and run closures in line order, then whole-file
    /// matches, then the user-presence and named-stage checks.
    #[must_use]
    pub fn run(&self, content: &str) -> Vec<Issue> {
        let ctx = FileContext::new(content);
        let mut state = ScanState::new(&self.disabled);

        for line in &ctx.lines {
            line_scanner::scan_line(&self.catalog, line, &mut state);
        }
        if let Some(run) = state.runs.finish() {
            state.fire(&self.catalog, RuleRole::CombineRuns, run.line, &run.content);
        }

        multi_line::match_file(&self.catalog, content, &mut state.collector);
        invariants::check(&self.catalog, &ctx, &mut state);

        state.collector.into_issues()
    }

    /// Reads and scans one file.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::NotFound`] if the file does not exist, before any
    /// scanning, or [`LintError::Io`] if it cannot be read.
    pub fn lint_file(&self, path: &Path) -> Result<FileReport, LintError> {
        if !path.is_file() {
            return Err(LintError::NotFound {
                path: path.to_path_buf(),
            });
        }
        debug!("Linting: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let issues = self.run(&content);
        Ok(FileReport::new(path, content, issues))
    }
}
