//! Ordered, deduplicated issue accumulation.

use std::collections::HashSet;
use std::sync::Arc;

use crate::rule::{Rule, RuleId};
use crate::types::Issue;

/// Collects issues in discovery order.
///
/// Refuses a second issue for the same `(line, rule)` pair and any issue
/// for a disabled rule.
#[derive(Debug)]
pub(crate) struct IssueCollector<'a> {
    issues: Vec<Issue>,
    seen: HashSet<(usize, RuleId)>,
    disabled: &'a HashSet<RuleId>,
}

impl<'a> IssueCollector<'a> {
    pub(crate) fn new(disabled: &'a HashSet<RuleId>) -> Self {
        Self {
            issues: Vec::new(),
            seen: HashSet::new(),
            disabled,
        }
    }

    /// Returns true if `rule` may fire in this scan.
    pub(crate) fn is_enabled(&self, rule: &Rule) -> bool {
        !self.disabled.contains(rule.id())
    }

    /// Records an issue. Returns false if it was refused.
    pub(crate) fn record(&mut self, line: usize, rule: &Arc<Rule>, content: &str) -> bool {
        if !self.is_enabled(rule) {
            return false;
        }
        if !self.seen.insert((line, rule.id().clone())) {
            return false;
        }
        self.issues.push(Issue::new(line, Arc::clone(rule), content));
        true
    }

    pub(crate) fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}
