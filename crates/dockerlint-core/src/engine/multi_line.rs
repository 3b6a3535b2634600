//! Whole-file pattern matching for file-scoped rules.

use super::collector::IssueCollector;
use crate::catalog::RuleCatalog;
use crate::rule::RuleScope;

/// Runs every file-scoped rule over the full text.
///
/// Role-bound rules are skipped; the line scan and global checks fire them.
/// Each match is anchored at the line where it starts. An `unless` match
/// anywhere in the text disables the rule for the file.
pub(crate) fn match_file(catalog: &RuleCatalog, content: &str, collector: &mut IssueCollector<'_>) {
    for rule in catalog.rules() {
        if rule.scope() != RuleScope::File || rule.role().is_some() || !collector.is_enabled(rule) {
            continue;
        }
        let Some(pattern) = rule.pattern() else {
            continue;
        };
        if rule.unless().is_some_and(|u| u.is_match(content)) {
            continue;
        }
        for found in pattern.find_iter(content) {
            let line = line_of(content, found.start());
            let first_line = found.as_str().lines().next().unwrap_or_default().trim();
            collector.record(line, rule, first_line);
        }
    }
}

/// 1-based line number of a byte offset.
fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}
