//! Per-line rule evaluation and instruction flags.

use tracing::trace;

use super::ScanState;
use crate::catalog::RuleCatalog;
use crate::context::{LineKind, SourceLine};
use crate::instruction;
use crate::rule::{RuleRole, RuleScope};

/// Scans one physical line.
///
/// Order within a line: a run closed by this line, then flag-driven
/// issues, then pattern matches.
pub(crate) fn scan_line(catalog: &RuleCatalog, line: &SourceLine<'_>, state: &mut ScanState<'_>) {
    if !line.is_scannable() {
        return;
    }
    if let Some(run) = state.runs.feed(line) {
        state.fire(catalog, RuleRole::CombineRuns, run.line, &run.content);
    }

    let trimmed = line.trimmed();
    let command = match &line.kind {
        LineKind::Instruction(keyword) => {
            state.current_keyword = Some(keyword.clone());
            instruction::arguments(trimmed)
        }
        _ => trimmed,
    };

    match state.current_keyword.as_deref() {
        Some("USER") if line.keyword().is_some() => {
            state.has_user = true;
            if instruction::is_root_user(trimmed) {
                state.fire(catalog, RuleRole::NonRootUser, line.number, trimmed);
            }
        }
        Some("RUN") if instruction::has_cd_subcommand(command) => {
            state.fire(catalog, RuleRole::WorkdirOverCd, line.number, trimmed);
        }
        _ => {}
    }

    for rule in catalog.rules() {
        if rule.scope() != RuleScope::Line || !rule.role().map_or(true, RuleRole::scans_lines) {
            continue;
        }
        if rule.matches(trimmed) && state.collector.record(line.number, rule, trimmed) {
            trace!(line = line.number, rule = %rule.id(), "Pattern matched");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileContext;
    use crate::rule::{compile_pattern, Rule, RuleId};
    use std::collections::HashSet;

    fn catalog() -> RuleCatalog {
        RuleCatalog::from_rules([
            Rule::builder(RuleId::from_index(0), "Avoid latest")
                .pattern(compile_pattern(r"^FROM\s+\S+:latest\b").unwrap())
                .build(),
            Rule::builder(RuleId::from_index(1), "Non-root user")
                .pattern(compile_pattern(r"^USER\s+root\b").unwrap())
                .role(RuleRole::NonRootUser)
                .build(),
            Rule::builder(RuleId::from_index(2), "Use WORKDIR")
                .pattern(compile_pattern(r"\bcd\b").unwrap())
                .role(RuleRole::WorkdirOverCd)
                .build(),
            Rule::builder(RuleId::from_index(3), "Multi-stage")
                .pattern(compile_pattern(r"^FROM").unwrap())
                .role(RuleRole::MultiStageBuild)
                .build(),
        ])
    }

    fn scan(content: &str) -> (Vec<(usize, String)>, bool) {
        let catalog = catalog();
        let disabled = HashSet::new();
        let mut state = ScanState::new(&disabled);
        let ctx = FileContext::new(content);
        for line in &ctx.lines {
            scan_line(&catalog, line, &mut state);
        }
        let has_user = state.has_user;
        let issues = state
            .collector
            .into_issues()
            .into_iter()
            .map(|i| (i.line_number, i.rule.id().to_string()))
            .collect();
        (issues, has_user)
    }

    #[test]
    fn pattern_rule_fires_on_trimmed_line() {
        let (issues, _) = scan("  FROM node:latest  \n");
        assert!(issues.contains(&(1, "DL001".to_string())));
    }

    #[test]
    fn root_user_fires_once_per_line() {
        let (issues, has_user) = scan("USER root\n");
        assert!(has_user);
        assert_eq!(
            issues.iter().filter(|(_, id)| id == "DL002").count(),
            1
        );
    }

    #[test]
    fn uid_zero_fires_through_flag() {
        let (issues, _) = scan("USER 0\n");
        assert_eq!(issues, vec![(1, "DL002".to_string())]);
    }

    #[test]
    fn cd_in_run_fires_workdir_rule() {
        let (issues, _) = scan("RUN cd /app && make\nRUN echo cd\n");
        assert_eq!(issues, vec![(1, "DL003".to_string())]);
    }

    #[test]
    fn cd_on_continuation_of_run_fires_at_that_line() {
        let (issues, _) = scan("RUN apt-get update \\\n  && cd /src\n");
        assert_eq!(issues, vec![(2, "DL003".to_string())]);
    }

    #[test]
    fn multi_stage_rule_never_fires_per_line() {
        let (issues, _) = scan("FROM debian:12\n");
        assert!(issues.iter().all(|(_, id)| id != "DL004"));
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let (issues, has_user) = scan("# USER root\n\n# FROM x:latest\n");
        assert!(issues.is_empty());
        assert!(!has_user);
    }
}
