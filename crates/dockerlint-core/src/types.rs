//! Core types for lint issues and results.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize, Serializer};
use std::path::PathBuf;
use std::sync::Arc;

use crate::rule::Rule;

/// Severity level for lint issues.
///
/// Ordered `Low < Medium < High < Critical`. The ordering exists for grouping
/// and reporting; the engine never compares severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Style or process advice.
    Low,
    /// Build size, cache and maintainability problems.
    Medium,
    /// Reproducibility and dependency hygiene problems.
    High,
    /// Security problems.
    Critical,
}

impl Severity {
    /// All severities, most severe first.
    pub const DESCENDING: [Self; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    /// Parses a severity name, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Returns the upper-case label used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule violation found in a Dockerfile.
///
/// Holds a shared reference to the rule that produced it, so cloning an issue
/// never copies rule text.
#[derive(Debug, Clone)]
pub struct Issue {
    /// 1-based line number. `0` only for the synthesized issue of an empty file.
    pub line_number: usize,
    /// The rule that fired.
    pub rule: Arc<Rule>,
    /// Text of the offending line, or a synthesized description.
    pub line_content: String,
}

impl Issue {
    /// Creates a new issue.
    #[must_use]
    pub fn new(line_number: usize, rule: Arc<Rule>, line_content: impl Into<String>) -> Self {
        Self {
            line_number,
            rule,
            line_content: line_content.into(),
        }
    }

    /// Severity of the rule that fired.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.rule.severity()
    }

    /// Formats the issue for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at line {}\n",
            self.rule.id(),
            self.rule.title(),
            self.line_number,
        );
        let _ = writeln!(output, "  {}: {}", self.severity(), self.rule.description());
        if !self.line_content.is_empty() {
            let _ = writeln!(output, "  | {}", self.line_content);
        }
        if !self.rule.suggestion().is_empty() {
            let _ = writeln!(output, "  = help: {}", self.rule.suggestion());
        }
        output
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.line_number,
            self.severity(),
            self.rule.id(),
            self.rule.title()
        )
    }
}

impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        IssueRecord::from(self).serialize(serializer)
    }
}

/// Flat, renderer-facing view of an [`Issue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Line number of the issue.
    pub line_number: usize,
    /// Stable rule identifier (e.g., "DL004").
    pub rule_id: String,
    /// Rule title.
    pub title: String,
    /// What the rule checks.
    pub description: String,
    /// Severity derived from the rule category.
    pub severity: Severity,
    /// How to fix it.
    pub suggestion: String,
    /// Offending line or synthesized description.
    pub line_content: String,
}

impl From<&Issue> for IssueRecord {
    fn from(issue: &Issue) -> Self {
        Self {
            line_number: issue.line_number,
            rule_id: issue.rule.id().to_string(),
            title: issue.rule.title().to_string(),
            description: issue.rule.description().to_string(),
            severity: issue.severity(),
            suggestion: issue.rule.suggestion().to_string(),
            line_content: issue.line_content.clone(),
        }
    }
}

/// Converts an issue to a miette diagnostic for rich terminal display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{rule_id}] {title}")]
pub struct IssueDiagnostic {
    rule_id: String,
    title: String,
    #[help]
    help: Option<String>,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl IssueDiagnostic {
    /// Builds a diagnostic pointing at the issue's line within `content`.
    ///
    /// Synthesized issues whose line lies outside the file are anchored at the
    /// end of the content.
    #[must_use]
    pub fn new(issue: &Issue, file_name: &str, content: &str) -> Self {
        let (offset, length) = line_span(content, issue.line_number);
        let suggestion = issue.rule.suggestion();
        Self {
            rule_id: issue.rule.id().to_string(),
            title: issue.rule.title().to_string(),
            help: (!suggestion.is_empty()).then(|| suggestion.to_string()),
            source_code: NamedSource::new(file_name, content.to_string()),
            span: SourceSpan::from((offset, length)),
            label_message: format!("{}: {}", issue.severity(), issue.rule.description()),
        }
    }
}

/// Byte offset and length of the 1-based `line` in `content`.
fn line_span(content: &str, line: usize) -> (usize, usize) {
    let mut offset = 0;
    for (index, text) in content.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let body = text.trim_end_matches(['\n', '\r']);
            return (offset, body.len());
        }
        offset += text.len();
    }
    (content.len(), 0)
}

/// Counts of issues per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    /// Critical issues.
    pub critical: usize,
    /// High issues.
    pub high: usize,
    /// Medium issues.
    pub medium: usize,
    /// Low issues.
    pub low: usize,
}

impl SeverityCounts {
    /// Returns the count for one severity.
    #[must_use]
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// Total number of issues.
    #[must_use]
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }

    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

/// Issues found in one Dockerfile.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Path of the analyzed file.
    pub path: PathBuf,
    /// Issues in discovery order.
    pub issues: Vec<Issue>,
    /// File contents, kept for diagnostic rendering.
    #[serde(skip)]
    pub content: String,
}

impl FileReport {
    /// Creates a report for a scanned file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            path: path.into(),
            issues,
            content: content.into(),
        }
    }

    /// Issues grouped by severity, most severe first, discovery order within a group.
    #[must_use]
    pub fn grouped_by_severity(&self) -> Vec<(Severity, Vec<&Issue>)> {
        Severity::DESCENDING
            .iter()
            .map(|&severity| {
                let group = self
                    .issues
                    .iter()
                    .filter(|i| i.severity() == severity)
                    .collect::<Vec<_>>();
                (severity, group)
            })
            .filter(|(_, group)| !group.is_empty())
            .collect()
    }
}

/// Result of running lint analysis over one or more files.
#[derive(Debug, Default, Serialize)]
pub struct LintResult {
    /// Per-file reports in discovery order.
    pub files: Vec<FileReport>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file report.
    pub fn push(&mut self, report: FileReport) {
        self.files.push(report);
        self.files_checked += 1;
    }

    /// Iterates over every issue across all files.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.files.iter().flat_map(|f| f.issues.iter())
    }

    /// Total number of issues.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.files.iter().map(|f| f.issues.len()).sum()
    }

    /// Returns true if there are any critical issues.
    #[must_use]
    pub fn has_critical(&self) -> bool {
        self.issues().any(|i| i.severity() == Severity::Critical)
    }

    /// Checks if any issue meets or exceeds the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.issues().any(|i| i.severity() >= severity)
    }

    /// Returns issues filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Issue> {
        self.issues().filter(|i| i.severity() == severity).collect()
    }

    /// Counts issues by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for issue in self.issues() {
            counts.add(issue.severity());
        }
        counts
    }

    /// Adds reports from another result.
    pub fn extend(&mut self, other: Self) {
        self.files.extend(other.files);
        self.files_checked += other.files_checked;
    }
}
