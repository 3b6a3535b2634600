//! Rule records.
//!
//! A rule is plain data: a compiled pattern plus display text. How the engine
//! uses it is decided by two tags, [`RuleScope`] and [`RuleRole`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Severity;

/// Stable identifier assigned to a rule at catalog load time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    /// Builds the identifier for the definition at `index` (0-based).
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(format!("DL{:03}", index + 1))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rule category. Determines severity through a fixed table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// "Security Best Practices"
    SecurityBestPractices,
    /// "Base Image Selection & Versioning"
    BaseImage,
    /// "Dependency Management"
    DependencyManagement,
    /// "Build Optimization"
    BuildOptimization,
    /// "Maintainability"
    #[default]
    Maintainability,
    /// "CI/CD & Best Practices"
    CiCd,
    /// Any label outside the closed set.
    Unrecognized(String),
}

impl Category {
    const TABLE: [(&'static str, Category, Severity); 6] = [
        (
            "Security Best Practices",
            Category::SecurityBestPractices,
            Severity::Critical,
        ),
        (
            "Base Image Selection & Versioning",
            Category::BaseImage,
            Severity::High,
        ),
        (
            "Dependency Management",
            Category::DependencyManagement,
            Severity::High,
        ),
        (
            "Build Optimization",
            Category::BuildOptimization,
            Severity::Medium,
        ),
        ("Maintainability", Category::Maintainability, Severity::Medium),
        ("CI/CD & Best Practices", Category::CiCd, Severity::Low),
    ];

    /// Parses a category label. Matching is exact after trimming.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::TABLE
            .iter()
            .find(|(text, _, _)| *text == label)
            .map_or_else(
                || Self::Unrecognized(label.to_string()),
                |(_, category, _)| category.clone(),
            )
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Unrecognized(label) => label,
            known => Self::TABLE
                .iter()
                .find(|(_, category, _)| category == known)
                .map_or("", |(text, _, _)| *text),
        }
    }

    /// Severity for this category. Unrecognized categories are [`Severity::Low`].
    #[must_use]
    pub fn severity(&self) -> Severity {
        Self::TABLE
            .iter()
            .find(|(_, category, _)| category == self)
            .map_or(Severity::Low, |(_, _, severity)| *severity)
    }
}

/// Where a rule's pattern is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleScope {
    /// Against each trimmed, non-blank, non-comment line.
    #[default]
    Line,
    /// Against the whole file text.
    File,
}

impl RuleScope {
    /// Parses `"line"` or `"file"`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "line" => Some(Self::Line),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

/// Binds a rule to one of the engine's built-in checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleRole {
    /// Fired for `USER root` lines and when no `USER` instruction exists.
    NonRootUser,
    /// Fired once when no named build stage exists.
    MultiStageBuild,
    /// Fired once per run of consecutive `RUN` instructions.
    CombineRuns,
    /// Fired for `RUN cd ...` lines.
    WorkdirOverCd,
}

impl RuleRole {
    /// Every role, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::NonRootUser,
        Self::MultiStageBuild,
        Self::CombineRuns,
        Self::WorkdirOverCd,
    ];

    /// Parses a role key such as `"non_root_user"`.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.key() == key.trim().replace('-', "_"))
    }

    /// Key used in rule definitions.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::NonRootUser => "non_root_user",
            Self::MultiStageBuild => "multi_stage_build",
            Self::CombineRuns => "combine_runs",
            Self::WorkdirOverCd => "workdir_over_cd",
        }
    }

    /// Whether the generic per-line pattern pass evaluates rules with this role.
    ///
    /// Flag-driven and global-only roles are fired by the engine itself.
    #[must_use]
    pub fn scans_lines(self) -> bool {
        matches!(self, Self::NonRootUser)
    }
}

impl fmt::Display for RuleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A compiled lint rule.
#[derive(Debug, Clone)]
pub struct Rule {
    id: RuleId,
    name: Option<String>,
    title: String,
    description: String,
    category: Category,
    suggestion: String,
    pattern: Option<Regex>,
    unless: Option<Regex>,
    scope: RuleScope,
    role: Option<RuleRole>,
}

impl Rule {
    /// Starts building a rule.
    #[must_use]
    pub fn builder(id: RuleId, title: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            rule: Self {
                id,
                name: None,
                title: title.into(),
                description: String::new(),
                category: Category::default(),
                suggestion: String::new(),
                pattern: None,
                unless: None,
                scope: RuleScope::Line,
                role: None,
            },
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> &RuleId {
        &self.id
    }

    /// Optional kebab-case name (e.g., "avoid-latest-tag").
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// What the rule checks.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Rule category.
    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Severity derived from the category.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.category.severity()
    }

    /// Remediation text.
    #[must_use]
    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }

    /// Compiled pattern, if any.
    #[must_use]
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Compiled exclusion pattern, if any.
    #[must_use]
    pub fn unless(&self) -> Option<&Regex> {
        self.unless.as_ref()
    }

    /// Evaluation scope.
    #[must_use]
    pub fn scope(&self) -> RuleScope {
        self.scope
    }

    /// Engine role, if any.
    #[must_use]
    pub fn role(&self) -> Option<RuleRole> {
        self.role
    }

    /// Returns true if this rule can be identified by `key` (id or name).
    #[must_use]
    pub fn is_named(&self, key: &str) -> bool {
        self.id.as_str() == key || self.name.as_deref() == Some(key)
    }

    /// Does `text` match this rule?
    ///
    /// True when the pattern matches and the exclusion pattern, if present,
    /// does not. A rule without a pattern never matches.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let Some(pattern) = &self.pattern else {
            return false;
        };
        pattern.is_match(text) && !self.unless.as_ref().is_some_and(|u| u.is_match(text))
    }

    pub(crate) fn clear_role(&mut self) {
        self.role = None;
    }
}

/// Builder for [`Rule`].
#[derive(Debug)]
pub struct RuleBuilder {
    rule: Rule,
}

impl RuleBuilder {
    /// Sets the kebab-case name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.rule.name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.rule.description = description.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.rule.category = category;
        self
    }

    /// Sets the remediation text.
    #[must_use]
    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.rule.suggestion = suggestion.into();
        self
    }

    /// Sets the compiled pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.rule.pattern = Some(pattern);
        self
    }

    /// Sets the compiled exclusion pattern.
    #[must_use]
    pub fn unless(mut self, unless: Regex) -> Self {
        self.rule.unless = Some(unless);
        self
    }

    /// Sets the evaluation scope.
    #[must_use]
    pub fn scope(mut self, scope: RuleScope) -> Self {
        self.rule.scope = scope;
        self
    }

    /// Sets the engine role.
    #[must_use]
    pub fn role(mut self, role: RuleRole) -> Self {
        self.rule.role = Some(role);
        self
    }

    /// Finishes the rule.
    #[must_use]
    pub fn build(self) -> Rule {
        self.rule
    }
}

/// Compiles a rule pattern: case-insensitive, multi-line.
///
/// # Errors
///
/// Returns the regex error if the pattern is invalid.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
}
