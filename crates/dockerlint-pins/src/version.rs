//! Version match classification.

use serde::Serialize;
use std::fmt;

/// How a pinned version relates to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionMatch {
    /// No catalog entry accepts the version.
    NoMatch,
    /// A literal catalog version equals the pin.
    ExactStringMatch,
    /// A glob pattern accepts the pin.
    WildcardPatternMatch,
}

impl VersionMatch {
    /// Returns true if the pin is kept as written.
    #[must_use]
    pub fn keeps_pin(self) -> bool {
        self == Self::ExactStringMatch
    }

    /// Upper-case label used in summaries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoMatch => "NO_MATCH",
            Self::ExactStringMatch => "EXACT_STRING_MATCH",
            Self::WildcardPatternMatch => "WILDCARD_PATTERN_MATCH",
        }
    }
}

impl fmt::Display for VersionMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if a version pattern contains a glob metacharacter.
#[must_use]
pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// A catalog version pattern, compiled once.
#[derive(Debug, Clone)]
pub struct VersionPattern {
    text: String,
    glob: Option<glob::Pattern>,
}

impl VersionPattern {
    /// Compiles a pattern.
    ///
    /// Text containing `*`, `?` or `[` is always treated as a glob. If it
    /// does not compile (an unclosed `[` as in `1.[`), the pattern is kept
    /// but never matches, not even a version spelled exactly like it. This
    /// is stricter than `fnmatch`, which reads the stray `[` as a literal.
    /// A warning is logged so the catalog entry can be fixed.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let glob = if has_wildcard(&text) {
            match glob::Pattern::new(&text) {
                Ok(glob) => Some(glob),
                Err(e) => {
                    tracing::warn!("Invalid version pattern `{text}`: {e}");
                    None
                }
            }
        } else {
            None
        };
        Self { text, glob }
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Classifies `version` against this pattern alone.
    ///
    /// Returns `None` when the pattern does not accept the version.
    #[must_use]
    pub fn classify(&self, version: &str) -> Option<VersionMatch> {
        if has_wildcard(&self.text) {
            self.glob
                .as_ref()
                .filter(|g| g.matches(version))
                .map(|_| VersionMatch::WildcardPatternMatch)
        } else {
            (self.text == version).then_some(VersionMatch::ExactStringMatch)
        }
    }
}
