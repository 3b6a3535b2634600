//! Text-level helpers for Dockerfile instructions.
//!
//! Lines are treated as text, not parsed into a syntax tree. These helpers
//! are shared by the scan engine and the pin validator.

/// Returns the instruction keyword of a line, upper-cased.
///
/// Returns `None` for blank lines and `#` comments.
#[must_use]
pub fn keyword(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    trimmed
        .split_whitespace()
        .next()
        .map(str::to_ascii_uppercase)
}

/// Returns true if the line starts with `keyword` (case-insensitive) as a whole word.
#[must_use]
pub fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed
        .split_whitespace()
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case(keyword))
}

/// Text after the instruction keyword, trimmed.
#[must_use]
pub fn arguments(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .find(char::is_whitespace)
        .map_or("", |at| trimmed[at..].trim())
}

/// Returns true if the line ends with a `\` continuation marker.
#[must_use]
pub fn continues(line: &str) -> bool {
    line.trim_end().ends_with('\\')
}

/// A parsed `FROM` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FromInstruction<'a> {
    /// Image reference (e.g., `python:3.12-slim`).
    pub image: &'a str,
    /// Stage name from `AS <name>`.
    pub stage: Option<&'a str>,
}

/// Parses a `FROM [--flag=value]... <image> [AS <name>]` line.
///
/// Returns `None` if the line is not a `FROM` instruction or has no image.
#[must_use]
pub fn parse_from(line: &str) -> Option<FromInstruction<'_>> {
    if !starts_with_keyword(line, "FROM") {
        return None;
    }
    let mut tokens = arguments(line)
        .split_whitespace()
        .skip_while(|t| t.starts_with("--"));
    let image = tokens.next()?;
    let stage = match (tokens.next(), tokens.next()) {
        (Some(kw), Some(name)) if kw.eq_ignore_ascii_case("AS") => Some(name),
        _ => None,
    };
    Some(FromInstruction { image, stage })
}

/// Returns true if a `USER` line switches to root (`root` or uid `0`).
///
/// A `user:group` value is judged by its user part.
#[must_use]
pub fn is_root_user(line: &str) -> bool {
    if !starts_with_keyword(line, "USER") {
        return false;
    }
    let user = arguments(line)
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default();
    user.eq_ignore_ascii_case("root") || user == "0"
}

/// Returns true if a shell command contains a `cd` sub-command.
///
/// Sub-commands are separated by `&&`, `||` or `;`.
#[must_use]
pub fn has_cd_subcommand(command: &str) -> bool {
    command
        .split("&&")
        .flat_map(|part| part.split("||"))
        .flat_map(|part| part.split(';'))
        .any(|part| part.split_whitespace().next() == Some("cd"))
}
