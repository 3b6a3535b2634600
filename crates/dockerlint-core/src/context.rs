//! Per-file view of a Dockerfile.

use crate::instruction;

/// How a physical line participates in the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace only.
    Blank,
    /// Starts with `#`.
    Comment,
    /// Starts an instruction; holds the upper-cased keyword.
    Instruction(String),
    /// Continues the previous instruction after a `\`.
    Continuation,
}

/// One physical line.
#[derive(Debug, Clone)]
pub struct SourceLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Line text without its terminator.
    pub text: &'a str,
    /// Line classification.
    pub kind: LineKind,
}

impl SourceLine<'_> {
    /// Trimmed text.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Instruction keyword, if this line starts an instruction.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        match &self.kind {
            LineKind::Instruction(keyword) => Some(keyword),
            _ => None,
        }
    }

    /// Returns true for lines the scanners evaluate.
    #[must_use]
    pub fn is_scannable(&self) -> bool {
        matches!(
            self.kind,
            LineKind::Instruction(_) | LineKind::Continuation
        )
    }
}

/// A Dockerfile split into classified lines.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Full file text.
    pub content: &'a str,
    /// Physical lines in order.
    pub lines: Vec<SourceLine<'a>>,
}

impl<'a> FileContext<'a> {
    /// Splits and classifies `content`.
    ///
    /// Comment lines inside a continued instruction do not end it.
    #[must_use]
    pub fn new(content: &'a str) -> Self {
        let mut continued = false;
        let lines = content
            .lines()
            .enumerate()
            .map(|(index, text)| {
                let trimmed = text.trim();
                let kind = if trimmed.is_empty() {
                    LineKind::Blank
                } else if trimmed.starts_with('#') {
                    LineKind::Comment
                } else if continued {
                    LineKind::Continuation
                } else {
                    instruction::keyword(trimmed).map_or(LineKind::Blank, LineKind::Instruction)
                };
                if !matches!(kind, LineKind::Blank | LineKind::Comment) {
                    continued = instruction::continues(text);
                }
                SourceLine {
                    number: index + 1,
                    text,
                    kind,
                }
            })
            .collect();
        Self { content, lines }
    }

    /// Number of physical lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Iterates over `FROM` instruction lines.
    pub fn from_lines(&self) -> impl Iterator<Item = &SourceLine<'a>> {
        self.lines.iter().filter(|l| l.keyword() == Some("FROM"))
    }

    /// First `FROM` instruction line.
    #[must_use]
    pub fn first_from(&self) -> Option<&SourceLine<'a>> {
        self.from_lines().next()
    }

    /// Returns true if any `FROM` line declares a named stage.
    #[must_use]
    pub fn has_named_stage(&self) -> bool {
        self.from_lines()
            .filter_map(|l| instruction::parse_from(l.text))
            .any(|from| from.stage.is_some())
    }

    /// Returns true if any line starts a `USER` instruction.
    #[must_use]
    pub fn has_user(&self) -> bool {
        self.lines.iter().any(|l| l.keyword() == Some("USER"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_lines() {
        let ctx = FileContext::new("FROM a\n\n# note\nRUN x \\\n  && y\nUSER app\n");
        let kinds: Vec<_> = ctx.lines.iter().map(|l| l.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Instruction("FROM".to_string()),
                LineKind::Blank,
                LineKind::Comment,
                LineKind::Instruction("RUN".to_string()),
                LineKind::Continuation,
                LineKind::Instruction("USER".to_string()),
            ]
        );
        assert_eq!(ctx.line_count(), 6);
        assert!(ctx.has_user());
    }

    #[test]
    fn comment_inside_continuation_keeps_it_open() {
        let ctx = FileContext::new("RUN a \\\n# inline\n  b\nUSER x");
        assert_eq!(ctx.lines[2].kind, LineKind::Continuation);
        assert_eq!(ctx.lines[3].keyword(), Some("USER"));
    }

    #[test]
    fn continued_user_word_is_not_an_instruction() {
        let ctx = FileContext::new("RUN echo \\\n  USER root");
        assert!(!ctx.has_user());
    }

    #[test]
    fn named_stage_detection() {
        assert!(FileContext::new("FROM rust:1 AS build\nFROM debian").has_named_stage());
        assert!(!FileContext::new("FROM rust:1\nRUN echo AS x").has_named_stage());
    }

    #[test]
    fn first_from_line() {
        let ctx = FileContext::new("# syntax=docker/dockerfile:1\nARG V=1\nFROM node:${V}\n");
        assert_eq!(ctx.first_from().map(|l| l.number), Some(3));
        assert!(FileContext::new("RUN x").first_from().is_none());
    }

    #[test]
    fn crlf_is_stripped_from_text() {
        let ctx = FileContext::new("FROM a\r\nUSER b\r\n");
        assert_eq!(ctx.lines[0].text, "FROM a");
        assert_eq!(ctx.line_count(), 2);
    }
}
