//! Detection of consecutive same-keyword instruction runs.

use crate::context::{LineKind, SourceLine};

/// First line of a closed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClosedRun {
    pub(crate) line: usize,
    pub(crate) content: String,
}

/// Buffers consecutive instructions with one tracked keyword.
///
/// Blank, comment and continuation lines neither extend nor break a run.
#[derive(Debug)]
pub(crate) struct RunAccumulator {
    keyword: &'static str,
    first: Option<ClosedRun>,
    length: usize,
}

impl RunAccumulator {
    pub(crate) fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            first: None,
            length: 0,
        }
    }

    /// Feeds one line. Returns the run it closed, if that run had more than one instruction.
    pub(crate) fn feed(&mut self, line: &SourceLine<'_>) -> Option<ClosedRun> {
        let LineKind::Instruction(keyword) = &line.kind else {
            return None;
        };
        if keyword == self.keyword {
            if self.first.is_none() {
                self.first = Some(ClosedRun {
                    line: line.number,
                    content: line.trimmed().to_string(),
                });
            }
            self.length += 1;
            None
        } else {
            self.close()
        }
    }

    /// Closes the open run at end of input.
    pub(crate) fn finish(&mut self) -> Option<ClosedRun> {
        self.close()
    }

    fn close(&mut self) -> Option<ClosedRun> {
        let length = std::mem::take(&mut self.length);
        let first = self.first.take()?;
        (length > 1).then_some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileContext;

    fn closed_runs(content: &str) -> Vec<usize> {
        let ctx = FileContext::new(content);
        let mut acc = RunAccumulator::new("RUN");
        let mut runs: Vec<usize> = ctx
            .lines
            .iter()
            .filter_map(|l| acc.feed(l))
            .map(|r| r.line)
            .collect();
        runs.extend(acc.finish().map(|r| r.line));
        runs
    }

    #[test]
    fn three_runs_close_once_at_first_line() {
        assert_eq!(closed_runs("FROM a\nRUN x\nRUN y\nRUN z\nUSER b"), vec![2]);
    }

    #[test]
    fn run_open_at_end_of_file_closes() {
        assert_eq!(closed_runs("FROM a\nRUN x\nRUN y"), vec![2]);
    }

    #[test]
    fn separated_runs_close_separately() {
        assert_eq!(
            closed_runs("RUN a\nRUN b\nCOPY . .\nRUN c\nRUN d\n"),
            vec![1, 4]
        );
    }

    #[test]
    fn single_run_never_closes_as_issue() {
        assert!(closed_runs("FROM a\nRUN x\nUSER b\nRUN y").is_empty());
    }

    #[test]
    fn blank_comment_and_continuation_do_not_break_runs() {
        assert_eq!(
            closed_runs("RUN a \\\n  && b\n\n# note\nRUN c\nENV X=1"),
            vec![1]
        );
    }
}
