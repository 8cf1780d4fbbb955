use std::collections::VecDeque;

use super::{LineReader, ReadOutcome};
use crate::error::ShellError;

/// Feeds a fixed list of lines, then reports end of input. Used for
/// `--command` and for driving the shell without a terminal.
#[derive(Debug, Clone, Default)]
pub struct ScriptedReader {
    lines: VecDeque<String>,
}

impl ScriptedReader {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome, ShellError> {
        Ok(match self.lines.pop_front() {
            Some(line) => ReadOutcome::Line(line),
            None => ReadOutcome::EndOfInput,
        })
    }
}
