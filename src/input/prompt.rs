use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::{LineReader, ReadOutcome};
use crate::error::ShellError;

/// Interactive reader backed by rustyline.
pub struct Prompt {
    editor: DefaultEditor,
}

impl Prompt {
    pub fn new() -> Result<Self, ShellError> {
        let mut editor = DefaultEditor::new()?;
        editor.set_auto_add_history(true);
        Ok(Prompt { editor })
    }
}

impl LineReader for Prompt {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            // Ctrl-C at the prompt just gives a fresh prompt
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Retry),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::EndOfInput),
            Err(ReadlineError::Io(e)) if e.kind() == std::io::ErrorKind::Interrupted => {
                Ok(ReadOutcome::Retry)
            }
            Err(ReadlineError::Errno(errno)) if errno as i32 == libc::EINTR => {
                Ok(ReadOutcome::Retry)
            }
            Err(e) => Err(e.into()),
        }
    }
}
