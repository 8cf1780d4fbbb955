mod prompt;
mod script;

pub use prompt::Prompt;
pub use script::ScriptedReader;

use crate::error::ShellError;

pub const WORD_DELIMITER: char = ' ';
pub const MAX_LINE_LENGTH: usize = 2048;

/// Result of asking a [`LineReader`] for the next command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The read was interrupted by a caught signal; ask again.
    Retry,
    EndOfInput,
}

pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError>;
}

/// Split a command line on single spaces. Runs of spaces never produce empty
/// words, and a blank line produces none at all.
pub fn tokenize(line: &str) -> Vec<String> {
    line.trim_end_matches(['\n', '\r'])
        .split(WORD_DELIMITER)
        .filter(|word| !word.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_words() {
        assert_eq!(tokenize("ls -la /tmp"), vec!["ls", "-la", "/tmp"]);
        assert_eq!(tokenize("  echo   spaced  "), vec!["echo", "spaced"]);
    }

    #[test]
    fn test_tokenize_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("    ").is_empty());
        assert!(tokenize("\n").is_empty());
    }

    #[test]
    fn test_tokenize_only_splits_on_spaces() {
        assert_eq!(tokenize("a\tb c\n"), vec!["a\tb", "c"]);
    }
}
