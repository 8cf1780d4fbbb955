use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

mod cd;
mod exit;
mod status;

pub use cd::CdCommand;
pub use exit::ExitCommand;
pub use status::StatusCommand;

use crate::core::expand::substitute_all;
use crate::core::state::ShellState;
use crate::process::{Launcher, ProcessError};

pub const COMMENT_MARKER: char = '#';
/// Program name, 512 arguments, two redirection pairs and `&`.
pub const MAX_WORDS: usize = 518;

#[derive(Debug)]
pub enum CommandError {
    InvalidArguments(String),
    ChangeDirectory { path: PathBuf, source: io::Error },
    HomeDirNotFound,
    Process(ProcessError),
    Io(io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::InvalidArguments(msg) => write!(f, "invalid arguments: {}", msg),
            CommandError::ChangeDirectory { path, source } => {
                write!(f, "cd: {}: {}", path.display(), source)
            }
            CommandError::HomeDirNotFound => write!(f, "cd: home directory not found"),
            CommandError::Process(err) => write!(f, "{}", err),
            CommandError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        CommandError::Io(err)
    }
}

impl From<ProcessError> for CommandError {
    fn from(err: ProcessError) -> Self {
        CommandError::Process(err)
    }
}

/// What the main loop does after a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct CommandContext<'a> {
    pub state: &'a mut ShellState,
    pub out: &'a mut dyn Write,
}

pub trait Command {
    fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<Flow, CommandError>;
}

#[derive(Debug, Clone)]
enum Builtin {
    Exit(ExitCommand),
    Status(StatusCommand),
    Cd(CdCommand),
}

impl Command for Builtin {
    fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        match self {
            Builtin::Exit(cmd) => cmd.execute(args, ctx),
            Builtin::Status(cmd) => cmd.execute(args, ctx),
            Builtin::Cd(cmd) => cmd.execute(args, ctx),
        }
    }
}

/// Routes a tokenized command line to a built-in or to the [`Launcher`].
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    builtins: BTreeMap<&'static str, Builtin>,
    launcher: Launcher,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        let mut builtins = BTreeMap::new();
        builtins.insert("exit", Builtin::Exit(ExitCommand::new()));
        builtins.insert("status", Builtin::Status(StatusCommand::new()));
        builtins.insert("cd", Builtin::Cd(CdCommand::new()));

        Self {
            builtins,
            launcher: Launcher::new(),
        }
    }

    pub fn dispatch(
        &self,
        mut words: Vec<String>,
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        substitute_all(&mut words, state.shell_pid());

        let Some(first) = words.first() else {
            return Ok(Flow::Continue);
        };
        if first.starts_with(COMMENT_MARKER) {
            return Ok(Flow::Continue);
        }
        if words.len() > MAX_WORDS {
            return Err(CommandError::InvalidArguments(format!(
                "{} words given, at most {} allowed",
                words.len(),
                MAX_WORDS
            )));
        }

        if let Some(builtin) = self.builtins.get(first.as_str()) {
            let mut ctx = CommandContext { state, out };
            return builtin.execute(&words[1..], &mut ctx);
        }

        self.launcher.launch(words, state, out)?;
        Ok(Flow::Continue)
    }
}
