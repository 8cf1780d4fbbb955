use crate::core::commands::CommandError;
use crate::process::ProcessError;

#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Io(std::io::Error),
    Process(ProcessError),
    Command(CommandError),
    Flag(String),
    Logger(String),
}

impl ShellError {
    /// Errors after which the main loop cannot sensibly continue.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShellError::Process(ProcessError::Fork(_))
                | ShellError::Command(CommandError::Process(ProcessError::Fork(_)))
        )
    }
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<ProcessError> for ShellError {
    fn from(err: ProcessError) -> Self {
        ShellError::Process(err)
    }
}

impl From<CommandError> for ShellError {
    fn from(err: CommandError) -> Self {
        ShellError::Command(err)
    }
}

impl From<log::SetLoggerError> for ShellError {
    fn from(err: log::SetLoggerError) -> Self {
        ShellError::Logger(err.to_string())
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "Readline error: {}", e),
            ShellError::Io(e) => write!(f, "IO error: {}", e),
            ShellError::Process(e) => write!(f, "{}", e),
            ShellError::Command(e) => write!(f, "{}", e),
            ShellError::Flag(msg) => write!(f, "Flag error: {}", msg),
            ShellError::Logger(msg) => write!(f, "Logger error: {}", msg),
        }
    }
}

impl std::error::Error for ShellError {}
