use std::fmt;
use std::io;
use std::path::PathBuf;

pub mod launcher;
pub mod reaper;
pub mod registry;
pub mod signal;
pub mod status;

pub use launcher::{Launcher, ParsedCommand};
pub use registry::{BackgroundJob, ProcessRegistry};
pub use signal::{ExecutionMode, ModeChange, SignalGuard, SignalModeController};
pub use status::{Completion, ExitStatus};

pub type Pid = libc::pid_t;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

#[derive(Debug)]
pub enum ProcessError {
    Spawn { program: String, source: io::Error },
    Redirect { path: PathBuf, direction: Direction, source: io::Error },
    Fork(io::Error),
    Wait(Pid, io::Error),
    NotTracked(Pid),
    Signal(String),
    Io(io::Error),
}

impl ProcessError {
    /// Errors that only concern the child being set up; the shell keeps going.
    pub fn is_child_setup(&self) -> bool {
        matches!(self, ProcessError::Spawn { .. } | ProcessError::Redirect { .. })
    }
}

impl From<io::Error> for ProcessError {
    fn from(e: io::Error) -> Self {
        ProcessError::Io(e)
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Spawn { program, source } => write!(f, "{}: {}", program, source),
            ProcessError::Redirect { path, direction, source } => write!(
                f,
                "cannot open {} for {}: {}",
                path.display(),
                direction,
                source
            ),
            ProcessError::Fork(e) => write!(f, "cannot fork: {}", e),
            ProcessError::Wait(pid, e) => write!(f, "cannot wait for pid {}: {}", pid, e),
            ProcessError::NotTracked(pid) => write!(f, "pid {} is not a tracked background job", pid),
            ProcessError::Signal(msg) => write!(f, "Signal error: {}", msg),
            ProcessError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {}
