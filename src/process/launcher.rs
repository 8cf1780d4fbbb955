use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, error};

use super::signal::reset_child_signals;
use super::status::{self, ExitStatus};
use super::{Direction, Pid, ProcessError};
use crate::core::state::ShellState;

pub const BACKGROUND_MARKER: &str = "&";
pub const REDIRECT_INPUT: &str = "<";
pub const REDIRECT_OUTPUT: &str = ">";
pub const NULL_DEVICE: &str = "/dev/null";

/// A command line split into the argument vector and its trailing
/// redirection and background markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub argv: Vec<String>,
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub background: bool,
}

impl ParsedCommand {
    /// Strip a trailing `&`, then up to two trailing `< file` / `> file`
    /// pairs in either order.
    ///
    /// The `&` is always removed; it only takes effect when
    /// `background_allowed` is set.
    pub fn parse(mut words: Vec<String>, background_allowed: bool) -> Self {
        let mut parsed = ParsedCommand::default();

        if words.last().map(String::as_str) == Some(BACKGROUND_MARKER) {
            words.pop();
            parsed.background = background_allowed;
        }

        for _ in 0..2 {
            // keep at least the program name in front of the pair
            if words.len() < 3 {
                break;
            }
            let slot = match words[words.len() - 2].as_str() {
                REDIRECT_INPUT => &mut parsed.input_file,
                REDIRECT_OUTPUT => &mut parsed.output_file,
                _ => break,
            };
            let path = words.pop().map(PathBuf::from);
            words.pop();
            *slot = path;
        }

        parsed.argv = words;
        parsed
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

/// Spawns external programs and either waits on them or hands them to the
/// registry.
#[derive(Debug, Clone)]
pub struct Launcher {
    null_device: PathBuf,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher {
    pub fn new() -> Self {
        Self {
            null_device: PathBuf::from(NULL_DEVICE),
        }
    }

    pub fn launch(
        &self,
        words: Vec<String>,
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), ProcessError> {
        let parsed = ParsedCommand::parse(words, state.signals.background_allowed());
        let Some(program) = parsed.program() else {
            debug!("nothing left to run after stripping operators");
            return Ok(());
        };

        let pid = match self.spawn(program, &parsed) {
            Ok(pid) => pid,
            Err(e) if e.is_child_setup() && parsed.background => {
                // the job still exists and is reaped as `exit value 1`
                error!("{}", e);
                spawn_failed_child()?
            }
            Err(e) => {
                // a child that never got to run reports failure like one that exited 1
                if e.is_child_setup() {
                    state.last_status = ExitStatus::Exited(1);
                }
                return Err(e);
            }
        };

        if parsed.background {
            writeln!(out, "background pid is {}", pid)?;
            out.flush()?;
            state.registry.add(pid);
            Ok(())
        } else {
            self.wait_foreground(pid, state, out)
        }
    }

    fn spawn(&self, program: &str, parsed: &ParsedCommand) -> Result<Pid, ProcessError> {
        let mut command = Command::new(program);
        command.args(&parsed.argv[1..]);

        if let Some(path) = self.input_path(parsed) {
            command.stdin(Stdio::from(open_input(path)?));
        }
        if let Some(path) = self.output_path(parsed) {
            command.stdout(Stdio::from(open_output(path)?));
        }

        let background = parsed.background;
        unsafe {
            command.pre_exec(move || reset_child_signals(background));
        }

        let child = command.spawn().map_err(|source| spawn_error(program, source))?;
        let pid = child.id() as Pid;
        debug!(
            "spawned pid {} {:?} background={} stdin={:?} stdout={:?}",
            pid, parsed.argv, background, parsed.input_file, parsed.output_file
        );
        Ok(pid)
    }

    // Background jobs never read from or write to the terminal unless told to.
    fn input_path<'a>(&'a self, parsed: &'a ParsedCommand) -> Option<&'a Path> {
        match &parsed.input_file {
            Some(path) => Some(path.as_path()),
            None if parsed.background => Some(self.null_device.as_path()),
            None => None,
        }
    }

    fn output_path<'a>(&'a self, parsed: &'a ParsedCommand) -> Option<&'a Path> {
        match &parsed.output_file {
            Some(path) => Some(path.as_path()),
            None if parsed.background => Some(self.null_device.as_path()),
            None => None,
        }
    }

    fn wait_foreground(
        &self,
        pid: Pid,
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), ProcessError> {
        state.signals.enter_wait_region();
        let waited = status::wait_blocking(pid);
        if let Some(change) = state.signals.exit_wait_region() {
            debug!("applying stop signal received while waiting: {:?}", change);
            out.write_all(change.message().as_bytes())?;
        }

        let status = waited.map_err(|e| ProcessError::Wait(pid, e))?;
        debug!("foreground pid {} finished: {}", pid, status);
        if let ExitStatus::Signaled(_) = status {
            writeln!(out, "{}", status)?;
        }
        out.flush()?;

        state.last_status = status;
        Ok(())
    }
}

fn open_input(path: &Path) -> Result<File, ProcessError> {
    File::open(path).map_err(|source| ProcessError::Redirect {
        path: path.to_path_buf(),
        direction: Direction::Input,
        source,
    })
}

fn open_output(path: &Path) -> Result<File, ProcessError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o644)
        .open(path)
        .map_err(|source| ProcessError::Redirect {
            path: path.to_path_buf(),
            direction: Direction::Output,
            source,
        })
}

/// Fork a child that exits 1 straight away, standing in for a background
/// job whose redirection or exec failed.
fn spawn_failed_child() -> Result<Pid, ProcessError> {
    match unsafe { libc::fork() } {
        -1 => Err(ProcessError::Fork(io::Error::last_os_error())),
        0 => unsafe { libc::_exit(1) },
        pid => {
            debug!("stand-in child {} for a failed background job", pid);
            Ok(pid)
        }
    }
}

fn spawn_error(program: &str, source: io::Error) -> ProcessError {
    match source.raw_os_error() {
        Some(libc::EAGAIN) | Some(libc::ENOMEM) => ProcessError::Fork(source),
        _ => ProcessError::Spawn {
            program: program.to_string(),
            source,
        },
    }
}
