use std::fmt;
use std::io;

use libc::{c_int, WEXITSTATUS, WIFEXITED, WIFSIGNALED, WNOHANG, WTERMSIG};

use super::Pid;

/// How a child process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    Signaled(i32),
}

impl Default for ExitStatus {
    fn default() -> Self {
        ExitStatus::Exited(0)
    }
}

impl ExitStatus {
    /// Decode a raw `waitpid` status word. Stopped and continued children
    /// have not terminated and decode to `None`.
    pub fn from_raw(status: c_int) -> Option<Self> {
        if WIFEXITED(status) {
            Some(ExitStatus::Exited(WEXITSTATUS(status)))
        } else if WIFSIGNALED(status) {
            Some(ExitStatus::Signaled(WTERMSIG(status)))
        } else {
            None
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exit value {}", code),
            ExitStatus::Signaled(signal) => write!(f, "terminated by signal {}", signal),
        }
    }
}

/// Line printed when a background job is reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub pid: Pid,
    pub status: ExitStatus,
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "background pid {} is done: {}", self.pid, self.status)
    }
}

fn waitpid(pid: Pid, flags: c_int) -> io::Result<(Pid, c_int)> {
    let mut status: c_int = 0;
    let waited = unsafe { libc::waitpid(pid, &mut status, flags) };
    if waited == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok((waited, status))
}

/// Block until `pid` terminates.
///
/// A caught signal makes `waitpid` return early with `EINTR`; the child has
/// not exited in that case and the wait is simply re-entered.
pub fn wait_blocking(pid: Pid) -> io::Result<ExitStatus> {
    loop {
        match waitpid(pid, 0) {
            Ok((_, raw)) => {
                if let Some(status) = ExitStatus::from_raw(raw) {
                    return Ok(status);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Non-blocking check; `Ok(None)` while the child is still running.
pub fn try_wait(pid: Pid) -> io::Result<Option<ExitStatus>> {
    loop {
        match waitpid(pid, WNOHANG) {
            Ok((0, _)) => return Ok(None),
            Ok((_, raw)) => return Ok(ExitStatus::from_raw(raw)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
