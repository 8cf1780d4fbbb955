use std::io::Write;

use log::{debug, warn};

use super::registry::ProcessRegistry;
use super::status::{self, Completion};
use super::ProcessError;

/// Report and forget every background job that has terminated since the last
/// sweep. Jobs still running stay registered. Returns how many were reaped.
pub fn sweep(registry: &mut ProcessRegistry, out: &mut dyn Write) -> Result<usize, ProcessError> {
    let mut reaped = 0;

    for pid in registry.snapshot() {
        match status::try_wait(pid) {
            Ok(None) => continue,
            Ok(Some(status)) => {
                writeln!(out, "{}", Completion { pid, status })?;
                debug!("reaped background pid {}: {}", pid, status);
            }
            Err(e) => {
                // nothing left to wait for, so stop tracking it
                warn!("lost track of background pid {}: {}", pid, e);
            }
        }
        registry.remove(pid)?;
        reaped += 1;
    }

    out.flush()?;
    Ok(reaped)
}

/// Kill every background job, wait for each one, and report it the same way
/// [`sweep`] would. The registry is empty afterwards.
pub fn shutdown(registry: &mut ProcessRegistry, out: &mut dyn Write) -> Result<(), ProcessError> {
    for pid in registry.snapshot() {
        if unsafe { libc::kill(pid, libc::SIGKILL) } == -1 {
            debug!(
                "kill({}) failed: {}",
                pid,
                std::io::Error::last_os_error()
            );
        }

        match status::wait_blocking(pid) {
            Ok(status) => writeln!(out, "{}", Completion { pid, status })?,
            Err(e) => warn!("cannot collect background pid {}: {}", pid, e),
        }
        registry.remove(pid)?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ExitStatus, Pid};
    use std::process::Command;
    use std::thread;
    use std::time::{Duration, Instant};

    fn spawn(program: &str, args: &[&str]) -> Pid {
        Command::new(program).args(args).spawn().unwrap().id() as Pid
    }

    #[test]
    fn test_sweep_leaves_running_jobs() {
        let mut registry = ProcessRegistry::new();
        let pid = spawn("sleep", &["5"]);
        registry.add(pid);

        let mut out = Vec::new();
        assert_eq!(sweep(&mut registry, &mut out).unwrap(), 0);
        assert!(registry.contains(pid));
        assert!(out.is_empty());

        shutdown(&mut registry, &mut Vec::new()).unwrap();
    }

    #[test]
    fn test_sweep_reports_finished_job() {
        let mut registry = ProcessRegistry::new();
        let pid = spawn("sh", &["-c", "exit 4"]);
        registry.add(pid);

        let mut out = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(10);
        while registry.contains(pid) && Instant::now() < deadline {
            sweep(&mut registry, &mut out).unwrap();
            thread::sleep(Duration::from_millis(20));
        }

        assert!(registry.is_empty());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("background pid {} is done: exit value 4\n", pid)
        );
    }

    #[test]
    fn test_sweep_forgets_unknown_pid() {
        let mut registry = ProcessRegistry::new();
        registry.add(i32::MAX);

        let mut out = Vec::new();
        assert_eq!(sweep(&mut registry, &mut out).unwrap(), 1);
        assert!(registry.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn test_shutdown_kills_everything() {
        let mut registry = ProcessRegistry::new();
        let first = spawn("sleep", &["30"]);
        let second = spawn("sleep", &["30"]);
        registry.add(first);
        registry.add(second);

        let mut out = Vec::new();
        shutdown(&mut registry, &mut out).unwrap();

        assert!(registry.is_empty());
        let report = String::from_utf8(out).unwrap();
        for pid in [first, second] {
            assert!(report.contains(&format!(
                "background pid {} is done: {}\n",
                pid,
                ExitStatus::Signaled(libc::SIGKILL)
            )));
        }
        assert_eq!(report.lines().count(), 2);
    }
}
