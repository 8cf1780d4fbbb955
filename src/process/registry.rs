use super::{Pid, ProcessError};

/// A child the shell spawned without waiting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundJob {
    pub pid: Pid,
}

/// Unordered set of background jobs that have not been reaped yet.
///
/// Callers that may remove entries while walking the registry iterate over
/// [`ProcessRegistry::snapshot`], never over the registry itself.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    jobs: Vec<BackgroundJob>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a freshly spawned background child.
    ///
    /// The kernel never hands out the same pid to two live children, so no
    /// duplicate check is made.
    pub fn add(&mut self, pid: Pid) {
        self.jobs.push(BackgroundJob { pid });
    }

    pub fn remove(&mut self, pid: Pid) -> Result<BackgroundJob, ProcessError> {
        let index = self
            .jobs
            .iter()
            .position(|job| job.pid == pid)
            .ok_or(ProcessError::NotTracked(pid))?;

        Ok(self.jobs.swap_remove(index))
    }

    pub fn snapshot(&self) -> Vec<Pid> {
        self.jobs.iter().map(|job| job.pid).collect()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.jobs.iter().any(|job| job.pid == pid)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
