use crate::process::{ExitStatus, ProcessRegistry, SignalModeController};

/// Everything the built-ins and the launcher share across command lines.
#[derive(Debug)]
pub struct ShellState {
    pub registry: ProcessRegistry,
    pub signals: SignalModeController,
    /// Termination of the most recent external foreground command.
    pub last_status: ExitStatus,
    shell_pid: u32,
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            registry: ProcessRegistry::new(),
            signals: SignalModeController::new(),
            last_status: ExitStatus::default(),
            shell_pid: std::process::id(),
        }
    }

    pub fn shell_pid(&self) -> u32 {
        self.shell_pid
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}
