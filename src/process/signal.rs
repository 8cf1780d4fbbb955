use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use libc::{c_int, sighandler_t, SIGINT, SIGTSTP, SIG_DFL, SIG_IGN};
use log::debug;
use signal_hook::SigId;

use super::ProcessError;

/// Whether a trailing `&` is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Normal,
    ForegroundOnly,
}

/// A completed mode toggle, carrying the text announced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    EnteredForegroundOnly,
    ExitedForegroundOnly,
}

impl ModeChange {
    pub const fn message(self) -> &'static str {
        match self {
            ModeChange::EnteredForegroundOnly => {
                "\nEntering foreground-only mode (& is now ignored)\n"
            }
            ModeChange::ExitedForegroundOnly => "\nExiting foreground-only mode\n",
        }
    }
}

#[derive(Debug, Default)]
struct ModeFlags {
    foreground_only: AtomicBool,
    waiting: AtomicBool,
    stop_pending: AtomicBool,
}

/// Owns the execution mode and the stop-signal bookkeeping.
///
/// Everything here is plain atomics so the same code runs from the signal
/// handler and from the main loop.
#[derive(Debug, Clone, Default)]
pub struct SignalModeController {
    flags: Arc<ModeFlags>,
}

impl SignalModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ExecutionMode {
        if self.flags.foreground_only.load(Ordering::SeqCst) {
            ExecutionMode::ForegroundOnly
        } else {
            ExecutionMode::Normal
        }
    }

    pub fn background_allowed(&self) -> bool {
        self.mode() == ExecutionMode::Normal
    }

    /// Handle a stop signal. Returns the toggle that happened, or `None` when
    /// a foreground wait is in progress and the toggle was deferred.
    pub fn on_stop_signal(&self) -> Option<ModeChange> {
        if self.flags.waiting.load(Ordering::SeqCst) {
            self.flags.stop_pending.store(true, Ordering::SeqCst);
            None
        } else {
            Some(self.toggle())
        }
    }

    pub fn enter_wait_region(&self) {
        self.flags.stop_pending.store(false, Ordering::SeqCst);
        self.flags.waiting.store(true, Ordering::SeqCst);
    }

    /// Leave the foreground wait and apply a toggle deferred during it.
    pub fn exit_wait_region(&self) -> Option<ModeChange> {
        self.flags.waiting.store(false, Ordering::SeqCst);
        if self.flags.stop_pending.swap(false, Ordering::SeqCst) {
            Some(self.toggle())
        } else {
            None
        }
    }

    pub fn stop_pending(&self) -> bool {
        self.flags.stop_pending.load(Ordering::SeqCst)
    }

    fn toggle(&self) -> ModeChange {
        let was_foreground_only = self.flags.foreground_only.fetch_xor(true, Ordering::SeqCst);
        if was_foreground_only {
            ModeChange::ExitedForegroundOnly
        } else {
            ModeChange::EnteredForegroundOnly
        }
    }

    /// Route SIGTSTP to this controller and make the shell immune to SIGINT.
    ///
    /// The stop handler is removed again when the returned guard drops.
    pub fn install(&self) -> Result<SignalGuard, ProcessError> {
        ignore_interrupts()?;

        let controller = self.clone();
        let id = unsafe {
            signal_hook::low_level::register(SIGTSTP, move || {
                if let Some(change) = controller.on_stop_signal() {
                    write_raw(change.message());
                }
            })
        }
        .map_err(|e| ProcessError::Signal(format!("cannot handle SIGTSTP: {}", e)))?;

        debug!("stop signal handler installed");
        Ok(SignalGuard { id })
    }
}

pub struct SignalGuard {
    id: SigId,
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        signal_hook::low_level::unregister(self.id);
    }
}

static INTERRUPT_HANDLER: AtomicBool = AtomicBool::new(false);

fn ignore_interrupts() -> Result<(), ProcessError> {
    if INTERRUPT_HANDLER.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    ctrlc::set_handler(|| {}).map_err(|e| ProcessError::Signal(format!("cannot handle SIGINT: {}", e)))
}

// Only async-signal-safe calls are allowed here.
fn write_raw(message: &str) {
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            message.as_ptr() as *const libc::c_void,
            message.len(),
        );
    }
}

fn set_disposition(signal: c_int, handler: sighandler_t) -> io::Result<()> {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handler;
        libc::sigemptyset(&mut action.sa_mask);
        if libc::sigaction(signal, &action, std::ptr::null_mut()) == -1 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// Signal dispositions for a freshly forked child, applied right before exec.
///
/// Foreground children can be interrupted, background children cannot, and
/// no child reacts to the stop signal.
pub fn reset_child_signals(background: bool) -> io::Result<()> {
    set_disposition(SIGINT, if background { SIG_IGN } else { SIG_DFL })?;
    set_disposition(SIGTSTP, SIG_IGN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_normal_mode() {
        let controller = SignalModeController::new();
        assert_eq!(controller.mode(), ExecutionMode::Normal);
        assert!(controller.background_allowed());
        assert!(!controller.stop_pending());
    }

    #[test]
    fn test_toggle_at_prompt() {
        let controller = SignalModeController::new();

        assert_eq!(
            controller.on_stop_signal(),
            Some(ModeChange::EnteredForegroundOnly)
        );
        assert_eq!(controller.mode(), ExecutionMode::ForegroundOnly);
        assert!(!controller.background_allowed());

        assert_eq!(
            controller.on_stop_signal(),
            Some(ModeChange::ExitedForegroundOnly)
        );
        assert_eq!(controller.mode(), ExecutionMode::Normal);
    }

    #[test]
    fn test_toggle_deferred_during_wait() {
        let controller = SignalModeController::new();

        controller.enter_wait_region();
        assert_eq!(controller.on_stop_signal(), None);
        assert!(controller.stop_pending());
        assert_eq!(controller.mode(), ExecutionMode::Normal);

        assert_eq!(
            controller.exit_wait_region(),
            Some(ModeChange::EnteredForegroundOnly)
        );
        assert!(!controller.stop_pending());
        assert_eq!(controller.mode(), ExecutionMode::ForegroundOnly);
    }

    #[test]
    fn test_wait_without_signal() {
        let controller = SignalModeController::new();
        controller.enter_wait_region();
        assert_eq!(controller.exit_wait_region(), None);
        assert_eq!(controller.mode(), ExecutionMode::Normal);
    }

    #[test]
    fn test_repeated_signals_during_wait_toggle_once() {
        let controller = SignalModeController::new();

        controller.enter_wait_region();
        controller.on_stop_signal();
        controller.on_stop_signal();

        assert_eq!(
            controller.exit_wait_region(),
            Some(ModeChange::EnteredForegroundOnly)
        );
        assert_eq!(controller.exit_wait_region(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let controller = SignalModeController::new();
        let handler_side = controller.clone();

        handler_side.on_stop_signal();
        assert_eq!(controller.mode(), ExecutionMode::ForegroundOnly);
    }

    #[test]
    fn test_announcement_text() {
        assert_eq!(
            ModeChange::EnteredForegroundOnly.message(),
            "\nEntering foreground-only mode (& is now ignored)\n"
        );
        assert_eq!(
            ModeChange::ExitedForegroundOnly.message(),
            "\nExiting foreground-only mode\n"
        );
    }
}
