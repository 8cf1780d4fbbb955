use super::{Command, CommandContext, CommandError, Flow};

/// Prints how the last external foreground command terminated.
#[derive(Debug, Clone, Default)]
pub struct StatusCommand;

impl StatusCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for StatusCommand {
    fn execute(&self, _args: &[String], ctx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        writeln!(ctx.out, "{}", ctx.state.last_status)?;
        ctx.out.flush()?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::ShellState;
    use crate::process::ExitStatus;

    fn status_line(last: ExitStatus) -> String {
        let mut state = ShellState::new();
        state.last_status = last;
        let mut out = Vec::new();
        let mut ctx = CommandContext {
            state: &mut state,
            out: &mut out,
        };

        StatusCommand::new().execute(&[], &mut ctx).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exit_value() {
        assert_eq!(status_line(ExitStatus::Exited(0)), "exit value 0\n");
        assert_eq!(status_line(ExitStatus::Exited(255)), "exit value 255\n");
    }

    #[test]
    fn test_terminated_by_signal() {
        assert_eq!(
            status_line(ExitStatus::Signaled(2)),
            "terminated by signal 2\n"
        );
    }
}
