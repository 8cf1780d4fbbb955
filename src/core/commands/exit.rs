use super::{Command, CommandContext, CommandError, Flow};
use crate::process::reaper;

/// Kills and reports every background job, then ends the main loop.
#[derive(Debug, Clone, Default)]
pub struct ExitCommand;

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(&self, _args: &[String], ctx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        reaper::shutdown(&mut ctx.state.registry, &mut *ctx.out)?;
        Ok(Flow::Exit)
    }
}
