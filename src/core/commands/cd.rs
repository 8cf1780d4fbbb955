use super::{Command, CommandContext, CommandError, Flow};
use log::debug;
use std::env;
use std::path::PathBuf;

pub const HOME_SHORTHAND: &str = "~";

#[derive(Debug, Clone, Default)]
pub struct CdCommand;

impl CdCommand {
    pub fn new() -> Self {
        Self
    }

    /// `cd`, `cd ~` and `cd ""` all go home; anything else is taken literally.
    pub fn target(&self, args: &[String]) -> Result<PathBuf, CommandError> {
        match args.first().map(String::as_str) {
            Some(path) if !path.is_empty() && path != HOME_SHORTHAND => Ok(PathBuf::from(path)),
            _ => dirs::home_dir().ok_or(CommandError::HomeDirNotFound),
        }
    }
}

impl Command for CdCommand {
    fn execute(&self, args: &[String], _ctx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        let path = self.target(args)?;
        debug!("changing directory to {}", path.display());

        env::set_current_dir(&path)
            .map_err(|source| CommandError::ChangeDirectory { path, source })?;
        Ok(Flow::Continue)
    }
}
