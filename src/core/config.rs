use crate::flags::Flags;
use crate::highlight;

pub const DEFAULT_PROMPT: &str = ": ";

/// Runtime settings derived from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub quiet: bool,
    pub color: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            quiet: false,
            color: false,
        }
    }
}

impl ShellConfig {
    pub fn from_flags(flags: &Flags) -> Self {
        let color = !flags.quiet && highlight::stderr_supports_color();

        Self {
            prompt: flags
                .prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            quiet: flags.quiet,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt() {
        let config = ShellConfig::from_flags(&Flags::default());
        assert_eq!(config.prompt, ": ");
        assert!(!config.quiet);
    }

    #[test]
    fn test_prompt_and_quiet_from_flags() {
        let flags = Flags::parse(&["-q".to_string(), "--prompt".to_string(), "$ ".to_string()])
            .unwrap();
        let config = ShellConfig::from_flags(&flags);
        assert_eq!(config.prompt, "$ ");
        assert!(config.quiet);
    }
}
