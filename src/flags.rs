use crate::error::ShellError;

#[derive(Debug, Clone, Copy)]
enum FlagKind {
    Help,
    Version,
    Quiet,
    Debug,
    Prompt,
    Command,
}

struct FlagSpec {
    kind: FlagKind,
    short: &'static str,
    long: &'static str,
    value: Option<&'static str>,
    description: &'static str,
}

const FLAG_SPECS: &[FlagSpec] = &[
    FlagSpec {
        kind: FlagKind::Help,
        short: "-h",
        long: "--help",
        value: None,
        description: "Print this help message",
    },
    FlagSpec {
        kind: FlagKind::Version,
        short: "-v",
        long: "--version",
        value: None,
        description: "Show version information",
    },
    FlagSpec {
        kind: FlagKind::Quiet,
        short: "-q",
        long: "--quiet",
        value: None,
        description: "Suppress log output",
    },
    FlagSpec {
        kind: FlagKind::Debug,
        short: "-d",
        long: "--debug",
        value: None,
        description: "Enable debug output",
    },
    FlagSpec {
        kind: FlagKind::Prompt,
        short: "-p",
        long: "--prompt",
        value: Some("TEXT"),
        description: "Prompt shown before each command line",
    },
    FlagSpec {
        kind: FlagKind::Command,
        short: "-c",
        long: "--command",
        value: Some("LINE"),
        description: "Run one command line and exit",
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    pub help: bool,
    pub version: bool,
    pub quiet: bool,
    pub debug: bool,
    pub prompt: Option<String>,
    pub command: Option<String>,
}

impl Flags {
    pub fn parse(args: &[String]) -> Result<Self, ShellError> {
        let mut flags = Flags::default();
        let mut args = args.iter();

        while let Some(arg) = args.next() {
            let spec = FLAG_SPECS
                .iter()
                .find(|spec| arg == spec.short || arg == spec.long)
                .ok_or_else(|| ShellError::Flag(format!("unknown flag {}", arg)))?;

            let mut value = || {
                args.next()
                    .cloned()
                    .ok_or_else(|| ShellError::Flag(format!("flag {} requires a value", arg)))
            };

            match spec.kind {
                FlagKind::Help => flags.help = true,
                FlagKind::Version => flags.version = true,
                FlagKind::Quiet => flags.quiet = true,
                FlagKind::Debug => flags.debug = true,
                FlagKind::Prompt => flags.prompt = Some(value()?),
                FlagKind::Command => flags.command = Some(value()?),
            }
        }

        Ok(flags)
    }

    pub fn print_help(&self) {
        println!("Usage: jobsh [OPTIONS]");
        println!("\nOptions:");
        for spec in FLAG_SPECS {
            let long = match spec.value {
                Some(value) => format!("{} {}", spec.long, value),
                None => spec.long.to_string(),
            };
            println!("  {}, {:<18} {}", spec.short, long, spec.description);
        }
    }
}
