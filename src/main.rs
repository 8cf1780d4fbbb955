use jobsh::core::config::ShellConfig;
use jobsh::error::ShellError;
use jobsh::flags::Flags;
use jobsh::input::{Prompt, ScriptedReader};
use jobsh::logger;
use jobsh::shell::Shell;
use std::{env, process};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("jobsh: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32, ShellError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let flags = Flags::parse(&args)?;

    if flags.help {
        flags.print_help();
        return Ok(0);
    }

    if flags.version {
        println!("jobsh {}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    logger::init(logger::level_for(flags.quiet, flags.debug))?;
    let config = ShellConfig::from_flags(&flags);

    match flags.command {
        Some(line) => {
            let mut shell = Shell::new(config, ScriptedReader::new([line]));
            shell.install_signal_handlers()?;
            shell.run()
        }
        None => {
            let mut shell = Shell::new(config, Prompt::new()?);
            shell.install_signal_handlers()?;
            shell.run()
        }
    }
}
