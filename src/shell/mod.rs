use std::io::{self, Write};

use log::debug;

use crate::{
    core::{
        commands::{CommandDispatcher, CommandError, Flow},
        config::ShellConfig,
        state::ShellState,
    },
    error::ShellError,
    highlight::Painter,
    input::{tokenize, LineReader, ReadOutcome, MAX_LINE_LENGTH},
    process::{reaper, SignalGuard},
};

/// The interactive loop: reap, read, substitute, dispatch, repeat.
pub struct Shell<R: LineReader> {
    reader: R,
    dispatcher: CommandDispatcher,
    state: ShellState,
    config: ShellConfig,
    painter: Painter,
    out: Box<dyn Write>,
    signal_guard: Option<SignalGuard>,
}

impl<R: LineReader> Shell<R> {
    pub fn new(config: ShellConfig, reader: R) -> Self {
        Shell {
            reader,
            dispatcher: CommandDispatcher::new(),
            state: ShellState::new(),
            painter: Painter::new(config.color),
            config,
            out: Box::new(io::stdout()),
            signal_guard: None,
        }
    }

    /// Send reports and built-in output somewhere other than stdout.
    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    pub fn install_signal_handlers(&mut self) -> Result<(), ShellError> {
        if self.signal_guard.is_none() {
            self.signal_guard = Some(self.state.signals.install()?);
        }
        Ok(())
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// Run until `exit`, end of input, or a failed read. Returns the shell's
    /// exit code, which is 1 only when the reader broke.
    pub fn run(&mut self) -> Result<i32, ShellError> {
        loop {
            self.reap()?;

            let line = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("end of input, shutting down");
                    self.shutdown()?;
                    break;
                }
                Err(e) => {
                    // only `ReadOutcome::Retry` is retried
                    if !self.config.quiet {
                        self.report(&e);
                    }
                    self.shutdown()?;
                    return Ok(1);
                }
            };

            match self.execute_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => self.report(&e),
            }
        }
        Ok(0)
    }

    pub fn execute_line(&mut self, line: &str) -> Result<Flow, ShellError> {
        if line.len() > MAX_LINE_LENGTH {
            return Err(CommandError::InvalidArguments(format!(
                "line is {} characters long, at most {} allowed",
                line.len(),
                MAX_LINE_LENGTH
            ))
            .into());
        }

        let words = tokenize(line);
        Ok(self
            .dispatcher
            .dispatch(words, &mut self.state, &mut *self.out)?)
    }

    /// Report background jobs that finished since the last call.
    pub fn reap(&mut self) -> Result<usize, ShellError> {
        Ok(reaper::sweep(&mut self.state.registry, &mut *self.out)?)
    }

    pub fn shutdown(&mut self) -> Result<(), ShellError> {
        Ok(reaper::shutdown(&mut self.state.registry, &mut *self.out)?)
    }

    fn next_line(&mut self) -> Result<Option<String>, ShellError> {
        loop {
            match self.reader.read_line(&self.config.prompt)? {
                ReadOutcome::Line(line) => return Ok(Some(line)),
                ReadOutcome::Retry => continue,
                ReadOutcome::EndOfInput => return Ok(None),
            }
        }
    }

    fn report(&self, err: &ShellError) {
        eprintln!("{}", self.painter.error(&format!("jobsh: {}", err)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedReader;
    use crate::process::ExitStatus;

    fn shell(lines: &[&str]) -> Shell<ScriptedReader> {
        Shell::new(ShellConfig::default(), ScriptedReader::new(lines.iter().copied()))
            .with_output(Box::new(io::sink()))
    }

    #[test]
    fn test_run_until_end_of_input() {
        let mut shell = shell(&["true", "false"]);
        assert_eq!(shell.run().unwrap(), 0);
        assert_eq!(shell.state().last_status, ExitStatus::Exited(1));
    }

    #[test]
    fn test_exit_stops_reading() {
        let mut shell = shell(&["exit", "false"]);
        assert_eq!(shell.run().unwrap(), 0);
        assert_eq!(shell.state().last_status, ExitStatus::Exited(0));
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let mut shell = shell(&["cd /nonexistent/jobsh", "jobsh-missing-binary", "sh -c exit"]);
        assert_eq!(shell.run().unwrap(), 0);
        assert_eq!(shell.state().last_status, ExitStatus::Exited(0));
    }

    struct BrokenReader {
        lines: Vec<&'static str>,
        reads: usize,
    }

    impl LineReader for BrokenReader {
        fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome, ShellError> {
            self.reads += 1;
            match self.lines.pop() {
                Some(line) => Ok(ReadOutcome::Line(line.to_string())),
                None => Err(io::Error::from_raw_os_error(libc::EIO).into()),
            }
        }
    }

    #[test]
    fn test_read_error_shuts_down_instead_of_spinning() {
        let config = ShellConfig {
            quiet: true,
            ..ShellConfig::default()
        };
        let reader = BrokenReader {
            lines: vec!["sleep 30 &"],
            reads: 0,
        };
        let mut shell = Shell::new(config, reader).with_output(Box::new(io::sink()));

        assert_eq!(shell.run().unwrap(), 1);
        assert_eq!(shell.reader.reads, 2);
        assert!(shell.state().registry.is_empty());
    }

    #[test]
    fn test_overlong_line_is_rejected() {
        let mut shell = shell(&[]);
        let line = format!("echo {}", "x".repeat(MAX_LINE_LENGTH));
        assert!(matches!(
            shell.execute_line(&line),
            Err(ShellError::Command(CommandError::InvalidArguments(_)))
        ));
    }
}
