use std::io::Write;

use log::{LevelFilter, Log};

use crate::error::ShellError;

pub struct SimpleLogger<W: Send + Sync>
where
    for<'a> &'a W: Write,
{
    target: W,
    prefix: &'static str,
}

impl<W: Send + Sync> Log for SimpleLogger<W>
where
    for<'a> &'a W: Write,
{
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        let _ = writeln!(&self.target, "{}{}", self.prefix, record.args());
    }

    fn flush(&self) {
        let _ = (&self.target).flush();
    }
}

impl SimpleLogger<std::io::Stderr> {
    pub fn to_stderr(prefix: &'static str) -> Self {
        SimpleLogger {
            target: std::io::stderr(),
            prefix,
        }
    }
}

pub fn level_for(quiet: bool, debug: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Off
    } else if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

pub fn init(level: LevelFilter) -> Result<(), ShellError> {
    log::set_boxed_logger(Box::new(SimpleLogger::to_stderr("jobsh: ")))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, RwLock};

    #[derive(Clone, Default)]
    struct Captured {
        inner: Arc<RwLock<String>>,
    }

    impl io::Write for &'_ Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.inner
                .write()
                .unwrap()
                .push_str(std::str::from_utf8(buf).unwrap());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_level_selection() {
        assert_eq!(level_for(false, false), LevelFilter::Warn);
        assert_eq!(level_for(false, true), LevelFilter::Debug);
        assert_eq!(level_for(true, true), LevelFilter::Off);
    }

    #[test]
    fn test_prefixed_lines() {
        let target = Captured::default();
        let logger = SimpleLogger {
            target: target.clone(),
            prefix: "jobsh: ",
        };
        let record = log::Record::builder()
            .args(format_args!("reaped pid 12"))
            .level(log::Level::Error)
            .build();

        logger.log(&record);

        assert_eq!(*target.inner.read().unwrap(), "jobsh: reaped pid 12\n");
    }
}
