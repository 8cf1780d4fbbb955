use std::io::IsTerminal;

use inksac::prelude::*;

pub fn stderr_supports_color() -> bool {
    std::io::stderr().is_terminal()
        && !matches!(
            check_color_support().unwrap_or(ColorSupport::NoColor),
            ColorSupport::NoColor
        )
}

/// Styles the shell's own diagnostics. Report lines and mode announcements
/// are never styled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn error(&self, message: &str) -> String {
        if !self.color {
            return message.to_string();
        }

        let style = Style::builder().foreground(Color::Red).bold().build();
        message.style(style).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_when_color_disabled() {
        let painter = Painter::new(false);
        assert_eq!(painter.error("jobsh: boom"), "jobsh: boom");
    }

    #[test]
    fn test_colored_output_keeps_text() {
        let painter = Painter::new(true);
        assert!(painter.error("jobsh: boom").contains("jobsh: boom"));
    }
}
