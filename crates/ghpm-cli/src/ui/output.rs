//! Terminal implementation of the core [`Reporter`].

use crossterm::style::Stylize;
use ghpm_core::Reporter;

use super::theme::Theme;

/// Prints progress messages to the terminal.
///
/// Info and section lines go to stdout and are dropped in quiet mode;
/// warnings and errors go to stderr and are always shown.
#[derive(Debug, Clone, Default)]
pub struct Output {
    theme: Theme,
    quiet: bool,
}

impl Output {
    /// Create a new output handle.
    pub fn new(quiet: bool) -> Self {
        Self {
            theme: Theme::default(),
            quiet,
        }
    }

    /// Theme in use.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

impl Reporter for Output {
    fn section(&self, title: &str) {
        if self.quiet {
            return;
        }
        println!();
        println!(
            "{} {}",
            title.bold(),
            "─".repeat(self.theme.layout.rule_width).with(self.theme.colors.header)
        );
    }

    fn info(&self, msg: &str) {
        if self.quiet {
            return;
        }
        println!("  {} {}", self.theme.icons.info, msg);
    }

    fn success(&self, msg: &str) {
        if self.quiet {
            return;
        }
        println!(
            "  {} {}",
            self.theme.icons.success.with(self.theme.colors.success),
            msg
        );
    }

    fn warning(&self, msg: &str) {
        eprintln!(
            "  {} {}",
            self.theme.icons.warning.with(self.theme.colors.warning),
            msg.with(self.theme.colors.warning)
        );
    }

    fn error(&self, msg: &str) {
        eprintln!(
            "  {} {}",
            self.theme.icons.error.with(self.theme.colors.error),
            msg.with(self.theme.colors.error)
        );
    }
}
