//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, OutputMode, Theme, UserInterface};

/// Terminal UI implementation. Warnings and errors go to stderr, everything
/// else to stdout.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: Theme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            Theme::new()
        } else {
            Theme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }

    /// Drop colors regardless of the terminal.
    pub fn without_colors(mut self) -> Self {
        self.theme = Theme::plain();
        self
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_decoration() {
            writeln!(self.out, "{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_decoration() {
            writeln!(self.out, "\n{}", self.theme.format_hint(hint)).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.out.is_term()
    }
}
