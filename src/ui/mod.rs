//! User-facing output.
//!
//! This module provides:
//! - [`UserInterface`] trait so commands never print directly
//! - [`TerminalUI`] for the terminal, styled with [`Theme`]
//! - [`MockUI`] capturing output for tests
//!
//! # Example
//!
//! ```
//! use strata::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_header("demo");
//! ui.success("Done!");
//! assert!(ui.has_success("Done!"));
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, Theme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every output mode.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a contextual hint (e.g. which command to run next).
    fn show_hint(&mut self, hint: &str);

    /// Check if running attached to a terminal.
    fn is_interactive(&self) -> bool;
}
