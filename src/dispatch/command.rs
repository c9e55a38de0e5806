//! The command capability.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait every dispatchable unit implements
//! - [`Context`] handed to lifecycle hooks
//! - [`CommandResult`] for uniform result reporting
//! - [`Lifecycle`] tracking where a command instance is in its run

use std::fmt;

use super::loader::{CommandLoader, Subcommands};
use super::options::{OptionSpecCollection, ParsedOptions};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// The dispatcher drives each resolved command through
/// `options` → `init` → `prepare` → `execute` (leaf only) → `finish`
/// (ancestors only).
pub trait Command {
    /// Name the command is registered under.
    fn name(&self) -> &str;

    /// One-line description shown by `list` and `help`.
    fn brief(&self) -> &str {
        ""
    }

    /// Register the options this command accepts.
    fn options(&self, _spec: &mut OptionSpecCollection) -> Result<()> {
        Ok(())
    }

    /// Register child subcommands.
    fn init(&mut self, _subcommands: &mut Subcommands) {}

    /// Setup that runs once this command's own options are parsed, before any
    /// child is resolved.
    fn prepare(&mut self, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// The command's main action. Only the deepest resolved command runs it.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Options, UI and loader for this run
    /// * `args` - Every positional argument collected across the command path
    fn execute(&mut self, ctx: &mut Context<'_>, args: &[String]) -> anyhow::Result<CommandResult>;

    /// Teardown, run on ancestors after the leaf executed.
    fn finish(&mut self, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Result of command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Exit status for the process. Codes outside `0..=255` become 1, and a
    /// failure never exits with 0.
    pub fn process_exit_code(&self) -> u8 {
        match u8::try_from(self.exit_code) {
            Ok(0) if !self.success => 1,
            Ok(code) => code,
            Err(_) => 1,
        }
    }
}

/// Where a command instance is in its run. Transitions are strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Lifecycle {
    Constructed,
    Initialized,
    OptionsBound,
    Prepared,
    Executed,
    Finished,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Constructed => "constructed",
            Self::Initialized => "initialized",
            Self::OptionsBound => "options bound",
            Self::Prepared => "prepared",
            Self::Executed => "executed",
            Self::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Everything a lifecycle hook can see during one run.
pub struct Context<'a> {
    ui: &'a mut dyn UserInterface,
    loader: &'a CommandLoader,
    toplevel: &'a Subcommands,
    app_options: &'a ParsedOptions,
    options: &'a ParsedOptions,
    path: &'a [String],
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        ui: &'a mut dyn UserInterface,
        loader: &'a CommandLoader,
        toplevel: &'a Subcommands,
        app_options: &'a ParsedOptions,
        options: &'a ParsedOptions,
        path: &'a [String],
    ) -> Self {
        Self {
            ui,
            loader,
            toplevel,
            app_options,
            options,
            path,
        }
    }

    /// Output surface for the run.
    pub fn ui(&mut self) -> &mut dyn UserInterface {
        &mut *self.ui
    }

    /// The loader the dispatcher resolves commands with.
    pub fn loader(&self) -> &'a CommandLoader {
        self.loader
    }

    /// Top-level subcommand names registered by the application.
    pub fn toplevel(&self) -> &'a Subcommands {
        self.toplevel
    }

    /// Options parsed for the application itself.
    pub fn app_options(&self) -> &'a ParsedOptions {
        self.app_options
    }

    /// Options parsed for the command receiving this context.
    pub fn options(&self) -> &'a ParsedOptions {
        self.options
    }

    /// Names of the resolved commands, root first.
    pub fn path(&self) -> &'a [String] {
        self.path
    }
}
