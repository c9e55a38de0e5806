//! The embedding application.

use super::builtins::HELP;
use super::command::{CommandResult, Context};
use super::loader::Subcommands;
use super::options::OptionSpecCollection;
use crate::error::Result;

/// Hooks an embedding application provides to the dispatcher.
///
/// The application behaves like the root command: it owns the root option
/// spec and the top-level subcommand names, and executes when no subcommand
/// was given.
pub trait Application {
    /// Program name, used in help output.
    fn name(&self) -> &str;

    /// One-line description of the program.
    fn brief(&self) -> &str {
        ""
    }

    /// Register application-level options. They are parsed before any
    /// subcommand token.
    fn options(&self, _spec: &mut OptionSpecCollection) -> Result<()> {
        Ok(())
    }

    /// Register top-level subcommand names. `list` and `help` are already
    /// declared when this runs.
    fn init(&mut self, _subcommands: &mut Subcommands) {}

    /// Runs once application options are parsed.
    fn prepare(&mut self, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs when no subcommand was given. Defaults to the `help` command.
    fn execute(&mut self, ctx: &mut Context<'_>, args: &[String]) -> anyhow::Result<CommandResult> {
        let mut help = ctx.loader().load_toplevel(HELP, ctx.toplevel())?;
        help.execute(ctx, args)
    }
}
