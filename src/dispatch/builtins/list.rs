//! List command implementation.
//!
//! `list` prints the top-level commands with their one-line descriptions.

use serde::Serialize;

use crate::dispatch::{
    Command, CommandLoader, CommandResult, Context, OptionSpecCollection, Subcommands,
};
use crate::error::Result;
use crate::ui::{Theme, UserInterface};

/// One row of a command listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandEntry {
    pub name: String,
    pub brief: String,
}

/// Describe every name in `names`.
///
/// With a `parent`, names are resolved as its children. Without one, `names`
/// is the top level: factories registered in it win, the rest go through
/// the namespaces. Names that do not resolve are listed with an empty
/// description.
pub fn command_entries(
    loader: &CommandLoader,
    names: &Subcommands,
    parent: Option<&Subcommands>,
) -> Vec<CommandEntry> {
    names
        .names()
        .into_iter()
        .map(|name| {
            let command = match parent {
                Some(parent) => loader.load(name, Some(parent)),
                None => loader.load_toplevel(name, names),
            };
            CommandEntry {
                name: name.to_string(),
                brief: command
                    .map(|cmd| cmd.brief().to_string())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Styled theme on a terminal, plain otherwise.
pub(crate) fn listing_theme(ui: &dyn UserInterface) -> Theme {
    if ui.is_interactive() {
        Theme::new()
    } else {
        Theme::plain()
    }
}

/// Render entries as aligned `name  brief` lines.
pub(crate) fn render_entries(entries: &[CommandEntry], theme: &Theme) -> Vec<String> {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|entry| {
            format!(
                "  {}  {}",
                theme.key.apply_to(format!("{:width$}", entry.name)),
                theme.dim.apply_to(&entry.brief)
            )
        })
        .collect()
}

/// The list command implementation.
#[derive(Debug, Default)]
pub struct ListCommand;

impl ListCommand {
    /// Create a new list command.
    pub fn new() -> Self {
        Self
    }
}

impl Command for ListCommand {
    fn name(&self) -> &str {
        super::LIST
    }

    fn brief(&self) -> &str {
        "List available commands"
    }

    fn options(&self, spec: &mut OptionSpecCollection) -> Result<()> {
        spec.add("json", "Print the listing as JSON")?;
        Ok(())
    }

    fn execute(
        &mut self,
        ctx: &mut Context<'_>,
        _args: &[String],
    ) -> anyhow::Result<CommandResult> {
        let entries = command_entries(ctx.loader(), ctx.toplevel(), None);

        if ctx.options().is_set("json") {
            let json = serde_json::to_string_pretty(&entries)?;
            ctx.ui().message(&json);
            return Ok(CommandResult::success());
        }

        let theme = listing_theme(ctx.ui());
        for line in render_entries(&entries, &theme) {
            ctx.ui().message(&line);
        }
        Ok(CommandResult::success())
    }
}
