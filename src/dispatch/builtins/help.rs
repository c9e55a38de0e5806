//! Help command implementation.
//!
//! `help` with no arguments lists the top-level commands. `help a b` walks
//! the command path `a b` through the same loader the dispatcher uses and
//! shows that command's description, options and children.

use crate::dispatch::{Command, CommandResult, Context, OptionSpecCollection, Subcommands};
use crate::error::Error;
use super::list::{command_entries, listing_theme, render_entries};

/// The help command implementation.
#[derive(Debug, Default)]
pub struct HelpCommand;

impl HelpCommand {
    /// Create a new help command.
    pub fn new() -> Self {
        Self
    }

    fn overview(&self, ctx: &mut Context<'_>) -> CommandResult {
        let theme = listing_theme(ctx.ui());
        let entries = command_entries(ctx.loader(), ctx.toplevel(), None);

        ctx.ui().message("Commands:");
        for line in render_entries(&entries, &theme) {
            ctx.ui().message(&line);
        }
        ctx.ui()
            .show_hint("Run 'help <command>' for a command's options and subcommands.");
        CommandResult::success()
    }

    fn describe(&self, ctx: &mut Context<'_>, path: &[String]) -> anyhow::Result<CommandResult> {
        let loader = ctx.loader();

        // Children of the most recently resolved command.
        let mut scope: Option<Subcommands> = None;
        let mut target: Option<Box<dyn Command>> = None;

        for name in path {
            let known = match &scope {
                Some(children) => children.contains(name),
                None => ctx.toplevel().contains(name),
            };
            let loaded = if !known {
                Err(Error::CommandNotFound { name: name.clone() })
            } else if let Some(children) = &scope {
                loader.load(name, Some(children))
            } else {
                loader.load_toplevel(name, ctx.toplevel())
            };
            let mut command = match loaded {
                Ok(command) => command,
                Err(err) => {
                    ctx.ui().error(&err.to_string());
                    return Ok(CommandResult::failure(1));
                }
            };

            let mut children = Subcommands::new();
            command.init(&mut children);
            scope = Some(children);
            target = Some(command);
        }

        let (Some(command), Some(children)) = (target, scope) else {
            return Ok(self.overview(ctx));
        };

        let mut spec = OptionSpecCollection::new();
        command.options(&mut spec)?;

        let theme = listing_theme(ctx.ui());
        ctx.ui().show_header(&path.join(" "));
        if !command.brief().is_empty() {
            ctx.ui().message(command.brief());
        }

        if !spec.is_empty() {
            ctx.ui().message("");
            ctx.ui().message("Options:");
            let width = spec.iter().map(|s| s.usage().len()).max().unwrap_or(0);
            for option in spec.iter() {
                ctx.ui().message(&format!(
                    "  {:width$}  {}",
                    option.usage(),
                    option.description()
                ));
            }
        }

        if !children.is_empty() {
            ctx.ui().message("");
            ctx.ui().message("Commands:");
            let entries = command_entries(loader, &children, Some(&children));
            for line in render_entries(&entries, &theme) {
                ctx.ui().message(&line);
            }
        }

        Ok(CommandResult::success())
    }
}

impl Command for HelpCommand {
    fn name(&self) -> &str {
        super::HELP
    }

    fn brief(&self) -> &str {
        "Show help for a command"
    }

    fn execute(
        &mut self,
        ctx: &mut Context<'_>,
        args: &[String],
    ) -> anyhow::Result<CommandResult> {
        if args.is_empty() {
            return Ok(self.overview(ctx));
        }
        self.describe(ctx, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::builtins::{builtins, HELP, LIST};
    use crate::dispatch::{CommandLoader, Namespace, ParsedOptions};
    use crate::ui::MockUI;

    struct Pack;
    struct Install;
    struct Status;
    struct Direct;

    impl Command for Pack {
        fn name(&self) -> &str {
            "pack"
        }

        fn brief(&self) -> &str {
            "Pack sources into an archive"
        }

        fn options(&self, spec: &mut OptionSpecCollection) -> crate::Result<()> {
            spec.add("output:", "Archive to write")?;
            spec.add("c|compress?", "Compression type")?;
            Ok(())
        }

        fn init(&mut self, subcommands: &mut Subcommands) {
            subcommands.register("install", || Box::new(Install));
            subcommands.register("status", || Box::new(Status));
        }

        fn execute(&mut self, _: &mut Context<'_>, _: &[String]) -> anyhow::Result<CommandResult> {
            Ok(CommandResult::success())
        }
    }

    impl Command for Install {
        fn name(&self) -> &str {
            "install"
        }

        fn brief(&self) -> &str {
            "Install the archive"
        }

        fn options(&self, spec: &mut OptionSpecCollection) -> crate::Result<()> {
            spec.add("f|force", "Overwrite")?;
            Ok(())
        }

        fn execute(&mut self, _: &mut Context<'_>, _: &[String]) -> anyhow::Result<CommandResult> {
            Ok(CommandResult::success())
        }
    }

    impl Command for Status {
        fn name(&self) -> &str {
            "status"
        }

        fn execute(&mut self, _: &mut Context<'_>, _: &[String]) -> anyhow::Result<CommandResult> {
            Ok(CommandResult::success())
        }
    }

    impl Command for Direct {
        fn name(&self) -> &str {
            "direct"
        }

        fn brief(&self) -> &str {
            "Registered by the application"
        }

        fn execute(&mut self, _: &mut Context<'_>, _: &[String]) -> anyhow::Result<CommandResult> {
            Ok(CommandResult::success())
        }
    }

    fn loader() -> CommandLoader {
        CommandLoader::new(vec![
            Namespace::new("demo")
                .register("pack", || Box::new(Pack))
                .register("status", || Box::new(Status)),
            builtins(),
        ])
    }

    fn toplevel() -> Subcommands {
        let mut subs = Subcommands::new();
        for name in [LIST, HELP, "pack", "status"] {
            subs.declare(name);
        }
        subs.register("direct", || Box::new(Direct));
        subs
    }

    fn run_help(args: &[&str]) -> (CommandResult, MockUI) {
        let loader = loader();
        let toplevel = toplevel();
        let options = ParsedOptions::new();
        let path = vec![HELP.to_string()];
        let mut ui = MockUI::new();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

        let result = {
            let mut ctx = Context::new(&mut ui, &loader, &toplevel, &options, &options, &path);
            HelpCommand::new().execute(&mut ctx, &args).unwrap()
        };
        (result, ui)
    }

    #[test]
    fn bare_help_lists_toplevel_commands() {
        let (result, ui) = run_help(&[]);
        assert!(result.success);
        assert!(ui.has_message("Commands:"));
        assert!(ui.has_message("Pack sources into an archive"));
        assert!(ui.has_message("Show help for a command"));
        assert!(ui.has_message("Registered by the application"));
        assert!(ui.has_hint("help <command>"));
    }

    #[test]
    fn help_for_command_shows_options() {
        let (result, ui) = run_help(&["pack"]);
        assert!(result.success);
        assert_eq!(ui.headers(), &["pack".to_string()]);
        assert!(ui.has_message("Options:"));
        assert!(ui.has_message("--output <VALUE>"));
        assert!(ui.has_message("-c, --compress[=VALUE]"));
    }

    #[test]
    fn help_walks_nested_path() {
        let (result, ui) = run_help(&["pack", "install"]);
        assert!(result.success);
        assert_eq!(ui.headers(), &["pack install".to_string()]);
        assert!(ui.has_message("-f, --force"));
    }

    #[test]
    fn help_lists_children() {
        let (_, ui) = run_help(&["pack"]);
        assert!(ui.has_message("Commands:"));
        assert!(ui.has_message("Install the archive"));
        assert!(ui.has_message("status"));
    }

    #[test]
    fn help_for_application_registered_command() {
        let (result, ui) = run_help(&["direct"]);
        assert!(result.success);
        assert_eq!(ui.headers(), &["direct".to_string()]);
        assert!(ui.has_message("Registered by the application"));
    }

    #[test]
    fn help_for_unknown_command_fails() {
        let (result, ui) = run_help(&["pakc"]);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("Command 'pakc' not found"));
    }

    #[test]
    fn help_does_not_reach_siblings_through_children() {
        let (result, ui) = run_help(&["pack", "direct"]);
        assert!(!result.success);
        assert!(ui.has_error("direct"));
    }
}
