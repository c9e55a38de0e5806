//! Command dispatching.
//!
//! [`CommandDispatcher::run`] walks the argument vector once:
//!
//! 1. application options are parsed up front
//! 2. each token naming a subcommand at the current depth pushes that
//!    command (options rescoped to it, `init` and `prepare` run); any other
//!    token becomes a positional argument
//! 3. the deepest command executes with every positional argument
//! 4. its ancestors are finished innermost first

use super::application::Application;
use super::builtins::{builtins, HELP, LIST};
use super::command::{Command, CommandResult, Context, Lifecycle};
use super::loader::{CommandLoader, Namespace, Subcommands};
use super::options::{OptionSpecCollection, ParsedOptions};
use super::parser::ContinuousOptionParser;
use crate::error::{Error, Result};
use crate::ui::UserInterface;

/// Where the dispatcher finds top-level commands.
///
/// The built-in `list` and `help` namespace is always searched after every
/// namespace added here.
#[derive(Debug, Default)]
pub struct DispatcherConfig {
    namespaces: Vec<Namespace>,
}

impl DispatcherConfig {
    /// Create a configuration with no namespaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace. Namespaces are searched in the order they are added.
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Names of the resolved commands, root first.
    pub path: Vec<String>,

    /// Positional arguments handed to `execute`.
    pub arguments: Vec<String>,

    /// What the executing command (or the application) returned.
    pub result: CommandResult,
}

impl RunReport {
    /// Number of commands that were pushed.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// One resolved command on the stack.
struct Frame {
    name: String,
    command: Box<dyn Command>,
    subcommands: Subcommands,
    options: ParsedOptions,
    state: Lifecycle,
}

impl Frame {
    fn new(name: String, command: Box<dyn Command>) -> Self {
        tracing::debug!(command = %name, "constructed");
        Self {
            name,
            command,
            subcommands: Subcommands::new(),
            options: ParsedOptions::new(),
            state: Lifecycle::Constructed,
        }
    }

    fn transition(&mut self, next: Lifecycle) {
        debug_assert!(next > self.state, "{}: {} -> {}", self.name, self.state, next);
        tracing::debug!(command = %self.name, state = %next, "lifecycle");
        self.state = next;
    }

    /// The child names reachable from this command.
    fn command_list(&self) -> &Subcommands {
        &self.subcommands
    }
}

/// State shared by every lifecycle call of one run.
struct Session<'r> {
    loader: &'r CommandLoader,
    toplevel: Subcommands,
    app_options: ParsedOptions,
    stack: Vec<Frame>,
    path: Vec<String>,
}

impl<'r> Session<'r> {
    /// Resolve, construct, and prepare the command named `name`.
    fn push(
        &mut self,
        name: String,
        parser: &mut ContinuousOptionParser,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let factory = match self.stack.last() {
            Some(parent) => self.loader.resolve(&name, Some(parent.command_list()))?,
            None => self.loader.resolve_toplevel(&name, &self.toplevel)?,
        };
        let mut frame = Frame::new(name, factory());

        let mut spec = OptionSpecCollection::new();
        frame.command.options(&mut spec)?;
        parser.set_options(spec);

        frame.command.init(&mut frame.subcommands);
        frame.transition(Lifecycle::Initialized);

        frame.options = parser.continue_parse()?;
        frame.transition(Lifecycle::OptionsBound);

        self.path.push(frame.name.clone());
        let mut ctx = Context::new(
            ui,
            self.loader,
            &self.toplevel,
            &self.app_options,
            &frame.options,
            &self.path,
        );
        frame
            .command
            .prepare(&mut ctx)
            .map_err(|source| Error::Execution {
                command: frame.name.clone(),
                source,
            })?;
        frame.transition(Lifecycle::Prepared);

        self.stack.push(frame);
        Ok(())
    }

    /// Whether `token` names a subcommand at the current depth.
    fn is_subcommand(&self, token: &str) -> bool {
        match self.stack.last() {
            Some(frame) => frame.command_list().contains(token),
            None => self.toplevel.contains(token),
        }
    }

    /// Call `finish` on `frames` innermost first, returning the first failure.
    fn finish_all(
        frames: &mut [Frame],
        ui: &mut dyn UserInterface,
        loader: &CommandLoader,
        toplevel: &Subcommands,
        app_options: &ParsedOptions,
        path: &[String],
    ) -> Option<Error> {
        let mut first = None;
        for frame in frames.iter_mut().rev() {
            let mut ctx = Context::new(ui, loader, toplevel, app_options, &frame.options, path);
            match frame.command.finish(&mut ctx) {
                Ok(()) => frame.transition(Lifecycle::Finished),
                Err(source) => {
                    tracing::warn!(command = %frame.name, error = %source, "finish failed");
                    first.get_or_insert(Error::Finish {
                        command: frame.name.clone(),
                        source,
                    });
                }
            }
        }
        first
    }
}

/// Resolves argument vectors into command chains and runs them.
pub struct CommandDispatcher {
    loader: CommandLoader,
}

impl CommandDispatcher {
    /// Create a dispatcher from its configuration.
    pub fn new(config: DispatcherConfig) -> Self {
        let mut loader = CommandLoader::new(config.namespaces);
        loader.add_namespace(builtins());
        Self { loader }
    }

    /// The loader commands are resolved with.
    pub fn loader(&self) -> &CommandLoader {
        &self.loader
    }

    /// Dispatch `argv` (program name excluded) for `app`.
    ///
    /// Parse and resolution failures abort before anything executes; commands
    /// already prepared are finished before the error is returned. An
    /// `execute` failure still finishes the ancestors, and is reported ahead
    /// of any `finish` failure.
    pub fn run<I, S>(
        &self,
        app: &mut dyn Application,
        argv: I,
        ui: &mut dyn UserInterface,
    ) -> Result<RunReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parser = ContinuousOptionParser::new(argv);

        let mut toplevel = Subcommands::new();
        toplevel.declare(LIST);
        toplevel.declare(HELP);
        app.init(&mut toplevel);

        let mut app_spec = OptionSpecCollection::new();
        app.options(&mut app_spec)?;
        parser.set_options(app_spec);
        let app_options = parser.continue_parse()?;
        tracing::debug!(app = app.name(), options = app_options.len(), "parsed app options");

        let mut session = Session {
            loader: &self.loader,
            toplevel,
            app_options,
            stack: Vec::new(),
            path: Vec::new(),
        };

        {
            let mut ctx = Context::new(
                ui,
                session.loader,
                &session.toplevel,
                &session.app_options,
                &session.app_options,
                &session.path,
            );
            app.prepare(&mut ctx).map_err(|source| Error::Execution {
                command: app.name().to_string(),
                source,
            })?;
        }

        let mut arguments = Vec::new();
        while let Some(token) = parser.current_argument() {
            if !parser.is_terminated() && session.is_subcommand(token) {
                let name = token.to_string();
                parser.advance();
                tracing::trace!(token = %name, depth = session.stack.len(), "subcommand");
                if let Err(err) = session.push(name, &mut parser, ui) {
                    Self::abort(&mut session, ui);
                    return Err(err);
                }
            } else if let Some(token) = parser.advance() {
                tracing::trace!(token = %token, "positional");
                arguments.push(token);
            }
        }

        let Session {
            loader,
            toplevel,
            app_options,
            mut stack,
            path,
        } = session;

        let outcome = match stack.split_last_mut() {
            Some((leaf, _)) => {
                tracing::debug!(command = %leaf.name, args = arguments.len(), "executing");
                let mut ctx =
                    Context::new(ui, loader, &toplevel, &app_options, &leaf.options, &path);
                let outcome = leaf.command.execute(&mut ctx, &arguments);
                leaf.transition(Lifecycle::Executed);
                outcome.map_err(|source| Error::Execution {
                    command: leaf.name.clone(),
                    source,
                })
            }
            None => {
                tracing::debug!(app = app.name(), args = arguments.len(), "executing application");
                let mut ctx =
                    Context::new(ui, loader, &toplevel, &app_options, &app_options, &path);
                app.execute(&mut ctx, &arguments)
                    .map_err(|source| Error::Execution {
                        command: app.name().to_string(),
                        source,
                    })
            }
        };

        let ancestors = stack.len().saturating_sub(1);
        let finish_error = Session::finish_all(
            &mut stack[..ancestors],
            ui,
            loader,
            &toplevel,
            &app_options,
            &path,
        );

        let result = outcome?;
        if let Some(err) = finish_error {
            return Err(err);
        }

        Ok(RunReport {
            path,
            arguments,
            result,
        })
    }

    fn abort(session: &mut Session<'_>, ui: &mut dyn UserInterface) {
        tracing::debug!(depth = session.stack.len(), "aborting run");
        let cleanup = Session::finish_all(
            &mut session.stack,
            ui,
            session.loader,
            &session.toplevel,
            &session.app_options,
            &session.path,
        );
        if let Some(err) = cleanup {
            tracing::warn!(error = %err, "cleanup after aborted run failed");
        }
    }
}
