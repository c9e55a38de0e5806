//! Nested subcommand dispatch.
//!
//! # Architecture
//!
//! - [`options`] - Option specs and parsed values, one collection per command
//! - [`parser`] - Continuous option parser whose spec is rebound per depth
//! - [`loader`] - Namespaces and per-command child registries
//! - [`command`] - The [`Command`] trait and its lifecycle
//! - [`application`] - Hooks of the embedding application
//! - [`dispatcher`] - The resolution loop tying it together
//! - [`builtins`] - The `list` and `help` commands every dispatcher serves
//!
//! # Example
//!
//! ```
//! use strata::dispatch::{
//!     Application, Command, CommandDispatcher, CommandResult, Context, DispatcherConfig,
//!     Namespace, Subcommands,
//! };
//! use strata::ui::MockUI;
//!
//! struct Greet;
//!
//! impl Command for Greet {
//!     fn name(&self) -> &str {
//!         "greet"
//!     }
//!
//!     fn execute(&mut self, ctx: &mut Context<'_>, args: &[String]) -> anyhow::Result<CommandResult> {
//!         ctx.ui().message(&format!("hello {}", args.join(" ")));
//!         Ok(CommandResult::success())
//!     }
//! }
//!
//! struct App;
//!
//! impl Application for App {
//!     fn name(&self) -> &str {
//!         "demo"
//!     }
//!
//!     fn init(&mut self, subcommands: &mut Subcommands) {
//!         subcommands.declare("greet");
//!     }
//! }
//!
//! let dispatcher = CommandDispatcher::new(
//!     DispatcherConfig::new()
//!         .namespace(Namespace::new("demo").register("greet", || Box::new(Greet))),
//! );
//! let mut ui = MockUI::new();
//! let report = dispatcher.run(&mut App, ["greet", "world"], &mut ui).unwrap();
//!
//! assert_eq!(report.path, vec!["greet"]);
//! assert!(ui.has_message("hello world"));
//! ```

pub mod application;
pub mod builtins;
pub mod command;
pub mod dispatcher;
pub mod loader;
pub mod options;
pub mod parser;

pub use application::Application;
pub use builtins::{
    builtins, command_entries, CommandEntry, HelpCommand, ListCommand, HELP, LIST,
};
pub use command::{Command, CommandResult, Context, Lifecycle};
pub use dispatcher::{CommandDispatcher, DispatcherConfig, RunReport};
pub use loader::{CommandFactory, CommandLoader, Namespace, Subcommands};
pub use options::{OptionSpec, OptionSpecCollection, OptionValue, ParsedOptions, ValueKind};
pub use parser::{ContinuousOptionParser, END_OF_OPTIONS};
