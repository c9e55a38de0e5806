//! Built-in commands.
//!
//! `list` and `help` are declared at the top level of every run and the
//! dispatcher always searches their namespace after the application's, so
//! an application namespace can shadow either one.

pub mod help;
pub mod list;

pub use help::HelpCommand;
pub use list::{command_entries, CommandEntry, ListCommand};

use super::loader::Namespace;

/// Name of the built-in command listing.
pub const LIST: &str = "list";

/// Name of the built-in help command.
pub const HELP: &str = "help";

/// Namespace holding the built-in commands.
pub fn builtins() -> Namespace {
    Namespace::new("builtin")
        .register(LIST, || Box::new(ListCommand::new()))
        .register(HELP, || Box::new(HelpCommand::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_list_and_help() {
        let ns = builtins();
        assert_eq!(ns.name(), "builtin");
        assert_eq!(ns.names().collect::<Vec<_>>(), vec![LIST, HELP]);
        assert_eq!(ns.get(HELP).unwrap()().name(), HELP);
    }
}
