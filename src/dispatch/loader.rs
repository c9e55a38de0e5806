//! Command resolution by name.
//!
//! Commands are found through factories rather than by reflecting on type
//! names:
//! - a [`Namespace`] maps top-level names to factories; the
//!   [`CommandLoader`] searches its namespaces in registration order
//! - a command registers its own children in [`Subcommands`] from its
//!   `init` hook, so each command module carries its own subtree
//! - the application may register top-level factories the same way; those
//!   are tried before the namespaces

use std::fmt;

use super::command::Command;
use crate::error::{Error, Result};

/// Builds a fresh command instance.
pub type CommandFactory = Box<dyn Fn() -> Box<dyn Command>>;

/// A named, ordered set of top-level command factories.
pub struct Namespace {
    name: String,
    factories: Vec<(String, CommandFactory)>,
}

impl Namespace {
    /// Create an empty namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factories: Vec::new(),
        }
    }

    /// Register a factory. A later registration under the same name replaces
    /// the earlier one.
    pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Command> + 'static,
    {
        let name = name.into();
        self.factories.retain(|(existing, _)| *existing != name);
        self.factories.push((name, Box::new(factory)));
        self
    }

    /// Namespace name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a factory.
    pub fn get(&self, name: &str) -> Option<&CommandFactory> {
        self.factories
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, factory)| factory)
    }

    /// Registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.iter().map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("commands", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// The child subcommands a command (or the application) makes reachable.
///
/// Names keep registration order. Children of a command carry their own
/// factory. At the top level the application may also just declare a name,
/// which is then resolved through the loader's namespaces.
#[derive(Default)]
pub struct Subcommands {
    entries: Vec<(String, Option<CommandFactory>)>,
}

impl Subcommands {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a child with its factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Command> + 'static,
    {
        self.insert(name.into(), Some(Box::new(factory)));
    }

    /// Make a name reachable without a local factory.
    pub fn declare(&mut self, name: impl Into<String>) {
        self.insert(name.into(), None);
    }

    fn insert(&mut self, name: String, factory: Option<CommandFactory>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((name, factory)),
        }
    }

    /// Whether `name` is a subcommand at this level.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    /// The command list, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// The locally registered factory for `name`, if any.
    pub fn factory(&self, name: &str) -> Option<&CommandFactory> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .and_then(|(_, factory)| factory.as_ref())
    }

    /// Number of reachable names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no subcommands are reachable.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Subcommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Resolves command names to factories.
#[derive(Debug, Default)]
pub struct CommandLoader {
    namespaces: Vec<Namespace>,
}

impl CommandLoader {
    /// Create a loader that searches `namespaces` in order.
    pub fn new(namespaces: Vec<Namespace>) -> Self {
        Self { namespaces }
    }

    /// Add a namespace after the existing ones.
    pub fn add_namespace(&mut self, namespace: Namespace) {
        self.namespaces.push(namespace);
    }

    /// Namespaces in search order.
    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// Find the factory for `name`.
    ///
    /// With a `parent`, only the parent's own children are searched. Without
    /// one, the top-level namespaces are searched and the first match wins.
    pub fn resolve<'s>(
        &'s self,
        name: &str,
        parent: Option<&'s Subcommands>,
    ) -> Result<&'s CommandFactory> {
        let found = match parent {
            Some(children) => children.factory(name),
            None => self.namespaces.iter().find_map(|ns| {
                let factory = ns.get(name);
                if factory.is_some() {
                    tracing::trace!(command = name, namespace = ns.name(), "resolved");
                }
                factory
            }),
        };
        found.ok_or_else(|| Error::CommandNotFound {
            name: name.to_string(),
        })
    }

    /// Resolve and construct.
    pub fn load(&self, name: &str, parent: Option<&Subcommands>) -> Result<Box<dyn Command>> {
        self.resolve(name, parent).map(|factory| factory())
    }

    /// Find a top-level factory. A factory the application registered in
    /// `registered` wins over the namespaces.
    pub fn resolve_toplevel<'s>(
        &'s self,
        name: &str,
        registered: &'s Subcommands,
    ) -> Result<&'s CommandFactory> {
        match registered.factory(name) {
            Some(factory) => {
                tracing::trace!(command = name, "resolved from application");
                Ok(factory)
            }
            None => self.resolve(name, None),
        }
    }

    /// Resolve at the top level and construct.
    pub fn load_toplevel(&self, name: &str, registered: &Subcommands) -> Result<Box<dyn Command>> {
        self.resolve_toplevel(name, registered).map(|factory| factory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{CommandResult, Context};

    struct Named(&'static str);

    impl Command for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn execute(
            &mut self,
            _ctx: &mut Context<'_>,
            _args: &[String],
        ) -> anyhow::Result<CommandResult> {
            Ok(CommandResult::success())
        }
    }

    #[test]
    fn first_namespace_wins() {
        let loader = CommandLoader::new(vec![
            Namespace::new("app").register("help", || Box::new(Named("app-help"))),
            Namespace::new("builtin").register("help", || Box::new(Named("builtin-help"))),
        ]);
        assert_eq!(loader.load("help", None).unwrap().name(), "app-help");
    }

    #[test]
    fn later_namespaces_are_searched() {
        let mut loader = CommandLoader::default();
        loader.add_namespace(Namespace::new("app"));
        loader.add_namespace(
            Namespace::new("builtin").register("list", || Box::new(Named("list"))),
        );
        assert_eq!(loader.load("list", None).unwrap().name(), "list");
    }

    #[test]
    fn unknown_name_is_command_not_found() {
        let loader = CommandLoader::default();
        let err = loader.load("bundle", None).err().unwrap();
        assert!(matches!(err, Error::CommandNotFound { ref name } if name == "bundle"));
    }

    #[test]
    fn parent_scope_ignores_toplevel_namespaces() {
        let loader = CommandLoader::new(vec![
            Namespace::new("app").register("install", || Box::new(Named("top-install"))),
        ]);
        let mut children = Subcommands::new();
        children.register("status", || Box::new(Named("status")));

        assert_eq!(loader.load("status", Some(&children)).unwrap().name(), "status");
        assert!(loader.load("install", Some(&children)).is_err());
    }

    #[test]
    fn declared_child_without_factory_is_not_found() {
        let loader = CommandLoader::default();
        let mut children = Subcommands::new();
        children.declare("ghost");
        assert!(children.contains("ghost"));
        assert!(loader.load("ghost", Some(&children)).is_err());
    }

    #[test]
    fn application_factory_wins_at_toplevel() {
        let loader = CommandLoader::new(vec![
            Namespace::new("app").register("greet", || Box::new(Named("namespace-greet"))),
        ]);
        let mut toplevel = Subcommands::new();
        toplevel.register("greet", || Box::new(Named("app-greet")));
        toplevel.declare("other");

        let greet = loader.load_toplevel("greet", &toplevel).unwrap();
        assert_eq!(greet.name(), "app-greet");
        assert!(matches!(
            loader.load_toplevel("other", &toplevel).err().unwrap(),
            Error::CommandNotFound { ref name } if name == "other"
        ));
    }

    #[test]
    fn declared_toplevel_name_falls_back_to_namespaces() {
        let loader = CommandLoader::new(vec![
            Namespace::new("app").register("greet", || Box::new(Named("namespace-greet"))),
        ]);
        let mut toplevel = Subcommands::new();
        toplevel.declare("greet");
        assert_eq!(
            loader.load_toplevel("greet", &toplevel).unwrap().name(),
            "namespace-greet"
        );
    }

    #[test]
    fn subcommands_keep_order_and_replace_in_place() {
        let mut subs = Subcommands::new();
        subs.declare("list");
        subs.declare("help");
        subs.register("list", || Box::new(Named("list")));
        assert_eq!(subs.names(), vec!["list", "help"]);
        assert!(subs.factory("list").is_some());
        assert!(subs.factory("help").is_none());
        assert_eq!(subs.len(), 2);
    }

    #[test]
    fn namespace_register_replaces() {
        let ns = Namespace::new("app")
            .register("a", || Box::new(Named("first")))
            .register("b", || Box::new(Named("b")))
            .register("a", || Box::new(Named("second")));
        assert_eq!(ns.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(ns.get("a").unwrap()().name(), "second");
    }
}
