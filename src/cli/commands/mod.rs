//! Command implementations.
//!
//! Each command implements the [`Command`](crate::dispatch::Command) trait.
//! These belong to the demo application; `list` and `help` live in
//! [`dispatch::builtins`](crate::dispatch::builtins).

pub mod bundle;
pub mod compile;

pub use bundle::{BundleCommand, BundleSettings, InstallCommand, StatusCommand};
pub use compile::CompileCommand;
