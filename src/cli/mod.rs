//! The `strata` demo application.
//!
//! # Architecture
//!
//! - [`app`] - The demo application's hooks and top-level names
//! - [`commands`] - The demo commands

pub mod app;
pub mod commands;

pub use app::{demo_dispatcher, GlobalFlags, StrataApp};
pub use commands::{BundleCommand, CompileCommand};
